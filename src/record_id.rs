//! Record and owner ID type definitions.

/// Alias for the identifier the record store assigns to a record.
pub type RecordId = String;

/// Alias for the identifier of the user that owns a record.
pub type OwnerId = String;
