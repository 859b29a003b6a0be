//! Creates the tables the SQLite record store reads.

use rusqlite::{Connection, Transaction as SqlTransaction};

/// Create the income, expense and khata tables if they do not exist.
///
/// `amount` has no declared type and every column except `owner_id` is
/// nullable, matching the upstream collections. Malformed rows are read as-is
/// and rejected later by the normalizers.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            amount,
            source TEXT,
            title TEXT,
            date TEXT,
            notes TEXT
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            amount,
            category TEXT,
            title TEXT,
            date TEXT,
            notes TEXT
        )",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS khata (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            type TEXT,
            person TEXT,
            amount,
            payment_method TEXT,
            date TEXT,
            notes TEXT
        )",
        (),
    )?;

    transaction.execute("CREATE INDEX IF NOT EXISTS income_owner ON income(owner_id)", ())?;
    transaction.execute("CREATE INDEX IF NOT EXISTS expense_owner ON expense(owner_id)", ())?;
    transaction.execute("CREATE INDEX IF NOT EXISTS khata_owner ON khata(owner_id)", ())?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_tables_and_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('income', 'expense', 'khata')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}
