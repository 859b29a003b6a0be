//! Cooperative cancellation of report builds.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::Error;

/// A flag shared between the caller and a running report.
///
/// Clones share the same flag. The pipeline checks it between passes, so a
/// report stops at the next pass boundary after [CancellationToken::cancel].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [CancellationToken::cancel] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// # Errors
    /// Returns [Error::Cancelled] once the token has been cancelled.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;
    use crate::Error;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let clone = token.clone();

        assert_eq!(clone.check(), Ok(()));

        token.cancel();

        assert!(clone.is_cancelled());
        assert_eq!(clone.check(), Err(Error::Cancelled));
    }
}
