//! Shared utilities for use cases.
//!
//! Cancellation polling and poison-tolerant locking used by the discussion
//! orchestrator.

use crate::use_cases::run_discussion::RunDiscussionError;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunDiscussionError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), RunDiscussionError> {
    if token.is_cancelled() {
        return Err(RunDiscussionError::Cancelled);
    }
    Ok(())
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Guarded state here is plain data that is valid after every statement, so
/// a poisoned lock carries nothing half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        let token = CancellationToken::new();
        assert!(check_cancelled(&token).is_ok());
        token.cancel();
        assert!(check_cancelled(&token).unwrap_err().is_cancelled());
    }
}
