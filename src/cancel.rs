//! Cooperative cancellation for long-running reductions.
//!
//! A `CancelToken` is cheap to clone; all clones observe the same flag. The
//! builder checks it between extension rounds and the reducer checks it at
//! every column boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, TopologyError};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TopologyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Check an optional token; `None` never cancels.
pub(crate) fn checkpoint(token: Option<&CancelToken>) -> Result<()> {
    match token {
        Some(t) => t.check(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(TopologyError::Cancelled)));
    }

    #[test]
    fn test_checkpoint_without_token() {
        assert!(checkpoint(None).is_ok());
    }
}
