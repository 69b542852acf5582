//! Owning-thread check.

use crate::error::{WidgetError, WidgetResult};
use std::thread::{self, ThreadId};

/// Remembers which thread owns a widget and rejects calls from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadGuard {
    owner: ThreadId,
}

impl ThreadGuard {
    pub fn new(owner: ThreadId) -> Self {
        Self { owner }
    }

    /// Guard owned by the calling thread.
    pub fn current() -> Self {
        Self::new(thread::current().id())
    }

    #[inline]
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    #[inline]
    pub fn is_valid_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Fails with [`WidgetError::InvalidThreadAccess`] off the owning thread.
    #[inline]
    pub fn check(&self) -> WidgetResult<()> {
        if self.is_valid_thread() {
            Ok(())
        } else {
            Err(WidgetError::InvalidThreadAccess)
        }
    }
}
