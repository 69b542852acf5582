//! Event listeners.

use crate::event::Event;
use std::fmt;
use std::sync::Arc;

/// Receives events from widgets.
///
/// Implemented for every `Fn(&mut Event) + Send + Sync` closure.
pub trait Listener: Send + Sync {
    fn handle_event(&self, event: &mut Event);
}

impl<F> Listener for F
where
    F: Fn(&mut Event) + Send + Sync,
{
    fn handle_event(&self, event: &mut Event) {
        self(event)
    }
}

/// Shared reference to a listener.
///
/// Equality is identity: two refs are equal when they point at the same
/// allocation, regardless of what the listener does. Keep a clone of the ref
/// you registered to remove it later.
#[derive(Clone)]
pub struct ListenerRef(Arc<dyn Listener>);

impl ListenerRef {
    pub fn new(listener: impl Listener + 'static) -> Self {
        Self(Arc::new(listener))
    }

    pub fn from_arc(listener: Arc<dyn Listener>) -> Self {
        Self(listener)
    }

    #[inline]
    pub fn handle_event(&self, event: &mut Event) {
        self.0.handle_event(event);
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for ListenerRef {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ListenerRef {}

impl fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerRef({:p})", self.addr())
    }
}

impl<L: Listener + 'static> From<Arc<L>> for ListenerRef {
    fn from(listener: Arc<L>) -> Self {
        Self(listener)
    }
}
