//! The display/session a widget belongs to.

use crate::event::{Event, EventKind};
use crate::input::{BasicKeymap, Keymap};
use crate::listener::ListenerRef;
use crate::widget::Widget;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Opaque identifier of a native toolkit resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(NonZeroU64);

impl NativeHandle {
    /// Wrap a raw native pointer or id. Returns `None` for zero.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Services a widget needs from its display.
///
/// One session is owned by exactly one thread for its whole life; every
/// widget created on it inherits that owner.
pub trait Session: Send + Sync {
    fn owner_thread(&self) -> ThreadId;

    fn is_valid_thread(&self) -> bool {
        thread::current().id() == self.owner_thread()
    }

    /// Returns true if session-wide filters are registered for `kind`.
    ///
    /// Widgets without listeners still dispatch such events so the filters
    /// see them.
    fn filters(&self, kind: EventKind) -> bool;

    /// Run the session-wide filters on `event`.
    ///
    /// Returns true if a filter vetoed the event, in which case no widget
    /// listener may see it.
    fn filter_event(&self, event: &mut Event) -> bool;

    /// Deliver `event` to `listeners` synchronously, in order.
    fn send_event(&self, listeners: &[ListenerRef], event: &mut Event);

    /// Queue `event` for later delivery on the owning thread.
    fn post_event(&self, event: Event);

    /// Timestamp of the most recent native event, in milliseconds.
    fn last_event_time(&self) -> u32;

    /// Modifier state of the native event currently being processed, if any.
    fn current_input_state(&self) -> Option<u32> {
        None
    }

    fn add_widget(&self, handle: NativeHandle, widget: &Arc<Widget>);

    fn remove_widget(&self, handle: NativeHandle);

    fn find_widget(&self, handle: NativeHandle) -> Option<Arc<Widget>>;

    /// Queue `widget` for a Skin notification.
    fn add_skinnable_widget(&self, widget: &Arc<Widget>);

    /// Returns true if widgets of `kind` may be created on this session.
    fn is_valid_kind(&self, _kind: &str) -> bool {
        true
    }

    fn keymap(&self) -> &dyn Keymap {
        &BasicKeymap
    }
}
