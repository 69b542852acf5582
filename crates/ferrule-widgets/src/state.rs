//! Widget state flags and the lifecycle they encode.

use bitflags::bitflags;

bitflags! {
    /// Per-widget state bits.
    ///
    /// Lifecycle bits only ever go from clear to set. Attribute bits describe
    /// the widget and may be toggled while it is live.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        const NONE            = 0;

        // Lifecycle (bits 0-2)

        /// Teardown finished. Terminal.
        const DISPOSED        = 1 << 0;
        /// Subclass resources and the native handle have been let go.
        const RELEASED        = 1 << 1;
        /// The Dispose notification has been delivered.
        const DISPOSE_SENT    = 1 << 2;

        // Attributes (bits 8-12)

        /// Property data holds named entries.
        const KEYED_DATA      = 1 << 8;
        /// The widget owns a native handle registered with its display.
        const HANDLE          = 1 << 9;
        /// The native handle belongs to someone else and must not be destroyed.
        const FOREIGN_HANDLE  = 1 << 10;
        /// The widget is queued on its display for a Skin notification.
        const SKIN_NEEDED     = 1 << 11;
        /// Pointer crossing checks include native sub-windows.
        const CHECK_SUBWINDOW = 1 << 12;
    }
}

impl StateFlags {
    /// Lifecycle flags group.
    pub const LIFECYCLE: Self = Self::DISPOSED
        .union(Self::RELEASED)
        .union(Self::DISPOSE_SENT);

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.contains(Self::DISPOSED)
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.contains(Self::RELEASED)
    }

    #[inline]
    pub fn dispose_sent(&self) -> bool {
        self.contains(Self::DISPOSE_SENT)
    }

    /// Returns true if the native handle may be destroyed on release.
    #[inline]
    pub fn owns_handle(&self) -> bool {
        self.contains(Self::HANDLE) && !self.contains(Self::FOREIGN_HANDLE)
    }

    /// The lifecycle stage these flags describe.
    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_flags(*self)
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        Self::NONE
    }
}

/// Lifecycle stage of a widget.
///
/// Stages are ordered; a widget only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Usable; no teardown has started.
    Live,
    /// Dispose listeners have been notified, resources are still held.
    DisposeSent,
    /// Resources released, final teardown pending.
    Released,
    /// Terminal.
    Disposed,
}

impl Lifecycle {
    pub fn from_flags(flags: StateFlags) -> Self {
        if flags.is_disposed() {
            Lifecycle::Disposed
        } else if flags.is_released() {
            Lifecycle::Released
        } else if flags.dispose_sent() {
            Lifecycle::DisposeSent
        } else {
            Lifecycle::Live
        }
    }
}
