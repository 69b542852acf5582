//! The widget core.
//!
//! A [`Widget`] is the toolkit-neutral half of every UI object: it owns the
//! lifecycle state, the listener table and the property store, and delegates
//! everything kind-specific to a [`WidgetBehavior`].
//!
//! # Threading
//!
//! Widgets are `Send + Sync` so they can be handed around, but every
//! operation except [`Widget::is_disposed`] and [`Widget::dispose`] on an
//! already disposed widget must run on the thread that owns the widget's
//! session. Calls from other threads fail with
//! [`WidgetError::InvalidThreadAccess`] before touching any state.
//!
//! # Reentrancy
//!
//! No internal lock is held while listeners or behavior hooks run. A Dispose
//! listener may dispose other widgets, or the widget being disposed.
//!
//! # Example
//!
//! ```rust
//! use ferrule_widgets::{Display, Event, EventKind, ListenerRef, Style, Widget, WidgetBehavior};
//!
//! struct Shell;
//! impl WidgetBehavior for Shell {
//!     fn kind_name(&self) -> &'static str {
//!         "Shell"
//!     }
//! }
//!
//! let display = Display::new();
//! let shell = Widget::new_root(display.clone(), Style::NONE, Shell).unwrap();
//! shell
//!     .add_dispose_listener(ListenerRef::new(|event: &mut Event| {
//!         assert_eq!(event.kind, EventKind::Dispose);
//!     }))
//!     .unwrap();
//! shell.dispose().unwrap();
//! assert!(shell.is_disposed());
//! ```

mod behavior;
mod data;
mod dispatch;
mod lifecycle;

pub use behavior::{ReskinScope, WidgetBehavior};
pub use data::{CHECK_SUBWINDOW_KEY, IS_ACTIVE_KEY, SKIN_CLASS_KEY, SKIN_ID_KEY};

use crate::error::{WidgetError, WidgetResult};
use crate::event::EventKind;
use crate::event_table::EventTable;
use crate::listener::ListenerRef;
use crate::property::PropertyData;
use crate::session::{NativeHandle, Session};
use crate::state::{Lifecycle, StateFlags};
use crate::style::{Style, check_orientation};
use crate::thread_guard::ThreadGuard;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static_assertions::assert_impl_all!(Widget: Send, Sync);

/// Process-unique identifier of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({})", self.0)
    }
}

/// Mutable widget state, guarded by one lock.
#[derive(Default)]
struct WidgetInner {
    state: StateFlags,
    style: Style,
    event_table: Option<EventTable>,
    data: PropertyData,
    handle: Option<NativeHandle>,
    /// Handle currently in the session's registry.
    registered: Option<NativeHandle>,
}

/// A UI object bound to one session and one owning thread.
pub struct Widget {
    id: WidgetId,
    pub(crate) session: Arc<dyn Session>,
    guard: ThreadGuard,
    this: Weak<Widget>,
    behavior: Box<dyn WidgetBehavior>,
    inner: Mutex<WidgetInner>,
}

impl Widget {
    /// Create a widget under `parent`.
    ///
    /// The widget joins the parent's session and inherits its orientation
    /// when `style` names none. The parent is not retained.
    ///
    /// # Errors
    ///
    /// - [`WidgetError::InvalidArgument`] if `parent` is disposed
    /// - [`WidgetError::InvalidThreadAccess`] off the parent's thread
    /// - [`WidgetError::InvalidSubclass`] if the session rejects the kind
    pub fn new(
        parent: &Widget,
        style: Style,
        behavior: impl WidgetBehavior,
    ) -> WidgetResult<Arc<Widget>> {
        let parent_style = parent.check_parent()?;
        Self::create(
            parent.session.clone(),
            Some(parent_style),
            style,
            Box::new(behavior),
            None,
        )
    }

    /// Create a top-level widget directly on `session`.
    pub fn new_root(
        session: Arc<dyn Session>,
        style: Style,
        behavior: impl WidgetBehavior,
    ) -> WidgetResult<Arc<Widget>> {
        if !session.is_valid_thread() {
            return Err(WidgetError::InvalidThreadAccess);
        }
        Self::create(session, None, style, Box::new(behavior), None)
    }

    /// Wrap a native handle created by someone else.
    ///
    /// The handle is released, never destroyed, when the widget goes away.
    pub fn adopt(
        parent: &Widget,
        style: Style,
        behavior: impl WidgetBehavior,
        handle: NativeHandle,
    ) -> WidgetResult<Arc<Widget>> {
        let parent_style = parent.check_parent()?;
        Self::create(
            parent.session.clone(),
            Some(parent_style),
            style,
            Box::new(behavior),
            Some(handle),
        )
    }

    fn create(
        session: Arc<dyn Session>,
        parent_style: Option<Style>,
        style: Style,
        behavior: Box<dyn WidgetBehavior>,
        foreign_handle: Option<NativeHandle>,
    ) -> WidgetResult<Arc<Widget>> {
        let kind = behavior.kind_name();
        if !session.is_valid_kind(kind) {
            return Err(WidgetError::InvalidSubclass { kind });
        }

        let guard = ThreadGuard::new(session.owner_thread());
        let widget = Arc::new_cyclic(|this| Widget {
            id: WidgetId::next(),
            session,
            guard,
            this: this.clone(),
            behavior,
            inner: Mutex::new(WidgetInner {
                style: check_orientation(style, parent_style),
                ..WidgetInner::default()
            }),
        });

        widget.reskin_widget();
        widget.create_widget(foreign_handle);
        tracing::debug!("Created {}", widget);
        Ok(widget)
    }

    /// Create the native side: handle, signal hookup, registry entry.
    fn create_widget(&self, foreign_handle: Option<NativeHandle>) {
        let (handle, foreign) = match foreign_handle {
            Some(handle) => (Some(handle), true),
            None => (self.behavior.create_handle(self), false),
        };
        if let Some(handle) = handle {
            let mut inner = self.inner.lock();
            inner.handle = Some(handle);
            inner.state.insert(StateFlags::HANDLE);
            if foreign {
                inner.state.insert(StateFlags::FOREIGN_HANDLE);
            }
        }
        self.behavior.hook_events(self);
        self.register();
    }

    fn register(&self) {
        let handle = {
            let mut inner = self.inner.lock();
            match inner.handle {
                Some(handle) if inner.registered.is_none() => {
                    inner.registered = Some(handle);
                    handle
                }
                _ => return,
            }
        };
        if let Some(this) = self.this.upgrade() {
            self.session.add_widget(handle, &this);
        }
    }

    /// Validate `self` as the parent of a new widget and return its style.
    fn check_parent(&self) -> WidgetResult<Style> {
        if self.is_disposed() {
            return Err(WidgetError::InvalidArgument);
        }
        self.check_widget()?;
        Ok(self.inner.lock().style)
    }

    /// Fail unless the widget is live and the caller is on its thread.
    ///
    /// Kinds built on top of the core call this first in every operation
    /// they expose.
    pub fn check_widget(&self) -> WidgetResult<()> {
        if self.is_disposed() {
            return Err(WidgetError::WidgetDisposed);
        }
        self.guard.check()
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Name of the widget kind.
    pub fn kind_name(&self) -> &'static str {
        self.behavior.kind_name()
    }

    /// The session the widget belongs to.
    ///
    /// Callable from any thread; fails only once the widget is disposed.
    pub fn session(&self) -> WidgetResult<Arc<dyn Session>> {
        if self.is_disposed() {
            return Err(WidgetError::WidgetDisposed);
        }
        Ok(self.session.clone())
    }

    /// The widget's behavior, if it is a `B`.
    pub fn behavior<B: WidgetBehavior>(&self) -> Option<&B> {
        let behavior: &dyn Any = &*self.behavior;
        behavior.downcast_ref::<B>()
    }

    pub(crate) fn behavior_type_id(&self) -> std::any::TypeId {
        let behavior: &dyn Any = &*self.behavior;
        behavior.type_id()
    }

    pub fn style(&self) -> WidgetResult<Style> {
        self.check_widget()?;
        Ok(self.inner.lock().style)
    }

    /// The native handle, while the widget holds one.
    pub fn handle(&self) -> WidgetResult<Option<NativeHandle>> {
        self.check_widget()?;
        Ok(self.inner.lock().handle)
    }

    /// Snapshot of the state flags. Not guarded.
    pub fn state(&self) -> StateFlags {
        self.inner.lock().state
    }

    /// Current lifecycle stage. Not guarded.
    pub fn lifecycle(&self) -> Lifecycle {
        self.state().lifecycle()
    }

    /// Returns true once disposal has finished. Callable from any thread.
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().state.is_disposed()
    }

    pub fn is_active(&self) -> WidgetResult<bool> {
        self.check_widget()?;
        Ok(self.behavior.is_active(self))
    }

    // -- Listeners --

    /// Register `listener` for events of `kind`.
    ///
    /// Listeners of one kind are notified in registration order.
    pub fn add_listener(&self, kind: EventKind, listener: ListenerRef) -> WidgetResult<()> {
        self.check_widget()?;
        self.inner
            .lock()
            .event_table
            .get_or_insert_with(EventTable::new)
            .hook(kind, listener);
        Ok(())
    }

    /// Remove one registration of `listener` for `kind`. Removing a listener
    /// that was never added is not an error.
    pub fn remove_listener(&self, kind: EventKind, listener: &ListenerRef) -> WidgetResult<()> {
        self.check_widget()?;
        if let Some(table) = self.inner.lock().event_table.as_mut() {
            table.unhook(kind, listener);
        }
        Ok(())
    }

    pub fn add_dispose_listener(&self, listener: ListenerRef) -> WidgetResult<()> {
        self.add_listener(EventKind::Dispose, listener)
    }

    pub fn remove_dispose_listener(&self, listener: &ListenerRef) -> WidgetResult<()> {
        self.remove_listener(EventKind::Dispose, listener)
    }

    /// Listeners registered for `kind`, in notification order.
    pub fn listeners(&self, kind: EventKind) -> WidgetResult<Vec<ListenerRef>> {
        self.check_widget()?;
        Ok(self
            .inner
            .lock()
            .event_table
            .as_ref()
            .map(|table| table.listeners(kind))
            .unwrap_or_default())
    }

    /// Returns true if at least one listener is registered for `kind`.
    pub fn is_listening(&self, kind: EventKind) -> WidgetResult<bool> {
        self.check_widget()?;
        Ok(self.hooks(kind))
    }

    pub(crate) fn hooks(&self, kind: EventKind) -> bool {
        self.inner
            .lock()
            .event_table
            .as_ref()
            .is_some_and(|table| table.hooks(kind))
    }

    // -- Skinning --

    /// Queue the widget for a Skin notification on its display.
    pub fn reskin(&self, scope: ReskinScope) -> WidgetResult<()> {
        self.check_widget()?;
        self.reskin_widget();
        if scope == ReskinScope::Subtree {
            self.behavior.reskin_children(self, scope);
        }
        Ok(())
    }

    fn reskin_widget(&self) {
        let queued = {
            let mut inner = self.inner.lock();
            if inner.state.contains(StateFlags::SKIN_NEEDED) {
                false
            } else {
                inner.state.insert(StateFlags::SKIN_NEEDED);
                true
            }
        };
        if queued {
            if let Some(this) = self.this.upgrade() {
                self.session.add_skinnable_widget(&this);
            }
        }
    }

    /// Clear a pending skin request. Returns true if one was pending and the
    /// widget is still live.
    pub(crate) fn take_skin_request(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.is_disposed() || !inner.state.contains(StateFlags::SKIN_NEEDED) {
            return false;
        }
        inner.state.remove(StateFlags::SKIN_NEEDED);
        true
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_disposed() {
            String::from("*Disposed*")
        } else if !self.guard.is_valid_thread() {
            String::from("*Wrong Thread*")
        } else {
            self.behavior.name_text(self)
        };
        write!(f, "{} {{{}}}", self.kind_name(), text)
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (state, style, handle) = {
            let inner = self.inner.lock();
            (inner.state, inner.style, inner.handle)
        };
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("kind", &self.kind_name())
            .field("state", &state)
            .field("style", &style)
            .field("handle", &handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::event::Event;

    struct Plain;

    impl WidgetBehavior for Plain {
        fn kind_name(&self) -> &'static str {
            "Plain"
        }
    }

    struct Handled(u64);

    impl WidgetBehavior for Handled {
        fn kind_name(&self) -> &'static str {
            "Handled"
        }

        fn create_handle(&self, _widget: &Widget) -> Option<NativeHandle> {
            NativeHandle::new(self.0)
        }

        fn name_text(&self, _widget: &Widget) -> String {
            format!("#{}", self.0)
        }
    }

    #[test]
    fn test_new_root_is_live() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::BORDER, Plain).unwrap();

        assert_eq!(widget.lifecycle(), Lifecycle::Live);
        assert!(!widget.is_disposed());
        assert_eq!(widget.style().unwrap(), Style::BORDER | Style::LEFT_TO_RIGHT);
        assert_eq!(widget.handle().unwrap(), None);
    }

    #[test]
    fn test_child_inherits_orientation() {
        let display = Display::new();
        let parent = Widget::new_root(display, Style::RIGHT_TO_LEFT, Plain).unwrap();
        let child = Widget::new(&parent, Style::NONE, Plain).unwrap();

        assert!(child.style().unwrap().is_right_to_left());
    }

    #[test]
    fn test_handle_registered_with_session() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Handled(42)).unwrap();
        let handle = NativeHandle::new(42).unwrap();

        assert!(widget.state().contains(StateFlags::HANDLE));
        let found = display.find_widget(handle).unwrap();
        assert!(Arc::ptr_eq(&found, &widget));
    }

    #[test]
    fn test_behavior_downcast() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Handled(3)).unwrap();

        assert_eq!(widget.behavior::<Handled>().map(|b| b.0), Some(3));
        assert!(widget.behavior::<Plain>().is_none());
    }

    #[test]
    fn test_display_formatting() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Handled(9)).unwrap();
        assert_eq!(widget.to_string(), "Handled {#9}");

        let remote = widget.clone();
        let text = std::thread::spawn(move || remote.to_string()).join().unwrap();
        assert_eq!(text, "Handled {*Wrong Thread*}");

        widget.dispose().unwrap();
        assert_eq!(widget.to_string(), "Handled {*Disposed*}");
    }

    #[test]
    fn test_listener_registration() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Plain).unwrap();
        let listener = ListenerRef::new(|_: &mut Event| {});

        assert!(!widget.is_listening(EventKind::Selection).unwrap());
        assert!(widget.listeners(EventKind::Selection).unwrap().is_empty());

        widget.add_listener(EventKind::Selection, listener.clone()).unwrap();
        assert!(widget.is_listening(EventKind::Selection).unwrap());
        assert_eq!(widget.listeners(EventKind::Selection).unwrap(), vec![listener.clone()]);

        widget.remove_listener(EventKind::Selection, &listener).unwrap();
        assert!(!widget.is_listening(EventKind::Selection).unwrap());
    }

    #[test]
    fn test_remove_listener_without_table() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Plain).unwrap();
        let listener = ListenerRef::new(|_: &mut Event| {});

        assert!(widget.remove_listener(EventKind::Modify, &listener).is_ok());
        assert!(widget.remove_dispose_listener(&listener).is_ok());
    }

    #[test]
    fn test_skin_requested_at_creation() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();
        assert!(widget.state().contains(StateFlags::SKIN_NEEDED));

        assert!(display.run_skin().unwrap());
        assert!(!widget.state().contains(StateFlags::SKIN_NEEDED));
        assert!(!display.run_skin().unwrap());

        widget.reskin(ReskinScope::Widget).unwrap();
        assert!(widget.state().contains(StateFlags::SKIN_NEEDED));
    }

    /// Reads its own widget's state whenever it is asked for its kind.
    #[derive(Default)]
    struct Introspective {
        widget: std::sync::OnceLock<Weak<Widget>>,
    }

    impl WidgetBehavior for Introspective {
        fn kind_name(&self) -> &'static str {
            match self.widget.get().and_then(Weak::upgrade) {
                Some(widget) if widget.state().is_disposed() => "Gone",
                _ => "Introspective",
            }
        }
    }

    #[test]
    fn test_debug_runs_behavior_without_lock() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Introspective::default()).unwrap();
        let behavior = widget.behavior::<Introspective>().unwrap();
        assert!(behavior.widget.set(Arc::downgrade(&widget)).is_ok());

        let text = format!("{:?}", widget);
        assert!(text.contains("Introspective"));
        assert!(text.starts_with("Widget {"));
    }
}
