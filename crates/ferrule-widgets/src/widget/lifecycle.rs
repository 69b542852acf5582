//! Dispose and release sequencing.

use super::Widget;
use crate::error::WidgetResult;
use crate::event::{Event, EventKind};
use crate::session::NativeHandle;
use crate::state::StateFlags;

impl Widget {
    /// Dispose the widget and every widget it owns.
    ///
    /// Listeners registered for [`EventKind::Dispose`] are notified exactly
    /// once, before anything is torn down. Afterwards every guarded operation
    /// fails with [`WidgetError::WidgetDisposed`](crate::WidgetError).
    /// Disposing a disposed widget does nothing, from any thread.
    ///
    /// # Errors
    ///
    /// [`WidgetError::InvalidThreadAccess`](crate::WidgetError) off the owning
    /// thread; the widget is left untouched.
    pub fn dispose(&self) -> WidgetResult<()> {
        self.release(true)
    }

    /// Run the release sequence.
    ///
    /// With `destroy` the native handle is destroyed and the widget detaches
    /// from its parent. Without it the handle is only released, which is what
    /// a parent uses for children whose native resources die with its own.
    pub fn release(&self, destroy: bool) -> WidgetResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        self.guard.check()?;

        if self.mark(StateFlags::DISPOSE_SENT) {
            tracing::debug!("Disposing {}", self);
            let mut event = Event::new();
            self.send_event(EventKind::Dispose, &mut event);
        }

        // A Dispose listener may already have finished the job.
        if !self.is_disposed() {
            self.behavior.release_children(self, destroy);
        }

        if self.mark(StateFlags::RELEASED) {
            if destroy {
                self.behavior.release_parent(self);
                self.behavior.release_widget(self);
                self.destroy_widget();
            } else {
                self.behavior.release_widget(self);
                self.release_native_handle();
            }
        }

        self.finish_release();
        Ok(())
    }

    /// Set `flag`, returning true if it was not set before.
    fn mark(&self, flag: StateFlags) -> bool {
        let mut inner = self.inner.lock();
        if inner.state.contains(flag) {
            return false;
        }
        inner.state.insert(flag);
        true
    }

    fn destroy_widget(&self) {
        let Some((handle, foreign)) = self.take_handle() else {
            return;
        };
        if foreign {
            self.behavior.release_handle(self, handle);
        } else {
            self.behavior.destroy_handle(self, handle);
        }
    }

    fn release_native_handle(&self) {
        if let Some((handle, _)) = self.take_handle() {
            self.behavior.release_handle(self, handle);
        }
    }

    fn take_handle(&self) -> Option<(NativeHandle, bool)> {
        let mut inner = self.inner.lock();
        let handle = inner.handle.take()?;
        let foreign = inner.state.contains(StateFlags::FOREIGN_HANDLE);
        inner
            .state
            .remove(StateFlags::HANDLE | StateFlags::FOREIGN_HANDLE);
        Some((handle, foreign))
    }

    /// Final teardown. Safe to reach more than once.
    fn finish_release(&self) {
        let (table, data, registered) = {
            let mut inner = self.inner.lock();
            inner.state.remove(StateFlags::KEYED_DATA | StateFlags::SKIN_NEEDED);
            inner.state.insert(StateFlags::DISPOSED);
            (
                inner.event_table.take(),
                std::mem::take(&mut inner.data),
                inner.registered.take(),
            )
        };
        if let Some(handle) = registered {
            self.session.remove_widget(handle);
        }
        // Values may run arbitrary drop code, so they go after the lock.
        drop(table);
        drop(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::error::WidgetError;
    use crate::listener::ListenerRef;
    use crate::session::Session;
    use crate::state::Lifecycle;
    use crate::style::Style;
    use crate::widget::WidgetBehavior;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Trace(Mutex<Vec<String>>);

    struct Traced {
        raw: u64,
        trace: Arc<Trace>,
    }

    impl Traced {
        fn log(&self, entry: impl Into<String>) {
            self.trace.0.lock().push(entry.into());
        }
    }

    impl WidgetBehavior for Traced {
        fn kind_name(&self) -> &'static str {
            "Traced"
        }

        fn create_handle(&self, _widget: &Widget) -> Option<NativeHandle> {
            NativeHandle::new(self.raw)
        }

        fn release_children(&self, _widget: &Widget, destroy: bool) {
            self.log(format!("release_children({destroy})"));
        }

        fn release_parent(&self, _widget: &Widget) {
            self.log("release_parent");
        }

        fn release_widget(&self, widget: &Widget) {
            assert!(!widget.is_disposed());
            self.log("release_widget");
        }

        fn destroy_handle(&self, _widget: &Widget, handle: NativeHandle) {
            self.log(format!("destroy_handle({})", handle.raw()));
        }

        fn release_handle(&self, _widget: &Widget, handle: NativeHandle) {
            self.log(format!("release_handle({})", handle.raw()));
        }
    }

    fn traced(display: &Arc<Display>, raw: u64) -> (Arc<Widget>, Arc<Trace>) {
        let trace = Arc::new(Trace::default());
        let widget = Widget::new_root(
            display.clone(),
            Style::NONE,
            Traced {
                raw,
                trace: trace.clone(),
            },
        )
        .unwrap();
        (widget, trace)
    }

    #[test]
    fn test_dispose_hook_order() {
        let display = Display::new();
        let (widget, trace) = traced(&display, 7);

        widget.dispose().unwrap();
        assert_eq!(
            *trace.0.lock(),
            vec![
                "release_children(true)",
                "release_parent",
                "release_widget",
                "destroy_handle(7)",
            ]
        );
        assert_eq!(widget.lifecycle(), Lifecycle::Disposed);
        assert!(display.find_widget(NativeHandle::new(7).unwrap()).is_none());
    }

    #[test]
    fn test_release_without_destroy() {
        let display = Display::new();
        let (widget, trace) = traced(&display, 8);

        widget.release(false).unwrap();
        assert_eq!(
            *trace.0.lock(),
            vec!["release_children(false)", "release_widget", "release_handle(8)"]
        );
        assert!(widget.is_disposed());
    }

    #[test]
    fn test_dispose_twice_is_noop() {
        let display = Display::new();
        let (widget, trace) = traced(&display, 9);

        widget.dispose().unwrap();
        let calls = trace.0.lock().len();
        assert_eq!(widget.dispose(), Ok(()));
        assert_eq!(trace.0.lock().len(), calls);
    }

    #[test]
    fn test_dispose_event_sent_once() {
        let display = Display::new();
        let (widget, _) = traced(&display, 10);
        let count = Arc::new(AtomicUsize::new(0));
        let listener = {
            let count = count.clone();
            ListenerRef::new(move |event: &mut Event| {
                assert_eq!(event.kind, EventKind::Dispose);
                let source = event.widget.clone().unwrap();
                assert!(!source.is_disposed());
                count.fetch_add(1, Ordering::SeqCst);
                source.dispose().unwrap();
            })
        };
        widget.add_dispose_listener(listener).unwrap();

        widget.dispose().unwrap();
        widget.dispose().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(widget.is_disposed());
    }

    #[test]
    fn test_guarded_calls_fail_after_dispose() {
        let display = Display::new();
        let (widget, _) = traced(&display, 11);
        widget.dispose().unwrap();

        assert_eq!(widget.style(), Err(WidgetError::WidgetDisposed));
        assert_eq!(
            widget.is_listening(EventKind::Dispose),
            Err(WidgetError::WidgetDisposed)
        );
        assert_eq!(widget.check_widget(), Err(WidgetError::WidgetDisposed));
        assert!(widget.session().is_err());
    }

    #[test]
    fn test_dispose_from_foreign_thread() {
        let display = Display::new();
        let (widget, trace) = traced(&display, 12);

        let remote = widget.clone();
        let result = std::thread::spawn(move || remote.dispose()).join().unwrap();
        assert_eq!(result, Err(WidgetError::InvalidThreadAccess));
        assert_eq!(widget.lifecycle(), Lifecycle::Live);
        assert!(trace.0.lock().is_empty());

        widget.dispose().unwrap();
        let remote = widget.clone();
        let result = std::thread::spawn(move || remote.dispose()).join().unwrap();
        assert_eq!(result, Ok(()));
    }
}
