//! Event dispatch: filters, listeners, posting.

use super::Widget;
use crate::error::WidgetResult;
use crate::event::{Event, EventKind, ModifierMask};
use ferrule_core::profiling::profile_function;

impl Widget {
    /// Notify the listeners for `kind` synchronously.
    ///
    /// `kind`, `widget` and, when zero, `time` are filled in before the
    /// session filters run. Listeners may clear `doit` to cancel the action
    /// the event reports; the caller reads it back from `event`.
    pub fn notify_listeners(&self, kind: EventKind, event: &mut Event) -> WidgetResult<()> {
        self.check_widget()?;
        self.send_event(kind, event);
        Ok(())
    }

    /// Notify the listeners for `kind` with a fresh event and return it.
    pub fn notify(&self, kind: EventKind) -> WidgetResult<Event> {
        let mut event = Event::new();
        self.notify_listeners(kind, &mut event)?;
        Ok(event)
    }

    /// Queue an event for delivery on the next run of the display's
    /// posted-event queue.
    pub fn post_event(&self, kind: EventKind, event: Option<Event>) -> WidgetResult<()> {
        self.check_widget()?;
        self.post(kind, event.unwrap_or_default());
        Ok(())
    }

    /// Send or post a selection-style event carrying the modifier state of
    /// the native event currently being processed.
    pub fn send_selection_event(
        &self,
        kind: EventKind,
        event: Option<Event>,
        send: bool,
    ) -> WidgetResult<Option<Event>> {
        self.check_widget()?;
        let mut event = event.unwrap_or_default();
        if let Some(state) = self.session.current_input_state() {
            event.state_mask = ModifierMask::from_native(state);
        }
        if send {
            self.send_event(kind, &mut event);
            Ok(Some(event))
        } else {
            self.post(kind, event);
            Ok(None)
        }
    }

    pub(crate) fn send_event(&self, kind: EventKind, event: &mut Event) {
        if self.prepare_event(kind, event) {
            self.deliver(event);
        }
    }

    fn post(&self, kind: EventKind, mut event: Event) {
        if self.prepare_event(kind, &mut event) {
            self.session.post_event(event);
        }
    }

    /// Stamp `event` for dispatch. Returns false when nobody could see it.
    fn prepare_event(&self, kind: EventKind, event: &mut Event) -> bool {
        if !self.hooks(kind) && !self.session.filters(kind) {
            return false;
        }
        event.kind = kind;
        event.widget = self.this.upgrade();
        if event.time == 0 {
            event.time = self.session.last_event_time();
        }
        true
    }

    /// Run the session filters, then the listeners registered for
    /// `event.kind`.
    pub(crate) fn deliver(&self, event: &mut Event) {
        profile_function!();
        if self.session.filter_event(event) {
            tracing::trace!("Filters vetoed event on {}", self.id());
            return;
        }
        let listeners = match self.inner.lock().event_table.as_ref() {
            Some(table) => table.listeners(event.kind),
            None => return,
        };
        if !listeners.is_empty() {
            self.session.send_event(&listeners, event);
        }
    }

    pub(crate) fn send_skin_event(&self) {
        let mut event = Event::new();
        self.send_event(EventKind::Skin, &mut event);
    }
}

#[cfg(test)]
mod tests {
    use crate::display::Display;
    use crate::event::{Event, EventKind, ModifierMask};
    use crate::listener::ListenerRef;
    use crate::style::Style;
    use crate::widget::{Widget, WidgetBehavior};
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Plain;

    impl WidgetBehavior for Plain {
        fn kind_name(&self) -> &'static str {
            "Plain"
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> ListenerRef {
        let log = log.clone();
        ListenerRef::new(move |_: &mut Event| log.lock().push(name))
    }

    #[test]
    fn test_notify_fills_event() {
        let display = Display::new();
        display.set_current_event(77, None).unwrap();
        let widget = Widget::new_root(display, Style::NONE, Plain).unwrap();
        let seen = Arc::new(Mutex::new(None));
        {
            let seen = seen.clone();
            widget
                .add_listener(
                    EventKind::Modify,
                    ListenerRef::new(move |event: &mut Event| {
                        *seen.lock() = Some((event.kind, event.time));
                    }),
                )
                .unwrap();
        }

        let event = widget.notify(EventKind::Modify).unwrap();
        assert_eq!(*seen.lock(), Some((EventKind::Modify, 77)));
        assert!(event.is_from(&widget));
    }

    #[test]
    fn test_listeners_run_in_order() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Plain).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let c = recorder(&log, "c");
        for listener in [&a, &b, &c] {
            widget.add_listener(EventKind::Selection, listener.clone()).unwrap();
        }

        widget.notify(EventKind::Selection).unwrap();
        widget.remove_listener(EventKind::Selection, &b).unwrap();
        widget.notify(EventKind::Selection).unwrap();

        assert_eq!(*log.lock(), vec!["a", "b", "c", "a", "c"]);
    }

    #[test]
    fn test_doit_read_back() {
        let display = Display::new();
        let widget = Widget::new_root(display, Style::NONE, Plain).unwrap();
        widget
            .add_listener(
                EventKind::Verify,
                ListenerRef::new(|event: &mut Event| event.doit = false),
            )
            .unwrap();

        let mut event = Event::new();
        widget.notify_listeners(EventKind::Verify, &mut event).unwrap();
        assert!(!event.doit);
    }

    #[test]
    fn test_filter_sees_events_without_listeners() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        display
            .add_filter(EventKind::MouseDown, recorder(&log, "filter"))
            .unwrap();

        widget.notify(EventKind::MouseDown).unwrap();
        widget.notify(EventKind::MouseUp).unwrap();
        assert_eq!(*log.lock(), vec!["filter"]);
    }

    #[test]
    fn test_filter_veto_skips_listeners() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        display
            .add_filter(
                EventKind::KeyDown,
                ListenerRef::new(|event: &mut Event| event.kind = EventKind::None),
            )
            .unwrap();
        widget
            .add_listener(EventKind::KeyDown, recorder(&log, "listener"))
            .unwrap();

        widget.notify(EventKind::KeyDown).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_post_delivers_later() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        widget
            .add_listener(EventKind::Resize, recorder(&log, "resize"))
            .unwrap();

        widget.post_event(EventKind::Resize, None).unwrap();
        assert!(log.lock().is_empty());
        assert_eq!(display.pending_events(), 1);

        assert_eq!(display.run_deferred_events().unwrap(), 1);
        assert_eq!(*log.lock(), vec!["resize"]);
    }

    #[test]
    fn test_post_without_listeners_is_dropped() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();

        widget.post_event(EventKind::Resize, None).unwrap();
        assert_eq!(display.pending_events(), 0);
    }

    #[test]
    fn test_selection_event_carries_input_state() {
        let display = Display::new();
        let widget = Widget::new_root(display.clone(), Style::NONE, Plain).unwrap();
        widget
            .add_listener(EventKind::Selection, ListenerRef::new(|_: &mut Event| {}))
            .unwrap();
        display.set_current_event(5, Some(1 << 0 | 1 << 2)).unwrap();

        let event = widget
            .send_selection_event(EventKind::Selection, None, true)
            .unwrap()
            .unwrap();
        assert_eq!(event.state_mask, ModifierMask::SHIFT | ModifierMask::CONTROL);

        let posted = widget
            .send_selection_event(EventKind::Selection, None, false)
            .unwrap();
        assert!(posted.is_none());
        assert_eq!(display.pending_events(), 1);
    }
}
