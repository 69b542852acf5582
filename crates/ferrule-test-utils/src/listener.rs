//! Recording listener.

use ferrule_widgets::{Event, EventKind, Listener, ListenerRef, ModifierMask, WidgetId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Snapshot of an event as a listener saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: EventKind,
    pub time: u32,
    pub widget: Option<WidgetId>,
    pub doit: bool,
    pub state_mask: ModifierMask,
    pub character: char,
    pub key_code: u32,
}

impl From<&Event> for RecordedEvent {
    fn from(event: &Event) -> Self {
        Self {
            kind: event.kind,
            time: event.time,
            widget: event.widget.as_ref().map(|widget| widget.id()),
            doit: event.doit,
            state_mask: event.state_mask,
            character: event.character,
            key_code: event.key_code,
        }
    }
}

/// What the listener does to the event after recording it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Reaction {
    #[default]
    None,
    ClearDoit,
    StopDelivery,
}

/// Listener that records every event it receives.
///
/// Uses `Mutex` for interior mutability so it can be shared with the widget
/// and inspected afterwards.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<RecordedEvent>>,
    reaction: Reaction,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A recorder that clears `doit` on every event.
    pub fn vetoing() -> Arc<Self> {
        Arc::new(Self {
            reaction: Reaction::ClearDoit,
            ..Self::default()
        })
    }

    /// A recorder that stops delivery to the listeners after it.
    pub fn stopping() -> Arc<Self> {
        Arc::new(Self {
            reaction: Reaction::StopDelivery,
            ..Self::default()
        })
    }

    /// A [`ListenerRef`] sharing this recorder. Every call returns a
    /// reference that compares equal to the others.
    pub fn listener(self: &Arc<Self>) -> ListenerRef {
        ListenerRef::from(self.clone())
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|event| event.kind).collect()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn last(&self) -> Option<RecordedEvent> {
        self.events.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Listener for RecordingListener {
    fn handle_event(&self, event: &mut Event) {
        self.events.lock().push(RecordedEvent::from(&*event));
        match self.reaction {
            Reaction::None => {}
            Reaction::ClearDoit => event.doit = false,
            Reaction::StopDelivery => event.kind = EventKind::None,
        }
    }
}
