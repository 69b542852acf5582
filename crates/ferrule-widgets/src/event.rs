//! Toolkit-neutral event objects.

use crate::property::PropertyValue;
use crate::widget::Widget;
use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

/// Event kinds a listener can register for.
///
/// Discriminants are stable and usable as wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EventKind {
    /// Not an event. A listener sets an event's kind to `None` to stop
    /// delivery to the listeners after it.
    None = 0,
    KeyDown = 1,
    KeyUp = 2,
    MouseDown = 3,
    MouseUp = 4,
    MouseMove = 5,
    MouseEnter = 6,
    MouseExit = 7,
    MouseDoubleClick = 8,
    Paint = 9,
    Move = 10,
    Resize = 11,
    /// Sent exactly once, before a widget releases its resources.
    Dispose = 12,
    Selection = 13,
    DefaultSelection = 14,
    FocusIn = 15,
    FocusOut = 16,
    Expand = 17,
    Collapse = 18,
    Iconify = 19,
    Deiconify = 20,
    Close = 21,
    Show = 22,
    Hide = 23,
    Modify = 24,
    Verify = 25,
    Activate = 26,
    Deactivate = 27,
    Help = 28,
    DragDetect = 29,
    Arm = 30,
    Traverse = 31,
    MouseHover = 32,
    MenuDetect = 35,
    SetData = 36,
    MouseWheel = 37,
    Settings = 39,
    ImeComposition = 43,
    OrientationChange = 44,
    /// Sent by the display to widgets queued for skinning.
    Skin = 45,
}

impl EventKind {
    const ALL: [EventKind; 40] = [
        EventKind::None,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::MouseMove,
        EventKind::MouseEnter,
        EventKind::MouseExit,
        EventKind::MouseDoubleClick,
        EventKind::Paint,
        EventKind::Move,
        EventKind::Resize,
        EventKind::Dispose,
        EventKind::Selection,
        EventKind::DefaultSelection,
        EventKind::FocusIn,
        EventKind::FocusOut,
        EventKind::Expand,
        EventKind::Collapse,
        EventKind::Iconify,
        EventKind::Deiconify,
        EventKind::Close,
        EventKind::Show,
        EventKind::Hide,
        EventKind::Modify,
        EventKind::Verify,
        EventKind::Activate,
        EventKind::Deactivate,
        EventKind::Help,
        EventKind::DragDetect,
        EventKind::Arm,
        EventKind::Traverse,
        EventKind::MouseHover,
        EventKind::MenuDetect,
        EventKind::SetData,
        EventKind::MouseWheel,
        EventKind::Settings,
        EventKind::ImeComposition,
        EventKind::OrientationChange,
        EventKind::Skin,
    ];

    /// Numeric id of this kind.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }
}

bitflags! {
    /// Keyboard modifiers and mouse buttons held when an event happened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierMask: u32 {
        const NONE    = 0;
        const ALT     = 1 << 16;
        const SHIFT   = 1 << 17;
        const CONTROL = 1 << 18;
        const BUTTON1 = 1 << 19;
        const BUTTON2 = 1 << 20;
        const BUTTON3 = 1 << 21;
    }
}

impl ModifierMask {
    /// Keyboard modifier group.
    pub const MODIFIERS: Self = Self::ALT.union(Self::SHIFT).union(Self::CONTROL);

    /// Mouse button group.
    pub const BUTTONS: Self = Self::BUTTON1.union(Self::BUTTON2).union(Self::BUTTON3);
}

impl Default for ModifierMask {
    fn default() -> Self {
        Self::NONE
    }
}

/// Which physical copy of a key produced a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLocation {
    #[default]
    Standard,
    Left,
    Right,
    Keypad,
}

/// An event delivered to listeners.
///
/// Listeners receive `&mut Event`; clearing [`doit`](Event::doit) asks the
/// native side to skip its default action.
#[derive(Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Native timestamp in milliseconds. Zero means "not set"; the dispatcher
    /// fills in the display's last event time.
    pub time: u32,
    /// Widget the event originated from.
    pub widget: Option<Arc<Widget>>,
    pub doit: bool,
    pub state_mask: ModifierMask,
    /// Character typed, `'\0'` when the event carries none.
    pub character: char,
    pub key_code: u32,
    pub key_location: KeyLocation,
    pub detail: i32,
    pub index: i32,
    pub text: Option<String>,
    pub data: Option<PropertyValue>,
}

impl Event {
    pub fn new() -> Self {
        Self {
            kind: EventKind::None,
            time: 0,
            widget: None,
            doit: true,
            state_mask: ModifierMask::NONE,
            character: '\0',
            key_code: 0,
            key_location: KeyLocation::Standard,
            detail: 0,
            index: 0,
            text: None,
            data: None,
        }
    }

    /// Create an event of the given kind.
    pub fn of_kind(kind: EventKind) -> Self {
        Self {
            kind,
            ..Self::new()
        }
    }

    /// Returns true if this event came from `widget`.
    pub fn is_from(&self, widget: &Arc<Widget>) -> bool {
        self.widget
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, widget))
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("time", &self.time)
            .field("widget", &self.widget.as_ref().map(|w| w.id()))
            .field("doit", &self.doit)
            .field("state_mask", &self.state_mask)
            .field("character", &self.character)
            .field("key_code", &self.key_code)
            .field("key_location", &self.key_location)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_defaults() {
        let event = Event::new();
        assert_eq!(event.kind, EventKind::None);
        assert!(event.doit);
        assert_eq!(event.time, 0);
        assert!(event.widget.is_none());
        assert_eq!(event.character, '\0');
    }

    #[test]
    fn test_kind_ids_round_trip() {
        assert_eq!(EventKind::from_id(12), Some(EventKind::Dispose));
        assert_eq!(EventKind::from_id(45), Some(EventKind::Skin));
        assert_eq!(EventKind::from_id(34), None);
        assert_eq!(EventKind::from_id(EventKind::Traverse.id()), Some(EventKind::Traverse));
    }

    #[test]
    fn test_modifier_groups() {
        let mask = ModifierMask::SHIFT | ModifierMask::BUTTON1;
        assert!(mask.intersects(ModifierMask::MODIFIERS));
        assert!(mask.intersects(ModifierMask::BUTTONS));
        assert!(!mask.contains(ModifierMask::CONTROL));
    }
}
