//! Native signal ids and routing.
//!
//! The native toolkit reports everything through one callback carrying a
//! native handle and a numeric signal id. [`SignalRouter`] turns that into a
//! call on the handler a widget kind registered for the signal.

mod router;

pub use router::{CallbackResult, NativeEvent, SignalArgs, SignalHandler, SignalHandlers, SignalRouter};

macro_rules! signals {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// Native signals a widget kind may handle.
        ///
        /// `*Inverse` variants are connected to run after the native default
        /// handler of the same signal.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Signal {
            $($variant = $id,)*
        }

        impl Signal {
            pub const ALL: &'static [Signal] = &[$(Signal::$variant,)*];

            /// Numeric id used on the native side.
            #[inline]
            pub const fn id(self) -> u16 {
                self as u16
            }

            pub const fn from_id(id: u16) -> Option<Self> {
                match id {
                    $($id => Some(Signal::$variant),)*
                    _ => None,
                }
            }

            /// Native signal name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Signal::$variant => $name,)*
                }
            }
        }
    };
}

signals! {
    Activate = 1 => "activate",
    ButtonPressEvent = 2 => "button-press-event",
    ButtonPressEventInverse = 3 => "button-press-event",
    ButtonReleaseEvent = 4 => "button-release-event",
    ButtonReleaseEventInverse = 5 => "button-release-event",
    Changed = 6 => "changed",
    ChangeValue = 7 => "change-value",
    Clicked = 8 => "clicked",
    Commit = 9 => "commit",
    ConfigureEvent = 10 => "configure-event",
    DeleteEvent = 11 => "delete-event",
    DeleteRange = 12 => "delete-range",
    DeleteText = 13 => "delete-text",
    EnterNotifyEvent = 14 => "enter-notify-event",
    Event = 15 => "event",
    EventAfter = 16 => "event-after",
    ExpandCollapseCursorRow = 17 => "expand-collapse-cursor-row",
    Draw = 18 => "draw",
    DrawInverse = 19 => "draw",
    Focus = 20 => "focus",
    FocusInEvent = 21 => "focus-in-event",
    FocusOutEvent = 22 => "focus-out-event",
    GrabFocus = 23 => "grab-focus",
    Hide = 24 => "hide",
    Input = 25 => "input",
    InsertText = 26 => "insert-text",
    KeyPressEvent = 27 => "key-press-event",
    KeyReleaseEvent = 28 => "key-release-event",
    LeaveNotifyEvent = 29 => "leave-notify-event",
    Map = 30 => "map",
    MapEvent = 31 => "map-event",
    MnemonicActivate = 32 => "mnemonic-activate",
    MotionNotifyEvent = 33 => "motion-notify-event",
    MotionNotifyEventInverse = 34 => "motion-notify-event",
    MoveFocus = 35 => "move-focus",
    Output = 36 => "output",
    PopulatePopup = 37 => "populate-popup",
    PopupMenu = 38 => "popup-menu",
    PreeditChanged = 39 => "preedit-changed",
    Realize = 40 => "realize",
    RowActivated = 41 => "row-activated",
    ScrollChild = 42 => "scroll-child",
    ScrollEvent = 43 => "scroll-event",
    Select = 44 => "select",
    Show = 45 => "show",
    ShowHelp = 46 => "show-help",
    SizeAllocate = 47 => "size-allocate",
    StyleSet = 48 => "style-set",
    SwitchPage = 49 => "switch-page",
    TestCollapseRow = 50 => "test-collapse-row",
    TestExpandRow = 51 => "test-expand-row",
    TextBufferInsertText = 52 => "insert-text",
    Toggled = 53 => "toggled",
    Unmap = 54 => "unmap",
    UnmapEvent = 55 => "unmap-event",
    Unrealize = 56 => "unrealize",
    ValueChanged = 57 => "value-changed",
    WindowStateEvent = 59 => "window-state-event",
    ActivateInverse = 60 => "activate",
    DaySelected = 61 => "day-selected",
    MonthChanged = 62 => "month-changed",
    StatusIconPopupMenu = 63 => "popup-menu",
    RowInserted = 64 => "row-inserted",
    RowDeleted = 65 => "row-deleted",
    DaySelectedDoubleClick = 66 => "day-selected-double-click",
    IconRelease = 67 => "icon-release",
    SelectionDone = 68 => "selection-done",
    StartInteractiveSearch = 69 => "start-interactive-search",
    Backspace = 70 => "backspace",
    BackspaceInverse = 71 => "backspace",
    CopyClipboard = 72 => "copy-clipboard",
    CopyClipboardInverse = 73 => "copy-clipboard",
    CutClipboard = 74 => "cut-clipboard",
    CutClipboardInverse = 75 => "cut-clipboard",
    PasteClipboard = 76 => "paste-clipboard",
    PasteClipboardInverse = 77 => "paste-clipboard",
    DeleteFromCursor = 78 => "delete-from-cursor",
    DeleteFromCursorInverse = 79 => "delete-from-cursor",
    MoveCursor = 80 => "move-cursor",
    MoveCursorInverse = 81 => "move-cursor",
    DirectionChanged = 82 => "direction-changed",
    CreateMenuProxy = 83 => "create-menu-proxy",
    RowHasChildToggled = 84 => "row-has-child-toggled",
    PoppedUp = 85 => "popped-up",
    FocusIn = 86 => "enter",
    FocusOut = 87 => "leave",
    ImUpdate = 88 => "im-update",
    KeyPressed = 89 => "key-pressed",
    KeyReleased = 90 => "key-released",
    Decelerate = 91 => "decelerate",
    Scroll = 92 => "scroll",
    ScrollBegin = 93 => "scroll-begin",
    ScrollEnd = 94 => "scroll-end",
    Enter = 95 => "enter",
    Leave = 96 => "leave",
    Motion = 97 => "motion",
    CloseRequest = 98 => "close-request",
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
