//! Translation of native key events into toolkit events.
//!
//! Native key events arrive as X11/GDK keysyms plus a modifier state word.
//! [`translate_key_event`] turns one of those into an [`Event`] carrying a
//! toolkit key code, the typed character and the key location. Layout
//! dependent lookups go through the [`Keymap`] trait so that the display can
//! plug in the platform's keyboard tables.

use crate::error::WidgetResult;
use crate::event::{Event, EventKind, KeyLocation, ModifierMask};
use crate::widget::Widget;

/// Native modifier bits and keysyms.
pub mod native {
    pub const SHIFT_MASK: u32 = 1 << 0;
    pub const CONTROL_MASK: u32 = 1 << 2;
    pub const MOD1_MASK: u32 = 1 << 3;
    pub const BUTTON1_MASK: u32 = 1 << 8;
    pub const BUTTON2_MASK: u32 = 1 << 9;
    pub const BUTTON3_MASK: u32 = 1 << 10;

    pub const BACKSPACE: u32 = 0xff08;
    pub const TAB: u32 = 0xff09;
    pub const LINEFEED: u32 = 0xff0a;
    pub const RETURN: u32 = 0xff0d;
    pub const PAUSE: u32 = 0xff13;
    pub const SCROLL_LOCK: u32 = 0xff14;
    pub const ESCAPE: u32 = 0xff1b;
    pub const HOME: u32 = 0xff50;
    pub const LEFT: u32 = 0xff51;
    pub const UP: u32 = 0xff52;
    pub const RIGHT: u32 = 0xff53;
    pub const DOWN: u32 = 0xff54;
    pub const PAGE_UP: u32 = 0xff55;
    pub const PAGE_DOWN: u32 = 0xff56;
    pub const END: u32 = 0xff57;
    pub const PRINT: u32 = 0xff61;
    pub const INSERT: u32 = 0xff63;
    pub const HELP: u32 = 0xff6a;
    pub const BREAK: u32 = 0xff6b;
    pub const NUM_LOCK: u32 = 0xff7f;
    pub const KP_SPACE: u32 = 0xff80;
    pub const KP_ENTER: u32 = 0xff8d;
    pub const KP_HOME: u32 = 0xff95;
    pub const KP_LEFT: u32 = 0xff96;
    pub const KP_UP: u32 = 0xff97;
    pub const KP_RIGHT: u32 = 0xff98;
    pub const KP_DOWN: u32 = 0xff99;
    pub const KP_PAGE_UP: u32 = 0xff9a;
    pub const KP_PAGE_DOWN: u32 = 0xff9b;
    pub const KP_END: u32 = 0xff9c;
    pub const KP_INSERT: u32 = 0xff9e;
    pub const KP_DELETE: u32 = 0xff9f;
    pub const KP_MULTIPLY: u32 = 0xffaa;
    pub const KP_ADD: u32 = 0xffab;
    pub const KP_SUBTRACT: u32 = 0xffad;
    pub const KP_DECIMAL: u32 = 0xffae;
    pub const KP_DIVIDE: u32 = 0xffaf;
    pub const KP_0: u32 = 0xffb0;
    pub const KP_9: u32 = 0xffb9;
    pub const KP_EQUAL: u32 = 0xffbd;
    pub const F1: u32 = 0xffbe;
    pub const F15: u32 = 0xffcc;
    pub const SHIFT_L: u32 = 0xffe1;
    pub const SHIFT_R: u32 = 0xffe2;
    pub const CONTROL_L: u32 = 0xffe3;
    pub const CONTROL_R: u32 = 0xffe4;
    pub const CAPS_LOCK: u32 = 0xffe5;
    pub const ALT_L: u32 = 0xffe9;
    pub const ALT_R: u32 = 0xffea;
    pub const DELETE: u32 = 0xffff;
    pub const ISO_LEFT_TAB: u32 = 0xfe20;

    /// Keysyms in this range encode a Unicode scalar in their low bits.
    pub const UNICODE_KEYSYM: u32 = 0x0100_0000;
}

/// Toolkit key codes.
///
/// Keys that type a character use the character itself; the rest are offset
/// from [`KEYCODE_BIT`](keys::KEYCODE_BIT).
pub mod keys {
    pub const KEYCODE_BIT: u32 = 1 << 24;

    pub const BS: u32 = 0x08;
    pub const TAB: u32 = 0x09;
    pub const LF: u32 = 0x0a;
    pub const CR: u32 = 0x0d;
    pub const ESC: u32 = 0x1b;
    pub const DEL: u32 = 0x7f;

    pub const ALT: u32 = 1 << 16;
    pub const SHIFT: u32 = 1 << 17;
    pub const CONTROL: u32 = 1 << 18;

    pub const ARROW_UP: u32 = KEYCODE_BIT + 1;
    pub const ARROW_DOWN: u32 = KEYCODE_BIT + 2;
    pub const ARROW_LEFT: u32 = KEYCODE_BIT + 3;
    pub const ARROW_RIGHT: u32 = KEYCODE_BIT + 4;
    pub const PAGE_UP: u32 = KEYCODE_BIT + 5;
    pub const PAGE_DOWN: u32 = KEYCODE_BIT + 6;
    pub const HOME: u32 = KEYCODE_BIT + 7;
    pub const END: u32 = KEYCODE_BIT + 8;
    pub const INSERT: u32 = KEYCODE_BIT + 9;
    pub const F1: u32 = KEYCODE_BIT + 10;
    pub const KEYPAD_MULTIPLY: u32 = KEYCODE_BIT + 42;
    pub const KEYPAD_ADD: u32 = KEYCODE_BIT + 43;
    pub const KEYPAD_SUBTRACT: u32 = KEYCODE_BIT + 45;
    pub const KEYPAD_DECIMAL: u32 = KEYCODE_BIT + 46;
    pub const KEYPAD_DIVIDE: u32 = KEYCODE_BIT + 47;
    pub const KEYPAD_0: u32 = KEYCODE_BIT + 48;
    pub const KEYPAD_EQUAL: u32 = KEYCODE_BIT + 61;
    pub const KEYPAD_CR: u32 = KEYCODE_BIT + 80;
    pub const HELP: u32 = KEYCODE_BIT + 81;
    pub const CAPS_LOCK: u32 = KEYCODE_BIT + 82;
    pub const NUM_LOCK: u32 = KEYCODE_BIT + 83;
    pub const SCROLL_LOCK: u32 = KEYCODE_BIT + 84;
    pub const PAUSE: u32 = KEYCODE_BIT + 85;
    pub const BREAK: u32 = KEYCODE_BIT + 86;
    pub const PRINT_SCREEN: u32 = KEYCODE_BIT + 87;
}

impl ModifierMask {
    /// Convert a native modifier state word.
    pub fn from_native(state: u32) -> Self {
        const TABLE: [(u32, ModifierMask); 6] = [
            (native::MOD1_MASK, ModifierMask::ALT),
            (native::SHIFT_MASK, ModifierMask::SHIFT),
            (native::CONTROL_MASK, ModifierMask::CONTROL),
            (native::BUTTON1_MASK, ModifierMask::BUTTON1),
            (native::BUTTON2_MASK, ModifierMask::BUTTON2),
            (native::BUTTON3_MASK, ModifierMask::BUTTON3),
        ];
        TABLE
            .iter()
            .filter(|(bit, _)| state & bit != 0)
            .fold(ModifierMask::NONE, |mask, (_, flag)| mask | *flag)
    }
}

/// Map a keysym to a toolkit key code. Returns 0 for keys that only type a
/// character.
pub fn translate_key(keyval: u32) -> u32 {
    use native as n;
    match keyval {
        n::ALT_L | n::ALT_R => keys::ALT,
        n::SHIFT_L | n::SHIFT_R => keys::SHIFT,
        n::CONTROL_L | n::CONTROL_R => keys::CONTROL,
        n::UP => keys::ARROW_UP,
        n::DOWN => keys::ARROW_DOWN,
        n::LEFT => keys::ARROW_LEFT,
        n::RIGHT => keys::ARROW_RIGHT,
        n::PAGE_UP => keys::PAGE_UP,
        n::PAGE_DOWN => keys::PAGE_DOWN,
        n::HOME => keys::HOME,
        n::END => keys::END,
        n::INSERT => keys::INSERT,
        n::BACKSPACE => keys::BS,
        n::RETURN => keys::CR,
        n::DELETE => keys::DEL,
        n::ESCAPE => keys::ESC,
        n::LINEFEED => keys::LF,
        n::TAB | n::ISO_LEFT_TAB => keys::TAB,
        n::F1..=n::F15 => keys::F1 + (keyval - n::F1),
        n::KP_MULTIPLY => keys::KEYPAD_MULTIPLY,
        n::KP_ADD => keys::KEYPAD_ADD,
        n::KP_ENTER => keys::KEYPAD_CR,
        n::KP_SUBTRACT => keys::KEYPAD_SUBTRACT,
        n::KP_DECIMAL => keys::KEYPAD_DECIMAL,
        n::KP_DIVIDE => keys::KEYPAD_DIVIDE,
        n::KP_0..=n::KP_9 => keys::KEYPAD_0 + (keyval - n::KP_0),
        n::KP_EQUAL => keys::KEYPAD_EQUAL,
        n::CAPS_LOCK => keys::CAPS_LOCK,
        n::NUM_LOCK => keys::NUM_LOCK,
        n::SCROLL_LOCK => keys::SCROLL_LOCK,
        n::PAUSE => keys::PAUSE,
        n::BREAK => keys::BREAK,
        n::PRINT => keys::PRINT_SCREEN,
        n::HELP => keys::HELP,
        _ => 0,
    }
}

/// Physical location of the key that produced `keyval`.
pub fn key_location(keyval: u32) -> KeyLocation {
    use native as n;
    match keyval {
        n::ALT_L | n::SHIFT_L | n::CONTROL_L => KeyLocation::Left,
        n::ALT_R | n::SHIFT_R | n::CONTROL_R => KeyLocation::Right,
        n::KP_0..=n::KP_9
        | n::KP_ADD
        | n::KP_DECIMAL
        | n::KP_DELETE
        | n::KP_DIVIDE
        | n::KP_DOWN
        | n::KP_END
        | n::KP_ENTER
        | n::KP_EQUAL
        | n::KP_HOME
        | n::KP_INSERT
        | n::KP_LEFT
        | n::KP_MULTIPLY
        | n::KP_PAGE_DOWN
        | n::KP_PAGE_UP
        | n::KP_RIGHT
        | n::KP_SUBTRACT
        | n::KP_UP
        | n::NUM_LOCK => KeyLocation::Keypad,
        _ => KeyLocation::Standard,
    }
}

/// Keyboard layout services.
pub trait Keymap: Send + Sync {
    /// Toolkit key code for `keyval`, 0 if it has none.
    fn translate_key(&self, keyval: u32) -> u32 {
        translate_key(keyval)
    }

    /// Unicode scalar typed by `keyval`, 0 if it types nothing.
    fn keyval_to_unicode(&self, keyval: u32) -> u32;

    /// Keysym the hardware `keycode` produces in the most Latin layout group,
    /// with no modifiers held. Used to give non-Latin layouts usable key codes.
    fn latin_keyval(&self, _keycode: u16, _group: u8) -> Option<u32> {
        None
    }
}

/// Layout-free keymap covering Latin-1, Unicode keysyms and the keypad.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicKeymap;

impl Keymap for BasicKeymap {
    fn keyval_to_unicode(&self, keyval: u32) -> u32 {
        use native as n;
        match keyval {
            0x20..=0x7e | 0xa0..=0xff => keyval,
            n::BACKSPACE => keys::BS,
            n::TAB | n::ISO_LEFT_TAB => keys::TAB,
            n::LINEFEED => keys::LF,
            n::RETURN | n::KP_ENTER => keys::CR,
            n::ESCAPE => keys::ESC,
            n::DELETE | n::KP_DELETE => keys::DEL,
            n::KP_SPACE => u32::from(' '),
            n::KP_MULTIPLY => u32::from('*'),
            n::KP_ADD => u32::from('+'),
            n::KP_SUBTRACT => u32::from('-'),
            n::KP_DECIMAL => u32::from('.'),
            n::KP_DIVIDE => u32::from('/'),
            n::KP_EQUAL => u32::from('='),
            n::KP_0..=n::KP_9 => u32::from('0') + (keyval - n::KP_0),
            _ if keyval & 0xff00_0000 == n::UNICODE_KEYSYM => keyval & 0x00ff_ffff,
            _ => 0,
        }
    }
}

/// A key press or release as reported by the native toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeKeyEvent {
    pub keyval: u32,
    /// Hardware keycode.
    pub keycode: u16,
    /// Modifier state word.
    pub state: u32,
    /// Active layout group.
    pub group: u8,
    pub time: u32,
    /// Text the input method attached to the key, if any.
    pub text: Option<String>,
}

impl NativeKeyEvent {
    fn is_composed(&self) -> bool {
        self.text.as_ref().is_some_and(|text| text.chars().count() > 1)
    }
}

/// Build the toolkit event for a native key event.
///
/// Returns `None` when the key carries composed text (more than one
/// character), or produces neither a key code nor a character.
pub fn translate_key_event(key: &NativeKeyEvent, keymap: &dyn Keymap) -> Option<Event> {
    use self::native as n;
    if key.is_composed() {
        return None;
    }

    let mut event = Event::new();
    event.time = key.time;
    event.key_code = keymap.translate_key(key.keyval);

    let mut is_null = false;
    let character = match key.keyval {
        n::BACKSPACE => keys::BS,
        n::LINEFEED => keys::LF,
        n::RETURN | n::KP_ENTER => keys::CR,
        n::DELETE | n::KP_DELETE => keys::DEL,
        n::ESCAPE => keys::ESC,
        n::TAB | n::ISO_LEFT_TAB => keys::TAB,
        keyval => {
            if event.key_code == 0 {
                if let Some(latin) = keymap.latin_keyval(key.keycode, key.group) {
                    event.key_code = keymap.keyval_to_unicode(latin);
                }
            }
            if key.state & n::CONTROL_MASK != 0 && keyval <= 0x7f {
                let mut code = keyval;
                if (u32::from('a')..=u32::from('z')).contains(&code) {
                    code -= u32::from('a') - u32::from('A');
                }
                if (64..=95).contains(&code) {
                    code -= 64;
                }
                is_null = keyval == u32::from('@') && code == 0;
                code
            } else {
                keymap.keyval_to_unicode(keyval)
            }
        }
    };
    event.character = char::from_u32(character).unwrap_or('\0');
    event.key_location = key_location(key.keyval);

    if event.key_code == 0 && event.character == '\0' && !is_null {
        return None;
    }
    event.state_mask = ModifierMask::from_native(key.state);
    Some(event)
}

impl Widget {
    /// Deliver a native key event as `kind` (KeyDown or KeyUp).
    ///
    /// Returns whether the native toolkit should go on processing the key:
    /// false if a listener cleared `doit` or disposed the widget.
    pub fn send_key_event(&self, kind: EventKind, native: &NativeKeyEvent) -> WidgetResult<bool> {
        self.check_widget()?;
        if native.is_composed() {
            let text = native.text.as_deref().unwrap_or_default();
            return Ok(self.send_im_key_event(kind, Some(native), text)?.is_some());
        }

        let Some(mut event) = translate_key_event(native, self.session.keymap()) else {
            return Ok(true);
        };
        self.send_event(kind, &mut event);
        if self.is_disposed() {
            return Ok(false);
        }
        Ok(event.doit)
    }

    /// Deliver input-method text one character at a time.
    ///
    /// Returns the characters whose events kept `doit` set, or `None` if none
    /// did or the widget was disposed by a listener.
    pub fn send_im_key_event(
        &self,
        kind: EventKind,
        native: Option<&NativeKeyEvent>,
        text: &str,
    ) -> WidgetResult<Option<String>> {
        self.check_widget()?;
        let chars: Vec<char> = text.chars().collect();
        let state = match native {
            Some(native) => native.state,
            None => self.session.current_input_state().unwrap_or(0),
        };

        let mut kept = String::with_capacity(text.len());
        for &character in &chars {
            let translated = match native {
                Some(native) if chars.len() <= 1 => {
                    translate_key_event(native, self.session.keymap())
                }
                _ => None,
            };
            let mut event = translated.unwrap_or_else(|| Event {
                state_mask: ModifierMask::from_native(state),
                ..Event::new()
            });
            event.character = character;
            self.send_event(kind, &mut event);

            if self.is_disposed() {
                return Ok(None);
            }
            if event.doit {
                kept.push(character);
            }
        }
        Ok(if kept.is_empty() { None } else { Some(kept) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(keyval: u32, state: u32) -> NativeKeyEvent {
        NativeKeyEvent {
            keyval,
            state,
            time: 10,
            ..NativeKeyEvent::default()
        }
    }

    #[test]
    fn test_modifier_mask_from_native() {
        assert_eq!(ModifierMask::from_native(0), ModifierMask::NONE);
        assert_eq!(
            ModifierMask::from_native(native::MOD1_MASK | native::BUTTON3_MASK),
            ModifierMask::ALT | ModifierMask::BUTTON3
        );
        // Unknown bits are ignored.
        assert_eq!(ModifierMask::from_native(1 << 1), ModifierMask::NONE);
    }

    #[test]
    fn test_printable_key() {
        let event = translate_key_event(&key(u32::from('a'), 0), &BasicKeymap).unwrap();
        assert_eq!(event.character, 'a');
        assert_eq!(event.key_code, 0);
        assert_eq!(event.time, 10);
        assert_eq!(event.key_location, KeyLocation::Standard);
    }

    #[test]
    fn test_special_keys() {
        let event = translate_key_event(&key(native::RETURN, 0), &BasicKeymap).unwrap();
        assert_eq!(event.character, '\r');
        assert_eq!(event.key_code, keys::CR);

        let event = translate_key_event(&key(native::ISO_LEFT_TAB, 0), &BasicKeymap).unwrap();
        assert_eq!(event.character, '\t');

        let event = translate_key_event(&key(native::UP, 0), &BasicKeymap).unwrap();
        assert_eq!(event.key_code, keys::ARROW_UP);
        assert_eq!(event.character, '\0');
    }

    #[test]
    fn test_control_characters() {
        let ctrl = native::CONTROL_MASK;
        let event = translate_key_event(&key(u32::from('c'), ctrl), &BasicKeymap).unwrap();
        assert_eq!(event.character, '\u{3}');
        assert_eq!(event.state_mask, ModifierMask::CONTROL);

        // Ctrl+@ types NUL and still produces an event.
        let event = translate_key_event(&key(u32::from('@'), ctrl), &BasicKeymap).unwrap();
        assert_eq!(event.character, '\0');
        assert_eq!(event.key_code, 0);
    }

    #[test]
    fn test_key_locations() {
        let event = translate_key_event(&key(native::SHIFT_R, 0), &BasicKeymap).unwrap();
        assert_eq!(event.key_location, KeyLocation::Right);
        assert_eq!(event.key_code, keys::SHIFT);

        let event = translate_key_event(&key(native::KP_0 + 5, 0), &BasicKeymap).unwrap();
        assert_eq!(event.key_location, KeyLocation::Keypad);
        assert_eq!(event.key_code, keys::KEYPAD_0 + 5);
        assert_eq!(event.character, '5');
    }

    #[test]
    fn test_unknown_key_dropped() {
        assert!(translate_key_event(&key(0xfe01, 0), &BasicKeymap).is_none());
    }

    #[test]
    fn test_composed_text_not_translated() {
        let composed = NativeKeyEvent {
            text: Some(String::from("ab")),
            ..key(u32::from('a'), 0)
        };
        assert!(translate_key_event(&composed, &BasicKeymap).is_none());
    }

    struct CyrillicKeymap;

    impl Keymap for CyrillicKeymap {
        fn keyval_to_unicode(&self, keyval: u32) -> u32 {
            BasicKeymap.keyval_to_unicode(keyval)
        }

        fn latin_keyval(&self, keycode: u16, _group: u8) -> Option<u32> {
            (keycode == 38).then_some(u32::from('a'))
        }
    }

    #[test]
    fn test_latin_key_code_for_other_layouts() {
        let cyrillic = NativeKeyEvent {
            keycode: 38,
            ..key(native::UNICODE_KEYSYM | 0x0444, 0)
        };
        let event = translate_key_event(&cyrillic, &CyrillicKeymap).unwrap();
        assert_eq!(event.character, '\u{444}');
        assert_eq!(event.key_code, u32::from('a'));
    }

    struct Field;

    impl crate::widget::WidgetBehavior for Field {
        fn kind_name(&self) -> &'static str {
            "Field"
        }
    }

    #[test]
    fn test_widget_keys_use_display_keymap() {
        use crate::display::{Display, DisplayConfig};
        use crate::listener::ListenerRef;
        use crate::style::Style;
        use parking_lot::Mutex;
        use std::sync::Arc;

        let display = Display::with_keymap(DisplayConfig::default(), Box::new(CyrillicKeymap));
        let field = Widget::new_root(display, Style::NONE, Field).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        field
            .add_listener(
                EventKind::KeyDown,
                ListenerRef::new(move |event: &mut Event| {
                    sink.lock().push((event.character, event.key_code));
                }),
            )
            .unwrap();

        let cyrillic = NativeKeyEvent {
            keycode: 38,
            ..key(native::UNICODE_KEYSYM | 0x0444, 0)
        };
        assert!(field.send_key_event(EventKind::KeyDown, &cyrillic).unwrap());
        assert_eq!(*seen.lock(), vec![('\u{444}', u32::from('a'))]);
    }
}
