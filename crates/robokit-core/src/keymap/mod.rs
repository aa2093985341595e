//! Key names and their per-platform key codes.
//!
//! Callers name keys with short lowercase tokens (`"enter"`, `"f5"`, `"a"`,
//! `"num7"`, `"audio_mute"`).  [`Key::from_name`] resolves a token to a
//! [`Key`]; the platform tables then translate a [`Key`] into whatever the
//! native backend injects:
//!
//! | Platform | Table | Code type |
//! |----------|-------|-----------|
//! | Windows  | [`windows_vk`] | Virtual-Key code (`u8`) |
//! | Linux    | [`linux_x11`]  | X11 KeySym (`u32`) |
//! | macOS    | [`macos_cg`]   | `CGKeyCode` (`u16`) |
//!
//! Single printable characters that are not named keys resolve to
//! [`Key::Char`].  Not every platform has a fixed code for every character;
//! a `None` from a table tells the backend to fall back to Unicode injection.

pub mod linux_x11;
pub mod macos_cg;
pub mod windows_vk;

/// A key a caller can tap or toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,
    CapsLock,

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    PrintScreen,
    Menu,

    /// Function key `F1`..=`F24`.
    F(u8),

    Command,
    RightCommand,
    Alt,
    RightAlt,
    Control,
    RightControl,
    Shift,
    RightShift,

    AudioMute,
    AudioVolumeDown,
    AudioVolumeUp,
    AudioPlay,
    AudioStop,
    AudioPrev,
    AudioNext,

    NumLock,
    /// Keypad digit `0`..=`9`.
    Numpad(u8),
    NumpadDecimal,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,

    /// Any single character that is not a named key.
    Char(char),
}

/// Highest function key number the name table accepts.
pub const MAX_FUNCTION_KEY: u8 = 24;

impl Key {
    /// Resolves a key token.
    ///
    /// Named keys match exactly (lowercase).  A token that is exactly one
    /// character becomes [`Key::Char`].  Everything else is `None`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "backspace" => Key::Backspace,
            "delete" => Key::Delete,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "esc" | "escape" => Key::Escape,
            "space" => Key::Space,
            "capslock" => Key::CapsLock,

            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "insert" => Key::Insert,
            "print" | "printscreen" => Key::PrintScreen,
            "menu" => Key::Menu,

            "cmd" | "command" | "lcmd" => Key::Command,
            "rcmd" => Key::RightCommand,
            "alt" | "lalt" => Key::Alt,
            "ralt" => Key::RightAlt,
            "ctrl" | "control" | "lctrl" => Key::Control,
            "rctrl" => Key::RightControl,
            "shift" | "lshift" => Key::Shift,
            "rshift" | "right_shift" => Key::RightShift,

            "audio_mute" => Key::AudioMute,
            "audio_vol_down" => Key::AudioVolumeDown,
            "audio_vol_up" => Key::AudioVolumeUp,
            "audio_play" => Key::AudioPlay,
            "audio_stop" => Key::AudioStop,
            "audio_prev" => Key::AudioPrev,
            "audio_next" => Key::AudioNext,

            "num_lock" => Key::NumLock,
            "num." => Key::NumpadDecimal,
            "num+" => Key::NumpadAdd,
            "num-" => Key::NumpadSubtract,
            "num*" => Key::NumpadMultiply,
            "num/" => Key::NumpadDivide,
            "num_enter" => Key::NumpadEnter,

            other => return Self::from_pattern(other),
        };
        Some(key)
    }

    /// `f<N>`, `num<D>` and single characters.
    fn from_pattern(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c));
        }
        if let Some(n) = name.strip_prefix('f').and_then(|d| d.parse::<u8>().ok()) {
            return (1..=MAX_FUNCTION_KEY).contains(&n).then_some(Key::F(n));
        }
        if let Some(d) = name.strip_prefix("num").and_then(|d| d.parse::<u8>().ok()) {
            return (d <= 9).then_some(Key::Numpad(d));
        }
        None
    }

    /// Whether synthesizing this key needs Shift held on a US layout.
    ///
    /// Only ASCII upper-case letters and the shifted ASCII symbols qualify.
    pub fn needs_shift(&self) -> bool {
        match self {
            Key::Char(c) => c.is_ascii_uppercase() || SHIFTED_SYMBOLS.contains(*c),
            _ => false,
        }
    }

    /// The unshifted character for [`Key::Char`] values on a US layout.
    ///
    /// `'A'` becomes `'a'` and `'!'` becomes `'1'`; anything else is returned
    /// unchanged.
    pub fn base_char(&self) -> Option<char> {
        let Key::Char(c) = *self else {
            return None;
        };
        if c.is_ascii_uppercase() {
            return Some(c.to_ascii_lowercase());
        }
        let base = SHIFTED_SYMBOLS
            .find(c)
            .and_then(|i| UNSHIFTED_SYMBOLS.chars().nth(i))
            .unwrap_or(c);
        Some(base)
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::Command
                | Key::RightCommand
                | Key::Alt
                | Key::RightAlt
                | Key::Control
                | Key::RightControl
                | Key::Shift
                | Key::RightShift
        )
    }
}

// Index-aligned: SHIFTED_SYMBOLS[i] is produced by Shift + UNSHIFTED_SYMBOLS[i].
const SHIFTED_SYMBOLS: &str = "~!@#$%^&*()_+{}|:\"<>?";
const UNSHIFTED_SYMBOLS: &str = "`1234567890-=[]\\;',./";

/// Translation entry points, one per native backend.
pub struct KeyMapper;

impl KeyMapper {
    /// Windows Virtual-Key code for `key`, if the key has a fixed one.
    pub fn windows_vk(key: Key) -> Option<u8> {
        windows_vk::key_to_vk(key)
    }

    /// X11 KeySym for `key`.
    pub fn x11_keysym(key: Key) -> Option<u32> {
        linux_x11::key_to_keysym(key)
    }

    /// macOS `CGKeyCode` for `key`, if the key has a fixed one.
    pub fn macos_keycode(key: Key) -> Option<u16> {
        macos_cg::key_to_cgkeycode(key)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_and_aliases_resolve() {
        assert_eq!(Key::from_name("enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("return"), Some(Key::Enter));
        assert_eq!(Key::from_name("esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("cmd"), Some(Key::Command));
        assert_eq!(Key::from_name("control"), Some(Key::Control));
        assert_eq!(Key::from_name("right_shift"), Some(Key::RightShift));
    }

    #[test]
    fn test_function_keys_are_bounded() {
        assert_eq!(Key::from_name("f1"), Some(Key::F(1)));
        assert_eq!(Key::from_name("f24"), Some(Key::F(24)));
        assert_eq!(Key::from_name("f0"), None);
        assert_eq!(Key::from_name("f25"), None);
    }

    #[test]
    fn test_single_character_tokens_become_char_keys() {
        assert_eq!(Key::from_name("a"), Some(Key::Char('a')));
        // "f" alone is a letter, not a function-key prefix
        assert_eq!(Key::from_name("f"), Some(Key::Char('f')));
        assert_eq!(Key::from_name("é"), Some(Key::Char('é')));
    }

    #[test]
    fn test_numpad_digits_resolve() {
        assert_eq!(Key::from_name("num0"), Some(Key::Numpad(0)));
        assert_eq!(Key::from_name("num9"), Some(Key::Numpad(9)));
        assert_eq!(Key::from_name("num10"), None);
        assert_eq!(Key::from_name("num+"), Some(Key::NumpadAdd));
    }

    #[test]
    fn test_unknown_tokens_resolve_to_none() {
        assert_eq!(Key::from_name(""), None);
        assert_eq!(Key::from_name("Enter"), None);
        assert_eq!(Key::from_name("hyper"), None);
    }

    #[test]
    fn test_shift_requirement_and_base_char() {
        assert!(Key::Char('A').needs_shift());
        assert!(Key::Char('?').needs_shift());
        assert!(!Key::Char('a').needs_shift());
        assert!(!Key::Enter.needs_shift());

        assert_eq!(Key::Char('A').base_char(), Some('a'));
        assert_eq!(Key::Char('!').base_char(), Some('1'));
        assert_eq!(Key::Char('"').base_char(), Some('\''));
        assert_eq!(Key::Char('ß').base_char(), Some('ß'));
        assert_eq!(Key::Tab.base_char(), None);
    }

    #[test]
    fn test_shift_symbol_tables_are_aligned() {
        assert_eq!(SHIFTED_SYMBOLS.chars().count(), UNSHIFTED_SYMBOLS.chars().count());
    }

    #[test]
    fn test_modifier_classification() {
        assert!(Key::RightAlt.is_modifier());
        assert!(!Key::CapsLock.is_modifier());
    }
}
