//! [`Key`] to macOS `CGKeyCode` table.
//!
//! CGKeyCode values are the `kVK_*` constants from HIToolbox `Events.h`.
//! They identify ANSI key positions, not characters.  Characters without an
//! ANSI position (and the media keys, which macOS posts as system-defined
//! events) return `None`; the backend types those as Unicode strings.

use super::Key;

/// Translates a [`Key`] to a macOS `CGKeyCode`.
pub fn key_to_cgkeycode(key: Key) -> Option<u16> {
    let code = match key {
        Key::Enter => 0x24,     // kVK_Return
        Key::Tab => 0x30,       // kVK_Tab
        Key::Space => 0x31,     // kVK_Space
        Key::Backspace => 0x33, // kVK_Delete
        Key::Escape => 0x35,    // kVK_Escape
        Key::CapsLock => 0x39,  // kVK_CapsLock
        Key::Delete => 0x75,    // kVK_ForwardDelete

        Key::Insert => 0x72, // kVK_Help
        Key::Home => 0x73,
        Key::PageUp => 0x74,
        Key::End => 0x77,
        Key::PageDown => 0x79,
        Key::Left => 0x7B,
        Key::Right => 0x7C,
        Key::Down => 0x7D,
        Key::Up => 0x7E,
        Key::PrintScreen => 0x69, // kVK_F13
        Key::Menu => return None,

        Key::F(n) => return function_key(n),

        Key::Command => 0x37,
        Key::RightCommand => 0x36,
        Key::Shift => 0x38,
        Key::RightShift => 0x3C,
        Key::Alt => 0x3A, // kVK_Option
        Key::RightAlt => 0x3D,
        Key::Control => 0x3B,
        Key::RightControl => 0x3E,

        Key::AudioVolumeUp => 0x48,
        Key::AudioVolumeDown => 0x49,
        Key::AudioMute => 0x4A,
        Key::AudioPlay | Key::AudioStop | Key::AudioPrev | Key::AudioNext => return None,

        Key::NumLock => 0x47, // kVK_ANSI_KeypadClear
        Key::NumpadDecimal => 0x41,
        Key::NumpadMultiply => 0x43,
        Key::NumpadAdd => 0x45,
        Key::NumpadDivide => 0x4B,
        Key::NumpadEnter => 0x4C,
        Key::NumpadSubtract => 0x4E,
        Key::Numpad(d) => return keypad_digit(d),

        Key::Char(c) => return char_to_cgkeycode(c),
    };
    Some(code)
}

fn function_key(n: u8) -> Option<u16> {
    let code = match n {
        1 => 0x7A,
        2 => 0x78,
        3 => 0x63,
        4 => 0x76,
        5 => 0x60,
        6 => 0x61,
        7 => 0x62,
        8 => 0x64,
        9 => 0x65,
        10 => 0x6D,
        11 => 0x67,
        12 => 0x6F,
        13 => 0x69,
        14 => 0x6B,
        15 => 0x71,
        16 => 0x6A,
        17 => 0x40,
        18 => 0x4F,
        19 => 0x50,
        20 => 0x5A,
        _ => return None,
    };
    Some(code)
}

fn keypad_digit(d: u8) -> Option<u16> {
    const KEYPAD: [u16; 10] = [0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5B, 0x5C];
    KEYPAD.get(usize::from(d)).copied()
}

/// ANSI position of a US-layout character, ignoring Shift.
fn char_to_cgkeycode(c: char) -> Option<u16> {
    let code = match Key::Char(c).base_char()? {
        'a' => 0x00,
        's' => 0x01,
        'd' => 0x02,
        'f' => 0x03,
        'h' => 0x04,
        'g' => 0x05,
        'z' => 0x06,
        'x' => 0x07,
        'c' => 0x08,
        'v' => 0x09,
        'b' => 0x0B,
        'q' => 0x0C,
        'w' => 0x0D,
        'e' => 0x0E,
        'r' => 0x0F,
        'y' => 0x10,
        't' => 0x11,
        '1' => 0x12,
        '2' => 0x13,
        '3' => 0x14,
        '4' => 0x15,
        '6' => 0x16,
        '5' => 0x17,
        '=' => 0x18,
        '9' => 0x19,
        '7' => 0x1A,
        '-' => 0x1B,
        '8' => 0x1C,
        '0' => 0x1D,
        ']' => 0x1E,
        'o' => 0x1F,
        'u' => 0x20,
        '[' => 0x21,
        'i' => 0x22,
        'p' => 0x23,
        'l' => 0x25,
        'j' => 0x26,
        '\'' => 0x27,
        'k' => 0x28,
        ';' => 0x29,
        '\\' => 0x2A,
        ',' => 0x2B,
        '/' => 0x2C,
        'n' => 0x2D,
        'm' => 0x2E,
        '.' => 0x2F,
        '`' => 0x32,
        ' ' => 0x31,
        '\n' | '\r' => 0x24,
        '\t' => 0x30,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_letter_keys_have_macos_mappings() {
        for c in 'a'..='z' {
            assert!(key_to_cgkeycode(Key::Char(c)).is_some(), "{c} should have a CGKeyCode");
        }
    }

    #[test]
    fn test_known_positions() {
        assert_eq!(key_to_cgkeycode(Key::Char('a')), Some(0x00));
        assert_eq!(key_to_cgkeycode(Key::Char('v')), Some(0x09));
        assert_eq!(key_to_cgkeycode(Key::Enter), Some(0x24));
        assert_eq!(key_to_cgkeycode(Key::F(1)), Some(0x7A));
        assert_eq!(key_to_cgkeycode(Key::Command), Some(0x37));
    }

    #[test]
    fn test_shifted_characters_share_the_base_position() {
        assert_eq!(key_to_cgkeycode(Key::Char('V')), key_to_cgkeycode(Key::Char('v')));
        assert_eq!(key_to_cgkeycode(Key::Char('@')), key_to_cgkeycode(Key::Char('2')));
    }

    #[test]
    fn test_function_keys_above_f20_are_unmapped() {
        assert!(key_to_cgkeycode(Key::F(20)).is_some());
        assert_eq!(key_to_cgkeycode(Key::F(21)), None);
    }

    #[test]
    fn test_media_transport_keys_are_unmapped() {
        assert_eq!(key_to_cgkeycode(Key::AudioPlay), None);
        assert_eq!(key_to_cgkeycode(Key::AudioMute), Some(0x4A));
    }

    #[test]
    fn test_keypad_digits_skip_0x5a() {
        assert_eq!(key_to_cgkeycode(Key::Numpad(7)), Some(0x59));
        assert_eq!(key_to_cgkeycode(Key::Numpad(8)), Some(0x5B));
    }

    #[test]
    fn test_non_ansi_characters_are_unmapped() {
        assert_eq!(key_to_cgkeycode(Key::Char('é')), None);
    }
}
