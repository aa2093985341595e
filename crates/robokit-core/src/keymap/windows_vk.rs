//! [`Key`] to Windows Virtual-Key code table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//! <https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes>
//!
//! Letters map to their upper-case ASCII value and digits to their ASCII
//! value, as `VK_A..VK_Z` and `VK_0..VK_9` are defined that way.  US-layout
//! punctuation maps to the `VK_OEM_*` codes.  Characters outside that set
//! have no fixed VK code; the backend asks `VkKeyScanW` at runtime or falls
//! back to a Unicode `SendInput`.

use super::Key;

/// Translates a [`Key`] to a Windows Virtual-Key code.
///
/// Returns `None` for characters without a fixed VK code and for function
/// keys above F24.
pub fn key_to_vk(key: Key) -> Option<u8> {
    let vk = match key {
        Key::Backspace => 0x08,
        Key::Tab => 0x09,
        Key::Enter => 0x0D,
        Key::Escape => 0x1B,
        Key::Space => 0x20,
        Key::CapsLock => 0x14,
        Key::Delete => 0x2E,

        Key::PageUp => 0x21,
        Key::PageDown => 0x22,
        Key::End => 0x23,
        Key::Home => 0x24,
        Key::Left => 0x25,
        Key::Up => 0x26,
        Key::Right => 0x27,
        Key::Down => 0x28,
        Key::PrintScreen => 0x2C,
        Key::Insert => 0x2D,
        Key::Menu => 0x5D, // VK_APPS

        // VK_F1 (0x70) .. VK_F24 (0x87) are contiguous
        Key::F(n) if (1..=24).contains(&n) => 0x70 + (n - 1),
        Key::F(_) => return None,

        Key::Command => 0x5B,      // VK_LWIN
        Key::RightCommand => 0x5C, // VK_RWIN
        Key::Alt => 0xA4,          // VK_LMENU
        Key::RightAlt => 0xA5,     // VK_RMENU
        Key::Control => 0xA2,      // VK_LCONTROL
        Key::RightControl => 0xA3, // VK_RCONTROL
        Key::Shift => 0xA0,        // VK_LSHIFT
        Key::RightShift => 0xA1,   // VK_RSHIFT

        Key::AudioMute => 0xAD,
        Key::AudioVolumeDown => 0xAE,
        Key::AudioVolumeUp => 0xAF,
        Key::AudioNext => 0xB0,
        Key::AudioPrev => 0xB1,
        Key::AudioStop => 0xB2,
        Key::AudioPlay => 0xB3, // VK_MEDIA_PLAY_PAUSE

        Key::NumLock => 0x90,
        Key::Numpad(d) if d <= 9 => 0x60 + d,
        Key::Numpad(_) => return None,
        Key::NumpadMultiply => 0x6A,
        Key::NumpadAdd => 0x6B,
        Key::NumpadSubtract => 0x6D,
        Key::NumpadDecimal => 0x6E,
        Key::NumpadDivide => 0x6F,
        // No distinct VK; the backend marks it with KEYEVENTF_EXTENDEDKEY.
        Key::NumpadEnter => 0x0D,

        Key::Char(c) => return char_to_vk(c),
    };
    Some(vk)
}

/// US-layout character to VK code, ignoring Shift.
fn char_to_vk(c: char) -> Option<u8> {
    let base = Key::Char(c).base_char()?;
    let vk = match base {
        'a'..='z' => base.to_ascii_uppercase() as u8,
        '0'..='9' => base as u8,
        ' ' => 0x20,
        ';' => 0xBA,  // VK_OEM_1
        '=' => 0xBB,  // VK_OEM_PLUS
        ',' => 0xBC,  // VK_OEM_COMMA
        '-' => 0xBD,  // VK_OEM_MINUS
        '.' => 0xBE,  // VK_OEM_PERIOD
        '/' => 0xBF,  // VK_OEM_2
        '`' => 0xC0,  // VK_OEM_3
        '[' => 0xDB,  // VK_OEM_4
        '\\' => 0xDC, // VK_OEM_5
        ']' => 0xDD,  // VK_OEM_6
        '\'' => 0xDE, // VK_OEM_7
        '\n' | '\r' => 0x0D,
        '\t' => 0x09,
        _ => return None,
    };
    Some(vk)
}
