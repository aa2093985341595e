//! [`Key`] to X11 KeySym table.
//!
//! KeySym values are defined in X11/keysymdef.h and XF86keysym.h.
//! Reference: <https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h>
//!
//! Latin-1 characters are their own KeySym (`XK_a` is 0x61).  Any other
//! character uses the Unicode KeySym range: `0x0100_0000 | codepoint`.  The
//! XTest backend turns a KeySym into a keycode with `XKeysymToKeycode`, so
//! upper-case letters resolve to the same physical key as lower-case ones and
//! Shift is applied separately.

use super::Key;

/// Offset of the Unicode KeySym range.
pub const UNICODE_KEYSYM_BASE: u32 = 0x0100_0000;

/// Translates a [`Key`] to an X11 KeySym.
///
/// Every key has a KeySym except function keys above F24.
pub fn key_to_keysym(key: Key) -> Option<u32> {
    let sym = match key {
        Key::Backspace => 0xFF08,
        Key::Tab => 0xFF09,
        Key::Enter => 0xFF0D,
        Key::Escape => 0xFF1B,
        Key::Delete => 0xFFFF,
        Key::Space => 0x0020,
        Key::CapsLock => 0xFFE5,

        Key::Home => 0xFF50,
        Key::Left => 0xFF51,
        Key::Up => 0xFF52,
        Key::Right => 0xFF53,
        Key::Down => 0xFF54,
        Key::PageUp => 0xFF55,
        Key::PageDown => 0xFF56,
        Key::End => 0xFF57,
        Key::PrintScreen => 0xFF61,
        Key::Insert => 0xFF63,
        Key::Menu => 0xFF67,

        // XK_F1 (0xFFBE) .. XK_F35 are contiguous
        Key::F(n) if (1..=24).contains(&n) => 0xFFBE + u32::from(n - 1),
        Key::F(_) => return None,

        Key::Shift => 0xFFE1,
        Key::RightShift => 0xFFE2,
        Key::Control => 0xFFE3,
        Key::RightControl => 0xFFE4,
        Key::Alt => 0xFFE9,
        Key::RightAlt => 0xFFEA,
        Key::Command => 0xFFEB,      // XK_Super_L
        Key::RightCommand => 0xFFEC, // XK_Super_R

        Key::AudioVolumeDown => 0x1008_FF11,
        Key::AudioMute => 0x1008_FF12,
        Key::AudioVolumeUp => 0x1008_FF13,
        Key::AudioPlay => 0x1008_FF14,
        Key::AudioStop => 0x1008_FF15,
        Key::AudioPrev => 0x1008_FF16,
        Key::AudioNext => 0x1008_FF17,

        Key::NumLock => 0xFF7F,
        Key::NumpadEnter => 0xFF8D,
        Key::NumpadMultiply => 0xFFAA,
        Key::NumpadAdd => 0xFFAB,
        Key::NumpadSubtract => 0xFFAD,
        Key::NumpadDecimal => 0xFFAE,
        Key::NumpadDivide => 0xFFAF,
        Key::Numpad(d) => 0xFFB0 + u32::from(d.min(9)),

        Key::Char(c) => char_to_keysym(c),
    };
    Some(sym)
}

/// KeySym of a character: Latin-1 directly, everything else via the Unicode range.
pub fn char_to_keysym(c: char) -> u32 {
    match c {
        '\n' | '\r' => 0xFF0D,
        '\t' => 0xFF09,
        c if (c as u32) < 0x100 => c as u32,
        c => UNICODE_KEYSYM_BASE | c as u32,
    }
}
