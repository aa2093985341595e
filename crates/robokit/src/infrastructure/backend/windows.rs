//! Windows event sink via the `SendInput` API.
//!
//! Keys are sent as Virtual-Key codes.  Unicode characters use
//! `KEYEVENTF_UNICODE`, one UTF-16 unit per event, so astral-plane
//! characters become a surrogate pair.  Mouse coordinates are normalized
//! to the `[0, 65535]` absolute range of the primary screen.

use robokit_core::{Key, KeyMapper, MouseButton};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, MOUSEEVENTF_ABSOLUTE,
    MOUSEEVENTF_HWHEEL, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
    MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSEEVENTF_WHEEL, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN,
};

use super::EventSink;
use crate::application::ports::BackendError;

/// One wheel notch in `mouseData` units.
const WHEEL_DELTA: i32 = 120;

/// Virtual keys that need `KEYEVENTF_EXTENDEDKEY`.
const EXTENDED_VKS: &[u8] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // nav
    0x2D, 0x2E, // Insert, Delete
    0x5B, 0x5C, // Win keys
    0x6F, // Numpad divide
    0xA3, 0xA5, // Right Ctrl, Right Alt
];

/// `SendInput` sink.  Stateless; the OS owns the input queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendInputSink;

impl SendInputSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for SendInputSink {
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        let (norm_x, norm_y) = normalize_coords(x, y);
        send(&[mouse_input(
            norm_x,
            norm_y,
            0,
            MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE,
        )])
    }

    fn button(&self, button: MouseButton, down: bool) -> Result<(), BackendError> {
        let flags = match (button, down) {
            (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
            (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
            (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
            (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
            (MouseButton::Center, true) => MOUSEEVENTF_MIDDLEDOWN,
            (MouseButton::Center, false) => MOUSEEVENTF_MIDDLEUP,
        };
        send(&[mouse_input(0, 0, 0, flags)])
    }

    fn wheel(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        if dy != 0 {
            send(&[mouse_input(0, 0, wheel_data(dy), MOUSEEVENTF_WHEEL)])?;
        }
        if dx != 0 {
            send(&[mouse_input(0, 0, wheel_data(dx), MOUSEEVENTF_HWHEEL)])?;
        }
        Ok(())
    }

    fn key(&self, key: Key, down: bool) -> Result<(), BackendError> {
        let vk = KeyMapper::windows_vk(key)
            .ok_or_else(|| BackendError::UnknownKey(format!("{key:?}")))?;
        let mut flags = KEYBD_EVENT_FLAGS(0);
        if !down {
            flags |= KEYEVENTF_KEYUP;
        }
        if EXTENDED_VKS.contains(&vk) {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }
        send(&[key_input(VIRTUAL_KEY(u16::from(vk)), 0, flags)])
    }

    fn unicode(&self, codepoint: u32) -> Result<(), BackendError> {
        let c = char::from_u32(codepoint)
            .ok_or_else(|| BackendError::Platform(format!("{codepoint:#x} is not a scalar value")))?;
        let mut units = [0u16; 2];
        let mut inputs = Vec::with_capacity(4);
        for unit in c.encode_utf16(&mut units).iter() {
            inputs.push(key_input(VIRTUAL_KEY(0), *unit, KEYEVENTF_UNICODE));
            inputs.push(key_input(
                VIRTUAL_KEY(0),
                *unit,
                KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
            ));
        }
        send(&inputs)
    }

    fn pointer(&self) -> Result<(i32, i32), BackendError> {
        let mut point = POINT::default();
        // SAFETY: point is a valid out-pointer for the call
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| BackendError::Platform(format!("GetCursorPos failed: {e}")))?;
        Ok((point.x, point.y))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn mouse_input(dx: i32, dy: i32, mouse_data: u32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn key_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Sends `inputs` as one batch.
///
/// `SendInput` reports how many events it inserted; fewer than requested
/// means UIPI or another desktop blocked the injection.
fn send(inputs: &[INPUT]) -> Result<(), BackendError> {
    // SAFETY: every INPUT is fully initialised and the size matches the struct
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(BackendError::Platform(format!(
            "SendInput inserted {sent} of {} events",
            inputs.len()
        )));
    }
    Ok(())
}

/// Normalizes pixel coordinates to the `[0, 65535]` absolute range.
fn normalize_coords(x: i32, y: i32) -> (i32, i32) {
    // SAFETY: GetSystemMetrics has no preconditions
    let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    (scale(x, w), scale(y, h))
}

fn scale(v: i32, extent: i32) -> i32 {
    if extent <= 1 {
        return 0;
    }
    (i64::from(v) * 65535 / i64::from(extent - 1)).clamp(0, 65535) as i32
}

/// `mouseData` for `notches` wheel clicks, saturating at the `i32` range.
fn wheel_data(notches: i32) -> u32 {
    notches.saturating_mul(WHEEL_DELTA) as u32
}
