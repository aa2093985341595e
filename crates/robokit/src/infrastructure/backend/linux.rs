//! Linux X11 event sink via the XTest extension.
//!
//! # What is XTest?
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! and mouse events as if the user had physically interacted with the
//! hardware.  The receiving application cannot tell them apart from real
//! input.
//!
//! - `XTestFakeKeyEvent(display, keycode, is_press, time)`
//! - `XTestFakeMotionEvent(display, screen, x, y, time)`
//! - `XTestFakeButtonEvent(display, button, is_press, time)`
//!
//! # Key code translation
//!
//! XTest takes hardware *keycodes*, not KeySyms:
//!
//! ```text
//! Key → KeyMapper::x11_keysym → XKeysymToKeycode(display, keysym) → keycode
//! ```
//!
//! # Unicode characters
//!
//! Most characters have no keycode in the active layout.  The sink reserves
//! one unused keycode at startup (the *scratch* keycode), rebinds it to the
//! character's KeySym, and taps it.  Escape tokens (`U00E9`) are valid KeySym
//! names, so they go through `XStringToKeysym` and the same scratch keycode.
//!
//! # Scrolling
//!
//! X11 has no wheel API; buttons 4/5 scroll up/down and 6/7 scroll
//! left/right, one press+release per notch.

use std::ffi::CString;
use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::sync::Mutex;

use robokit_core::keymap::linux_x11::char_to_keysym;
use robokit_core::{Key, KeyMapper, MouseButton};
use tracing::{debug, info};
use x11::xlib;
use x11::xtest;

use super::{parse_escape_token, EventSink};
use crate::application::ports::BackendError;

/// `CurrentTime`: let the server timestamp synthesized events.
const CURRENT_TIME: xlib::Time = 0;

/// Screen argument for `XTestFakeMotionEvent` meaning "the pointer's screen".
const SCREEN_DEFAULT: c_int = -1;

const NO_SYMBOL: xlib::KeySym = 0;

/// XTest sink bound to one display connection.
pub struct XTestSink {
    display: *mut xlib::Display,
    /// Keycode rebound for characters outside the layout; the lock
    /// serialises rebind + tap.
    scratch: Mutex<xlib::KeyCode>,
}

// Xlib is initialised with XInitThreads before the display is opened.
unsafe impl Send for XTestSink {}
unsafe impl Sync for XTestSink {}

impl XTestSink {
    /// Opens the display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// [`BackendError::Platform`] if the display cannot be opened.
    pub fn open() -> Result<Self, BackendError> {
        // SAFETY: XInitThreads must precede every other Xlib call in the
        // process; calling it more than once is harmless.
        let display = unsafe {
            xlib::XInitThreads();
            xlib::XOpenDisplay(ptr::null())
        };
        if display.is_null() {
            return Err(BackendError::Platform(
                "XOpenDisplay failed; is DISPLAY set?".into(),
            ));
        }
        let scratch = unsafe { find_scratch_keycode(display) };
        info!("X11 input ready (scratch keycode {scratch})");
        Ok(Self {
            display,
            scratch: Mutex::new(scratch),
        })
    }

    fn flush(&self) {
        // SAFETY: display is open for the lifetime of self
        unsafe {
            xlib::XFlush(self.display);
        }
    }

    fn fake_key(&self, keycode: xlib::KeyCode, down: bool) {
        // SAFETY: display is open; XTest ignores unknown keycodes
        unsafe {
            xtest::XTestFakeKeyEvent(
                self.display,
                c_uint::from(keycode),
                c_int::from(down),
                CURRENT_TIME,
            );
        }
    }

    fn fake_button(&self, button: c_uint, down: bool) {
        // SAFETY: display is open
        unsafe {
            xtest::XTestFakeButtonEvent(self.display, button, c_int::from(down), CURRENT_TIME);
        }
    }

    /// Taps `keysym` through the scratch keycode.
    fn tap_keysym(&self, keysym: xlib::KeySym) -> Result<(), BackendError> {
        let scratch = self
            .scratch
            .lock()
            .map_err(|_| BackendError::Platform("scratch keycode lock poisoned".into()))?;
        if *scratch == 0 {
            return Err(BackendError::Platform("no free keycode for Unicode input".into()));
        }
        let mut syms = [keysym, keysym];
        // SAFETY: syms outlives the call; one keycode, two syms per keycode
        unsafe {
            xlib::XChangeKeyboardMapping(
                self.display,
                c_int::from(*scratch),
                syms.len() as c_int,
                syms.as_mut_ptr(),
                1,
            );
            xlib::XSync(self.display, xlib::False);
        }
        self.fake_key(*scratch, true);
        self.fake_key(*scratch, false);
        // The binding stays until the next rebind so the client can still
        // resolve the event after we return.
        unsafe {
            xlib::XSync(self.display, xlib::False);
        }
        Ok(())
    }
}

impl Drop for XTestSink {
    fn drop(&mut self) {
        // SAFETY: display was opened in `open` and is closed exactly once
        unsafe {
            if let Ok(scratch) = self.scratch.lock() {
                if *scratch != 0 {
                    let mut empty = [NO_SYMBOL, NO_SYMBOL];
                    xlib::XChangeKeyboardMapping(
                        self.display,
                        c_int::from(*scratch),
                        empty.len() as c_int,
                        empty.as_mut_ptr(),
                        1,
                    );
                }
            }
            xlib::XCloseDisplay(self.display);
        }
    }
}

impl EventSink for XTestSink {
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        // SAFETY: display is open
        unsafe {
            xtest::XTestFakeMotionEvent(self.display, SCREEN_DEFAULT, x, y, CURRENT_TIME);
        }
        self.flush();
        Ok(())
    }

    fn button(&self, button: MouseButton, down: bool) -> Result<(), BackendError> {
        self.fake_button(x_button(button), down);
        self.flush();
        Ok(())
    }

    fn wheel(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        for (button, notches) in wheel_buttons(dx, dy) {
            for _ in 0..notches {
                self.fake_button(button, true);
                self.fake_button(button, false);
            }
        }
        self.flush();
        Ok(())
    }

    fn key(&self, key: Key, down: bool) -> Result<(), BackendError> {
        let keysym = KeyMapper::x11_keysym(key)
            .ok_or_else(|| BackendError::UnknownKey(format!("{key:?}")))?;
        // SAFETY: display is open
        let keycode = unsafe { xlib::XKeysymToKeycode(self.display, xlib::KeySym::from(keysym)) };
        if keycode == 0 {
            // Not in the layout; the synthesizer retries characters as Unicode.
            return Err(BackendError::UnknownKey(format!("{key:?}")));
        }
        self.fake_key(keycode, down);
        self.flush();
        Ok(())
    }

    fn unicode(&self, codepoint: u32) -> Result<(), BackendError> {
        let c = char::from_u32(codepoint)
            .ok_or_else(|| BackendError::Platform(format!("{codepoint:#x} is not a scalar value")))?;
        self.tap_keysym(xlib::KeySym::from(char_to_keysym(c)))
    }

    fn escaped(&self, token: &str) -> Result<(), BackendError> {
        let name = CString::new(token)
            .map_err(|_| BackendError::Platform(format!("escape token {token:?} contains NUL")))?;
        // SAFETY: name is a valid NUL-terminated string for the call
        let keysym = unsafe { xlib::XStringToKeysym(name.as_ptr()) };
        if keysym == NO_SYMBOL {
            debug!("XStringToKeysym does not know {token:?}; decoding it");
            return self.unicode(parse_escape_token(token)?);
        }
        self.tap_keysym(keysym)
    }

    fn pointer(&self) -> Result<(i32, i32), BackendError> {
        let (mut root, mut child) = (0, 0);
        let (mut root_x, mut root_y, mut win_x, mut win_y) = (0, 0, 0, 0);
        let mut mask: c_uint = 0;
        // SAFETY: every out-pointer refers to a live local
        let on_screen = unsafe {
            xlib::XQueryPointer(
                self.display,
                xlib::XDefaultRootWindow(self.display),
                &mut root,
                &mut child,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        if on_screen == xlib::False {
            return Err(BackendError::Platform("pointer is on another screen".into()));
        }
        Ok((root_x, root_y))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn x_button(button: MouseButton) -> c_uint {
    match button {
        MouseButton::Left => 1,
        MouseButton::Center => 2,
        MouseButton::Right => 3,
    }
}

/// Wheel buttons and press counts for a scroll of `(dx, dy)` notches.
fn wheel_buttons(dx: i32, dy: i32) -> Vec<(c_uint, u32)> {
    let mut presses = Vec::with_capacity(2);
    if dy != 0 {
        presses.push((if dy > 0 { 4 } else { 5 }, dy.unsigned_abs()));
    }
    if dx != 0 {
        presses.push((if dx > 0 { 7 } else { 6 }, dx.unsigned_abs()));
    }
    presses
}

/// Highest keycode with no KeySym bound, or 0 if the map is full.
///
/// # Safety
///
/// `display` must be an open display.
unsafe fn find_scratch_keycode(display: *mut xlib::Display) -> xlib::KeyCode {
    let (mut min, mut max) = (0, 0);
    xlib::XDisplayKeycodes(display, &mut min, &mut max);
    let count = max - min + 1;
    let mut per_code: c_int = 0;
    let map = xlib::XGetKeyboardMapping(display, min as xlib::KeyCode, count, &mut per_code);
    if map.is_null() || per_code <= 0 {
        return 0;
    }
    let per_code = per_code as usize;
    let syms = std::slice::from_raw_parts(map, count as usize * per_code);

    let free = (0..count as usize)
        .rev()
        .find(|&i| syms[i * per_code..(i + 1) * per_code].iter().all(|&s| s == NO_SYMBOL))
        .map(|i| (min as usize + i) as xlib::KeyCode)
        .unwrap_or(0);
    xlib::XFree(map.cast());
    free
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_numbers() {
        assert_eq!(x_button(MouseButton::Left), 1);
        assert_eq!(x_button(MouseButton::Center), 2);
        assert_eq!(x_button(MouseButton::Right), 3);
    }

    #[test]
    fn test_wheel_buttons_per_axis() {
        assert_eq!(wheel_buttons(0, 3), vec![(4, 3)]);
        assert_eq!(wheel_buttons(0, -2), vec![(5, 2)]);
        assert_eq!(wheel_buttons(-1, 1), vec![(4, 1), (6, 1)]);
        assert!(wheel_buttons(0, 0).is_empty());
    }
}
