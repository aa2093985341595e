//! In-module test doubles for the application ports.

use std::sync::Mutex;

use robokit_core::{ButtonDirection, MouseButton};

use super::ports::{BackendError, Clipboard, ClipboardError, InputBackend, Pacer};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Move(i32, i32),
    Smooth(i32, i32, f64, f64, u32),
    Drag(i32, i32),
    Click(MouseButton, bool),
    Toggle(ButtonDirection, MouseButton),
    MouseDelay(u32),
    KeyDelay(u32),
    Scroll(i32, i32, u32),
    Tap(String, String, String, u32),
    Chord(String, Vec<String>, usize, u32),
    KeyToggle(String, String, String, String),
    Escaped(String),
    Direct(u32),
    Delayed(String, u32),
    Text(String),
}

/// Records every call; fails every call when `should_fail` is set.
#[derive(Default)]
pub struct Recorder {
    pub calls: Mutex<Vec<Call>>,
    pub should_fail: bool,
}

impl Recorder {
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), BackendError> {
        if self.should_fail {
            return Err(BackendError::Platform("injected failure".to_string()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl InputBackend for Recorder {
    fn move_to(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.record(Call::Move(x, y))
    }
    fn move_smooth(&self, x: i32, y: i32, low: f64, high: f64, d: u32) -> Result<bool, BackendError> {
        self.record(Call::Smooth(x, y, low, high, d)).map(|_| true)
    }
    fn drag_to(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.record(Call::Drag(x, y))
    }
    fn click(&self, button: MouseButton, double: bool) -> Result<(), BackendError> {
        self.record(Call::Click(button, double))
    }
    fn toggle(&self, d: ButtonDirection, b: MouseButton) -> Result<(), BackendError> {
        self.record(Call::Toggle(d, b))
    }
    fn set_mouse_delay(&self, ms: u32) -> Result<(), BackendError> {
        self.record(Call::MouseDelay(ms))
    }
    fn set_key_delay(&self, ms: u32) -> Result<(), BackendError> {
        self.record(Call::KeyDelay(ms))
    }
    fn scroll(&self, dx: i32, dy: i32, delay: u32) -> Result<(), BackendError> {
        self.record(Call::Scroll(dx, dy, delay))
    }
    fn key_tap(&self, key: &str, m: &str, mt: &str, delay: u32) -> Result<(), BackendError> {
        self.record(Call::Tap(key.into(), m.into(), mt.into(), delay))
    }
    fn key_tap_chord(&self, key: &str, mods: &[String], count: usize, delay: u32) -> Result<(), BackendError> {
        self.record(Call::Chord(key.into(), mods.to_vec(), count, delay))
    }
    fn key_toggle(&self, key: &str, d: &str, m: &str, mt: &str) -> Result<(), BackendError> {
        if d == "sideways" {
            return Err(BackendError::InvalidKeyState(d.into()));
        }
        self.record(Call::KeyToggle(key.into(), d.into(), m.into(), mt.into()))
    }
    fn type_unicode_escaped(&self, token: &str) -> Result<(), BackendError> {
        self.record(Call::Escaped(token.into()))
    }
    fn type_unicode_direct(&self, cp: u32) -> Result<(), BackendError> {
        self.record(Call::Direct(cp))
    }
    fn type_string_delayed(&self, text: &str, delay: u32) -> Result<(), BackendError> {
        self.record(Call::Delayed(text.into(), delay))
    }
    fn type_string(&self, text: &str) -> Result<(), BackendError> {
        self.record(Call::Text(text.into()))
    }
    fn position(&self) -> Result<(i32, i32), BackendError> {
        if self.should_fail {
            return Err(BackendError::NotInitialized);
        }
        Ok((0, 0))
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct PauseLog {
    pub pauses: Mutex<Vec<f64>>,
}

impl Pacer for PauseLog {
    fn pause_ms(&self, ms: f64) {
        self.pauses.lock().unwrap().push(ms);
    }
}

/// Clipboard held in memory; `should_fail` makes writes fail.
#[derive(Default)]
pub struct ClipboardStub {
    pub contents: Mutex<String>,
    pub should_fail: bool,
}

impl Clipboard for ClipboardStub {
    fn read(&self) -> Result<String, ClipboardError> {
        Ok(self.contents.lock().unwrap().clone())
    }
    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        if self.should_fail {
            return Err(ClipboardError::Unsupported);
        }
        *self.contents.lock().unwrap() = text.to_string();
        Ok(())
    }
}
