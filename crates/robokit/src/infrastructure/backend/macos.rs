//! macOS event sink via Quartz event services.
//!
//! Events are created from a `HIDSystemState` event source and posted at the
//! HID tap, the same level as physical input.  Posting requires the
//! Accessibility permission; without it macOS drops the events silently.
//!
//! Two pieces of state are tracked here because Quartz does not infer them:
//!
//! - held modifier flags, stamped on every key event so applications see
//!   `⌘V` rather than a bare `V` after a separate Command press;
//! - held mouse buttons, so pointer motion is posted as a drag while a
//!   button is down.

use std::sync::Mutex;

use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTapLocation, CGEventType, CGMouseButton, ScrollEventUnit,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use robokit_core::{Key, KeyMapper, MouseButton};

use super::EventSink;
use crate::application::ports::BackendError;

#[derive(Default)]
struct Held {
    flags: u64,
    button: Option<MouseButton>,
}

/// Quartz sink.  A fresh event source is created per event.
pub struct QuartzSink {
    held: Mutex<Held>,
}

impl QuartzSink {
    /// # Errors
    ///
    /// [`BackendError::Platform`] if no event source can be created.
    pub fn new() -> Result<Self, BackendError> {
        source()?;
        Ok(Self {
            held: Mutex::new(Held::default()),
        })
    }

    fn held(&self) -> Result<std::sync::MutexGuard<'_, Held>, BackendError> {
        self.held
            .lock()
            .map_err(|_| BackendError::Platform("held-state lock poisoned".into()))
    }

    fn post_mouse(
        &self,
        kind: CGEventType,
        at: CGPoint,
        button: CGMouseButton,
    ) -> Result<(), BackendError> {
        let event = CGEvent::new_mouse_event(source()?, kind, at, button)
            .map_err(|_| BackendError::Platform("CGEventCreateMouseEvent failed".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn location(&self) -> Result<CGPoint, BackendError> {
        let event = CGEvent::new(source()?)
            .map_err(|_| BackendError::Platform("CGEventCreate failed".into()))?;
        Ok(event.location())
    }
}

impl EventSink for QuartzSink {
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        let at = CGPoint::new(f64::from(x), f64::from(y));
        let held = self.held()?.button;
        let (kind, button) = match held {
            Some(MouseButton::Left) => (CGEventType::LeftMouseDragged, CGMouseButton::Left),
            Some(MouseButton::Right) => (CGEventType::RightMouseDragged, CGMouseButton::Right),
            Some(MouseButton::Center) => (CGEventType::OtherMouseDragged, CGMouseButton::Center),
            None => (CGEventType::MouseMoved, CGMouseButton::Left),
        };
        self.post_mouse(kind, at, button)
    }

    fn button(&self, button: MouseButton, down: bool) -> Result<(), BackendError> {
        let (kind, cg_button) = match (button, down) {
            (MouseButton::Left, true) => (CGEventType::LeftMouseDown, CGMouseButton::Left),
            (MouseButton::Left, false) => (CGEventType::LeftMouseUp, CGMouseButton::Left),
            (MouseButton::Right, true) => (CGEventType::RightMouseDown, CGMouseButton::Right),
            (MouseButton::Right, false) => (CGEventType::RightMouseUp, CGMouseButton::Right),
            (MouseButton::Center, true) => (CGEventType::OtherMouseDown, CGMouseButton::Center),
            (MouseButton::Center, false) => (CGEventType::OtherMouseUp, CGMouseButton::Center),
        };
        let at = self.location()?;
        self.post_mouse(kind, at, cg_button)?;
        self.held()?.button = down.then_some(button);
        Ok(())
    }

    fn wheel(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        let event = CGEvent::new_scroll_event(source()?, ScrollEventUnit::LINE, 2, dy, dx, 0)
            .map_err(|_| BackendError::Platform("CGEventCreateScrollWheelEvent failed".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn key(&self, key: Key, down: bool) -> Result<(), BackendError> {
        let keycode = KeyMapper::macos_keycode(key)
            .ok_or_else(|| BackendError::UnknownKey(format!("{key:?}")))?;
        let flags = {
            let mut held = self.held()?;
            let bit = modifier_flag(key);
            if down {
                held.flags |= bit;
            } else {
                held.flags &= !bit;
            }
            held.flags
        };
        let event = CGEvent::new_keyboard_event(source()?, keycode, down)
            .map_err(|_| BackendError::Platform("CGEventCreateKeyboardEvent failed".into()))?;
        event.set_flags(CGEventFlags::from_bits_truncate(flags));
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn unicode(&self, codepoint: u32) -> Result<(), BackendError> {
        let c = char::from_u32(codepoint)
            .ok_or_else(|| BackendError::Platform(format!("{codepoint:#x} is not a scalar value")))?;
        let text = c.to_string();
        for down in [true, false] {
            let event = CGEvent::new_keyboard_event(source()?, 0, down)
                .map_err(|_| BackendError::Platform("CGEventCreateKeyboardEvent failed".into()))?;
            event.set_string(&text);
            event.post(CGEventTapLocation::HID);
        }
        Ok(())
    }

    fn pointer(&self) -> Result<(i32, i32), BackendError> {
        let at = self.location()?;
        Ok((at.x.round() as i32, at.y.round() as i32))
    }
}

fn source() -> Result<CGEventSource, BackendError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| BackendError::Platform("CGEventSourceCreate failed".into()))
}

/// Event flag bit held while `key` is down; 0 for ordinary keys.
fn modifier_flag(key: Key) -> u64 {
    let flag = match key {
        Key::Command | Key::RightCommand => CGEventFlags::CGEventFlagCommand,
        Key::Shift | Key::RightShift => CGEventFlags::CGEventFlagShift,
        Key::Alt | Key::RightAlt => CGEventFlags::CGEventFlagAlternate,
        Key::Control | Key::RightControl => CGEventFlags::CGEventFlagControl,
        _ => return 0,
    };
    flag.bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_modifier_keys_carry_flags() {
        assert_ne!(modifier_flag(Key::Command), 0);
        assert_eq!(modifier_flag(Key::Shift), modifier_flag(Key::RightShift));
        assert_eq!(modifier_flag(Key::Char('a')), 0);
    }
}
