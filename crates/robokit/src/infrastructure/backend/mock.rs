//! Recording event sink for tests and headless runs.
//!
//! # Why a recording sink?
//!
//! The native sinks move the real cursor and press real keys, need a
//! desktop session, and cannot be observed from test code.  The
//! `RecordingSink` pushes every raw event into a `Mutex<Vec<SinkEvent>>` and
//! tracks a virtual pointer, so the whole [`Synthesizer`] (token decoding,
//! modifier order, smooth-move walking) can be asserted on directly.
//!
//! # Knobs
//!
//! - `should_fail` makes every event fail with `BackendError::Platform`.
//! - `unmapped` lists keys the "platform" has no code for, to exercise the
//!   Unicode fallback.
//! - `nudge_after` simulates the user grabbing the mouse: after that many
//!   pointer moves the virtual pointer jumps away.

use std::sync::{Arc, Mutex};

use robokit_core::{Key, MouseButton};

use super::{EventSink, Synthesizer};
use crate::application::ports::{BackendError, Pacer};

/// Distance the virtual pointer jumps when `nudge_after` triggers.
const NUDGE_PX: i32 = 37;

/// One raw event as emitted to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Move(i32, i32),
    Button(MouseButton, bool),
    Wheel(i32, i32),
    Key(Key, bool),
    Unicode(u32),
}

/// An [`EventSink`] that records instead of injecting.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<SinkEvent>>,
    pub pointer: Mutex<(i32, i32)>,
    pub should_fail: bool,
    pub unmapped: Vec<Key>,
    pub nudge_after: Option<usize>,
    moves: Mutex<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every event fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// A sink with no key code for any of `keys`.
    pub fn with_unmapped(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            unmapped: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A sink whose pointer jumps away after `moves` pointer moves.
    pub fn nudging_after(moves: usize) -> Self {
        Self {
            nudge_after: Some(moves),
            ..Self::default()
        }
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, event: SinkEvent) -> Result<(), BackendError> {
        if self.should_fail {
            return Err(BackendError::Platform("recording sink set to fail".into()));
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
        Ok(())
    }
}

impl EventSink for RecordingSink {
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.record(SinkEvent::Move(x, y))?;
        let moves = match self.moves.lock() {
            Ok(mut n) => {
                *n += 1;
                *n
            }
            Err(_) => 0,
        };
        let nudged = self.nudge_after.is_some_and(|after| moves >= after);
        if let Ok(mut pointer) = self.pointer.lock() {
            *pointer = if nudged {
                (x + NUDGE_PX, y - NUDGE_PX)
            } else {
                (x, y)
            };
        }
        Ok(())
    }

    fn button(&self, button: MouseButton, down: bool) -> Result<(), BackendError> {
        self.record(SinkEvent::Button(button, down))
    }

    fn wheel(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        self.record(SinkEvent::Wheel(dx, dy))
    }

    fn key(&self, key: Key, down: bool) -> Result<(), BackendError> {
        if self.unmapped.contains(&key) {
            return Err(BackendError::UnknownKey(format!("{key:?}")));
        }
        self.record(SinkEvent::Key(key, down))
    }

    fn unicode(&self, codepoint: u32) -> Result<(), BackendError> {
        self.record(SinkEvent::Unicode(codepoint))
    }

    fn pointer(&self) -> Result<(i32, i32), BackendError> {
        if self.should_fail {
            return Err(BackendError::NotInitialized);
        }
        self.pointer
            .lock()
            .map(|p| *p)
            .map_err(|_| BackendError::Platform("pointer lock poisoned".into()))
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<f64>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<f64> {
        self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Pacer for RecordingPacer {
    fn pause_ms(&self, ms: f64) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(ms);
        }
    }
}

/// Synthesizer over a [`RecordingSink`].
pub type RecordingBackend = Synthesizer<RecordingSink>;

impl Synthesizer<RecordingSink> {
    /// A recording backend that never sleeps.
    pub fn recording() -> Self {
        Self::with_pacer(RecordingSink::new(), Arc::new(RecordingPacer::default()))
    }
}
