//! Keyboard use cases: taps, chords and key toggles.
//!
//! A tap is always sent as exactly one backend call, either a single-key tap
//! with up to two modifiers or a chord.  Absent modifier slots are sent as
//! the `"null"` token.

use std::sync::Arc;

use robokit_core::domain::keyboard::NO_MODIFIER;
use robokit_core::{FromArgs, KeyRequest, OptionalArgs, TapOptions, ToggleKeyOptions};
use tracing::{debug, warn};

use super::ports::InputBackend;

/// The Keyboard Event use case.
#[derive(Clone)]
pub struct KeyDispatcher {
    backend: Arc<dyn InputBackend>,
}

impl KeyDispatcher {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self { backend }
    }

    /// Taps `key` with the modifiers and delay in `opts`.
    pub fn tap(&self, key: &str, opts: TapOptions) {
        self.dispatch(KeyRequest::single(key, opts));
    }

    /// Taps `key` with every entry of `modifiers` held.
    pub fn multi_tap<S: AsRef<str>>(&self, key: &str, modifiers: &[S], delay_ms: u32) {
        self.dispatch(KeyRequest::Chord {
            key: key.to_string(),
            modifiers: modifiers.iter().map(|m| m.as_ref().to_string()).collect(),
            delay_ms,
        });
    }

    /// Loose tap: the shape of the first optional value picks single or chord.
    pub fn tap_args(&self, key: &str, args: &OptionalArgs) {
        self.dispatch(KeyRequest::from_args(key, args));
    }

    /// Sends one already-shaped request.
    pub fn dispatch(&self, request: KeyRequest) {
        debug!("key request {request:?}");
        let result = match &request {
            KeyRequest::Single {
                key,
                modifier,
                modifier_type,
                delay_ms,
            } => self.backend.key_tap(
                key,
                modifier.as_deref().unwrap_or(NO_MODIFIER),
                modifier_type.as_deref().unwrap_or(NO_MODIFIER),
                *delay_ms,
            ),
            KeyRequest::Chord {
                key,
                modifiers,
                delay_ms,
            } => self
                .backend
                .key_tap_chord(key, modifiers, modifiers.len(), *delay_ms),
        };
        if let Err(e) = result {
            warn!("tap of {:?} failed: {e:?}", request.key());
        }
    }

    /// Presses or releases `key`.
    ///
    /// Returns the backend's status: empty on success, its message otherwise.
    pub fn toggle(&self, key: &str, opts: ToggleKeyOptions) -> String {
        let result = self.backend.key_toggle(
            key,
            opts.direction.as_deref().unwrap_or(NO_MODIFIER),
            opts.modifier.as_deref().unwrap_or(NO_MODIFIER),
            opts.modifier_type.as_deref().unwrap_or(NO_MODIFIER),
        );
        match result {
            Ok(()) => String::new(),
            Err(e) => {
                debug!("key toggle of {key:?} reported {e:?}");
                e.to_string()
            }
        }
    }

    /// Loose form of [`KeyDispatcher::toggle`]: `[direction, modifier, modifier_type]`.
    pub fn toggle_args(&self, key: &str, args: &OptionalArgs) -> String {
        self.toggle(key, ToggleKeyOptions::from_args(args))
    }

    pub fn set_key_delay(&self, ms: u32) {
        if let Err(e) = self.backend.set_key_delay(ms) {
            warn!("set key delay failed: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
