//! Input backends.
//!
//! # Layout
//!
//! Each platform provides an [`EventSink`]: the handful of raw events its
//! native API can emit (pointer motion, button, wheel, key, Unicode
//! character).  [`Synthesizer`] builds the full [`InputBackend`] port on top
//! of any sink: token decoding, modifier handling, click doubling, smooth
//! moves and per-action pauses live here once instead of once per OS.
//!
//! | Sink | Platform | API |
//! |------|----------|-----|
//! | `windows::SendInputSink` | Windows | `SendInput` |
//! | `linux::XTestSink` | Linux (X11) | XTest |
//! | `macos::QuartzSink` | macOS | Quartz event services |
//! | [`mock::RecordingSink`] | any | in-memory log |
//!
//! The native sinks are compiled only with the `native` cargo feature.  The
//! one matching the build target is re-exported through [`NativeBackend`].

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use robokit_core::motion::plan_smooth_move;
use robokit_core::{
    ButtonDirection, Key, KeyDirection, Modifier, Modifiers, MouseButton, SmoothMoveSpec,
    DEFAULT_DELAY_MS,
};
use tracing::{debug, trace, warn};

use crate::application::ports::{BackendError, InputBackend, Pacer};

pub mod mock;

#[cfg(all(feature = "native", target_os = "windows"))]
pub mod windows;

#[cfg(all(feature = "native", target_os = "linux"))]
pub mod linux;

#[cfg(all(feature = "native", target_os = "macos"))]
pub mod macos;

#[cfg(all(feature = "native", target_os = "windows"))]
pub type NativeBackend = Synthesizer<windows::SendInputSink>;

#[cfg(all(feature = "native", target_os = "linux"))]
pub type NativeBackend = Synthesizer<linux::XTestSink>;

#[cfg(all(feature = "native", target_os = "macos"))]
pub type NativeBackend = Synthesizer<macos::QuartzSink>;

/// Opens the native backend for the build target.
///
/// # Errors
///
/// [`BackendError::Platform`] if the platform API cannot be reached (no X
/// display, no event source).
#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "linux", target_os = "macos")
))]
pub fn native_backend() -> Result<NativeBackend, BackendError> {
    #[cfg(target_os = "windows")]
    let sink = windows::SendInputSink::new();
    #[cfg(target_os = "linux")]
    let sink = linux::XTestSink::open()?;
    #[cfg(target_os = "macos")]
    let sink = macos::QuartzSink::new()?;
    Ok(Synthesizer::new(sink))
}

/// Pause between the two clicks of a double click.
pub const DOUBLE_CLICK_GAP_MS: u32 = 200;

/// A smooth move is abandoned when the pointer is found this many pixels
/// away from where the previous step put it.
pub const INTERFERENCE_TOLERANCE_PX: i32 = 2;

// ── Sink ──────────────────────────────────────────────────────────────────────

/// Raw events a native input API can emit.
pub trait EventSink: Send + Sync {
    /// Moves the pointer to an absolute screen position.
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError>;

    fn button(&self, button: MouseButton, down: bool) -> Result<(), BackendError>;

    /// Scrolls by whole notches.  Positive `dy` scrolls up, positive `dx`
    /// scrolls right.
    fn wheel(&self, dx: i32, dy: i32) -> Result<(), BackendError>;

    /// Presses or releases one key.
    ///
    /// Returns [`BackendError::UnknownKey`] when the platform has no code for
    /// `key`; the synthesizer then falls back to [`EventSink::unicode`] for
    /// character keys.
    fn key(&self, key: Key, down: bool) -> Result<(), BackendError>;

    /// Types one Unicode scalar value (press and release).
    fn unicode(&self, codepoint: u32) -> Result<(), BackendError>;

    /// Types one escape token (`U` + hex).
    ///
    /// The default decodes the token and types the scalar it names.
    fn escaped(&self, token: &str) -> Result<(), BackendError> {
        self.unicode(parse_escape_token(token)?)
    }

    /// Current pointer position.
    fn pointer(&self) -> Result<(i32, i32), BackendError>;
}

// ── Token decoding ────────────────────────────────────────────────────────────

/// Resolves a key name, reporting unknown names as [`BackendError::UnknownKey`].
pub fn resolve_key(name: &str) -> Result<Key, BackendError> {
    Key::from_name(name).ok_or_else(|| BackendError::UnknownKey(name.to_string()))
}

/// Resolves modifier tokens; `""` and `"null"` are skipped.
pub fn resolve_modifiers<'a, I>(tokens: I) -> Result<Modifiers, BackendError>
where
    I: IntoIterator<Item = &'a str>,
{
    Modifiers::from_tokens(tokens).map_err(BackendError::InvalidModifier)
}

pub fn resolve_direction(token: &str) -> Result<KeyDirection, BackendError> {
    KeyDirection::from_token(token).ok_or_else(|| BackendError::InvalidKeyState(token.to_string()))
}

/// Decodes `U00E9`-style tokens to their scalar value.
pub fn parse_escape_token(token: &str) -> Result<u32, BackendError> {
    token
        .strip_prefix('U')
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .filter(|cp| char::from_u32(*cp).is_some())
        .ok_or_else(|| BackendError::Platform(format!("malformed escape token {token:?}")))
}

/// Keys to hold around `key`, in press order.
///
/// Character keys that need Shift on a US layout get it added here, so
/// sinks only ever see unshifted characters.
fn held_keys(key: Key, modifiers: Modifiers) -> (Key, Vec<Key>) {
    let mut held: Vec<Key> = modifiers.iter().map(|m| m.key()).collect();
    if !key.needs_shift() {
        return (key, held);
    }
    if !modifiers.contains(Modifier::Shift) && !modifiers.contains(Modifier::RightShift) {
        held.push(Key::Shift);
    }
    let base = key.base_char().map(Key::Char).unwrap_or(key);
    (base, held)
}

// ── Pacing ────────────────────────────────────────────────────────────────────

/// [`Pacer`] that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause_ms(&self, ms: f64) {
        if let Some(duration) = pause_duration(ms) {
            std::thread::sleep(duration);
        } else if ms > 0.0 {
            warn!("pause of {ms} ms is out of range; skipping");
        }
    }
}

/// Sleep length for a pause of `ms` milliseconds.
///
/// `None` for zero, negative, NaN and anything too long for a `Duration`.
fn pause_duration(ms: f64) -> Option<Duration> {
    if ms.is_nan() || ms <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(ms / 1000.0).ok()
}

// ── Synthesizer ───────────────────────────────────────────────────────────────

/// [`InputBackend`] built on an [`EventSink`].
pub struct Synthesizer<S> {
    sink: S,
    pacer: Arc<dyn Pacer>,
    mouse_delay_ms: AtomicU32,
    key_delay_ms: AtomicU32,
}

impl<S: EventSink> Synthesizer<S> {
    /// Synthesizer that sleeps the calling thread between actions.
    pub fn new(sink: S) -> Self {
        Self::with_pacer(sink, Arc::new(ThreadPacer))
    }

    pub fn with_pacer(sink: S, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            sink,
            pacer,
            mouse_delay_ms: AtomicU32::new(DEFAULT_DELAY_MS),
            key_delay_ms: AtomicU32::new(DEFAULT_DELAY_MS),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn pause(&self, ms: u32) {
        if ms > 0 {
            self.pacer.pause_ms(f64::from(ms));
        }
    }

    fn mouse_pause(&self) {
        self.pause(self.mouse_delay_ms.load(Ordering::Relaxed));
    }

    fn key_pause(&self) {
        self.pause(self.key_delay_ms.load(Ordering::Relaxed));
    }

    fn press_release(&self, button: MouseButton) -> Result<(), BackendError> {
        self.sink.button(button, true)?;
        self.sink.button(button, false)
    }

    /// Taps `key` with `modifiers` held; modifiers are released even when the
    /// key itself fails.
    fn tap_with(&self, key: Key, modifiers: Modifiers) -> Result<(), BackendError> {
        let (key, held) = held_keys(key, modifiers);
        for k in &held {
            self.sink.key(*k, true)?;
        }

        let tapped = match (key, self.sink.key(key, true)) {
            (_, Ok(())) => self.sink.key(key, false),
            (Key::Char(c), Err(BackendError::UnknownKey(_))) => self.sink.unicode(u32::from(c)),
            (_, Err(e)) => Err(e),
        };

        let mut released = Ok(());
        for k in held.iter().rev() {
            if let Err(e) = self.sink.key(*k, false) {
                released = Err(e);
            }
        }
        tapped.and(released)
    }

    /// Types one character through its layout key, falling back to a
    /// Unicode event when the sink has no key for it.
    fn type_char(&self, c: char) -> Result<(), BackendError> {
        match c {
            '\n' | '\r' => self.tap_with(Key::Enter, Modifiers::NONE),
            '\t' => self.tap_with(Key::Tab, Modifiers::NONE),
            c => self.tap_with(Key::Char(c), Modifiers::NONE),
        }
    }

    /// Visits `points`, pausing `step_delay_ms` after each.
    ///
    /// Returns `Ok(false)` as soon as the pointer is not where the previous
    /// step left it.
    fn walk(&self, points: &[(i32, i32)], step_delay_ms: u32) -> Result<bool, BackendError> {
        let mut last: Option<(i32, i32)> = None;
        for &(x, y) in points {
            if let Some((lx, ly)) = last {
                let (cx, cy) = self.sink.pointer()?;
                if (cx - lx).abs() > INTERFERENCE_TOLERANCE_PX
                    || (cy - ly).abs() > INTERFERENCE_TOLERANCE_PX
                {
                    debug!("smooth move interrupted at ({cx}, {cy}), expected ({lx}, {ly})");
                    return Ok(false);
                }
            }
            self.sink.move_pointer(x, y)?;
            last = Some((x, y));
            self.pause(step_delay_ms);
        }
        Ok(true)
    }
}

impl<S: EventSink> InputBackend for Synthesizer<S> {
    fn move_to(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.sink.move_pointer(x, y)?;
        self.mouse_pause();
        Ok(())
    }

    fn move_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
        step_delay_ms: u32,
    ) -> Result<bool, BackendError> {
        let start = self.sink.pointer()?;
        let spec = SmoothMoveSpec {
            low,
            high,
            step_delay_ms,
        };
        let plan = plan_smooth_move(start, (x, y), &spec, &mut rand::thread_rng());
        trace!(
            "smooth move {start:?} -> ({x}, {y}): {} steps over {:.3}s",
            plan.points.len(),
            plan.duration_secs
        );
        let completed = self.walk(&plan.points, plan.step_delay_ms)?;
        self.mouse_pause();
        Ok(completed)
    }

    fn drag_to(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.sink.button(MouseButton::Left, true)?;
        let moved = self.sink.move_pointer(x, y);
        self.sink.button(MouseButton::Left, false)?;
        moved?;
        self.mouse_pause();
        Ok(())
    }

    fn click(&self, button: MouseButton, double: bool) -> Result<(), BackendError> {
        self.press_release(button)?;
        if double {
            self.pause(DOUBLE_CLICK_GAP_MS);
            self.press_release(button)?;
        }
        self.mouse_pause();
        Ok(())
    }

    fn toggle(&self, direction: ButtonDirection, button: MouseButton) -> Result<(), BackendError> {
        self.sink.button(button, direction.is_down())?;
        self.mouse_pause();
        Ok(())
    }

    fn set_mouse_delay(&self, ms: u32) -> Result<(), BackendError> {
        self.mouse_delay_ms.store(ms, Ordering::Relaxed);
        Ok(())
    }

    fn set_key_delay(&self, ms: u32) -> Result<(), BackendError> {
        self.key_delay_ms.store(ms, Ordering::Relaxed);
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32, delay_ms: u32) -> Result<(), BackendError> {
        self.sink.wheel(dx, dy)?;
        self.pause(delay_ms);
        Ok(())
    }

    fn key_tap(
        &self,
        key: &str,
        modifier: &str,
        modifier_type: &str,
        delay_ms: u32,
    ) -> Result<(), BackendError> {
        let key = resolve_key(key)?;
        let modifiers = resolve_modifiers([modifier, modifier_type])?;
        self.tap_with(key, modifiers)?;
        self.pause(delay_ms);
        Ok(())
    }

    fn key_tap_chord(
        &self,
        key: &str,
        modifiers: &[String],
        count: usize,
        delay_ms: u32,
    ) -> Result<(), BackendError> {
        let key = resolve_key(key)?;
        let modifiers = resolve_modifiers(modifiers.iter().take(count).map(String::as_str))?;
        self.tap_with(key, modifiers)?;
        self.pause(delay_ms);
        Ok(())
    }

    fn key_toggle(
        &self,
        key: &str,
        direction: &str,
        modifier: &str,
        modifier_type: &str,
    ) -> Result<(), BackendError> {
        let key = resolve_key(key)?;
        let direction = resolve_direction(direction)?;
        let modifiers = resolve_modifiers([modifier, modifier_type])?;
        let (key, held) = held_keys(key, modifiers);

        match direction {
            KeyDirection::Down => {
                for k in &held {
                    self.sink.key(*k, true)?;
                }
                self.sink.key(key, true)?;
            }
            KeyDirection::Up => {
                self.sink.key(key, false)?;
                for k in held.iter().rev() {
                    self.sink.key(*k, false)?;
                }
            }
        }
        self.key_pause();
        Ok(())
    }

    fn type_unicode_escaped(&self, token: &str) -> Result<(), BackendError> {
        self.sink.escaped(token)
    }

    fn type_unicode_direct(&self, codepoint: u32) -> Result<(), BackendError> {
        self.sink.unicode(codepoint)
    }

    fn type_string_delayed(&self, text: &str, delay_ms: u32) -> Result<(), BackendError> {
        for c in text.chars() {
            self.type_char(c)?;
            self.pause(delay_ms);
        }
        Ok(())
    }

    fn type_string(&self, text: &str) -> Result<(), BackendError> {
        for c in text.chars() {
            self.type_char(c)?;
        }
        Ok(())
    }

    fn position(&self) -> Result<(i32, i32), BackendError> {
        self.sink.pointer()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::{RecordingBackend, RecordingSink, SinkEvent};
    use super::*;

    fn key(k: Key, down: bool) -> SinkEvent {
        SinkEvent::Key(k, down)
    }

    #[test]
    fn test_resolve_helpers_map_bad_tokens_to_their_errors() {
        assert_eq!(resolve_key("hyper"), Err(BackendError::UnknownKey("hyper".into())));
        assert!(matches!(
            resolve_modifiers(["meta"]),
            Err(BackendError::InvalidModifier(_))
        ));
        assert_eq!(
            resolve_direction("sideways"),
            Err(BackendError::InvalidKeyState("sideways".into()))
        );
        assert_eq!(resolve_direction("null"), Ok(KeyDirection::Down));
    }

    #[test]
    fn test_parse_escape_token() {
        assert_eq!(parse_escape_token("U00E9"), Ok(0xE9));
        assert_eq!(parse_escape_token("U1F600"), Ok(0x1F600));
        assert!(parse_escape_token("00E9").is_err());
        assert!(parse_escape_token("UD800").is_err());
    }

    #[test]
    fn test_key_tap_presses_modifiers_then_releases_in_reverse() {
        // Arrange
        let backend = RecordingBackend::recording();

        // Act
        backend.key_tap("v", "control", "shift", 0).unwrap();

        // Assert
        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Control, true),
                key(Key::Shift, true),
                key(Key::Char('v'), true),
                key(Key::Char('v'), false),
                key(Key::Shift, false),
                key(Key::Control, false),
            ]
        );
    }

    #[test]
    fn test_shifted_character_gets_shift_and_base_key() {
        let backend = RecordingBackend::recording();

        backend.key_tap("A", "null", "null", 0).unwrap();

        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Shift, true),
                key(Key::Char('a'), true),
                key(Key::Char('a'), false),
                key(Key::Shift, false),
            ]
        );
    }

    #[test]
    fn test_chord_uses_only_first_count_modifiers() {
        let backend = RecordingBackend::recording();
        let mods = vec!["alt".to_string(), "command".to_string()];

        backend.key_tap_chord("t", &mods, 1, 0).unwrap();

        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Alt, true),
                key(Key::Char('t'), true),
                key(Key::Char('t'), false),
                key(Key::Alt, false),
            ]
        );
    }

    #[test]
    fn test_unmapped_character_falls_back_to_unicode() {
        let sink = RecordingSink::with_unmapped([Key::Char('é')]);
        let backend = RecordingBackend::with_pacer(sink, Arc::new(mock::RecordingPacer::default()));

        backend.key_tap("é", "null", "null", 0).unwrap();

        assert_eq!(backend.sink().events(), vec![SinkEvent::Unicode(0xE9)]);
    }

    #[test]
    fn test_bad_tokens_send_nothing() {
        let backend = RecordingBackend::recording();

        assert_eq!(
            backend.key_tap("nope", "null", "null", 0),
            Err(BackendError::UnknownKey("nope".into()))
        );
        assert!(matches!(
            backend.key_tap("a", "hyper", "null", 0),
            Err(BackendError::InvalidModifier(_))
        ));
        assert!(backend.sink().events().is_empty());
    }

    #[test]
    fn test_key_toggle_down_and_up_halves() {
        let backend = RecordingBackend::recording();

        backend.key_toggle("a", "down", "alt", "null").unwrap();
        backend.key_toggle("a", "up", "alt", "null").unwrap();

        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Alt, true),
                key(Key::Char('a'), true),
                key(Key::Char('a'), false),
                key(Key::Alt, false),
            ]
        );
    }

    #[test]
    fn test_double_click_pauses_between_clicks() {
        let pacer = Arc::new(mock::RecordingPacer::default());
        let backend = RecordingBackend::with_pacer(RecordingSink::default(), pacer.clone());
        backend.set_mouse_delay(0).unwrap();

        backend.click(MouseButton::Right, true).unwrap();

        assert_eq!(backend.sink().events().len(), 4);
        assert_eq!(pacer.pauses(), vec![f64::from(DOUBLE_CLICK_GAP_MS)]);
    }

    #[test]
    fn test_drag_holds_left_button_across_the_move() {
        let backend = RecordingBackend::recording();

        backend.drag_to(40, 50).unwrap();

        assert_eq!(
            backend.sink().events(),
            vec![
                SinkEvent::Button(MouseButton::Left, true),
                SinkEvent::Move(40, 50),
                SinkEvent::Button(MouseButton::Left, false),
            ]
        );
    }

    #[test]
    fn test_smooth_move_ends_on_target() {
        let backend = RecordingBackend::recording();

        let completed = backend.move_smooth(300, 200, 0.05, 0.1, 10).unwrap();

        assert!(completed);
        assert_eq!(backend.position().unwrap(), (300, 200));
    }

    #[test]
    fn test_smooth_move_with_reversed_bounds_still_completes() {
        let backend = RecordingBackend::recording();
        assert!(backend.move_smooth(10, 10, 0.1, 0.05, 10).unwrap());
    }

    #[test]
    fn test_smooth_move_reports_interference() {
        // Arrange – the "user" grabs the mouse after the second step
        let sink = RecordingSink::nudging_after(2);
        let backend = RecordingBackend::with_pacer(sink, Arc::new(mock::RecordingPacer::default()));

        // Act
        let completed = backend.move_smooth(500, 500, 0.5, 0.5, 10).unwrap();

        // Assert
        assert!(!completed);
        assert_ne!(backend.position().unwrap(), (500, 500));
    }

    #[test]
    fn test_type_string_routes_newline_through_enter() {
        let backend = RecordingBackend::recording();

        backend.type_string("a\n").unwrap();

        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Char('a'), true),
                key(Key::Char('a'), false),
                key(Key::Enter, true),
                key(Key::Enter, false),
            ]
        );
    }

    #[test]
    fn test_type_string_delayed_pauses_per_character() {
        let pacer = Arc::new(mock::RecordingPacer::default());
        let backend = RecordingBackend::with_pacer(RecordingSink::default(), pacer.clone());

        backend.type_string_delayed("héllo", 30).unwrap();

        assert_eq!(backend.sink().events().len(), 10);
        assert_eq!(pacer.pauses(), vec![30.0; 5]);
    }

    #[test]
    fn test_type_string_taps_layout_keys_and_falls_back_for_unmapped() {
        // Arrange
        let sink = RecordingSink::with_unmapped([Key::Char('é')]);
        let backend = RecordingBackend::with_pacer(sink, Arc::new(mock::RecordingPacer::default()));

        // Act
        backend.type_string("Hé").unwrap();

        // Assert
        assert_eq!(
            backend.sink().events(),
            vec![
                key(Key::Shift, true),
                key(Key::Char('h'), true),
                key(Key::Char('h'), false),
                key(Key::Shift, false),
                SinkEvent::Unicode(0xE9),
            ]
        );
    }

    #[test]
    fn test_escaped_token_is_typed_as_its_scalar() {
        let backend = RecordingBackend::recording();
        backend.type_unicode_escaped("U20AC").unwrap();
        assert_eq!(backend.sink().events(), vec![SinkEvent::Unicode(0x20AC)]);
    }

    #[test]
    fn test_failing_sink_surfaces_platform_error() {
        let sink = RecordingSink::failing();
        let backend = RecordingBackend::with_pacer(sink, Arc::new(mock::RecordingPacer::default()));

        assert!(matches!(backend.move_to(1, 1), Err(BackendError::Platform(_))));
    }

    #[test]
    fn test_thread_pacer_ignores_non_positive_and_nan() {
        let pacer = ThreadPacer;
        pacer.pause_ms(0.0);
        pacer.pause_ms(-5.0);
        pacer.pause_ms(f64::NAN);
    }

    #[test]
    fn test_oversized_pause_is_skipped_instead_of_panicking() {
        // Arrange
        let pacer = ThreadPacer;

        // Act
        pacer.pause_ms(f64::MAX);
        pacer.pause_ms(f64::INFINITY);

        // Assert
        assert_eq!(pause_duration(f64::MAX), None);
        assert_eq!(pause_duration(f64::INFINITY), None);
        assert_eq!(pause_duration(250.0), Some(Duration::from_millis(250)));
    }
}
