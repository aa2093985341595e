//! Unicode text injection, clipboard paste and related helpers.
//!
//! # Strategies
//!
//! | Platform | Strategy | Pacing |
//! |----------|----------|--------|
//! | Linux    | escape tokens for non-ASCII, whole strings for ASCII runs | `micro_delay_ms` after each token |
//! | others   | one direct injection per code point | none |
//!
//! The strategy can be forced with [`TextInjector::with_strategy`].

use std::sync::Arc;

use robokit_core::unicode::{escape_segments, CodepointStream, EscapeSegment, TextStrategy};
use robokit_core::TapOptions;
use tracing::{debug, warn};

use super::dispatch_keys::KeyDispatcher;
use super::ports::{BackendError, Clipboard, ClipboardError, InputBackend, Pacer};

/// Operating system family, used where behaviour differs per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// Text strategy the native backend of this platform supports.
    pub fn text_strategy(&self) -> TextStrategy {
        match self {
            Platform::Linux => TextStrategy::Escape,
            _ => TextStrategy::Direct,
        }
    }

    /// Modifier held for the paste shortcut.
    pub fn paste_modifier(&self) -> &'static str {
        match self {
            Platform::MacOs => "command",
            _ => "control",
        }
    }
}

/// The Unicode Text Injection use case.
pub struct TextInjector {
    backend: Arc<dyn InputBackend>,
    clipboard: Arc<dyn Clipboard>,
    pacer: Arc<dyn Pacer>,
    keys: KeyDispatcher,
    strategy: TextStrategy,
    paste_modifier: &'static str,
}

impl TextInjector {
    pub fn new(
        backend: Arc<dyn InputBackend>,
        clipboard: Arc<dyn Clipboard>,
        pacer: Arc<dyn Pacer>,
        platform: Platform,
    ) -> Self {
        Self {
            keys: KeyDispatcher::new(Arc::clone(&backend)),
            backend,
            clipboard,
            pacer,
            strategy: platform.text_strategy(),
            paste_modifier: platform.paste_modifier(),
        }
    }

    /// Overrides the platform's default strategy.
    pub fn with_strategy(mut self, strategy: TextStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_strategy(&mut self, strategy: TextStrategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> TextStrategy {
        self.strategy
    }

    /// Types `text` with the configured strategy.
    ///
    /// `micro_delay_ms` is the pause after each escape token; the direct
    /// strategy ignores it.  Injection stops at the first backend failure.
    pub fn type_text(&self, text: &str, micro_delay_ms: f64) {
        let result = match self.strategy {
            TextStrategy::Escape => self.type_escaped(text, micro_delay_ms),
            TextStrategy::Direct => self.type_direct(text),
        };
        if let Err(e) = result {
            warn!("typing stopped: {e}");
        }
    }

    fn type_escaped(&self, text: &str, micro_delay_ms: f64) -> Result<(), BackendError> {
        for segment in escape_segments(text) {
            match segment {
                EscapeSegment::Text(run) => self.backend.type_string(&run)?,
                EscapeSegment::Token(token) => {
                    self.backend.type_unicode_escaped(&token.to_string())?;
                    self.pacer.pause_ms(micro_delay_ms);
                }
            }
        }
        Ok(())
    }

    fn type_direct(&self, text: &str) -> Result<(), BackendError> {
        for cp in CodepointStream::new(text).iter() {
            self.backend.type_unicode_direct(cp)?;
        }
        Ok(())
    }

    /// Puts `text` on the clipboard and sends the platform paste shortcut.
    ///
    /// # Errors
    ///
    /// [`ClipboardError`] if the clipboard write fails; no keys are sent then.
    pub fn paste(&self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.write(text)?;
        debug!("pasting {} chars with {}+v", text.chars().count(), self.paste_modifier);
        self.keys.tap("v", TapOptions::with_modifier(self.paste_modifier));
        Ok(())
    }

    /// Types `text` in one backend call, pausing `delay_ms` per character.
    pub fn type_delayed(&self, text: &str, delay_ms: u32) {
        if let Err(e) = self.backend.type_string_delayed(text, delay_ms) {
            warn!("delayed typing failed: {e}");
        }
    }

    /// Types `text` in one backend call.
    pub fn type_string(&self, text: &str) {
        if let Err(e) = self.backend.type_string(text) {
            warn!("typing failed: {e}");
        }
    }

    /// # Errors
    ///
    /// [`ClipboardError`] from the clipboard adapter.
    pub fn read_clipboard(&self) -> Result<String, ClipboardError> {
        self.clipboard.read()
    }

    /// # Errors
    ///
    /// [`ClipboardError`] from the clipboard adapter.
    pub fn write_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.write(text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{Call, ClipboardStub, PauseLog, Recorder};

    struct Fixture {
        rec: Arc<Recorder>,
        pauses: Arc<PauseLog>,
        clipboard: Arc<ClipboardStub>,
        text: TextInjector,
    }

    fn fixture(platform: Platform) -> Fixture {
        fixture_with(Recorder::default(), ClipboardStub::default(), platform)
    }

    fn fixture_with(rec: Recorder, clipboard: ClipboardStub, platform: Platform) -> Fixture {
        let rec = Arc::new(rec);
        let pauses = Arc::new(PauseLog::default());
        let clipboard = Arc::new(clipboard);
        let text = TextInjector::new(rec.clone(), clipboard.clone(), pauses.clone(), platform);
        Fixture {
            rec,
            pauses,
            clipboard,
            text,
        }
    }

    #[test]
    fn test_platform_picks_strategy() {
        assert_eq!(Platform::Linux.text_strategy(), TextStrategy::Escape);
        assert_eq!(Platform::MacOs.text_strategy(), TextStrategy::Direct);
        assert_eq!(Platform::Windows.text_strategy(), TextStrategy::Direct);
    }

    #[test]
    fn test_direct_strategy_injects_each_code_point_unpaced() {
        let f = fixture(Platform::Windows);

        f.text.type_text("AB", 7.0);

        assert_eq!(f.rec.calls(), vec![Call::Direct(0x41), Call::Direct(0x42)]);
        assert!(f.pauses.pauses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_escape_strategy_single_non_ascii_gives_one_token_and_one_pause() {
        // Arrange
        let f = fixture(Platform::Linux);

        // Act
        f.text.type_text("é", 7.0);

        // Assert
        assert_eq!(f.rec.calls(), vec![Call::Escaped("U00E9".into())]);
        assert_eq!(*f.pauses.pauses.lock().unwrap(), vec![7.0]);
    }

    #[test]
    fn test_escape_strategy_keeps_ascii_runs_in_order() {
        let f = fixture(Platform::Linux);

        f.text.type_text("naïve €5", 3.5);

        assert_eq!(
            f.rec.calls(),
            vec![
                Call::Text("na".into()),
                Call::Escaped("U00EF".into()),
                Call::Text("ve ".into()),
                Call::Escaped("U20AC".into()),
                Call::Text("5".into()),
            ]
        );
        assert_eq!(*f.pauses.pauses.lock().unwrap(), vec![3.5, 3.5]);
    }

    #[test]
    fn test_forced_strategy_overrides_platform() {
        let f = fixture(Platform::Linux);
        let text = f.text.with_strategy(TextStrategy::Direct);
        text.type_text("é", 7.0);
        assert_eq!(f.rec.calls(), vec![Call::Direct(0xE9)]);
    }

    #[test]
    fn test_typing_stops_at_first_backend_failure() {
        let f = fixture_with(Recorder::failing(), ClipboardStub::default(), Platform::Linux);
        f.text.type_text("éé", 7.0);
        assert!(f.pauses.pauses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_paste_writes_clipboard_then_taps_control_v() {
        let f = fixture(Platform::Linux);

        f.text.paste("hello").unwrap();

        assert_eq!(*f.clipboard.contents.lock().unwrap(), "hello");
        assert_eq!(
            f.rec.calls(),
            vec![Call::Tap("v".into(), "control".into(), "null".into(), 10)]
        );
    }

    #[test]
    fn test_paste_on_macos_uses_command() {
        let f = fixture(Platform::MacOs);
        f.text.paste("hi").unwrap();
        assert_eq!(
            f.rec.calls(),
            vec![Call::Tap("v".into(), "command".into(), "null".into(), 10)]
        );
    }

    #[test]
    fn test_paste_clipboard_failure_sends_no_keys() {
        let f = fixture_with(
            Recorder::default(),
            ClipboardStub {
                should_fail: true,
                ..ClipboardStub::default()
            },
            Platform::Windows,
        );

        assert!(f.text.paste("x").is_err());
        assert!(f.rec.calls().is_empty());
    }

    #[test]
    fn test_type_delayed_is_one_backend_call() {
        let f = fixture(Platform::Windows);
        f.text.type_delayed("slow", 40);
        assert_eq!(f.rec.calls(), vec![Call::Delayed("slow".into(), 40)]);
    }

    #[test]
    fn test_clipboard_passthrough() {
        let f = fixture(Platform::Other);
        f.text.write_clipboard("abc").unwrap();
        assert_eq!(f.text.read_clipboard().unwrap(), "abc");
    }
}
