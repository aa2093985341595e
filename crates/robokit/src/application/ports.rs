//! Collaborator ports: the traits the use cases drive and their error types.
//!
//! Each OS provides implementations in the infrastructure layer.  The
//! application layer only ever sees these traits, injected as
//! `Arc<dyn Trait>` at construction time.

use std::io;

use robokit_core::{ButtonDirection, MouseButton, Pid, WindowHandle};
use thiserror::Error;

// ── Input backend ─────────────────────────────────────────────────────────────

/// Error reported by a native input backend.
///
/// The `Display` text of the key-related variants is the status string
/// returned from a key toggle, so it is kept short and fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{0}")]
    Platform(String),
    #[error("Invalid key code specified.")]
    UnknownKey(String),
    #[error("Invalid key state specified.")]
    InvalidKeyState(String),
    #[error("Invalid key flag specified.")]
    InvalidModifier(String),
    #[error("input backend not initialized")]
    NotInitialized,
}

/// Native mouse and keyboard synthesis.
///
/// Modifier and direction arguments are passed as the caller's tokens
/// (`"shift"`, `"null"`, `"down"`); decoding them is the backend's job so a
/// bad token comes back as a [`BackendError`] rather than being dropped.
pub trait InputBackend: Send + Sync {
    /// Moves the pointer to an absolute position.
    fn move_to(&self, x: i32, y: i32) -> Result<(), BackendError>;

    /// Moves the pointer along a humanized path.
    ///
    /// Returns `Ok(false)` when the move was interrupted (the pointer was
    /// moved by something else along the way).
    fn move_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
        step_delay_ms: u32,
    ) -> Result<bool, BackendError>;

    /// Moves the pointer with the left button held.
    fn drag_to(&self, x: i32, y: i32) -> Result<(), BackendError>;

    fn click(&self, button: MouseButton, double: bool) -> Result<(), BackendError>;

    /// Presses or releases a button without the other half.
    fn toggle(&self, direction: ButtonDirection, button: MouseButton) -> Result<(), BackendError>;

    /// Pause applied after each mouse action, milliseconds.
    fn set_mouse_delay(&self, ms: u32) -> Result<(), BackendError>;

    /// Pause applied after each keyboard action, milliseconds.
    fn set_key_delay(&self, ms: u32) -> Result<(), BackendError>;

    /// Scrolls by `(dx, dy)` notches, then pauses `delay_ms`.
    fn scroll(&self, dx: i32, dy: i32, delay_ms: u32) -> Result<(), BackendError>;

    /// Taps `key` with up to two modifiers held.
    fn key_tap(
        &self,
        key: &str,
        modifier: &str,
        modifier_type: &str,
        delay_ms: u32,
    ) -> Result<(), BackendError>;

    /// Taps `key` with the first `count` entries of `modifiers` held.
    fn key_tap_chord(
        &self,
        key: &str,
        modifiers: &[String],
        count: usize,
        delay_ms: u32,
    ) -> Result<(), BackendError>;

    /// Presses or releases `key` with optional modifiers.
    fn key_toggle(
        &self,
        key: &str,
        direction: &str,
        modifier: &str,
        modifier_type: &str,
    ) -> Result<(), BackendError>;

    /// Types one escape token (`U` + hex) through the escape primitive.
    fn type_unicode_escaped(&self, token: &str) -> Result<(), BackendError>;

    /// Types one code point through the direct primitive.
    fn type_unicode_direct(&self, codepoint: u32) -> Result<(), BackendError>;

    /// Types `text`, pausing `delay_ms` after each character.
    fn type_string_delayed(&self, text: &str, delay_ms: u32) -> Result<(), BackendError>;

    /// Types `text` in one call.
    fn type_string(&self, text: &str) -> Result<(), BackendError>;

    /// Current pointer position.
    fn position(&self) -> Result<(i32, i32), BackendError>;
}

/// Blocking pause between injected tokens.
pub trait Pacer: Send + Sync {
    fn pause_ms(&self, ms: f64);
}

// ── Clipboard ─────────────────────────────────────────────────────────────────

/// Error reported by a clipboard adapter.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("could not start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("clipboard contents are not valid UTF-8")]
    NotUtf8,
    #[error("no clipboard tool is available on this platform")]
    Unsupported,
}

/// The system clipboard (text only).
pub trait Clipboard: Send + Sync {
    fn read(&self) -> Result<String, ClipboardError>;
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

// ── Processes ─────────────────────────────────────────────────────────────────

/// Error reported by process enumeration or control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("process enumeration failed: {0}")]
    Enumerate(String),
    #[error("no process with pid {0}")]
    NotFound(Pid),
    #[error("name lookup for pid {pid} failed: {reason}")]
    Lookup { pid: Pid, reason: String },
    #[error("could not terminate pid {pid}")]
    Kill { pid: Pid },
}

/// A live view of the OS process table.
///
/// Implementations must not cache: every call reflects the table at the
/// time of the call.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessTable: Send + Sync {
    fn list_pids(&self) -> Result<Vec<Pid>, ProcessError>;
    fn exists(&self, pid: Pid) -> bool;
    /// Name of the process `pid`.
    fn lookup(&self, pid: Pid) -> Result<String, ProcessError>;
    fn kill(&self, pid: Pid) -> Result<(), ProcessError>;
}

// ── Windows ───────────────────────────────────────────────────────────────────

/// Error reported by a window-manager adapter.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("no window found for pid {pid}")]
    NoWindow { pid: Pid },
    #[error("no window is selected")]
    NoHandle,
    #[error("could not start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },
    #[error("unexpected output from {program}: {output:?}")]
    Parse { program: String, output: String },
    #[error("window management is not supported on this platform")]
    Unsupported,
}

/// Window-manager primitives used to target synthesized input.
///
/// The adapter keeps a "current" window: the one last activated or set with
/// [`WindowManager::set_handle`].  `title`, `close` and `is_valid` act on it.
#[cfg_attr(test, mockall::automock)]
pub trait WindowManager: Send + Sync {
    /// Brings the window of `pid` to the front.  A non-zero `handle` selects
    /// that window directly.
    fn activate(&self, pid: Pid, handle: WindowHandle) -> Result<(), WindowError>;
    fn handle(&self) -> Result<WindowHandle, WindowError>;
    fn set_handle(&self, handle: WindowHandle) -> Result<(), WindowError>;
    fn title(&self) -> Result<String, WindowError>;
    fn close(&self) -> Result<(), WindowError>;
    fn is_valid(&self) -> bool;
    /// Pid owning the focused window.
    fn active_pid(&self) -> Result<Pid, WindowError>;
}

/// Failure of a lookup that spans processes and windows.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Window(#[from] WindowError),
}
