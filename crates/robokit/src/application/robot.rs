//! The `Robot` facade: one value owning the input settings and every
//! collaborator, exposing the whole call surface.
//!
//! # Ownership
//!
//! Delay settings live in the `Robot` and change only through `&mut self`
//! methods, which also forward the new value to the backend.  Sharing a
//! `Robot` across threads means wrapping it (for example in a `Mutex`).

use std::sync::Arc;

use robokit_core::unicode::{TextStrategy, DEFAULT_MICRO_DELAY_MS};
use robokit_core::{
    ClickOptions, OptionalArgs, Pid, ProcessRecord, ScrollDirection, ScrollOptions,
    SmoothMoveSpec, TapOptions, ToggleKeyOptions, ToggleOptions, WindowHandle,
    DEFAULT_DELAY_MS,
};
use tracing::debug;

/// The `n`-th Unicode scalar value of a string; needs no `Robot`.
pub use robokit_core::unicode::char_code_at;

use super::dispatch_keys::KeyDispatcher;
use super::drive_mouse::MouseDriver;
use super::inject_text::{Platform, TextInjector};
use super::lookup_process::ProcessLookup;
use super::ports::{
    Clipboard, ClipboardError, InputBackend, LookupError, Pacer, ProcessError, ProcessTable,
    WindowError, WindowManager,
};

/// Per-action pauses applied by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSettings {
    pub mouse_delay_ms: u32,
    pub key_delay_ms: u32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mouse_delay_ms: DEFAULT_DELAY_MS,
            key_delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

/// The adapters a [`Robot`] drives.
pub struct Collaborators {
    pub backend: Arc<dyn InputBackend>,
    pub clipboard: Arc<dyn Clipboard>,
    pub processes: Arc<dyn ProcessTable>,
    pub windows: Arc<dyn WindowManager>,
    pub pacer: Arc<dyn Pacer>,
}

/// Single entry point for input synthesis, text injection and lookup.
pub struct Robot {
    settings: InputSettings,
    mouse: MouseDriver,
    keys: KeyDispatcher,
    text: TextInjector,
    lookup: ProcessLookup,
    smooth: SmoothMoveSpec,
    micro_delay_ms: f64,
}

impl Robot {
    /// Builds a robot for the current platform and applies `settings` to the
    /// backend.
    pub fn new(collaborators: Collaborators, settings: InputSettings) -> Self {
        Self::for_platform(collaborators, settings, Platform::current())
    }

    /// Like [`Robot::new`] with an explicit platform, which picks the text
    /// strategy and the paste shortcut.
    pub fn for_platform(
        collaborators: Collaborators,
        settings: InputSettings,
        platform: Platform,
    ) -> Self {
        let Collaborators {
            backend,
            clipboard,
            processes,
            windows,
            pacer,
        } = collaborators;

        let robot = Self {
            settings,
            mouse: MouseDriver::new(Arc::clone(&backend)),
            keys: KeyDispatcher::new(Arc::clone(&backend)),
            text: TextInjector::new(backend, clipboard, pacer, platform),
            lookup: ProcessLookup::new(processes, windows),
            smooth: SmoothMoveSpec::default(),
            micro_delay_ms: DEFAULT_MICRO_DELAY_MS,
        };
        robot.mouse.set_mouse_delay(settings.mouse_delay_ms);
        robot.keys.set_key_delay(settings.key_delay_ms);
        debug!("robot ready for {platform:?} with {settings:?}");
        robot
    }

    // ── Settings ──────────────────────────────────────────────────────────

    pub fn settings(&self) -> InputSettings {
        self.settings
    }

    pub fn set_mouse_delay(&mut self, ms: u32) {
        self.settings.mouse_delay_ms = ms;
        self.mouse.set_mouse_delay(ms);
    }

    pub fn set_key_delay(&mut self, ms: u32) {
        self.settings.key_delay_ms = ms;
        self.keys.set_key_delay(ms);
    }

    /// Spec used by [`Robot::move_smooth`] and [`Robot::moves_click`].
    pub fn set_smooth_defaults(&mut self, spec: SmoothMoveSpec) {
        self.smooth = spec;
    }

    /// Pause after each escape token in [`Robot::type_text`].
    pub fn set_micro_delay(&mut self, ms: f64) {
        self.micro_delay_ms = ms;
    }

    pub fn set_text_strategy(&mut self, strategy: TextStrategy) {
        self.text.set_strategy(strategy);
    }

    pub fn text_strategy(&self) -> TextStrategy {
        self.text.strategy()
    }

    // ── Mouse ─────────────────────────────────────────────────────────────

    pub fn move_to(&self, x: i32, y: i32) {
        self.mouse.move_to(x, y);
    }

    pub fn drag_to(&self, x: i32, y: i32) {
        self.mouse.drag_to(x, y);
    }

    /// Smooth move with the robot's default spec.
    pub fn move_smooth(&self, x: i32, y: i32) -> bool {
        self.mouse.move_smooth(x, y, self.smooth)
    }

    pub fn move_smooth_with(&self, x: i32, y: i32, spec: SmoothMoveSpec) -> bool {
        self.mouse.move_smooth(x, y, spec)
    }

    pub fn move_smooth_args(&self, x: i32, y: i32, args: &OptionalArgs) -> bool {
        self.mouse.move_smooth_args(x, y, args)
    }

    pub fn click(&self, opts: ClickOptions) {
        self.mouse.click(opts);
    }

    pub fn click_args(&self, args: &OptionalArgs) {
        self.mouse.click_args(args);
    }

    pub fn move_click(&self, x: i32, y: i32, args: &OptionalArgs) {
        self.mouse.move_click(x, y, args);
    }

    pub fn moves_click(&self, x: i32, y: i32, args: &OptionalArgs) {
        self.mouse.moves_click(x, y, self.smooth, args);
    }

    pub fn mouse_toggle(&self, direction: &str, opts: ToggleOptions) {
        self.mouse.toggle(direction, opts);
    }

    pub fn mouse_toggle_args(&self, direction: &str, args: &OptionalArgs) {
        self.mouse.toggle_args(direction, args);
    }

    pub fn scroll(&self, dx: i32, dy: i32, opts: ScrollOptions) {
        self.mouse.scroll(dx, dy, opts);
    }

    pub fn scroll_args(&self, dx: i32, dy: i32, args: &OptionalArgs) {
        self.mouse.scroll_args(dx, dy, args);
    }

    /// Vertical scroll paced by the mouse delay.
    pub fn scroll_direction(&self, magnitude: u32, direction: ScrollDirection) {
        self.mouse
            .scroll_direction(magnitude, direction, self.settings.mouse_delay_ms);
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.mouse.position()
    }

    // ── Keyboard ──────────────────────────────────────────────────────────

    pub fn tap(&self, key: &str, opts: TapOptions) {
        self.keys.tap(key, opts);
    }

    pub fn multi_tap<S: AsRef<str>>(&self, key: &str, modifiers: &[S], delay_ms: u32) {
        self.keys.multi_tap(key, modifiers, delay_ms);
    }

    pub fn tap_args(&self, key: &str, args: &OptionalArgs) {
        self.keys.tap_args(key, args);
    }

    /// Key down/up; returns the backend status string (empty on success).
    pub fn key_toggle(&self, key: &str, opts: ToggleKeyOptions) -> String {
        self.keys.toggle(key, opts)
    }

    pub fn key_toggle_args(&self, key: &str, args: &OptionalArgs) -> String {
        self.keys.toggle_args(key, args)
    }

    // ── Text ──────────────────────────────────────────────────────────────

    /// Types `text` with the robot's micro delay.
    pub fn type_text(&self, text: &str) {
        self.text.type_text(text, self.micro_delay_ms);
    }

    pub fn type_text_paced(&self, text: &str, micro_delay_ms: f64) {
        self.text.type_text(text, micro_delay_ms);
    }

    pub fn type_delayed(&self, text: &str, delay_ms: u32) {
        self.text.type_delayed(text, delay_ms);
    }

    pub fn type_string(&self, text: &str) {
        self.text.type_string(text);
    }

    pub fn paste(&self, text: &str) -> Result<(), ClipboardError> {
        self.text.paste(text)
    }

    pub fn read_clipboard(&self) -> Result<String, ClipboardError> {
        self.text.read_clipboard()
    }

    pub fn write_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        self.text.write_clipboard(text)
    }

    // ── Processes and windows ─────────────────────────────────────────────

    pub fn list_pids(&self) -> Result<Vec<Pid>, ProcessError> {
        self.lookup.list_pids()
    }

    pub fn process_exists(&self, pid: Pid) -> bool {
        self.lookup.process_exists(pid)
    }

    pub fn list_processes(&self) -> Result<Vec<ProcessRecord>, ProcessError> {
        self.lookup.list_processes()
    }

    pub fn find_name_by_pid(&self, pid: Pid) -> Result<String, ProcessError> {
        self.lookup.find_name_by_pid(pid)
    }

    pub fn find_names_for_all(&self) -> Result<Vec<String>, ProcessError> {
        self.lookup.find_names_for_all()
    }

    pub fn find_pids_by_name(&self, name: &str) -> Result<Vec<Pid>, ProcessError> {
        self.lookup.find_pids_by_name(name)
    }

    pub fn activate_by_pid(&self, pid: Pid, handle: WindowHandle) -> Result<(), WindowError> {
        self.lookup.activate_by_pid(pid, handle)
    }

    pub fn activate_by_name(&self, name: &str) -> Result<(), LookupError> {
        self.lookup.activate_by_name(name)
    }

    pub fn terminate(&self, pid: Pid) -> Result<(), ProcessError> {
        self.lookup.terminate(pid)
    }

    pub fn window_title(&self) -> Result<String, WindowError> {
        self.lookup.window_title()
    }

    pub fn close_window(&self) -> Result<(), WindowError> {
        self.lookup.close_window()
    }

    pub fn window_handle(&self) -> Result<WindowHandle, WindowError> {
        self.lookup.window_handle()
    }

    pub fn set_window_handle(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.lookup.set_window_handle(handle)
    }

    pub fn is_window_valid(&self) -> bool {
        self.lookup.is_window_valid()
    }

    pub fn active_pid(&self) -> Result<Pid, WindowError> {
        self.lookup.active_pid()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
