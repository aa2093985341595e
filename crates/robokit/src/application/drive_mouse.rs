//! Mouse use cases: instant and smooth moves, clicks, toggles and scrolling.
//!
//! Every operation except [`MouseDriver::move_smooth`] is fire-and-forget: a
//! backend failure is logged at `warn` and the call returns normally.

use std::sync::Arc;

use robokit_core::{
    ButtonDirection, ClickOptions, FromArgs, OptionalArgs, ScrollDirection, ScrollOptions,
    SmoothMoveSpec, ToggleOptions,
};
use tracing::{debug, warn};

use super::ports::{BackendError, InputBackend};

/// Logs a swallowed backend failure.
fn swallow(op: &str, result: Result<(), BackendError>) {
    if let Err(e) = result {
        warn!("{op} failed: {e}");
    }
}

/// The Mouse Motion use case.
#[derive(Clone)]
pub struct MouseDriver {
    backend: Arc<dyn InputBackend>,
}

impl MouseDriver {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self { backend }
    }

    pub fn move_to(&self, x: i32, y: i32) {
        swallow("move", self.backend.move_to(x, y));
    }

    pub fn drag_to(&self, x: i32, y: i32) {
        swallow("drag", self.backend.drag_to(x, y));
    }

    /// Humanized move to `(x, y)`.
    ///
    /// Returns whether the move completed uninterrupted.  A backend error is
    /// logged and reported as `false`.
    pub fn move_smooth(&self, x: i32, y: i32, spec: SmoothMoveSpec) -> bool {
        debug!(
            "smooth move to ({x}, {y}) over {}..{}s, step {}ms",
            spec.low, spec.high, spec.step_delay_ms
        );
        match self
            .backend
            .move_smooth(x, y, spec.low, spec.high, spec.step_delay_ms)
        {
            Ok(completed) => completed,
            Err(e) => {
                warn!("smooth move failed: {e}");
                false
            }
        }
    }

    /// Loose form of [`MouseDriver::move_smooth`]: `[low, high, step_delay_ms]`.
    pub fn move_smooth_args(&self, x: i32, y: i32, args: &OptionalArgs) -> bool {
        self.move_smooth(x, y, SmoothMoveSpec::from_args(args))
    }

    pub fn click(&self, opts: ClickOptions) {
        swallow("click", self.backend.click(opts.button, opts.double));
    }

    /// Loose form of [`MouseDriver::click`]: `[button, double]`.
    pub fn click_args(&self, args: &OptionalArgs) {
        self.click(ClickOptions::from_args(args));
    }

    /// Instant move, then click.  `args` are the click's optional values.
    pub fn move_click(&self, x: i32, y: i32, args: &OptionalArgs) {
        self.move_to(x, y);
        self.click_args(args);
    }

    /// Smooth move with `spec`, then click.  The click happens even if the
    /// move was interrupted.
    pub fn moves_click(&self, x: i32, y: i32, spec: SmoothMoveSpec, args: &OptionalArgs) {
        if !self.move_smooth(x, y, spec) {
            debug!("smooth move before click did not complete");
        }
        self.click_args(args);
    }

    /// Persistent press or release.  Direction tokens are `"down"` / `"up"`;
    /// anything else is logged and nothing is sent.
    pub fn toggle(&self, direction: &str, opts: ToggleOptions) {
        let Some(direction) = ButtonDirection::from_token(direction) else {
            warn!("mouse toggle ignored: unknown direction {direction:?}");
            return;
        };
        swallow("mouse toggle", self.backend.toggle(direction, opts.button));
    }

    /// Loose form of [`MouseDriver::toggle`]: `[button]`.
    pub fn toggle_args(&self, direction: &str, args: &OptionalArgs) {
        self.toggle(direction, ToggleOptions::from_args(args));
    }

    pub fn scroll(&self, dx: i32, dy: i32, opts: ScrollOptions) {
        swallow("scroll", self.backend.scroll(dx, dy, opts.delay_ms));
    }

    /// Loose form of [`MouseDriver::scroll`]: `[delay_ms]`.
    pub fn scroll_args(&self, dx: i32, dy: i32, args: &OptionalArgs) {
        self.scroll(dx, dy, ScrollOptions::from_args(args));
    }

    /// Vertical scroll by `magnitude` notches, paced by `pace_ms`.
    pub fn scroll_direction(&self, magnitude: u32, direction: ScrollDirection, pace_ms: u32) {
        swallow(
            "scroll",
            self.backend.scroll(0, direction.delta(magnitude), pace_ms),
        );
    }

    pub fn set_mouse_delay(&self, ms: u32) {
        swallow("set mouse delay", self.backend.set_mouse_delay(ms));
    }

    /// Current pointer position, or `None` if the backend cannot read it.
    pub fn position(&self) -> Option<(i32, i32)> {
        match self.backend.position() {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!("reading pointer position failed: {e}");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
