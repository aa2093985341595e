//! Mouse value types and their optional-argument layouts.

use crate::args::{ArgShapeError, FromArgs, OptionalArgs};

use super::DEFAULT_DELAY_MS;

/// Mouse button targeted by a click or toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Center,
    Right,
}

impl MouseButton {
    /// Resolves a button token.
    ///
    /// Matching is exact and case-sensitive: only `"left"`, `"center"` and
    /// `"right"` are recognised.  Anything else (including `"Right"`) is a
    /// left click.
    pub fn from_token(token: &str) -> Self {
        match token {
            "left" => MouseButton::Left,
            "center" => MouseButton::Center,
            "right" => MouseButton::Right,
            _ => MouseButton::Left,
        }
    }

    /// The canonical token for this button.
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Center => "center",
            MouseButton::Right => "right",
        }
    }
}

/// Press or release half of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonDirection {
    Down,
    Up,
}

impl ButtonDirection {
    /// Parses `"down"` / `"up"`; any other token is rejected.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "down" => Some(ButtonDirection::Down),
            "up" => Some(ButtonDirection::Up),
            _ => None,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self, ButtonDirection::Down)
    }
}

/// Vertical scroll direction used by magnitude-style scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "up" => Some(ScrollDirection::Up),
            "down" => Some(ScrollDirection::Down),
            _ => None,
        }
    }

    /// Signed vertical delta for `magnitude` notches (up is positive).
    pub fn delta(&self, magnitude: u32) -> i32 {
        let m = i32::try_from(magnitude).unwrap_or(i32::MAX);
        match self {
            ScrollDirection::Up => m,
            ScrollDirection::Down => -m,
        }
    }
}

/// `click(button = "left", double = false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickOptions {
    pub button: MouseButton,
    pub double: bool,
}

impl ClickOptions {
    pub fn new(button: MouseButton, double: bool) -> Self {
        Self { button, double }
    }
}

impl FromArgs for ClickOptions {
    /// Slots: `0: Str` button token, `1: Bool` double.  Both are required.
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        let button = MouseButton::from_token(args.str_at(0)?);
        let double = args.bool_at(1)?;
        Ok(Self { button, double })
    }
}

/// `toggle(direction, button = "left")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleOptions {
    pub button: MouseButton,
}

impl FromArgs for ToggleOptions {
    /// Slots: `0: Str` button token.
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        Ok(Self {
            button: MouseButton::from_token(args.str_at(0)?),
        })
    }
}

/// Default lower bound of the smooth-move duration, in seconds.
pub const DEFAULT_SMOOTH_LOW: f64 = 1.0;
/// Default upper bound of the smooth-move duration, in seconds.
pub const DEFAULT_SMOOTH_HIGH: f64 = 3.0;

/// Parameters of a humanized pointer move.
///
/// `low <= high` is not checked here; the motion planner tolerates reversed
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothMoveSpec {
    /// Lower bound of the sampled duration, seconds.
    pub low: f64,
    /// Upper bound of the sampled duration, seconds.
    pub high: f64,
    /// Pause between intermediate steps, milliseconds.
    pub step_delay_ms: u32,
}

impl Default for SmoothMoveSpec {
    fn default() -> Self {
        Self {
            low: DEFAULT_SMOOTH_LOW,
            high: DEFAULT_SMOOTH_HIGH,
            step_delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl FromArgs for SmoothMoveSpec {
    /// Slots: with 3+ values, `2: Int` step delay; with 2+ values,
    /// `0: Float` low and `1: Float` high.  A single value is ignored.
    ///
    /// A failure in any slot resets all three fields, including a step delay
    /// that parsed cleanly.
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        let mut spec = Self::default();
        if args.len() > 2 {
            spec.step_delay_ms = args.delay_at(2)?;
        }
        if args.len() > 1 {
            spec.low = args.float_at(0)?;
            spec.high = args.float_at(1)?;
        }
        Ok(spec)
    }
}

/// `scroll(x, y, delay_ms = 10)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub delay_ms: u32,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl FromArgs for ScrollOptions {
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        let mut opts = Self::default();
        if !args.is_empty() {
            opts.delay_ms = args.delay_at(0)?;
        }
        Ok(opts)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opt_args;

    #[test]
    fn test_button_tokens_resolve_exactly() {
        assert_eq!(MouseButton::from_token("left"), MouseButton::Left);
        assert_eq!(MouseButton::from_token("right"), MouseButton::Right);
        assert_eq!(MouseButton::from_token("center"), MouseButton::Center);
    }

    #[test]
    fn test_unknown_or_miscased_button_token_is_left() {
        for token in ["Right", "middle", "", "RIGHT", " right"] {
            assert_eq!(MouseButton::from_token(token), MouseButton::Left, "{token:?}");
        }
    }

    #[test]
    fn test_click_options_without_args_is_single_left_click() {
        let opts = ClickOptions::from_args(&opt_args![]);
        assert_eq!(opts, ClickOptions::new(MouseButton::Left, false));
    }

    #[test]
    fn test_click_options_with_button_only_falls_back_to_defaults() {
        // The `double` slot is missing, so the button token is discarded too.
        let opts = ClickOptions::from_args(&opt_args!["right"]);
        assert_eq!(opts, ClickOptions::default());
    }

    #[test]
    fn test_click_options_with_both_slots() {
        let opts = ClickOptions::from_args(&opt_args!["right", true]);
        assert_eq!(opts, ClickOptions::new(MouseButton::Right, true));
    }

    #[test]
    fn test_smooth_spec_defaults_without_args() {
        let spec = SmoothMoveSpec::from_args(&opt_args![]);
        assert_eq!(spec.low, 1.0);
        assert_eq!(spec.high, 3.0);
        assert_eq!(spec.step_delay_ms, 10);
    }

    #[test]
    fn test_smooth_spec_uses_all_three_values() {
        let spec = SmoothMoveSpec::from_args(&opt_args![2.0, 5.0, 20]);
        assert_eq!(
            spec,
            SmoothMoveSpec {
                low: 2.0,
                high: 5.0,
                step_delay_ms: 20
            }
        );
    }

    #[test]
    fn test_smooth_spec_single_value_is_ignored() {
        let spec = SmoothMoveSpec::from_args(&opt_args![9.0]);
        assert_eq!(spec, SmoothMoveSpec::default());
    }

    #[test]
    fn test_smooth_spec_bad_bounds_reset_a_valid_step_delay() {
        // Arrange – the delay slot is fine but `low` is an integer
        let args = opt_args![2, 5.0, 40];

        // Act
        let spec = SmoothMoveSpec::from_args(&args);

        // Assert – the whole triple is back to defaults
        assert_eq!(spec, SmoothMoveSpec::default());
    }

    #[test]
    fn test_smooth_spec_does_not_enforce_bound_order() {
        let spec = SmoothMoveSpec::from_args(&opt_args![4.0, 1.5]);
        assert_eq!(spec.low, 4.0);
        assert_eq!(spec.high, 1.5);
    }

    #[test]
    fn test_scroll_options_default_and_explicit_delay() {
        assert_eq!(ScrollOptions::from_args(&opt_args![]).delay_ms, 10);
        assert_eq!(ScrollOptions::from_args(&opt_args![30]).delay_ms, 30);
        assert_eq!(ScrollOptions::from_args(&opt_args!["fast"]).delay_ms, 10);
    }

    #[test]
    fn test_toggle_options_read_button_slot() {
        assert_eq!(ToggleOptions::from_args(&opt_args!["right"]).button, MouseButton::Right);
        assert_eq!(ToggleOptions::from_args(&opt_args![]).button, MouseButton::Left);
    }

    #[test]
    fn test_button_direction_tokens() {
        assert_eq!(ButtonDirection::from_token("down"), Some(ButtonDirection::Down));
        assert_eq!(ButtonDirection::from_token("up"), Some(ButtonDirection::Up));
        assert_eq!(ButtonDirection::from_token("sideways"), None);
    }

    #[test]
    fn test_scroll_direction_delta_sign() {
        assert_eq!(ScrollDirection::Up.delta(3), 3);
        assert_eq!(ScrollDirection::Down.delta(3), -3);
    }
}
