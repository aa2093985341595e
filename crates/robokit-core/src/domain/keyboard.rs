//! Keyboard requests: modifiers, taps, chords and toggles.

use crate::args::{ArgShapeError, ArgValue, FromArgs, OptionalArgs};
use crate::keymap::Key;

use super::DEFAULT_DELAY_MS;

/// Token that stands for "no modifier" in modifier slots.
pub const NO_MODIFIER: &str = "null";

/// A modifier key that can be held during a tap or toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Alt,
    Command,
    Control,
    Shift,
    RightShift,
}

impl Modifier {
    /// Parses a modifier token.
    ///
    /// `Ok(None)` for the empty token and for `"null"`; `Err` carries the
    /// unrecognised token back to the caller.
    pub fn from_token(token: &str) -> Result<Option<Self>, String> {
        let modifier = match token {
            "" | NO_MODIFIER => return Ok(None),
            "alt" => Modifier::Alt,
            "command" | "cmd" => Modifier::Command,
            "control" | "ctrl" => Modifier::Control,
            "shift" => Modifier::Shift,
            "right_shift" => Modifier::RightShift,
            other => return Err(other.to_string()),
        };
        Ok(Some(modifier))
    }

    /// The key held down for this modifier.
    pub fn key(&self) -> Key {
        match self {
            Modifier::Alt => Key::Alt,
            Modifier::Command => Key::Command,
            Modifier::Control => Key::Control,
            Modifier::Shift => Key::Shift,
            Modifier::RightShift => Key::RightShift,
        }
    }

    const fn bit(&self) -> u8 {
        match self {
            Modifier::Alt => 1 << 0,
            Modifier::Command => 1 << 1,
            Modifier::Control => 1 << 2,
            Modifier::Shift => 1 << 3,
            Modifier::RightShift => 1 << 4,
        }
    }
}

const ALL_MODIFIERS: [Modifier; 5] = [
    Modifier::Alt,
    Modifier::Command,
    Modifier::Control,
    Modifier::Shift,
    Modifier::RightShift,
];

/// A set of held modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in a fixed order, used for press order (releases go in reverse).
    pub fn iter(&self) -> impl Iterator<Item = Modifier> {
        let set = *self;
        ALL_MODIFIERS.into_iter().filter(move |m| set.contains(*m))
    }

    /// Builds a set from the `(modifier, modifier_type)` pair of a single tap.
    ///
    /// # Errors
    ///
    /// The first token that is not a modifier name.
    pub fn from_pair(modifier: &str, modifier_type: &str) -> Result<Self, String> {
        Self::from_tokens([modifier, modifier_type])
    }

    /// Builds a set from a list of modifier tokens.
    ///
    /// Duplicates collapse; `""` and `"null"` are skipped.
    ///
    /// # Errors
    ///
    /// The first token that is not a modifier name.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Modifiers::NONE;
        for token in tokens {
            if let Some(m) = Modifier::from_token(token)? {
                set.insert(m);
            }
        }
        Ok(set)
    }
}

/// Press or release half of a key toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

impl KeyDirection {
    /// `"down"` / `"up"`.  An absent direction (`""` or `"null"`) presses.
    /// Any other token is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "down" | "" | NO_MODIFIER => Some(KeyDirection::Down),
            "up" => Some(KeyDirection::Up),
            _ => None,
        }
    }
}

/// Optional values of a single-key tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapOptions {
    pub modifier: Option<String>,
    pub modifier_type: Option<String>,
    pub delay_ms: u32,
}

impl Default for TapOptions {
    fn default() -> Self {
        Self {
            modifier: None,
            modifier_type: None,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl TapOptions {
    pub fn with_modifier(modifier: impl Into<String>) -> Self {
        Self {
            modifier: Some(modifier.into()),
            ..Self::default()
        }
    }
}

/// One keyboard tap, in exactly one of its two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRequest {
    Single {
        key: String,
        modifier: Option<String>,
        modifier_type: Option<String>,
        delay_ms: u32,
    },
    Chord {
        key: String,
        modifiers: Vec<String>,
        delay_ms: u32,
    },
}

impl KeyRequest {
    pub fn single(key: impl Into<String>, opts: TapOptions) -> Self {
        KeyRequest::Single {
            key: key.into(),
            modifier: opts.modifier,
            modifier_type: opts.modifier_type,
            delay_ms: opts.delay_ms,
        }
    }

    /// Shapes a loose tap call.
    ///
    /// The first optional value decides the shape: a key sequence makes a
    /// chord (an `Int` delay may follow); a string is the modifier, and a
    /// following value is either a string modifier type or an `Int` delay.
    /// Any mismatch yields a plain tap with no modifiers and the default
    /// delay.
    pub fn from_args(key: &str, args: &OptionalArgs) -> Self {
        match Self::try_from_args(key, args) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("tap arguments for {key:?} rejected ({e}); tapping without modifiers");
                KeyRequest::single(key, TapOptions::default())
            }
        }
    }

    fn try_from_args(key: &str, args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        if let Ok(modifiers) = args.keys_at(0) {
            let delay_ms = if args.len() > 1 {
                args.delay_at(1)?
            } else {
                DEFAULT_DELAY_MS
            };
            return Ok(KeyRequest::Chord {
                key: key.to_string(),
                modifiers: modifiers.to_vec(),
                delay_ms,
            });
        }

        let mut opts = TapOptions::with_modifier(args.str_at(0)?);
        match args.get(1) {
            None => {}
            Some(ArgValue::Str(modifier_type)) => opts.modifier_type = Some(modifier_type.clone()),
            Some(_) => opts.delay_ms = args.delay_at(1)?,
        }
        Ok(KeyRequest::single(key, opts))
    }

    pub fn key(&self) -> &str {
        match self {
            KeyRequest::Single { key, .. } | KeyRequest::Chord { key, .. } => key,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        match self {
            KeyRequest::Single { delay_ms, .. } | KeyRequest::Chord { delay_ms, .. } => *delay_ms,
        }
    }
}

/// Optional values of a key toggle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToggleKeyOptions {
    pub direction: Option<String>,
    pub modifier: Option<String>,
    pub modifier_type: Option<String>,
}

impl ToggleKeyOptions {
    pub fn down() -> Self {
        Self {
            direction: Some("down".into()),
            ..Self::default()
        }
    }

    pub fn up() -> Self {
        Self {
            direction: Some("up".into()),
            ..Self::default()
        }
    }
}

impl FromArgs for ToggleKeyOptions {
    /// Slots: `0: Str` direction, `1: Str` modifier, `2: Str` modifier type.
    /// Each is read only when present.
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError> {
        let mut opts = Self::default();
        if !args.is_empty() {
            opts.direction = Some(args.str_at(0)?.to_string());
        }
        if args.len() > 1 {
            opts.modifier = Some(args.str_at(1)?.to_string());
        }
        if args.len() > 2 {
            opts.modifier_type = Some(args.str_at(2)?.to_string());
        }
        Ok(opts)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opt_args;

    fn chord_mods(mods: &[&str]) -> ArgValue {
        ArgValue::from(mods)
    }

    #[test]
    fn test_modifier_tokens_and_aliases() {
        assert_eq!(Modifier::from_token("cmd"), Ok(Some(Modifier::Command)));
        assert_eq!(Modifier::from_token("ctrl"), Ok(Some(Modifier::Control)));
        assert_eq!(Modifier::from_token("right_shift"), Ok(Some(Modifier::RightShift)));
        assert_eq!(Modifier::from_token("null"), Ok(None));
        assert_eq!(Modifier::from_token(""), Ok(None));
        assert_eq!(Modifier::from_token("hyper"), Err("hyper".to_string()));
    }

    #[test]
    fn test_modifier_set_collapses_duplicates_and_skips_null() {
        let set = Modifiers::from_tokens(["shift", "null", "shift", "alt"]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Modifier::Alt, Modifier::Shift]);
    }

    #[test]
    fn test_modifier_pair_reports_the_bad_token() {
        assert_eq!(Modifiers::from_pair("alt", "super"), Err("super".to_string()));
    }

    #[test]
    fn test_tap_with_no_optional_values_is_single_without_modifiers() {
        let req = KeyRequest::from_args("a", &opt_args![]);
        assert_eq!(req, KeyRequest::single("a", TapOptions::default()));
    }

    #[test]
    fn test_tap_with_key_sequence_is_a_chord() {
        // Arrange
        let args = OptionalArgs::from(vec![chord_mods(&["alt", "shift"]), ArgValue::from(25)]);

        // Act
        let req = KeyRequest::from_args("t", &args);

        // Assert
        assert_eq!(
            req,
            KeyRequest::Chord {
                key: "t".into(),
                modifiers: vec!["alt".into(), "shift".into()],
                delay_ms: 25,
            }
        );
    }

    #[test]
    fn test_chord_without_delay_uses_default() {
        let args = OptionalArgs::from(vec![chord_mods(&["control"])]);
        assert_eq!(KeyRequest::from_args("c", &args).delay_ms(), 10);
    }

    #[test]
    fn test_tap_with_modifier_and_modifier_type() {
        let req = KeyRequest::from_args("v", &opt_args!["control", "shift"]);
        assert_eq!(
            req,
            KeyRequest::Single {
                key: "v".into(),
                modifier: Some("control".into()),
                modifier_type: Some("shift".into()),
                delay_ms: 10,
            }
        );
    }

    #[test]
    fn test_tap_with_modifier_and_delay() {
        let req = KeyRequest::from_args("v", &opt_args!["command", 40]);
        assert_eq!(
            req,
            KeyRequest::Single {
                key: "v".into(),
                modifier: Some("command".into()),
                modifier_type: None,
                delay_ms: 40,
            }
        );
    }

    #[test]
    fn test_tap_with_malformed_second_value_drops_the_modifier() {
        // Arrange – a bool is neither a modifier type nor a delay
        let args = opt_args!["alt", true];

        // Act
        let req = KeyRequest::from_args("x", &args);

        // Assert – the valid "alt" is discarded along with the bad slot
        assert_eq!(req, KeyRequest::single("x", TapOptions::default()));
    }

    #[test]
    fn test_tap_with_non_string_first_value_is_plain_tap() {
        let req = KeyRequest::from_args("x", &opt_args![5]);
        assert_eq!(req, KeyRequest::single("x", TapOptions::default()));
    }

    #[test]
    fn test_key_direction_tokens() {
        assert_eq!(KeyDirection::from_token("up"), Some(KeyDirection::Up));
        assert_eq!(KeyDirection::from_token("down"), Some(KeyDirection::Down));
        assert_eq!(KeyDirection::from_token("null"), Some(KeyDirection::Down));
        assert_eq!(KeyDirection::from_token("sideways"), None);
    }

    #[test]
    fn test_toggle_options_read_present_slots_only() {
        let opts = ToggleKeyOptions::from_args(&opt_args!["up", "shift"]);
        assert_eq!(opts.direction.as_deref(), Some("up"));
        assert_eq!(opts.modifier.as_deref(), Some("shift"));
        assert_eq!(opts.modifier_type, None);
    }

    #[test]
    fn test_toggle_options_with_bad_slot_fall_back_entirely() {
        let opts = ToggleKeyOptions::from_args(&opt_args!["up", 3]);
        assert_eq!(opts, ToggleKeyOptions::default());
    }
}
