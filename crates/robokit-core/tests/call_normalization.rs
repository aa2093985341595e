//! Cross-module checks of how loose calls are normalised before they reach a
//! backend.

use robokit_core::args::{ArgValue, FromArgs, OptionalArgs};
use robokit_core::domain::keyboard::{KeyRequest, Modifiers, TapOptions};
use robokit_core::domain::mouse::{ClickOptions, MouseButton, SmoothMoveSpec};
use robokit_core::keymap::{Key, KeyMapper};
use robokit_core::opt_args;
use robokit_core::unicode::{escape_segments, EscapeSegment};

#[test]
fn test_empty_click_args_equal_a_single_left_click() {
    assert_eq!(
        ClickOptions::from_args(&OptionalArgs::none()),
        ClickOptions::new(MouseButton::Left, false)
    );
}

#[test]
fn test_smooth_defaults_and_explicit_values() {
    let defaults = SmoothMoveSpec::from_args(&opt_args![]);
    assert_eq!((defaults.low, defaults.high, defaults.step_delay_ms), (1.0, 3.0, 10));

    let explicit = SmoothMoveSpec::from_args(&opt_args![2.0, 5.0, 20]);
    assert_eq!((explicit.low, explicit.high, explicit.step_delay_ms), (2.0, 5.0, 20));
}

#[test]
fn test_chord_modifiers_resolve_to_keys_every_backend_can_press() {
    // Arrange
    let args = OptionalArgs::from(vec![ArgValue::from(&["command", "shift"][..])]);

    // Act
    let KeyRequest::Chord { modifiers, .. } = KeyRequest::from_args("4", &args) else {
        panic!("a key sequence must produce a chord");
    };
    let set = Modifiers::from_tokens(modifiers.iter().map(String::as_str)).unwrap();

    // Assert
    for m in set.iter() {
        let key = m.key();
        assert!(KeyMapper::windows_vk(key).is_some(), "{key:?}");
        assert!(KeyMapper::x11_keysym(key).is_some(), "{key:?}");
        assert!(KeyMapper::macos_keycode(key).is_some(), "{key:?}");
    }
}

#[test]
fn test_paste_chord_key_is_mapped_everywhere() {
    let v = Key::from_name("v").unwrap();
    assert_eq!(KeyMapper::windows_vk(v), Some(b'V'));
    assert_eq!(KeyMapper::x11_keysym(v), Some(u32::from(b'v')));
    assert_eq!(KeyMapper::macos_keycode(v), Some(0x09));
}

#[test]
fn test_malformed_tap_is_a_plain_tap() {
    let req = KeyRequest::from_args("enter", &opt_args![1.5]);
    assert_eq!(req, KeyRequest::single("enter", TapOptions::default()));
}

#[test]
fn test_escape_tokenizer_counts_one_token_per_non_ascii_scalar() {
    let tokens = escape_segments("naïve café ☕")
        .into_iter()
        .filter(|s| matches!(s, EscapeSegment::Token(_)))
        .count();
    assert_eq!(tokens, 3);
}
