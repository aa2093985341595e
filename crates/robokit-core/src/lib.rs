//! # robokit-core
//!
//! OS-independent half of robokit: everything that decides *what* to inject,
//! with no knowledge of *how* a platform injects it.
//!
//! - **`args`** – Positional optional arguments and the all-or-nothing
//!   defaulting rule used by every loose call surface.
//!
//! - **`domain`** – Buttons, modifiers, tap/chord requests, smooth-move
//!   parameters and process records.
//!
//! - **`keymap`** – Key names and their Windows VK, X11 KeySym and macOS
//!   `CGKeyCode` tables.
//!
//! - **`unicode`** – Scalar-value indexing and the escape tokenizer used by
//!   the escape-sequence text strategy.
//!
//! - **`motion`** – Duration sampling and humanized paths for smooth moves.
//!
//! The crate performs no I/O.  The `robokit` crate wires these pieces to the
//! native backends.

pub mod args;
pub mod domain;
pub mod keymap;
pub mod motion;
pub mod unicode;

pub use args::{ArgShapeError, ArgValue, FromArgs, OptionalArgs};
pub use domain::keyboard::{KeyDirection, KeyRequest, Modifier, Modifiers, TapOptions, ToggleKeyOptions};
pub use domain::mouse::{
    ButtonDirection, ClickOptions, MouseButton, ScrollDirection, ScrollOptions, SmoothMoveSpec,
    ToggleOptions,
};
pub use domain::process::{Pid, ProcessRecord, WindowHandle};
pub use domain::DEFAULT_DELAY_MS;
pub use keymap::{Key, KeyMapper};
pub use unicode::{char_code_at, CodepointStream, EscapeSegment, EscapeToken, TextStrategy};
