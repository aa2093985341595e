//! Value types shared by every robokit operation.
//!
//! Nothing here touches the OS.  Option structs implement
//! [`FromArgs`](crate::args::FromArgs) so loose calls can be normalised
//! before they reach a backend.

/// Mouse buttons, directions and the option sets of mouse calls.
pub mod mouse;

/// Modifiers, tap/chord requests and key-toggle options.
pub mod keyboard;

pub mod process;

/// Delay applied when a call leaves its delay slot empty, in milliseconds.
pub const DEFAULT_DELAY_MS: u32 = 10;
