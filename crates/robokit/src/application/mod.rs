//! Application layer use cases.
//!
//! # What use cases does robokit have?
//!
//! - **`drive_mouse`** – Instant and smooth pointer moves, clicks, button
//!   toggles and scrolling.  Loose optional arguments are normalised with
//!   `robokit_core::args` before anything reaches the backend.
//!
//! - **`dispatch_keys`** – Taps, chords and key toggles.  Exactly one backend
//!   call per tap; the toggle status string is returned unparsed.
//!
//! - **`inject_text`** – Unicode text through one of two strategies (escape
//!   tokens or direct code points), clipboard paste and plain string typing.
//!
//! - **`lookup_process`** – Process enumeration and window activation used
//!   to target synthesized input.
//!
//! - **`robot`** – The `Robot` facade owning the settings and every
//!   collaborator.
//!
//! All OS access goes through the traits in **`ports`**, injected as
//! `Arc<dyn Trait>`.  This layer never imports `infrastructure`.

pub mod dispatch_keys;
pub mod drive_mouse;
pub mod inject_text;
pub mod lookup_process;
pub mod ports;
pub mod robot;

#[cfg(test)]
pub(crate) mod test_support;
