//! Infrastructure layer: OS-facing adapters for the application ports.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `robokit_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`backend`** – Input synthesis.  A shared `Synthesizer` over one raw
//!   event sink per OS (`SendInput`, XTest, Quartz), selected at compile
//!   time with `#[cfg(target_os)]` behind the `native` feature.  A recording
//!   sink is always available for tests.
//!
//! - **`clipboard`** – Clipboard through the platform's command-line tools,
//!   plus an in-memory clipboard.
//!
//! - **`config`** – TOML configuration file: delays, typing strategy and
//!   smooth-move defaults.
//!
//! - **`process`** – Process table via `sysinfo`, plus a fixed in-memory
//!   table.
//!
//! - **`window`** – Window activation and queries via `xdotool`,
//!   `osascript` or PowerShell, plus an in-memory window list.

pub mod backend;
pub mod clipboard;
pub mod config;
pub mod process;
pub mod window;
