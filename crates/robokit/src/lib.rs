//! robokit library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does robokit do?
//!
//! robokit drives the local machine's pointer and keyboard the way a user
//! would: moves (instant or humanized), clicks, scrolls, key taps and chords,
//! and Unicode text, plus the process and window lookups needed to aim that
//! input at the right application.
//!
//! The OS-independent decisions (argument defaults, key tables, text
//! tokenization, motion planning) live in `robokit_core`.  This crate holds
//! the use cases and the adapters that reach the OS:
//!
//! 1. `application::robot::Robot` is the single call surface.
//! 2. Use cases in `application` normalise calls and drive the ports.
//! 3. `infrastructure` implements the ports with `SendInput` on Windows,
//!    XTest on Linux and Quartz on macOS, plus clipboard, process and
//!    window tools.

/// Application layer: use cases and ports.
pub mod application;

/// Infrastructure layer: OS adapters and configuration.
pub mod infrastructure;
