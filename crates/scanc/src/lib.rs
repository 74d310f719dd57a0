//! Command-line driver for the token-stream device.
//!
//! Plays the part of a user-space client: opens a handle on a [`Scanner`],
//! optionally sets its separators, writes text and prints every token it
//! reads back.
//!
//! [`Scanner`]: scan_device::Scanner

pub mod commands;
