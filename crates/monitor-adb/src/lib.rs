//! adb integration layer for the Android USB monitor.
//!
//! This crate owns everything that touches the `adb` binary: spawning it,
//! parsing `adb devices` output into the device model and issuing
//! `svc usb setFunctions` mode switches.

pub mod client;
pub mod parse;

pub use monitor_core as core;
