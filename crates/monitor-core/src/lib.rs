//! Core domain types for the Android USB monitor.
//!
//! This crate defines the device model, the USB function catalog, the error
//! taxonomy and CLI settings shared by every other crate in the workspace.

pub mod device;
pub mod error;
pub mod functions;
pub mod settings;
