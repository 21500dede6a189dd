//! Async client for the adb binary.
//!
//! [`AdbClient`] wraps a configurable executable path and exposes the three
//! operations the monitor needs: listing devices, probing the client version
//! and switching the active USB function. All invocations capture output and
//! decode it lossily, so a device with a non-UTF-8 name can never wedge the
//! poll loop.

use monitor_core::device::{connected_serials, DeviceEntry, DeviceId};
use monitor_core::error::{MonitorError, Result};
use monitor_core::functions::UsbFunction;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::parse;

/// Default executable name, resolved through `PATH`.
pub const DEFAULT_ADB_PROGRAM: &str = "adb";

/// Argument tail for switching the active USB function on a device.
const SET_FUNCTIONS_ARGS: [&str; 4] = ["shell", "svc", "usb", "setFunctions"];

// ── Client ─────────────────────────────────────────────────────────────────────

/// Thin async wrapper around the adb executable.
#[derive(Debug, Clone)]
pub struct AdbClient {
    program: String,
}

impl AdbClient {
    /// Create a client that invokes `program` (a name resolved via `PATH` or
    /// an absolute path).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this client invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `adb devices` and parse every reported entry, whatever its state.
    pub async fn list_devices(&self) -> Result<Vec<DeviceEntry>> {
        let stdout = self.run(&["devices"]).await?;
        Ok(parse::parse_device_list(&stdout))
    }

    /// Run `adb devices` and return only the serials in the `device` state,
    /// in adb's reporting order.
    pub async fn connected_devices(&self) -> Result<Vec<DeviceId>> {
        let entries = self.list_devices().await?;
        Ok(connected_serials(&entries))
    }

    /// Probe `adb version`. Returns the parsed version number, falling back
    /// to the first output line when the banner has an unexpected shape.
    pub async fn version(&self) -> Result<String> {
        let stdout = self.run(&["version"]).await?;
        Ok(parse::parse_adb_version(&stdout).unwrap_or_else(|| {
            stdout.lines().next().unwrap_or_default().trim().to_string()
        }))
    }

    /// Switch the device's active USB function via
    /// `adb [-s serial] shell svc usb setFunctions <mode>`.
    ///
    /// Without a serial, adb targets the single connected device and fails if
    /// there are several; the caller decides whether that failure matters.
    pub async fn try_set_usb_function(
        &self,
        serial: Option<&str>,
        function: UsbFunction,
    ) -> Result<()> {
        let mut args: Vec<&str> = Vec::with_capacity(SET_FUNCTIONS_ARGS.len() + 3);
        if let Some(serial) = serial {
            args.extend(["-s", serial]);
        }
        args.extend(SET_FUNCTIONS_ARGS);
        args.push(function.as_str());

        self.run(&args).await?;
        Ok(())
    }

    /// Fire-and-forget variant of [`try_set_usb_function`]: failures are
    /// logged and swallowed so a mode switch can never take down the watch.
    pub async fn set_usb_function(&self, serial: Option<&str>, function: UsbFunction) {
        match self.try_set_usb_function(serial, function).await {
            Ok(()) => debug!(function = %function, "USB function switched"),
            Err(err) => warn!(function = %function, error = %err, "USB function switch failed"),
        }
    }

    /// Spawn the program with `args`, wait for it and return stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = self.command_line(args);
        debug!(command = %rendered, "running adb");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| MonitorError::CommandExecution {
                command: rendered.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(MonitorError::CommandFailed {
                command: rendered,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Render the full command line for logs and error messages.
    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl Default for AdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_ADB_PROGRAM)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
