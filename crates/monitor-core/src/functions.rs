use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// USB gadget functions a connected device can be switched to.
///
/// The catalog is fixed: five entries, in menu order. Each variant maps to
/// the mode token passed to `svc usb setFunctions` and carries a
/// human-readable label matching what Android shows in its own USB dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsbFunction {
    /// File transfer via the Media Transfer Protocol.
    Mtp,
    /// USB ethernet tethering.
    Rndis,
    /// MIDI peripheral mode.
    Midi,
    /// Image transfer via the Picture Transfer Protocol.
    Ptp,
    /// Charging only (vendor token used by Samsung firmware).
    SecCharging,
}

impl FromStr for UsbFunction {
    type Err = MonitorError;

    /// Case-insensitive construction from a mode token.
    ///
    /// Accepts `"mtp"`, `"rndis"`, `"midi"`, `"ptp"` and `"sec_charging"`.
    /// Returns [`MonitorError::InvalidFunction`] for unrecognised tokens.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "mtp" => Ok(UsbFunction::Mtp),
            "rndis" => Ok(UsbFunction::Rndis),
            "midi" => Ok(UsbFunction::Midi),
            "ptp" => Ok(UsbFunction::Ptp),
            "sec_charging" => Ok(UsbFunction::SecCharging),
            other => Err(MonitorError::InvalidFunction(other.to_string())),
        }
    }
}

impl UsbFunction {
    /// All catalog entries, in menu order.
    pub const ALL: [UsbFunction; 5] = [
        UsbFunction::Mtp,
        UsbFunction::Rndis,
        UsbFunction::Midi,
        UsbFunction::Ptp,
        UsbFunction::SecCharging,
    ];

    /// Accepted mode tokens, in menu order (used for CLI validation).
    pub const MODE_TOKENS: [&'static str; 5] = ["mtp", "rndis", "midi", "ptp", "sec_charging"];

    /// The mode token passed to the mode-switch command.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsbFunction::Mtp => "mtp",
            UsbFunction::Rndis => "rndis",
            UsbFunction::Midi => "midi",
            UsbFunction::Ptp => "ptp",
            UsbFunction::SecCharging => "sec_charging",
        }
    }

    /// Human-readable menu label for this function.
    pub fn label(&self) -> &'static str {
        match self {
            UsbFunction::Mtp => "Transferring Files",
            UsbFunction::Rndis => "USB tethering",
            UsbFunction::Midi => "MIDI",
            UsbFunction::Ptp => "Transferring images",
            UsbFunction::SecCharging => "Charge phone",
        }
    }
}

impl fmt::Display for UsbFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
