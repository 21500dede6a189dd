use serde::{Deserialize, Serialize};

/// Opaque device identifier reported by the listing command.
///
/// For adb this is the serial number (or the emulator pseudo-serial, e.g.
/// `emulator-5554`). Unique per connected device; rebuilt on every poll.
pub type DeviceId = String;

/// Connection status column of a single `adb devices` output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    /// Fully connected and authorized for debugging.
    Device,
    /// Attached but not yet authorized on the device screen.
    Unauthorized,
    /// Known to the adb server but currently unreachable.
    Offline,
    /// Booted into recovery mode.
    Recovery,
    /// Waiting for a sideload package.
    Sideload,
    /// Any other status string adb may emit (e.g. `bootloader`).
    #[serde(untagged)]
    Other(String),
}

impl From<&str> for DeviceState {
    /// Infallible construction from the raw status field.
    fn from(raw: &str) -> Self {
        match raw {
            "device" => DeviceState::Device,
            "unauthorized" => DeviceState::Unauthorized,
            "offline" => DeviceState::Offline,
            "recovery" => DeviceState::Recovery,
            "sideload" => DeviceState::Sideload,
            other => DeviceState::Other(other.to_string()),
        }
    }
}

impl DeviceState {
    /// The raw status string as adb prints it.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceState::Device => "device",
            DeviceState::Unauthorized => "unauthorized",
            DeviceState::Offline => "offline",
            DeviceState::Recovery => "recovery",
            DeviceState::Sideload => "sideload",
            DeviceState::Other(raw) => raw,
        }
    }
}

/// One parsed line of `adb devices` output, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Serial number (or equivalent opaque identifier).
    pub serial: DeviceId,
    /// Connection status parsed from the second output column.
    pub state: DeviceState,
}

impl DeviceEntry {
    /// `true` only for the fully-connected, authorized state.
    pub fn is_connected(&self) -> bool {
        self.state == DeviceState::Device
    }
}

/// Derive the connected-device list from parsed entries.
///
/// Order is preserved; only entries whose status is exactly `device` are
/// kept, so unauthorized and offline devices never count towards presence.
pub fn connected_serials(entries: &[DeviceEntry]) -> Vec<DeviceId> {
    entries
        .iter()
        .filter(|e| e.is_connected())
        .map(|e| e.serial.clone())
        .collect()
}
