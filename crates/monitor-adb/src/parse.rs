//! Parsers for adb command output.
//!
//! `adb devices` prints a one-line header followed by one line per device:
//!
//! ```text
//! List of devices attached
//! ABC123	device
//! XYZ789	unauthorized
//! ```
//!
//! Parsing is a pure function of the output text; all filtering of
//! not-fully-connected devices happens later via
//! [`monitor_core::device::connected_serials`].

use monitor_core::device::{DeviceEntry, DeviceState};
use regex::Regex;

// ── Device list ────────────────────────────────────────────────────────────────

/// Parse the output of `adb devices` into device entries.
///
/// The first line is the header and is always discarded. Each remaining line
/// is split on the tab character into `(serial, state)`; lines with fewer
/// than two fields (including blank lines) are skipped silently.
pub fn parse_device_list(output: &str) -> Vec<DeviceEntry> {
    output.lines().skip(1).filter_map(parse_device_line).collect()
}

/// Parse a single `<serial>\t<state>` line. Returns `None` for lines that do
/// not carry both fields.
fn parse_device_line(line: &str) -> Option<DeviceEntry> {
    let (serial, state) = line.split_once('\t')?;
    let serial = serial.trim();
    let state = state.trim();
    if serial.is_empty() || state.is_empty() {
        return None;
    }

    Some(DeviceEntry {
        serial: serial.to_string(),
        state: DeviceState::from(state),
    })
}

// ── Version banner ─────────────────────────────────────────────────────────────

/// Extract the version number from `adb version` output
/// (e.g. `Android Debug Bridge version 1.0.41` → `1.0.41`).
pub fn parse_adb_version(output: &str) -> Option<String> {
    let re = Regex::new(r"Android Debug Bridge version (\d+(?:\.\d+)*)").expect("regex is valid");
    re.captures(output).map(|caps| caps[1].to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::device::connected_serials;

    // ── parse_device_list ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_mixed_states() {
        let output = "List of devices attached\nABC123\tdevice\nXYZ789\tunauthorized\n";
        let entries = parse_device_list(output);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].serial, "ABC123");
        assert_eq!(entries[0].state, DeviceState::Device);
        assert_eq!(entries[1].serial, "XYZ789");
        assert_eq!(entries[1].state, DeviceState::Unauthorized);

        // Only the fully connected device survives the presence filter.
        assert_eq!(connected_serials(&entries), vec!["ABC123".to_string()]);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_device_list("").is_empty());
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse_device_list("List of devices attached\n").is_empty());
        assert!(parse_device_list("List of devices attached").is_empty());
    }

    #[test]
    fn test_parse_skips_lines_without_tab() {
        let output = "List of devices attached\nnotabhere\nABC123\tdevice\n";
        let entries = parse_device_list(output);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].serial, "ABC123");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let output = "List of devices attached\n\nABC123\tdevice\n\n";
        let entries = parse_device_list(output);

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        // adb on Windows hosts emits \r\n.
        let output = "List of devices attached\r\nABC123\tdevice\r\n";
        let entries = parse_device_list(output);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].serial, "ABC123");
        assert_eq!(entries[0].state, DeviceState::Device);
    }

    #[test]
    fn test_parse_preserves_order() {
        let output = "List of devices attached\nB\tdevice\nA\tdevice\nC\tdevice\n";
        let serials = connected_serials(&parse_device_list(output));

        assert_eq!(serials, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_parse_unknown_state_is_kept_as_other() {
        let output = "List of devices attached\nABC123\thost\n";
        let entries = parse_device_list(output);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].state, DeviceState::Other("host".to_string()));
        assert!(connected_serials(&entries).is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let output = "List of devices attached\nABC123\tdevice\nXYZ789\toffline\n";
        assert_eq!(parse_device_list(output), parse_device_list(output));
    }

    // ── parse_adb_version ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_adb_version() {
        let output = "Android Debug Bridge version 1.0.41\nVersion 35.0.2-12147458\n";
        assert_eq!(parse_adb_version(output), Some("1.0.41".to_string()));
    }

    #[test]
    fn test_parse_adb_version_missing_banner() {
        assert_eq!(parse_adb_version("command not found"), None);
        assert_eq!(parse_adb_version(""), None);
    }
}
