use thiserror::Error;

/// All errors produced by the USB monitor crates.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// An external command could not be spawned or its output collected.
    #[error("Failed to execute `{command}`: {source}")]
    CommandExecution {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command ran but exited with a failure status.
    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A mode token is not one of the recognised USB functions.
    #[error("Invalid USB function: {0}")]
    InvalidFunction(String),

    /// An explicitly configured adb executable does not exist.
    #[error("adb program not found: {0}")]
    ProgramNotFound(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for raw I/O errors that carry no command context.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_command_execution() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MonitorError::CommandExecution {
            command: "adb devices".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to execute"));
        assert!(msg.contains("adb devices"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_command_failed() {
        let err = MonitorError::CommandFailed {
            command: "adb shell svc usb setFunctions mtp".to_string(),
            stderr: "error: no devices/emulators found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("adb shell svc usb setFunctions mtp"));
        assert!(msg.contains("no devices/emulators found"));
    }

    #[test]
    fn test_error_display_invalid_function() {
        let err = MonitorError::InvalidFunction("warp_drive".to_string());
        let msg = err.to_string();
        assert_eq!(msg, "Invalid USB function: warp_drive");
    }

    #[test]
    fn test_error_display_program_not_found() {
        let err = MonitorError::ProgramNotFound("/opt/missing/adb".to_string());
        let msg = err.to_string();
        assert_eq!(msg, "adb program not found: /opt/missing/adb");
    }

    #[test]
    fn test_error_display_config() {
        let err = MonitorError::Config("set mode requires --usb-function".to_string());
        let msg = err.to_string();
        assert_eq!(msg, "Configuration error: set mode requires --usb-function");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MonitorError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: MonitorError = json_err.into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to process JSON"));
    }

    #[test]
    fn test_command_execution_source_is_preserved() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = MonitorError::CommandExecution {
            command: "adb version".to_string(),
            source: io_err,
        };
        let source = std::error::Error::source(&err).expect("source must be set");
        assert!(source.to_string().contains("gone"));
    }
}
