use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use monitor_adb::client::DEFAULT_ADB_PROGRAM;
use monitor_core::error::MonitorError;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.android-usb-monitor/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.android-usb-monitor/`
/// - `~/.android-usb-monitor/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let monitor_dir = home.join(".android-usb-monitor");
    std::fs::create_dir_all(&monitor_dir)?;
    std::fs::create_dir_all(monitor_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive
/// (tracing uses lowercase level names). Falls back to `"info"` if the level
/// string is not recognised.
///
/// With a `log_file`, output is appended there without ANSI colours;
/// otherwise everything goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));

            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer().with_target(false).with_thread_ids(false);

            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── adb discovery ──────────────────────────────────────────────────────────────

/// Locate the adb executable to invoke.
///
/// Resolution order:
/// 1. The explicit override (from `--adb-path`), which must exist.
/// 2. `$ANDROID_HOME/platform-tools/adb`.
/// 3. `~/Android/Sdk/platform-tools/adb` (the default SDK install location).
/// 4. Bare `adb`, resolved through `PATH` at spawn time.
pub fn discover_adb_program(override_path: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_string_lossy().into_owned());
        }
        return Err(MonitorError::ProgramNotFound(path.display().to_string()).into());
    }

    if let Ok(sdk) = std::env::var("ANDROID_HOME") {
        let candidate = PathBuf::from(sdk).join("platform-tools").join("adb");
        if candidate.exists() {
            return Ok(candidate.to_string_lossy().into_owned());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidate = home
            .join("Android")
            .join("Sdk")
            .join("platform-tools")
            .join("adb");
        if candidate.exists() {
            return Ok(candidate.to_string_lossy().into_owned());
        }
    }

    Ok(DEFAULT_ADB_PROGRAM.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
