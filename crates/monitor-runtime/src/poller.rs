//! Retrying device poller for the watch runtime.
//!
//! Wraps [`AdbClient::connected_devices`] with transparent retry logic.
//! A poll that fails all attempts yields `None` rather than an empty list,
//! so callers can keep the last known presence state instead of misreading
//! a hiccuping adb server as a disconnect.

use std::time::{Duration, Instant};

use monitor_adb::client::AdbClient;
use monitor_core::device::DeviceId;
use tokio::time;

/// Maximum number of listing attempts per poll before giving up.
const MAX_RETRY_ATTEMPTS: u32 = 3;

// ── DevicePoller ──────────────────────────────────────────────────────────────

/// Retrying wrapper around the device-listing command.
pub struct DevicePoller {
    /// Client used for every listing attempt.
    client: AdbClient,
    /// Most recent successful device list.
    last_devices: Option<Vec<DeviceId>>,
    /// When the last successful poll completed.
    last_poll: Option<Instant>,
    /// Human-readable description of the last poll error.
    last_error: Option<String>,
}

impl DevicePoller {
    /// Create a poller around `client`.
    pub fn new(client: AdbClient) -> Self {
        Self {
            client,
            last_devices: None,
            last_poll: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Poll once for connected devices.
    ///
    /// Retries up to [`MAX_RETRY_ATTEMPTS`] times with back-off
    /// (0 ms → 100 ms → 200 ms). Returns `None` when every attempt failed;
    /// the previous successful list stays available via
    /// [`DevicePoller::last_devices`].
    pub async fn poll(&mut self) -> Option<Vec<DeviceId>> {
        match self.fetch_with_retry().await {
            Ok(devices) => {
                tracing::debug!(count = devices.len(), "device poll succeeded");
                self.last_devices = Some(devices.clone());
                self.last_poll = Some(Instant::now());
                self.last_error = None;
                Some(devices)
            }
            Err(e) => {
                tracing::warn!(error = %e, "device poll failed; keeping last known state");
                self.last_error = Some(e);
                None
            }
        }
    }

    /// The most recent successful device list, or `None` before the first
    /// successful poll.
    pub fn last_devices(&self) -> Option<&[DeviceId]> {
        self.last_devices.as_deref()
    }

    /// Human-readable description of the last poll error, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Time since the last successful poll, or `None` if there was none yet.
    pub fn poll_age(&self) -> Option<Duration> {
        self.last_poll.map(|ts| ts.elapsed())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Attempt up to [`MAX_RETRY_ATTEMPTS`] listings with back-off.
    ///
    /// Back-off schedule: attempt 1 → 0 ms, attempt 2 → 100 ms, attempt 3 → 200 ms.
    async fn fetch_with_retry(&self) -> Result<Vec<DeviceId>, String> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let sleep_ms = u64::from(attempt) * 100;
                tracing::debug!(attempt, sleep_ms, "retrying device listing after back-off");
                time::sleep(Duration::from_millis(sleep_ms)).await;
            }

            match self.client.connected_devices().await {
                Ok(devices) => return Ok(devices),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "device listing attempt failed");
                    last_err = e.to_string();
                }
            }
        }

        Err(last_err)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
