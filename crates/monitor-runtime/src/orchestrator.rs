//! Async watch orchestrator.
//!
//! Coordinates [`DevicePoller`] and [`PresenceMonitor`] in a tokio task,
//! sending [`DeviceEvent`] transitions through an `mpsc` channel so the
//! presentation seam can consume them without any shared mutable state.
//! A second channel carries hotplug notifications into the loop; each one
//! triggers a debounced poll after a settle delay.

use std::time::Duration;

use monitor_adb::client::AdbClient;
use monitor_core::device::DeviceId;
use monitor_core::functions::UsbFunction;
use tokio::sync::mpsc;
use tokio::time;

use crate::poller::DevicePoller;
use crate::presence::{DeviceEvent, PresenceMonitor};

// ── WatchOrchestrator ─────────────────────────────────────────────────────────

/// Background watch coordinator.
///
/// Call [`WatchOrchestrator::start`] to spin up the watch loop in a dedicated
/// tokio task and receive a channel endpoint for [`DeviceEvent`] transitions
/// plus a [`WatchHandle`] for control.
pub struct WatchOrchestrator {
    /// Spacing between periodic polls.
    poll_interval: Duration,
    /// How long to wait after a hotplug notification before polling, giving
    /// the kernel and the adb server time to settle.
    settle_delay: Duration,
    /// Client used for polling and mode switches.
    client: AdbClient,
}

impl WatchOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `poll_interval_secs` – seconds between periodic polls.
    /// - `settle_delay_ms`    – post-hotplug delay before polling.
    /// - `client`             – adb client to poll with.
    pub fn new(poll_interval_secs: u64, settle_delay_ms: u64, client: AdbClient) -> Self {
        Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            settle_delay: Duration::from_millis(settle_delay_ms),
            client,
        }
    }

    /// Start the watch loop.
    ///
    /// Spawns a tokio task that runs the loop. Returns:
    /// - An `mpsc::Receiver<DeviceEvent>` for the caller to poll.
    /// - A [`WatchHandle`] for hotplug notifications, mode switches and
    ///   aborting the loop.
    pub fn start(self) -> (mpsc::Receiver<DeviceEvent>, WatchHandle) {
        // Buffer a modest number of events so slow consumers don't stall the loop.
        let (tx, rx) = mpsc::channel(16);
        let (hotplug_tx, hotplug_rx) = mpsc::channel(16);

        let client = self.client.clone();
        let handle = tokio::spawn(async move {
            self.watch_loop(tx, hotplug_rx).await;
        });

        (
            rx,
            WatchHandle {
                handle,
                hotplug_tx,
                client,
            },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    /// The main watch loop.
    ///
    /// Performs an immediate poll on startup so the current state is
    /// reported right away, then repeats on `poll_interval`. Hotplug
    /// notifications trigger an extra poll after `settle_delay`; whatever
    /// queued up during the delay is collapsed into that single poll. The
    /// loop exits when the receiver side of the event channel is closed.
    async fn watch_loop(self, tx: mpsc::Sender<DeviceEvent>, mut hotplug_rx: mpsc::Receiver<()>) {
        let mut poller = DevicePoller::new(self.client.clone());
        let mut presence = PresenceMonitor::new();

        Self::poll_once(&mut poller, &mut presence, &tx).await;

        let mut interval = time::interval(self.poll_interval);
        // Consume the first tick which fires immediately; we already polled above.
        interval.tick().await;

        // Cleared once the notification side hangs up, so the closed channel
        // doesn't spin the select.
        let mut hotplug_open = true;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                notice = hotplug_rx.recv(), if hotplug_open => {
                    match notice {
                        Some(()) => {
                            time::sleep(self.settle_delay).await;
                            // Collapse notifications that arrived while settling.
                            while hotplug_rx.try_recv().is_ok() {}
                            // Push the next periodic poll a full interval out.
                            interval.reset();
                        }
                        None => {
                            hotplug_open = false;
                            continue;
                        }
                    }
                }
            }

            if tx.is_closed() {
                tracing::debug!("event channel closed; exiting watch loop");
                break;
            }

            Self::poll_once(&mut poller, &mut presence, &tx).await;
        }
    }

    /// Poll once and forward any presence transition to the channel.
    async fn poll_once(
        poller: &mut DevicePoller,
        presence: &mut PresenceMonitor,
        tx: &mpsc::Sender<DeviceEvent>,
    ) {
        // A failed poll carries no information; presence keeps its last
        // known state rather than misreporting a disconnect.
        let Some(devices) = poller.poll().await else {
            return;
        };

        if let Some(event) = presence.observe(devices) {
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "failed to send device event; receiver dropped");
            }
        }
    }
}

// ── WatchHandle ───────────────────────────────────────────────────────────────

/// A handle to the background watch task.
///
/// Drop or call [`WatchHandle::abort`] to stop the loop.
pub struct WatchHandle {
    handle: tokio::task::JoinHandle<()>,
    hotplug_tx: mpsc::Sender<()>,
    client: AdbClient,
}

impl WatchHandle {
    /// Immediately abort the watch loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Notify the loop that a device may have been plugged or unplugged.
    ///
    /// The loop polls once after its settle delay. Notifications are
    /// coalesced; if the queue is full a poll is already pending and the
    /// notification can be dropped.
    pub fn notify_hotplug(&self) {
        let _ = self.hotplug_tx.try_send(());
    }

    /// Switch the device's USB function in a detached task.
    ///
    /// Fire-and-forget: failures are logged by the client and never affect
    /// the watch loop or presence state.
    pub fn request_mode_switch(&self, serial: Option<DeviceId>, function: UsbFunction) {
        let client = self.client.clone();
        tokio::spawn(async move {
            client.set_usb_function(serial.as_deref(), function).await;
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
