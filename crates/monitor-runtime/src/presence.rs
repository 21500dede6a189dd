//! Device-presence state machine.
//!
//! [`PresenceMonitor`] ingests the connected-device list produced by each
//! poll, collapses it into a boolean presence state and emits a
//! [`DeviceEvent`] only when that state actually flips. Feeding it the same
//! list twice is therefore always silent.

use chrono::{DateTime, Utc};
use monitor_core::device::DeviceId;

// ── Public types ──────────────────────────────────────────────────────────────

/// Collapsed presence state: is at least one fully connected device attached?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    /// No device in the `device` state.
    Absent,
    /// One or more devices in the `device` state.
    Present,
}

/// Transition event delivered to the presentation seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Presence flipped to [`PresenceState::Present`]; carries the serials
    /// observed in the flipping poll, in adb's reporting order.
    Connected(Vec<DeviceId>),
    /// Presence flipped to [`PresenceState::Absent`].
    Disconnected,
}

/// One attach/detach episode recorded in the history.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    /// Serials observed when the episode began.
    pub serials: Vec<DeviceId>,
    /// When the first device appeared.
    pub connected_at: DateTime<Utc>,
    /// When the last device disappeared; `None` while still attached.
    pub disconnected_at: Option<DateTime<Utc>>,
}

// ── PresenceMonitor ───────────────────────────────────────────────────────────

/// Tracks device presence and maintains a history of attach episodes.
///
/// Call [`PresenceMonitor::observe`] with the result of every successful
/// poll. Failed polls must be skipped entirely so the last known state is
/// preserved rather than misread as a disconnect.
pub struct PresenceMonitor {
    /// Current collapsed presence state.
    state: PresenceState,
    /// Serials from the most recent poll while present.
    devices: Vec<DeviceId>,
    /// Ordered log of all attach episodes observed since startup.
    history: Vec<DeviceSession>,
}

impl PresenceMonitor {
    /// Create a monitor starting in [`PresenceState::Absent`].
    pub fn new() -> Self {
        Self {
            state: PresenceState::Absent,
            devices: Vec::new(),
            history: Vec::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Fold a fresh device list into the state machine.
    ///
    /// Returns `Some(event)` only when presence flips:
    /// - Absent → non-empty list: [`DeviceEvent::Connected`] with the serials.
    /// - Present → empty list: [`DeviceEvent::Disconnected`].
    ///
    /// While present, a changed (but non-empty) list updates
    /// [`PresenceMonitor::devices`] without emitting anything.
    pub fn observe(&mut self, devices: Vec<DeviceId>) -> Option<DeviceEvent> {
        let present = !devices.is_empty();

        match (self.state, present) {
            (PresenceState::Absent, true) => {
                self.on_connected(&devices);
                self.state = PresenceState::Present;
                self.devices = devices.clone();
                Some(DeviceEvent::Connected(devices))
            }
            (PresenceState::Present, false) => {
                self.on_disconnected();
                self.state = PresenceState::Absent;
                self.devices.clear();
                Some(DeviceEvent::Disconnected)
            }
            (PresenceState::Present, true) => {
                // Same presence, possibly different serials.
                self.devices = devices;
                None
            }
            (PresenceState::Absent, false) => None,
        }
    }

    /// Current presence state.
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// `true` when at least one device is attached.
    pub fn is_present(&self) -> bool {
        self.state == PresenceState::Present
    }

    /// Serials from the most recent poll, empty while absent.
    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }

    /// Number of attach episodes observed (including an ongoing one).
    pub fn session_count(&self) -> usize {
        self.history.len()
    }

    /// Ordered history of attach episodes.
    pub fn history(&self) -> &[DeviceSession] {
        &self.history
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Called when presence flips to present.
    fn on_connected(&mut self, serials: &[DeviceId]) {
        tracing::info!(devices = %serials.join(","), "device connected");

        self.history.push(DeviceSession {
            serials: serials.to_vec(),
            connected_at: Utc::now(),
            disconnected_at: None,
        });
    }

    /// Called when presence flips to absent.
    fn on_disconnected(&mut self) {
        tracing::info!("device disconnected");

        if let Some(session) = self.history.last_mut() {
            session.disconnected_at = Some(Utc::now());
        }
    }
}

impl Default for PresenceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────

    fn serials(ids: &[&str]) -> Vec<DeviceId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    // ── initial state ─────────────────────────────────────────────────────

    #[test]
    fn test_starts_absent() {
        let monitor = PresenceMonitor::new();
        assert_eq!(monitor.state(), PresenceState::Absent);
        assert!(!monitor.is_present());
        assert!(monitor.devices().is_empty());
        assert_eq!(monitor.session_count(), 0);
    }

    // ── connect ───────────────────────────────────────────────────────────

    #[test]
    fn test_connect_emits_event_with_serials() {
        let mut monitor = PresenceMonitor::new();

        let event = monitor.observe(serials(&["ABC123"]));

        assert_eq!(event, Some(DeviceEvent::Connected(serials(&["ABC123"]))));
        assert!(monitor.is_present());
        assert_eq!(monitor.devices(), serials(&["ABC123"]).as_slice());
    }

    #[test]
    fn test_steady_present_is_silent() {
        let mut monitor = PresenceMonitor::new();
        monitor.observe(serials(&["ABC123"]));

        assert_eq!(monitor.observe(serials(&["ABC123"])), None);
        assert_eq!(monitor.observe(serials(&["ABC123"])), None);
        assert_eq!(monitor.session_count(), 1);
    }

    #[test]
    fn test_device_set_change_while_present_is_silent() {
        let mut monitor = PresenceMonitor::new();
        monitor.observe(serials(&["A"]));

        // A second device appears: still present, no event, list refreshed.
        assert_eq!(monitor.observe(serials(&["A", "B"])), None);
        assert_eq!(monitor.devices(), serials(&["A", "B"]).as_slice());
    }

    // ── disconnect ────────────────────────────────────────────────────────

    #[test]
    fn test_disconnect_emits_event() {
        let mut monitor = PresenceMonitor::new();
        monitor.observe(serials(&["ABC123"]));

        let event = monitor.observe(Vec::new());

        assert_eq!(event, Some(DeviceEvent::Disconnected));
        assert!(!monitor.is_present());
        assert!(monitor.devices().is_empty());
    }

    #[test]
    fn test_steady_absent_is_silent() {
        let mut monitor = PresenceMonitor::new();
        assert_eq!(monitor.observe(Vec::new()), None);
        assert_eq!(monitor.observe(Vec::new()), None);
        assert_eq!(monitor.session_count(), 0);
    }

    // ── full transition sequence ──────────────────────────────────────────

    #[test]
    fn test_transition_sequence_emits_exactly_two_events() {
        let mut monitor = PresenceMonitor::new();

        let polls: Vec<Vec<DeviceId>> = vec![
            Vec::new(),
            Vec::new(),
            serials(&["A"]),
            serials(&["A"]),
            Vec::new(),
        ];

        let events: Vec<DeviceEvent> = polls
            .into_iter()
            .filter_map(|poll| monitor.observe(poll))
            .collect();

        assert_eq!(
            events,
            vec![
                DeviceEvent::Connected(serials(&["A"])),
                DeviceEvent::Disconnected,
            ]
        );
    }

    #[test]
    fn test_reconnect_starts_new_session() {
        let mut monitor = PresenceMonitor::new();

        monitor.observe(serials(&["A"]));
        monitor.observe(Vec::new());
        let event = monitor.observe(serials(&["B"]));

        assert_eq!(event, Some(DeviceEvent::Connected(serials(&["B"]))));
        assert_eq!(monitor.session_count(), 2);
    }

    // ── history ───────────────────────────────────────────────────────────

    #[test]
    fn test_history_records_timestamps() {
        let mut monitor = PresenceMonitor::new();

        monitor.observe(serials(&["ABC123"]));
        assert_eq!(monitor.history().len(), 1);
        assert!(monitor.history()[0].disconnected_at.is_none());

        monitor.observe(Vec::new());
        let session = &monitor.history()[0];
        assert_eq!(session.serials, serials(&["ABC123"]));
        let disconnected_at = session.disconnected_at.expect("episode must be closed");
        assert!(disconnected_at >= session.connected_at);
    }

    // ── Default ───────────────────────────────────────────────────────────

    #[test]
    fn test_default_matches_new() {
        let monitor = PresenceMonitor::default();
        assert_eq!(monitor.state(), PresenceState::Absent);
    }
}
