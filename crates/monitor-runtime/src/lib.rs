//! Watch runtime for the Android USB monitor.
//!
//! Combines the retrying [`poller::DevicePoller`] with the
//! [`presence::PresenceMonitor`] state machine inside an async
//! [`orchestrator::WatchOrchestrator`] loop, delivering connect/disconnect
//! events through an `mpsc` channel.

pub mod orchestrator;
pub mod poller;
pub mod presence;

pub use monitor_adb as adb;
pub use monitor_core as core;
