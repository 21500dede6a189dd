mod bootstrap;

use anyhow::Result;
use monitor_adb::client::AdbClient;
use monitor_core::error::MonitorError;
use monitor_core::functions::UsbFunction;
use monitor_core::settings::Settings;
use monitor_runtime::orchestrator::WatchOrchestrator;
use monitor_runtime::presence::DeviceEvent;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Android USB Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Mode: {}, poll interval: {}s, settle delay: {}ms",
        settings.mode,
        settings.poll_interval,
        settings.settle_delay_ms
    );

    let program = bootstrap::discover_adb_program(settings.adb_path.as_deref())?;
    tracing::debug!(%program, "using adb executable");
    let client = AdbClient::new(program);

    match settings.mode.as_str() {
        "watch" => run_watch(&settings, client).await?,
        "list" => run_list(&settings, &client).await?,
        "set" => run_set(&settings, &client).await?,
        unknown => {
            eprintln!("Unknown mode: {}", unknown);
        }
    }

    Ok(())
}

/// Watch for presence transitions until Ctrl+C, printing each one.
async fn run_watch(settings: &Settings, client: AdbClient) -> Result<()> {
    tracing::info!("Starting device watch...");

    // Best-effort probe; a genuinely missing adb surfaces on the first poll.
    match client.version().await {
        Ok(version) => tracing::info!(%version, "adb client found"),
        Err(e) => tracing::warn!(error = %e, "adb version probe failed"),
    }

    let orchestrator = WatchOrchestrator::new(
        u64::from(settings.poll_interval),
        settings.settle_delay_ms,
        client,
    );
    let (rx, handle) = orchestrator.start();

    tokio::select! {
        _ = consume_events(rx) => {
            handle.abort();
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down watch task");
            handle.abort();
        }
    }

    Ok(())
}

/// Print transition events until the channel closes.
async fn consume_events(mut rx: mpsc::Receiver<DeviceEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            DeviceEvent::Connected(serials) => {
                println!("connected: {}", serials.join(", "));
            }
            DeviceEvent::Disconnected => {
                println!("disconnected");
            }
        }
    }
}

/// Print the current device list once and exit.
async fn run_list(settings: &Settings, client: &AdbClient) -> Result<()> {
    let entries = client.list_devices().await?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("no devices attached");
    } else {
        for entry in &entries {
            println!("{}\t{}", entry.serial, entry.state.as_str());
        }
    }

    Ok(())
}

/// Apply a USB function once and exit.
async fn run_set(settings: &Settings, client: &AdbClient) -> Result<()> {
    let Some(token) = settings.usb_function.as_deref() else {
        return Err(MonitorError::Config("set mode requires --usb-function".to_string()).into());
    };
    let function: UsbFunction = token.parse()?;

    // Same contract as the watch-mode switch: a rejected command is logged,
    // never fatal.
    match client
        .try_set_usb_function(settings.serial.as_deref(), function)
        .await
    {
        Ok(()) => println!("USB function set to {} ({})", function.label(), function),
        Err(e) => tracing::warn!(error = %e, "USB function switch failed"),
    }

    Ok(())
}
