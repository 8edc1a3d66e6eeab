//! tapcast CLI — user-facing binary for the touchscreen-to-pointer relay.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tapcast_input::{NoopHaptics, TouchSurface};
use tapcast_relay::{setup, Config, Relay, RelayEvent};
use tapcast_transport::{HttpEmitter, IntentEmitter};

#[derive(Parser)]
#[command(
    name = "tapcast",
    about = "Turn a touchscreen into a remote pointer and keyboard",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay against the configured remote host.
    Run {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Query the remote host's screen size and pointer position.
    Status {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// List candidate touchscreen devices.
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = setup::load_config(config.as_deref())?;
            init_tracing(&config);
            run_relay(config).await
        }
        Commands::Status { config } => {
            let config = setup::load_config(config.as_deref())?;
            init_tracing(&config);
            let emitter = HttpEmitter::new(&config.relay.server_url)?;
            let size = emitter.screen_size().await?;
            let position = emitter.pointer_position().await?;
            println!("Server:  {}", config.relay.server_url);
            println!("Screen:  {size}");
            println!("Pointer: {position}");
            Ok(())
        }
        Commands::Devices => {
            list_devices();
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.relay.log_level)),
        )
        .init();
}

async fn run_relay(config: Config) -> anyhow::Result<()> {
    tracing::info!(server = %config.relay.server_url, "starting tapcast relay");

    let emitter: Arc<dyn IntentEmitter> = Arc::new(HttpEmitter::new(&config.relay.server_url)?);
    let surface = make_surface(&config)?;
    let mut relay = Relay::new(config, surface, emitter, Arc::new(NoopHaptics));

    // Ctrl-C translates into a clean shutdown event.
    let shutdown = relay.event_sender();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("interrupt received");
        let _ = shutdown.send(RelayEvent::Shutdown).await;
    });

    relay.run().await?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn make_surface(config: &Config) -> anyhow::Result<Box<dyn TouchSurface>> {
    let path = config.input.device.as_ref().map(std::path::PathBuf::from);
    Ok(Box::new(tapcast_input::EvdevTouchscreen::new(
        path,
        tapcast_input::MonotonicClock::new(),
    )))
}

#[cfg(not(target_os = "linux"))]
fn make_surface(_config: &Config) -> anyhow::Result<Box<dyn TouchSurface>> {
    anyhow::bail!("touch capture is only available on Linux")
}

#[cfg(target_os = "linux")]
fn list_devices() {
    let devices = tapcast_input::linux::enumerate_touchscreens();
    if devices.is_empty() {
        println!("No touchscreen devices found.");
        return;
    }
    for (path, name) in devices {
        println!("{}  {name}", path.display());
    }
}

#[cfg(not(target_os = "linux"))]
fn list_devices() {
    eprintln!("device enumeration is only available on Linux");
}
