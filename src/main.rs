//! conn-addons command line.
//!
//! Opens a connection over the in-process channel transport so the addon
//! layer can be driven by hand:
//!
//! ```text
//! conn-addons platform
//! conn-addons --log-file conn.log send --key greeting --data hello
//! conn-addons --config addons.toml watch --interval-secs 2
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;

use conn_addons::addons::binding::{Fallback, SinkBinding};
use conn_addons::config::watcher::ConfigWatcher;
use conn_addons::config::{load_config, AddonsConfig};
use conn_addons::diagnostics::{LogFormat, Severity};
use conn_addons::lifecycle::{signals, Shutdown};
use conn_addons::net::{ChannelTransport, Connection, Packet, Platform};
use conn_addons::observability::{logging, metrics};
use conn_addons::AddonHost;

#[derive(Parser)]
#[command(name = "conn-addons")]
#[command(about = "Drive connection addons: diagnostics sinks, platform probe, raw data sends", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append connection diagnostics to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Diagnostic line format (text or json).
    #[arg(long)]
    format: Option<LogFormat>,

    /// Start with connection diagnostics disabled.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what the platform probe reports for this host
    Platform,
    /// Send one raw data packet; omit --data to exercise the missing payload path
    Send {
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Keep a connection open, send heartbeats and hot-reload logging settings
    Watch {
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },
}

/// Command line settings that win over the config file, also after reloads.
#[derive(Clone)]
struct Overrides {
    log_file: Option<PathBuf>,
    format: Option<LogFormat>,
    quiet: bool,
}

impl Overrides {
    fn apply(&self, config: &mut AddonsConfig) {
        if let Some(path) = &self.log_file {
            config.logging.sink_path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(format) = self.format {
            config.logging.format = format;
        }
        if self.quiet {
            config.logging.enabled = Some(false);
        }
    }
}

#[derive(Serialize)]
struct PlatformReport {
    platform: Platform,
    is_linux: bool,
    is_windows: bool,
    is_macos: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AddonsConfig::default(),
    };
    let overrides = Overrides {
        log_file: cli.log_file.clone(),
        format: cli.format,
        quiet: cli.quiet,
    };
    let mut config = file_config.clone();
    overrides.apply(&mut config);

    logging::init_tracing(&config.observability)?;
    tracing::debug!(
        logging_enabled = config.logging.resolved_enabled(),
        format = ?config.logging.format,
        sink_path = ?config.logging.sink_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Platform => print_platform()?,
        Commands::Send { key, data } => send_once(&config, &key, data.as_deref())?,
        Commands::Watch { interval_secs } => {
            watch(config, file_config, overrides, cli.config.as_deref(), interval_secs).await?
        }
    }

    Ok(())
}

fn print_platform() -> Result<(), Box<dyn Error>> {
    let platform = Platform::current();
    let report = PlatformReport {
        platform,
        is_linux: platform.is_linux(),
        is_windows: platform.is_windows(),
        is_macos: platform.is_macos(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn send_once(config: &AddonsConfig, key: &str, data: Option<&str>) -> Result<(), Box<dyn Error>> {
    let (transport, mut packets) = ChannelTransport::new();
    let conn = Connection::new(transport, &config.logging);
    let mut binding = SinkBinding::new(Fallback::Stderr);
    binding.apply(&conn, &config.logging)?;

    conn.send_raw_data(key, data.map(str::as_bytes))?;
    conn.close();

    print_sent(&mut packets)
}

async fn watch(
    config: AddonsConfig,
    file_config: AddonsConfig,
    overrides: Overrides,
    config_path: Option<&Path>,
    interval_secs: u64,
) -> Result<(), Box<dyn Error>> {
    let (transport, mut packets) = ChannelTransport::new();
    let conn = Connection::new(transport, &config.logging);
    let mut binding = SinkBinding::new(Fallback::Stderr);
    binding.apply(&conn, &config.logging)?;

    // The watcher must stay alive for the whole loop.
    let (_watcher, mut updates) = match config_path {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path, file_config);
            (Some(watcher.run()?), Some(rx))
        }
        None => (None, None),
    };

    let shutdown = Shutdown::new();
    let mut shutdown_rx = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut seq: u64 = 0;

    tracing::info!(connection_id = %conn.id(), interval_secs, "Heartbeat loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                seq += 1;
                conn.send_raw_data("heartbeat", Some(&seq.to_be_bytes()))?;
                print_sent(&mut packets)?;
            }
            Some(mut reloaded) = next_update(&mut updates) => {
                overrides.apply(&mut reloaded);
                match binding.apply(&conn, &reloaded.logging) {
                    Ok(()) => conn.logger().log("Logging configuration reloaded", None, Severity::Information),
                    Err(e) => tracing::error!(error = %e, "Failed to apply reloaded logging configuration"),
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }

    conn.close();
    tracing::info!(heartbeats = seq, "Shutdown complete");
    Ok(())
}

async fn next_update(updates: &mut Option<mpsc::UnboundedReceiver<AddonsConfig>>) -> Option<AddonsConfig> {
    match updates {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn print_sent(packets: &mut mpsc::UnboundedReceiver<Packet>) -> Result<(), Box<dyn Error>> {
    while let Ok(packet) = packets.try_recv() {
        println!("{}", serde_json::to_string(&packet)?);
    }
    Ok(())
}
