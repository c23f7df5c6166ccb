//! `sonarscope` – SonarScope station binary
//!
//! This binary is the entry point for the radar station.  It:
//!
//! 1. Loads `~/.sonarscope/config.toml` (writing the defaults on first run).
//! 2. Builds the servo bank and rangefinder; without real hardware attached
//!    the station runs on the simulated rig so the console always has a live
//!    sweep to show.
//! 3. Spawns the sweep task and the HTTP console, wired together by the
//!    snapshot watch channel.
//! 4. Intercepts **Ctrl-C** to stop both tasks between steps and exit
//!    cleanly.

mod config;

use std::sync::Arc;

use colored::Colorize;
use tokio::sync::watch;
use tracing::{error, warn};

use sonarscope_console::{ConsoleServer, StatusService};
use sonarscope_hal::sim::SimRig;
use sonarscope_sweep::{Clock, SweepController, SystemClock};

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set SONARSCOPE_LOG_FORMAT=json to emit newline-delimited JSON logs
    // suitable for log aggregators.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("SONARSCOPE_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run: defaults written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Error saving config".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    // ── Hardware rig ──────────────────────────────────────────────────────
    let (bank, rangefinder) = SimRig::new().build();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (controller, snapshots) =
        match SweepController::new(cfg.sweep_config(), bank, rangefinder, clock) {
            Ok(built) => built,
            Err(e) => {
                error!(error = %e, "invalid sweep configuration");
                println!("{}: {}", "Invalid sweep configuration".red(), e);
                std::process::exit(1);
            }
        };

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ctrlc_tx = shutdown_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!(
            "{}",
            "⚠  Ctrl-C received – stopping sweep and console …"
                .yellow()
                .bold()
        );
        let _ = ctrlc_tx.send(true);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── Tasks ─────────────────────────────────────────────────────────────
    let sweep_task = tokio::spawn(controller.run(shutdown_rx.clone()));

    let console = ConsoleServer::new(StatusService::new(snapshots)).with_port(cfg.console_port);
    println!(
        "  Radar viewer at {}",
        format!("http://localhost:{}", cfg.console_port).bold().cyan()
    );
    println!();
    let console_task = tokio::spawn(console.run(shutdown_rx));

    if let Err(e) = sweep_task.await {
        error!(error = %e, "sweep task panicked");
    }
    match console_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "console server failed"),
        Err(e) => error!(error = %e, "console task panicked"),
    }

    println!("{}", "  ✓ SonarScope stopped.".green());
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   ____                       ____"#.bold().cyan());
    println!("{}", r#"  / __/__  ___  ___ _____    / __/______  ___  ___"#.bold().cyan());
    println!("{}", r#" _\ \/ _ \/ _ \/ _ `/ __/   _\ \/ __/ _ \/ _ \/ -_)"#.bold().cyan());
    println!("{}", r#"/___/\___/_//_/\_,_/_/     /___/\__/\___/ .__/\__/"#.bold().cyan());
    println!("{}", r#"                                       /_/"#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "SonarScope".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Servo-Swept Ultrasonic Radar Station");
    println!();
}
