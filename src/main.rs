//! Main entry point for the activity roster service
//!
//! Loads configuration, seeds the roster, serves the HTTP API and shuts
//! down gracefully on SIGINT/SIGTERM.

use activity_roster::config::{validate_config, AppConfig};
use activity_roster::service::AppState;
use activity_roster::web::HttpServer;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Activity Roster Service - extracurricular signups for Mergington High School
#[derive(Parser)]
#[command(
    name = "activity-roster",
    version,
    about = "Signup service for school extracurricular activities",
    long_about = "Activity Roster keeps an in-memory roster of school activities and serves \
                 endpoints to list activities, sign students up and unregister them. State \
                 is reset to the seed data on every restart."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP host override
    #[arg(long, value_name = "HOST", help = "Override HTTP bind host")]
    host: Option<String>,

    /// HTTP port override
    #[arg(short, long, value_name = "PORT", help = "Override HTTP server port")]
    port: Option<u16>,

    /// Static directory override
    #[arg(long, value_name = "DIR", help = "Directory served under /static")]
    static_dir: Option<PathBuf>,

    /// Seed file override
    #[arg(long, value_name = "FILE", help = "Seed the roster from a TOML file")]
    seed_file: Option<PathBuf>,

    /// Enforce activity capacity
    #[arg(long, help = "Reject signups once an activity reaches max_participants")]
    enforce_capacity: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and seed data, then exit without serving"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🚀 Activity Roster Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Listen: http://{}", config.bind_address());
    info!("   Static dir: {}", config.http.static_dir.display());
    match &config.roster.seed_file {
        Some(path) => info!("   Seed: {}", path.display()),
        None => info!("   Seed: built-in"),
    }
    info!("   Capacity enforcement: {}", config.roster.enforce_capacity);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(host) = &args.host {
        config.http.host = host.clone();
    }

    if let Some(port) = args.port {
        config.http.port = port;
    }

    if let Some(static_dir) = &args.static_dir {
        config.http.static_dir = static_dir.clone();
    }

    if let Some(seed_file) = &args.seed_file {
        config.roster.seed_file = Some(seed_file.clone());
    }

    if args.enforce_capacity {
        config.roster.enforce_capacity = true;
    }

    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        info!("Configuration and seed validation successful");
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    if let Err(e) = app_state.start().await {
        error!("Failed to start service: {}", e);
        std::process::exit(1);
    }

    let server = Arc::new(HttpServer::new(app_state.clone()));
    let server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("✅ Activity Roster Service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("🛑 Shutdown signal received, beginning graceful shutdown...");
        }
        result = server_task => {
            match result {
                Ok(Ok(())) => warn!("HTTP server exited unexpectedly"),
                Ok(Err(e)) => error!("HTTP server failed: {:#}", e),
                Err(e) => error!("HTTP server task panicked: {}", e),
            }
            app_state.shutdown().await?;
            std::process::exit(1);
        }
    }

    server.stop();

    match tokio::time::timeout(config.shutdown_timeout(), app_state.shutdown()).await {
        Ok(Ok(())) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Err(e)) => warn!("Shutdown completed with errors: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Activity Roster Service stopped");
    Ok(())
}
