//! Main application state and service coordination
//!
//! `AppState` owns the roster store, the metrics collector and the
//! background maintenance task. It is built once at startup and shared with
//! the HTTP handlers; tests build one per test for isolation.

use crate::config::{validate_config, AppConfig};
use crate::metrics::MetricsCollector;
use crate::roster::{FileSeedProvider, RosterStore, SeedProvider, StaticSeedProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// The activity roster
    roster: RosterStore,

    /// Metrics collector shared with the roster and HTTP layer
    metrics_collector: Arc<MetricsCollector>,

    /// Process start, for uptime reporting
    started_at: Instant,

    /// Background task handles
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application, seeding the roster from the configured source
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        let provider: Box<dyn SeedProvider> = match &config.roster.seed_file {
            Some(path) => Box::new(FileSeedProvider::new(path)),
            None => Box::new(StaticSeedProvider::new()),
        };

        Self::with_seed_provider(config, provider.as_ref())
    }

    /// Initialize the application with an explicit seed provider
    pub fn with_seed_provider(
        config: AppConfig,
        provider: &dyn SeedProvider,
    ) -> Result<Self, ServiceError> {
        info!("Initializing {} service", config.service.name);

        validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics_collector =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let roster = RosterStore::from_provider(provider)
            .map_err(|e| ServiceError::Initialization {
                message: format!("Failed to seed roster from {}: {:#}", provider.source(), e),
            })?
            .with_capacity_enforcement(config.roster.enforce_capacity)
            .with_metrics(metrics_collector.clone());

        if config.roster.enforce_capacity {
            info!("Capacity enforcement enabled");
        }

        Ok(Self {
            config,
            roster,
            metrics_collector,
            started_at: Instant::now(),
            background_tasks: Mutex::new(Vec::new()),
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Mark the service running and start background maintenance
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Starting {} service", self.config.service.name);

        *self.is_running.write().await = true;
        self.start_background_tasks().await;

        info!("✅ {} service started", self.config.service.name);
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of {}", self.config.service.name);

        *self.is_running.write().await = false;
        self.stop_background_tasks().await;

        let final_stats = self
            .roster
            .stats()
            .map_err(|e| ServiceError::BackgroundTask {
                message: format!("Failed to get final stats: {}", e),
            })?;

        info!("Final roster statistics: {:?}", final_stats);
        info!("✅ {} shutdown completed", self.config.service.name);
        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the roster store
    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// Get the metrics collector
    pub fn metrics_collector(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Start background maintenance tasks
    async fn start_background_tasks(&self) {
        let interval_duration = self.config.maintenance_interval();
        info!(
            "Starting roster maintenance task ({}s interval)...",
            interval_duration.as_secs()
        );

        let roster = self.roster.clone();
        let metrics = self.metrics_collector.clone();
        let is_running = self.is_running.clone();
        let started_at = self.started_at;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval_duration);

            loop {
                interval.tick().await;

                if !*is_running.read().await {
                    debug!("Maintenance task stopping: service no longer running");
                    break;
                }

                metrics.update_uptime(started_at.elapsed());

                match roster.stats() {
                    Ok(stats) => {
                        let gauge = if stats.over_capacity > 0 { 1 } else { 2 };
                        metrics.update_health_status(gauge);
                        debug!(
                            "Roster stats - activities: {}, participants: {}, signups: {}, unregistrations: {}",
                            stats.activities, stats.participants, stats.signups, stats.unregistrations
                        );
                    }
                    Err(e) => {
                        metrics.update_health_status(0);
                        error!("Failed to read roster stats: {}", e);
                    }
                }
            }
        });

        self.background_tasks.lock().await.push(handle);
    }

    /// Stop background tasks
    async fn stop_background_tasks(&self) {
        let mut tasks = self.background_tasks.lock().await;
        info!("Stopping {} background tasks...", tasks.len());

        for handle in tasks.drain(..) {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Background task ended with error: {}", e);
                }
            }
        }
    }
}
