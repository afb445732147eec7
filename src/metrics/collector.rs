//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the activity roster service
//! using Prometheus metrics.

use crate::types::Activity;
use anyhow::Result;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the roster service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Roster-related metrics
    roster_metrics: RosterMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// HTTP requests by route and status code
    pub http_requests_total: IntCounterVec,
}

/// Roster-related metrics
#[derive(Clone)]
pub struct RosterMetrics {
    /// Signup/unregister attempts by outcome
    pub operations_total: IntCounterVec,

    /// Current participants per activity
    pub participants: IntGaugeVec,

    /// Number of activities in the roster
    pub activities: IntGauge,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Roster operation durations
    pub operation_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let roster_metrics = RosterMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            roster_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get roster metrics
    pub fn roster(&self) -> &RosterMetrics {
        &self.roster_metrics
    }

    /// Publish the participant counts of a freshly seeded roster
    pub fn record_roster_loaded(&self, activities: &[Activity]) {
        self.roster_metrics.activities.set(activities.len() as i64);

        for activity in activities {
            self.set_participants(&activity.name, activity.participants.len());
        }
    }

    /// Record a signup or unregister attempt
    pub fn record_operation(&self, operation: &str, outcome: &str, duration: Duration) {
        self.roster_metrics
            .operations_total
            .with_label_values(&[operation, outcome])
            .inc();

        self.performance_metrics
            .operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Set the current participant count of an activity
    pub fn set_participants(&self, activity: &str, count: usize) {
        self.roster_metrics
            .participants
            .with_label_values(&[activity])
            .set(count as i64);
    }

    /// Record a served HTTP request
    pub fn record_http_request(&self, route: &str, status: u16) {
        let status = status.to_string();
        self.service_metrics
            .http_requests_total
            .with_label_values(&[route, status.as_str()])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update uptime
    pub fn update_uptime(&self, uptime: Duration) {
        self.service_metrics
            .uptime_seconds
            .set(uptime.as_secs() as i64);
    }

    /// Number of recorded operations with the given outcome
    pub fn operation_count(&self, operation: &str, outcome: &str) -> u64 {
        self.roster_metrics
            .operations_total
            .with_label_values(&[operation, outcome])
            .get()
    }

    /// Last published participant count of an activity
    pub fn participants(&self, activity: &str) -> i64 {
        self.roster_metrics
            .participants
            .with_label_values(&[activity])
            .get()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("activity_roster_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "activity_roster_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "activity_roster_http_requests_total",
                "Total HTTP requests served",
            ),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            http_requests_total,
        })
    }
}

impl RosterMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let operations_total = IntCounterVec::new(
            Opts::new(
                "activity_roster_operations_total",
                "Total roster operations by outcome",
            ),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(operations_total.clone()))?;

        let participants = IntGaugeVec::new(
            Opts::new(
                "activity_roster_participants",
                "Current participants per activity",
            ),
            &["activity"],
        )?;
        registry.register(Box::new(participants.clone()))?;

        let activities = IntGauge::new(
            "activity_roster_activities",
            "Number of activities in the roster",
        )?;
        registry.register(Box::new(activities.clone()))?;

        Ok(Self {
            operations_total,
            participants,
            activities,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "activity_roster_operation_duration_seconds",
                "Roster operation duration",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self { operation_duration })
    }
}
