//! Health checks for the activity roster service
//!
//! Liveness, readiness and a detailed report combining component checks
//! with roster statistics.

use crate::roster::RosterStats;
use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Gauge value for the metrics collector
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since the service state was created
    pub uptime_seconds: u64,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Roster statistics, when the roster is readable
    pub stats: Option<RosterStats>,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl HealthCheck {
    /// Perform a full health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let mut checks = Vec::new();

        let service_check = Self::check_service_running(&app_state).await;
        let mut overall_status = service_check.status.clone();
        checks.push(service_check);

        let (roster_check, stats) = Self::check_roster(&app_state);
        match roster_check.status {
            HealthStatus::Unhealthy => overall_status = HealthStatus::Unhealthy,
            HealthStatus::Degraded if overall_status == HealthStatus::Healthy => {
                overall_status = HealthStatus::Degraded
            }
            _ => {}
        }
        checks.push(roster_check);

        app_state
            .metrics_collector()
            .update_health_status(overall_status.as_gauge());

        Ok(HealthCheck {
            status: overall_status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            uptime_seconds: app_state.uptime().as_secs(),
            checks,
            stats,
        })
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Readiness check - verify service can handle requests
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        Ok(Self::check_roster(&app_state).0.status)
    }

    /// Check if service is running
    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Check that the roster can be read and no activity is oversubscribed
    fn check_roster(app_state: &AppState) -> (ComponentCheck, Option<RosterStats>) {
        let start = std::time::Instant::now();

        let (status, message, stats) = match app_state.roster().stats() {
            Ok(stats) if stats.over_capacity > 0 => (
                HealthStatus::Degraded,
                Some(format!(
                    "{} activities are over capacity",
                    stats.over_capacity
                )),
                Some(stats),
            ),
            Ok(stats) => (HealthStatus::Healthy, None, Some(stats)),
            Err(e) => {
                error!("Roster stats check failed: {}", e);
                (HealthStatus::Unhealthy, Some(e.to_string()), None)
            }
        };

        let check = ComponentCheck {
            name: "roster".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        (check, stats)
    }

    /// Convert health check to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn create_state() -> Arc<AppState> {
        Arc::new(AppState::new(AppConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_not_running_is_unhealthy() {
        let state = create_state();

        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.checks.len(), 2);

        assert_eq!(
            HealthCheck::liveness_check(state.clone()).await.unwrap(),
            HealthStatus::Unhealthy
        );
        assert_eq!(
            HealthCheck::readiness_check(state).await.unwrap(),
            HealthStatus::Unhealthy
        );
    }

    #[tokio::test]
    async fn test_running_is_healthy() {
        let state = create_state();
        state.start().await.unwrap();

        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.service, "activity-roster");

        let stats = health.stats.clone().unwrap();
        assert_eq!(stats.participants, 18);
        assert_eq!(state.metrics_collector().service().health_status.get(), 2);

        let json = health.to_json().unwrap();
        assert!(json.contains("\"status\": \"healthy\""));

        assert_eq!(
            HealthCheck::readiness_check(state.clone()).await.unwrap(),
            HealthStatus::Healthy
        );
        state.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_oversubscribed_activity_is_degraded() {
        let state = create_state();
        state.start().await.unwrap();

        // Math Olympiad seats 10; capacity is advisory by default
        for i in 0..9 {
            state
                .roster()
                .signup("Math Olympiad", &format!("mathlete{}@mergington.edu", i))
                .unwrap();
        }

        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.stats.unwrap().over_capacity, 1);
        assert!(health.checks[1]
            .message
            .as_deref()
            .unwrap()
            .contains("over capacity"));
        assert_eq!(state.metrics_collector().service().health_status.get(), 1);

        assert_eq!(
            HealthCheck::readiness_check(state.clone()).await.unwrap(),
            HealthStatus::Degraded
        );
        assert_eq!(
            HealthCheck::liveness_check(state.clone()).await.unwrap(),
            HealthStatus::Healthy
        );
        state.shutdown().await.unwrap();
    }
}
