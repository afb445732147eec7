//! Metrics and monitoring for the activity roster service
//!
//! This module provides Prometheus metrics collection for roster
//! operations and HTTP traffic.

pub mod collector;

pub use collector::{MetricsCollector, PerformanceMetrics, RosterMetrics, ServiceMetrics};

use prometheus::{Encoder, TextEncoder};

/// Render every metric in a collector's registry in Prometheus text format
pub fn encode_metrics(collector: &MetricsCollector) -> anyhow::Result<(String, String)> {
    let metric_families = collector.registry().gather();
    let encoder = TextEncoder::new();

    let body = encoder
        .encode_to_string(&metric_families)
        .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))?;

    Ok((encoder.format_type().to_string(), body))
}
