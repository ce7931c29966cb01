//! Observability module for centralized metrics and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and output format
//! - A Prometheus metrics recorder rendered on demand by the host
//! - Recording functions for workflow and collaborator events

pub mod metrics;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

pub use self::metrics::{
    record_acquisition, record_circuit_breaker_open, record_collaborator_request, record_lookup,
};

/// Initialize logging and, when enabled, the metrics recorder
///
/// Returns the Prometheus handle so the host can render the current snapshot.
pub fn init_observability_with_config(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    let handle = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        metrics_enabled = config.enable_metrics,
        "Observability initialized"
    );
    Ok(handle)
}

/// Initialize structured logging with tracing and configuration
///
/// Logs go to stderr; stdout belongs to the host's own output.
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("nutricheck={}", config.log_level.to_lowercase()).parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    // Pretty for development, JSON for others
    if config.is_development() || config.pretty_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    Ok(())
}

/// Install the global Prometheus recorder without an HTTP listener
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;
    self::metrics::describe_metrics();
    Ok(handle)
}
