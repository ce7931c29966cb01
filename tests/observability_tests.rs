//! # Observability Tests Module
//!
//! Metrics recording, structured logging and observability configuration.

#[cfg(test)]
mod tests {
    use nutricheck::observability;
    use nutricheck::observability_config::ObservabilityConfig;
    use std::time::Duration;

    /// Recording functions are safe to call without an installed recorder
    #[test]
    fn test_metrics_recording() {
        observability::record_acquisition("upload", "applied");
        observability::record_acquisition("camera", "ignored");
        observability::record_acquisition("speech", "discarded");
        observability::record_collaborator_request("ocr", true, Duration::from_millis(120));
        observability::record_collaborator_request("product", false, Duration::from_secs(2));
        observability::record_lookup(true, Duration::from_millis(80));
        observability::record_circuit_breaker_open("speech");
    }

    #[test]
    fn test_metrics_description_without_recorder() {
        observability::metrics::describe_metrics();
    }

    /// Test structured logging with the fields the workflow emits
    #[test]
    fn test_structured_logging_output() {
        use tracing::{debug, info, warn};

        debug!(generation = 3_u64, channel = "upload", "Superseded acquisition result discarded");
        info!(product = "Nutella 400g", "Looking up product");
        warn!(
            service = "product",
            operation = "lookup",
            duration_ms = 150,
            "Collaborator request failed"
        );
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(observability::init_observability_with_config(&config).is_err());
    }

    #[test]
    fn test_default_configuration_is_development() {
        let config = ObservabilityConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    /// Recording from many tasks at once
    #[tokio::test]
    async fn test_concurrent_metrics_recording() {
        let mut handles = vec![];

        for i in 0..10 {
            handles.push(tokio::spawn(async move {
                observability::record_acquisition("upload", if i % 2 == 0 { "applied" } else { "discarded" });
                observability::record_lookup(i % 3 != 0, Duration::from_millis(i * 10));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
