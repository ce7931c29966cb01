//! # Collaborator Client Tests
//!
//! Exercises the reqwest clients against a local one-shot HTTP responder:
//! request shape, response decoding, error bodies and the circuit breaker.


#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use nutricheck::config::AppConfig;
    use nutricheck::image_codec::ImageCodec;
    use nutricheck::service_config::RecoveryConfig;
    use nutricheck::service_errors::ServiceError;
    use nutricheck::services::{
        build_http_client, Collaborators, OcrClient, OcrService, ProductClient, ProductLookup,
        ProfileClient, ProfileService, SpeechClient, SpeechService,
    };
    use nutricheck::workflow::{Phase, Workflow};

    fn client() -> reqwest::Client {
        build_http_client(&RecoveryConfig::default()).expect("http client")
    }

    fn image() -> nutricheck::image_codec::ImagePayload {
        ImageCodec::default()
            .decode_data_url(&data_url(b"\xff\xd8\xff\xe0 jpeg bytes"))
            .expect("payload")
    }

    #[tokio::test]
    async fn test_ocr_posts_multipart_image() -> anyhow::Result<()> {
        let (base_url, requests) =
            spawn_responder(vec![(200, r#"{"extracted_text": "Nutella 400g"}"#.to_string())]).await;
        let ocr = OcrClient::new(client(), &base_url, &RecoveryConfig::default());

        assert_eq!(ocr.extract_text(image()).await?, "Nutella 400g");

        let requests = requests.await?;
        let request = &requests[0];
        assert!(request.starts_with("POST /upload-image "));
        assert!(request.to_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="image""#));
        assert!(request.contains(r#"filename="image.jpeg""#));
        assert!(request.contains("image/jpeg"));
        Ok(())
    }

    #[tokio::test]
    async fn test_ocr_without_text_is_malformed() -> anyhow::Result<()> {
        let (base_url, _requests) = spawn_responder(vec![
            (200, r#"{"message": "no text found"}"#.to_string()),
            (200, r#"{"extracted_text": "   "}"#.to_string()),
        ])
        .await;
        let ocr = OcrClient::new(client(), &base_url, &RecoveryConfig::default());

        assert!(matches!(ocr.extract_text(image()).await, Err(ServiceError::Malformed(_))));
        assert!(matches!(ocr.extract_text(image()).await, Err(ServiceError::Malformed(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_speech_posts_without_payload() -> anyhow::Result<()> {
        let (base_url, requests) = spawn_responder(vec![
            (200, r#"{"text": "Coca-Cola"}"#.to_string()),
            (200, r#"{"error": "Could not understand audio"}"#.to_string()),
        ])
        .await;
        let speech = SpeechClient::new(client(), &base_url, &RecoveryConfig::default());

        assert_eq!(speech.transcribe().await?, "Coca-Cola");
        assert!(matches!(speech.transcribe().await, Err(ServiceError::Malformed(_))));

        let requests = requests.await?;
        assert!(requests[0].starts_with("POST /speech-to-text "));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_lookup_uses_first_match() -> anyhow::Result<()> {
        let body = r#"{"products": [
            {"product_name": "Nutella", "nutri_score": "E", "eco_score": null,
             "nutritional_values": {"sugars": "56.3", "fat": 30.9}},
            {"product_name": "Nutella B-ready", "nutri_score": "D"}
        ]}"#;
        let (base_url, requests) = spawn_responder(vec![(200, body.to_string())]).await;
        let products = ProductClient::new(client(), &format!("{}/api", base_url), &RecoveryConfig::default());

        let record = products.lookup("Nutella 400g").await?;
        assert_eq!(record.product_name.as_deref(), Some("Nutella"));
        assert_eq!(record.nutri_score, "E");
        assert_eq!(record.eco_score, "N/A");
        assert_eq!(record.nutritional_values.get("sugars").and_then(|a| a.value), Some(56.3));

        let requests = requests.await?;
        assert!(requests[0].starts_with("GET /api/product?name=Nutella+400g "));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_error_body_is_surfaced() -> anyhow::Result<()> {
        let (base_url, _requests) = spawn_responder(vec![
            (500, r#"{"error": "service unavailable"}"#.to_string()),
            (200, r#"{"products": []}"#.to_string()),
        ])
        .await;
        let products = ProductClient::new(client(), &base_url, &RecoveryConfig::default());

        let err = products.lookup("Nutella").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Status {
                status: 500,
                message: Some("service unavailable".to_string())
            }
        );

        assert!(matches!(products.lookup("Nutella").await, Err(ServiceError::Malformed(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_path_and_not_found() -> anyhow::Result<()> {
        let (base_url, requests) = spawn_responder(vec![
            (200, r#"{"id": "42", "name": "Ada"}"#.to_string()),
            (404, r#"{"detail": "Not found"}"#.to_string()),
        ])
        .await;
        let profiles = ProfileClient::new(client(), &format!("{}/api", base_url), &RecoveryConfig::default());

        let profile = profiles.fetch_profile("42").await?;
        assert_eq!(profile.get("name"), Some(&serde_json::json!("Ada")));

        let err = profiles.fetch_profile("a b").await.unwrap_err();
        assert_eq!(err, ServiceError::Status { status: 404, message: None });

        let requests = requests.await?;
        assert!(requests[0].starts_with("GET /api/user/profile/42 "));
        assert!(requests[1].starts_with("GET /api/user/profile/a%20b "));
        Ok(())
    }

    #[tokio::test]
    async fn test_circuit_breaker_fails_fast() -> anyhow::Result<()> {
        let recovery = RecoveryConfig {
            circuit_breaker_threshold: 2,
            ..RecoveryConfig::default()
        };
        let (base_url, requests) = spawn_responder(vec![
            (503, "{}".to_string()),
            (503, "{}".to_string()),
        ])
        .await;
        let speech = SpeechClient::new(client(), &base_url, &recovery);

        for _ in 0..2 {
            assert!(matches!(speech.transcribe().await, Err(ServiceError::Status { status: 503, .. })));
        }
        assert!(matches!(speech.transcribe().await, Err(ServiceError::Unavailable(_))));
        assert_eq!(requests.await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_client_errors_do_not_open_breaker() -> anyhow::Result<()> {
        let recovery = RecoveryConfig {
            circuit_breaker_threshold: 1,
            ..RecoveryConfig::default()
        };
        let (base_url, _requests) = spawn_responder(vec![
            (404, "{}".to_string()),
            (200, r#"{"id": "7"}"#.to_string()),
        ])
        .await;
        let profiles = ProfileClient::new(client(), &base_url, &recovery);

        assert!(profiles.fetch_profile("7").await.is_err());
        assert!(profiles.fetch_profile("7").await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let ocr = OcrClient::new(client(), "http://127.0.0.1:9", &RecoveryConfig::default());
        let err = ocr.extract_text(image()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_) | ServiceError::Timeout(_)));
    }

    /// The lookup failure scenario end to end through the HTTP client
    #[tokio::test]
    async fn test_workflow_search_against_failing_service() -> anyhow::Result<()> {
        let (base_url, _requests) =
            spawn_responder(vec![(500, r#"{"error": "service unavailable"}"#.to_string())]).await;

        let mut config = AppConfig::default();
        config.services.product_url = base_url;
        let fakes = Fakes::new();
        let services = Collaborators::http(&config, fakes.camera.clone())?;
        let workflow = Workflow::new(services, ImageCodec::default());

        workflow.set_draft("Nutella");
        workflow.confirm()?;
        let err = workflow.search().await.unwrap_err();
        assert_eq!(err.user_message(), "service unavailable");

        let session = workflow.snapshot();
        assert_eq!(session.error_message(), Some("service unavailable"));
        assert!(session.record().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.phase(), Phase::Failed);
        Ok(())
    }
}
