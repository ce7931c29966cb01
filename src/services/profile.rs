//! User profile client: `GET /user/profile/{id}`.

use async_trait::async_trait;

use super::{HttpEndpoint, ProfileService};
use crate::nutrition::UserProfile;
use crate::service_config::RecoveryConfig;
use crate::service_errors::ServiceError;

#[derive(Debug)]
pub struct ProfileClient {
    endpoint: HttpEndpoint,
}

impl ProfileClient {
    pub fn new(client: reqwest::Client, base_url: &str, recovery: &RecoveryConfig) -> Self {
        Self {
            endpoint: HttpEndpoint::new("profile", client, base_url, recovery),
        }
    }
}

#[async_trait]
impl ProfileService for ProfileClient {
    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ServiceError> {
        let mut url = reqwest::Url::parse(&self.endpoint.url("/user/profile"))
            .map_err(|e| ServiceError::Transport(format!("invalid profile URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Transport("profile URL cannot take a path".to_string()))?
            .push(user_id);

        let request = self.endpoint.client().get(url);
        self.endpoint.send_json("fetch_profile", request).await
    }
}
