//! Product lookup client: `GET /product?name=`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{HttpEndpoint, ProductLookup};
use crate::nutrition::NutritionRecord;
use crate::service_config::RecoveryConfig;
use crate::service_errors::ServiceError;

#[derive(Debug, Deserialize)]
struct ProductSearchResponse {
    #[serde(default)]
    products: Vec<NutritionRecord>,
}

#[derive(Debug)]
pub struct ProductClient {
    endpoint: HttpEndpoint,
}

impl ProductClient {
    pub fn new(client: reqwest::Client, base_url: &str, recovery: &RecoveryConfig) -> Self {
        Self {
            endpoint: HttpEndpoint::new("product", client, base_url, recovery),
        }
    }
}

#[async_trait]
impl ProductLookup for ProductClient {
    /// Only the first match is used
    async fn lookup(&self, name: &str) -> Result<NutritionRecord, ServiceError> {
        let request = self
            .endpoint
            .client()
            .get(self.endpoint.url("/product"))
            .query(&[("name", name)]);

        let response: ProductSearchResponse = self.endpoint.send_json("lookup", request).await?;
        response
            .products
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Malformed("response has no products".to_string()))
    }
}
