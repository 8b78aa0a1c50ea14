use crate::domain::ports::MessagingGateway;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::json;

/// Evolution API text-message gateway.
pub struct EvolutionGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EvolutionGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MessagingGateway for EvolutionGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<bool> {
        let response = self
            .client
            .post(format!("{}/message/sendText", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "number": recipient, "text": text }))
            .send()
            .await?;
        Ok(response.status() == reqwest::StatusCode::OK)
    }
}
