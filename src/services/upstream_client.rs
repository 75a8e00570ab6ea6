use crate::app::config::Config;
use crate::models::payment::UpstreamChargeBody;
use crate::services::error::UpstreamError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde_json::Value;
use tracing::{debug, info};

/// The single payment API this gateway forwards to. Returns the parsed JSON
/// body whatever the HTTP status; interpreting it is the mapper's job.
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    async fn create_charge(&self, body: &UpstreamChargeBody) -> Result<Value, UpstreamError>;

    async fn charge_status(&self, payment_id: &str) -> Result<Value, UpstreamError>;
}

pub struct HttpUpstream {
    client: Client,
    url: String,
}

impl HttpUpstream {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.gateway_api_url.clone(),
        })
    }

    async fn read_json(response: Response) -> Result<Value, UpstreamError> {
        let status = response.status();
        let raw = response.text().await?;
        debug!(%status, bytes = raw.len(), "upstream responded");
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl UpstreamGateway for HttpUpstream {
    async fn create_charge(&self, body: &UpstreamChargeBody) -> Result<Value, UpstreamError> {
        info!(amount = body.amount, title = %body.item.title, "creating charge upstream");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn charge_status(&self, payment_id: &str) -> Result<Value, UpstreamError> {
        info!(payment_id, "checking charge status upstream");

        let response = self
            .client
            .get(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("transactionId", payment_id)])
            .send()
            .await?;

        Self::read_json(response).await
    }
}
