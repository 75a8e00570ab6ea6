use crate::app::config::Config;
use crate::models::envelope::ClientResult;
use crate::models::payment::{ChargeRequest, GatewayQuery, UpstreamChargeBody};
use crate::services::campaign_tag;
use crate::services::error::{GatewayError, RequestError};
use crate::services::response_mapper::map_response;
use crate::services::upstream_client::UpstreamGateway;
use crate::services::validator::{validate, ValidRequest};
use crate::utils::money::{format_currency, to_minor_units};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct GatewayService {
    upstream: Arc<dyn UpstreamGateway>,
    config: Config,
}

impl GatewayService {
    pub fn new(config: Config, upstream: Arc<dyn UpstreamGateway>) -> Self {
        Self { upstream, config }
    }

    /// Validate, call upstream once, map. Every failure ends up as a `GatewayError`.
    pub async fn handle(&self, query: GatewayQuery) -> Result<ClientResult, GatewayError> {
        let result = self.dispatch(query).await;

        match &result {
            Ok(reply) if reply.is_failure() => warn!("upstream reported a failure"),
            Ok(_) => info!("request completed"),
            Err(GatewayError::Request(e)) => warn!(error = %e, "rejected request"),
            Err(GatewayError::Transport(e)) => error!(error = %e, "upstream call failed"),
        }

        result
    }

    async fn dispatch(&self, query: GatewayQuery) -> Result<ClientResult, GatewayError> {
        let request = validate(query)?;
        let action = request.action();
        info!(?action, "dispatching");

        let body = match request {
            ValidRequest::Create(charge) => {
                let upstream_body = self.build_charge_body(charge)?;
                self.upstream.create_charge(&upstream_body).await?
            }
            ValidRequest::Verify(status) => self.upstream.charge_status(&status.payment_id).await?,
        };

        Ok(map_response(action, &body))
    }

    pub fn build_charge_body(&self, request: ChargeRequest) -> Result<UpstreamChargeBody, RequestError> {
        let amount = to_minor_units(request.amount.as_deref())?;
        let utm = campaign_tag::canonicalize(request.campaign_tag.as_deref());
        let title = self.offer_title(request.offer_variant.as_deref(), request.bonus_tier);

        info!(amount = %format_currency(amount), %title, has_utm = utm.is_some(), "charge normalized");
        Ok(UpstreamChargeBody::new(request, amount, utm, title))
    }

    /// Bonus title only for the default offer with a non-zero tier.
    pub fn offer_title(&self, offer_variant: Option<&str>, bonus_tier: Option<i64>) -> String {
        let offer = offer_variant.unwrap_or(self.config.default_offer.as_str());

        match bonus_tier {
            Some(tier) if tier != 0 && offer == self.config.default_offer => {
                format!("{} {}", self.config.bonus_title, tier)
            }
            _ => self.config.front_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::envelope::{ChargeResult, StatusResult};
    use crate::services::error::UpstreamError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingUpstream {
        charges: Mutex<Vec<UpstreamChargeBody>>,
        lookups: Mutex<Vec<String>>,
        reply: Value,
    }

    #[async_trait]
    impl UpstreamGateway for RecordingUpstream {
        async fn create_charge(&self, body: &UpstreamChargeBody) -> Result<Value, UpstreamError> {
            self.charges.lock().unwrap().push(body.clone());
            Ok(self.reply.clone())
        }

        async fn charge_status(&self, payment_id: &str) -> Result<Value, UpstreamError> {
            self.lookups.lock().unwrap().push(payment_id.to_string());
            Ok(self.reply.clone())
        }
    }

    fn build_service(reply: Value) -> (GatewayService, Arc<RecordingUpstream>) {
        let upstream = Arc::new(RecordingUpstream {
            reply,
            ..RecordingUpstream::default()
        });
        (GatewayService::new(Config::default(), upstream.clone()), upstream)
    }

    fn charge_query() -> GatewayQuery {
        GatewayQuery {
            action: Some("create".to_string()),
            name: Some("Maria".to_string()),
            email: Some("maria@example.com".to_string()),
            phone: Some("11999990000".to_string()),
            document: Some("12345678909".to_string()),
            campaign_tag: Some("utm_source%3DTT-7".to_string()),
            amount: Some("12.3".to_string()),
            ..GatewayQuery::default()
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_forwards() {
        let (service, upstream) = build_service(json!({ "transactionId": "T1", "pixCode": "000201", "status": "pending" }));

        let result = service.handle(charge_query()).await.unwrap();
        assert!(matches!(result, ClientResult::Charge(ChargeResult::Created { .. })));

        let charges = upstream.charges.lock().unwrap();
        assert_eq!(charges.len(), 1);
        assert_eq!(charges[0].amount, 1230);
        assert_eq!(charges[0].item.price, 1230);
        assert_eq!(charges[0].item.title, "Depósito");
        assert_eq!(charges[0].utm.as_deref(), Some("utm_source=TT-7"));
        assert_eq!(charges[0].customer.email.as_deref(), Some("maria@example.com"));
    }

    #[tokio::test]
    async fn missing_fields_never_reach_upstream() {
        for field in ["name", "phone", "document"] {
            let (service, upstream) = build_service(json!({}));
            let mut query = charge_query();
            match field {
                "name" => query.name = None,
                "phone" => query.phone = None,
                _ => query.document = Some(String::new()),
            }

            let err = service.handle(query).await.unwrap_err();
            assert!(matches!(err, GatewayError::Request(RequestError::MissingFields(_))));
            assert!(upstream.charges.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn bad_amount_is_a_request_error() {
        let (service, upstream) = build_service(json!({}));
        let query = GatewayQuery {
            amount: Some("doze".to_string()),
            ..charge_query()
        };

        let err = service.handle(query).await.unwrap_err();
        assert!(matches!(err, GatewayError::Request(RequestError::InvalidAmount(_))));
        assert!(upstream.charges.lock().unwrap().is_empty());

        let query = GatewayQuery {
            amount: None,
            ..charge_query()
        };
        assert!(service.handle(query).await.is_err());
    }

    #[tokio::test]
    async fn verify_skips_normalization() {
        let (service, upstream) = build_service(json!({ "status": "paid" }));
        let query = GatewayQuery {
            action: Some("verify".to_string()),
            payment_id: Some("T1".to_string()),
            amount: Some("not a number".to_string()),
            ..GatewayQuery::default()
        };

        let result = service.handle(query).await.unwrap();
        assert_eq!(
            result,
            ClientResult::Status(StatusResult::Found { status: json!("paid") })
        );
        assert_eq!(*upstream.lookups.lock().unwrap(), vec!["T1".to_string()]);
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let (service, _) = build_service(json!({}));
        let query = GatewayQuery {
            action: Some("cancel".to_string()),
            ..charge_query()
        };

        let err = service.handle(query).await.unwrap_err();
        assert!(matches!(err, GatewayError::Request(RequestError::UnknownAction(_))));
    }

    #[test]
    fn bonus_title_only_for_default_offer() {
        let (service, _) = build_service(json!({}));
        assert_eq!(service.offer_title(None, None), "Depósito");
        assert_eq!(service.offer_title(None, Some(2)), "Depósito Bônus 2");
        assert_eq!(service.offer_title(Some("tiktok"), Some(3)), "Depósito Bônus 3");
        assert_eq!(service.offer_title(Some("tiktok"), Some(0)), "Depósito");
        assert_eq!(service.offer_title(Some("kwai"), Some(2)), "Depósito");
    }
}
