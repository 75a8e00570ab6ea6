use serde::{Deserialize, Serialize};

pub const PAYMENT_DESCRIPTION: &str = "Pagamento via Pix";
pub const PAYMENT_METHOD: &str = "PIX";

/// Raw query parameters. Legacy frontend names are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayQuery {
    #[serde(alias = "acao")]
    pub action: Option<String>,
    #[serde(alias = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "telefone")]
    pub phone: Option<String>,
    #[serde(alias = "cpf")]
    pub document: Option<String>,
    #[serde(rename = "campaignTag", alias = "utm")]
    pub campaign_tag: Option<String>,
    #[serde(alias = "valor")]
    pub amount: Option<String>,
    #[serde(rename = "offerVariant", alias = "oferta")]
    pub offer_variant: Option<String>,
    #[serde(rename = "bonusTier", alias = "up")]
    pub bonus_tier: Option<String>,
    pub payment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub document: String,
    pub campaign_tag: Option<String>,
    /// Decimal string; normalized to minor units when the upstream body is built.
    pub amount: Option<String>,
    pub offer_variant: Option<String>,
    pub bonus_tier: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub payment_id: String,
}

// Payload sent to the payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamChargeBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm: Option<String>,
    pub item: Item,
    pub amount: i64,
    pub customer: Customer,
    pub description: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub price: i64,
    pub title: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub document: String,
}

impl UpstreamChargeBody {
    pub fn new(request: ChargeRequest, amount: i64, utm: Option<String>, title: String) -> Self {
        Self {
            utm,
            item: Item {
                price: amount,
                title,
                quantity: 1,
            },
            amount,
            customer: Customer {
                name: request.name,
                email: request.email,
                phone: request.phone,
                document: request.document,
            },
            description: PAYMENT_DESCRIPTION.to_string(),
            payment_method: PAYMENT_METHOD.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ChargeRequest {
        ChargeRequest {
            name: "Maria".to_string(),
            email: None,
            phone: "11999990000".to_string(),
            document: "12345678909".to_string(),
            campaign_tag: None,
            amount: Some("12.30".to_string()),
            offer_variant: None,
            bonus_tier: None,
        }
    }

    #[test]
    fn body_serializes_in_gateway_shape() {
        let body = UpstreamChargeBody::new(
            request(),
            1230,
            Some("utm_source=TT-1".to_string()),
            "Depósito".to_string(),
        );

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            json!({
                "utm": "utm_source=TT-1",
                "item": { "price": 1230, "title": "Depósito", "quantity": 1 },
                "amount": 1230,
                "customer": { "name": "Maria", "phone": "11999990000", "document": "12345678909" },
                "description": "Pagamento via Pix",
                "paymentMethod": "PIX"
            })
            .to_string()
        );
    }

    #[test]
    fn query_accepts_legacy_names() {
        let query: GatewayQuery = serde_json::from_value(json!({
            "acao": "criar",
            "nome": "Maria",
            "telefone": "11999990000",
            "cpf": "12345678909",
            "utm": "TT-1",
            "valor": "10",
            "oferta": "tiktok",
            "up": "2"
        }))
        .unwrap();

        assert_eq!(query.action.as_deref(), Some("criar"));
        assert_eq!(query.document.as_deref(), Some("12345678909"));
        assert_eq!(query.campaign_tag.as_deref(), Some("TT-1"));
        assert_eq!(query.bonus_tier.as_deref(), Some("2"));
    }
}
