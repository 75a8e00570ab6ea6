use std::str::FromStr;

use crate::models::payment::{ChargeRequest, GatewayQuery, StatusRequest};
use crate::services::error::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Verify,
}

impl FromStr for Action {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" | "criar" => Ok(Action::Create),
            "verify" | "verificar" => Ok(Action::Verify),
            other => Err(RequestError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidRequest {
    Create(ChargeRequest),
    Verify(StatusRequest),
}

impl ValidRequest {
    pub fn action(&self) -> Action {
        match self {
            ValidRequest::Create(_) => Action::Create,
            ValidRequest::Verify(_) => Action::Verify,
        }
    }
}

/// Checks the action selector and the fields it requires.
pub fn validate(mut query: GatewayQuery) -> Result<ValidRequest, RequestError> {
    let action: Action = present(query.action.take())
        .ok_or(RequestError::MissingAction)?
        .parse()?;

    match action {
        Action::Create => validate_charge(query).map(ValidRequest::Create),
        Action::Verify => {
            let payment_id = present(query.payment_id)
                .ok_or_else(|| RequestError::MissingFields(vec!["payment_id"]))?;
            Ok(ValidRequest::Verify(StatusRequest { payment_id }))
        }
    }
}

fn validate_charge(query: GatewayQuery) -> Result<ChargeRequest, RequestError> {
    let name = present(query.name);
    let phone = present(query.phone);
    let document = present(query.document);

    match (name, phone, document) {
        (Some(name), Some(phone), Some(document)) => Ok(ChargeRequest {
            name,
            email: present(query.email),
            phone,
            document,
            campaign_tag: query.campaign_tag,
            amount: query.amount,
            offer_variant: present(query.offer_variant),
            bonus_tier: query.bonus_tier.as_deref().and_then(parse_leading_int),
        }),
        (name, phone, document) => {
            let missing = [("name", name.is_none()), ("phone", phone.is_none()), ("document", document.is_none())]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
            Err(RequestError::MissingFields(missing))
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Leading integer of a string ("3", " 3x", "-2") like the frontend's parseInt.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(|c: char| c == '-' || c == '+'));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    trimmed[..sign_len + digits_len].parse().ok()
}
