use serde::Serialize;
use serde_json::Value;

/// Failure shape shared by every client-facing error: `{ erro: 1, erroMsg, erroCode?, detalhes? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub erro: u8,
    #[serde(rename = "erroMsg")]
    pub erro_msg: String,
    #[serde(rename = "erroCode", skip_serializing_if = "Option::is_none")]
    pub erro_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            erro: 1,
            erro_msg: message.into(),
            erro_code: None,
            detalhes: None,
        }
    }

    pub fn with_code(mut self, code: Option<Value>) -> Self {
        self.erro_code = code;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.detalhes = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChargeResult {
    Created {
        payment_id: Value,
        #[serde(rename = "pixCode", skip_serializing_if = "Option::is_none")]
        pix_code: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<Value>,
    },
    Failed(ErrorEnvelope),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusResult {
    Found { status: Value },
    Failed(ErrorEnvelope),
}

/// Anything the dispatcher answers with HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientResult {
    Charge(ChargeResult),
    Status(StatusResult),
}

impl ClientResult {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ClientResult::Charge(ChargeResult::Failed(_)) | ClientResult::Status(StatusResult::Failed(_))
        )
    }
}
