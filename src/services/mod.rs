pub mod campaign_tag;
pub mod error;
pub mod gateway_service;
pub mod response_mapper;
pub mod upstream_client;
pub mod validator;

pub use error::{GatewayError, RequestError, UpstreamError};
pub use gateway_service::GatewayService;
pub use upstream_client::{HttpUpstream, UpstreamGateway};
