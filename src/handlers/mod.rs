pub mod cors;
pub mod gateway;
