pub mod envelope;
pub mod payment;
