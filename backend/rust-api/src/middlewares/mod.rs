pub mod identity;
pub mod metrics;
