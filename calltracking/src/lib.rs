pub mod buyers;
pub mod catalog;
pub mod client;
pub mod metrics_defs;
pub mod resolve;
pub mod types;
