pub mod access;
pub mod client;
pub mod errors;
pub mod metrics_defs;
pub mod session;
pub mod testutils;
pub mod types;
