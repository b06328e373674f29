pub mod cache;
pub mod http;
pub mod metrics_defs;
pub mod sanitize;
pub mod validate;
