//! Metrics definitions for the call-tracking provider integration.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PROVIDER_ERROR: MetricDef = MetricDef {
    name: "calltracking.provider.error",
    metric_type: MetricType::Counter,
    description: "Provider lookups that failed and degraded to empty results",
};

pub const DETAILS_FALLBACK: MetricDef = MetricDef {
    name: "calltracking.details.fallback",
    metric_type: MetricType::Counter,
    description: "Campaign-details lookups retried against the fallback campaign",
};

pub const ALL_METRICS: &[MetricDef] = &[PROVIDER_ERROR, DETAILS_FALLBACK];
