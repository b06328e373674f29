//! Metrics definitions for the registry client.

use shared::metrics_defs::{MetricDef, MetricType};

pub const MUTATION_REJECTED: MetricDef = MetricDef {
    name: "registry.mutation.rejected",
    metric_type: MetricType::Counter,
    description: "Mutations rejected because another one was in flight",
};

pub const MUTATION_SENT: MetricDef = MetricDef {
    name: "registry.mutation.sent",
    metric_type: MetricType::Counter,
    description: "Domain/route mutations dispatched to the backend",
};

pub const UNEXPECTED_LIST_PAYLOAD: MetricDef = MetricDef {
    name: "registry.list.unexpected_payload",
    metric_type: MetricType::Counter,
    description: "Domain list responses with none of the known shapes",
};

pub const ALL_METRICS: &[MetricDef] = &[MUTATION_REJECTED, MUTATION_SENT, UNEXPECTED_LIST_PAYLOAD];
