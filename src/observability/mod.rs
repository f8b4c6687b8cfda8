// Observability: metrics for each pipeline stage

pub mod metrics;
