// Observability: metrics recorded around a bundle run

pub mod metrics;
