// Metric identities, values and normalization
pub mod metric;

// The per-run output record
pub mod record;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
