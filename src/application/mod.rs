// Fan-out collection over the source registry
pub mod collector;

// Run orchestration
pub mod pipeline;
