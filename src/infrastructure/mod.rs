// Shared HTTP client construction
pub mod http_client_factory;

// Destination store (Notion) publisher
pub mod notion;

// Source adapter implementations and the deployment registry
pub mod sources;
