// Application layer - use cases and the time-series store seam
pub mod ingest_service;
pub mod query_service;
pub mod store;
pub mod task_service;
