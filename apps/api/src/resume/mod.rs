pub mod embedding;
pub mod ingest;
pub mod store;
