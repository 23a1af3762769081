pub mod ingestion;
pub mod sink;
