pub mod bulk;
pub mod client;
pub mod mapping;

pub use bulk::{BulkFailure, BulkReport};
pub use client::ElasticClient;
