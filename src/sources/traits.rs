use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can hand the engine a record collection
/// (data files, the marketplace REST backend, ...).
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Materialize the full collection of listings
    async fn load(&self) -> Result<Vec<Property>>;

    /// Get the name of the source for logging
    fn source_name(&self) -> &'static str;
}
