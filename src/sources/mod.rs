pub mod file;
pub mod http;
pub mod traits;

pub use file::{write_json, JsonFileSource};
pub use http::HttpSource;
pub use traits::ListingSource;

use crate::config::QueryConfig;
use crate::models::{check_unique_ids, Property};
use anyhow::{Context, Result};
use tracing::info;

/// Load a collection, fill unset fields from `config`, and reject it if ids
/// collide or a record breaks an invariant.
pub async fn load_checked(source: &dyn ListingSource, config: &QueryConfig) -> Result<Vec<Property>> {
    let mut records = source
        .load()
        .await
        .with_context(|| format!("Loading listings from {} failed", source.source_name()))?;

    check_unique_ids(&records)?;
    for record in &mut records {
        record.check_invariants()?;
        record.apply_defaults(config);
    }

    info!(
        "✅ {} listings from {} passed validation",
        records.len(),
        source.source_name()
    );
    Ok(records)
}
