//! Property query engine: filter, sort and paginate an in-memory snapshot.
//!
//! Every entry point is a pure function over borrowed records. Inputs are
//! never mutated and results are owned clones, so concurrent callers can
//! share one `&[Property]` freely.

pub mod criteria;
mod filter;

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::QueryConfig;
use crate::models::Property;

pub use criteria::{Criteria, RawCriteria, SortKey, SortOrder};
use filter::Filter;

/// One page of matches plus the number of matches before paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub items: Vec<Property>,
    pub total_count: usize,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    /// Pages needed to show every match at `limit` per page.
    pub fn page_count(&self, limit: usize) -> usize {
        if limit == 0 {
            0
        } else {
            self.total_count.div_ceil(limit)
        }
    }

    /// Whether matches remain after this page, which started at `offset`.
    pub fn has_more(&self, offset: usize) -> bool {
        offset.saturating_add(self.items.len()) < self.total_count
    }
}

/// Run `criteria` against `records` with the built-in defaults.
pub fn query(records: &[Property], criteria: &Criteria) -> QueryResult {
    query_with(records, criteria, &QueryConfig::default())
}

/// Run `criteria` against `records`, taking the page size default from `config`.
pub fn query_with(records: &[Property], criteria: &Criteria, config: &QueryConfig) -> QueryResult {
    let filter = Filter::new(criteria);
    let matches: Vec<&Property> = records.iter().filter(|p| filter.matches(p)).collect();

    let limit = criteria.limit.unwrap_or(config.default_limit);
    let result = paginate(matches, criteria, limit);

    debug!(
        records = records.len(),
        total = result.total_count,
        returned = result.items.len(),
        sort_by = %criteria.sort_by,
        sort_order = %criteria.sort_order,
        offset = criteria.offset,
        limit,
        "query evaluated"
    );

    result
}

/// Featured listings, newest first, one page starting at `offset`.
pub fn featured_listings(records: &[Property], offset: usize, limit: usize) -> QueryResult {
    query(records, &Criteria::new().featured(true).page(offset, limit))
}

/// Listings created within `window` of `now`, newest first, one page
/// starting at `offset`.
pub fn new_listings(
    records: &[Property],
    now: DateTime<Utc>,
    window: Duration,
    offset: usize,
    limit: usize,
) -> QueryResult {
    let matches = records.iter().filter(|p| p.is_new(now, window)).collect();
    paginate(matches, &Criteria::new().page(offset, limit), limit)
}

/// [`new_listings`] using the recency window from `config`.
pub fn new_listings_with(
    records: &[Property],
    now: DateTime<Utc>,
    config: &QueryConfig,
    offset: usize,
    limit: usize,
) -> QueryResult {
    new_listings(records, now, config.new_listing_window, offset, limit)
}

fn paginate(mut matches: Vec<&Property>, criteria: &Criteria, limit: usize) -> QueryResult {
    let total_count = matches.len();
    matches.sort_by(|a, b| compare(a, b, criteria.sort_by, criteria.sort_order));

    let items = matches
        .into_iter()
        .skip(criteria.offset)
        .take(limit)
        .cloned()
        .collect();

    QueryResult { items, total_count }
}

/// Order two records by `key`, breaking ties by ascending id.
///
/// For price keys, records of the other listing type have no key and sort
/// after every keyed record in either direction.
fn compare(a: &Property, b: &Property, key: SortKey, order: SortOrder) -> Ordering {
    let primary = match key {
        SortKey::CreatedAt => order.apply(a.created_at.cmp(&b.created_at)),
        SortKey::RentPrice => compare_keyed(a.rent_price(), b.rent_price(), order),
        SortKey::SalePrice => compare_keyed(a.sale_price(), b.sale_price(), order),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn compare_keyed(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => order.apply(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
