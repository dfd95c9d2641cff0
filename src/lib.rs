//! Filtering, sorting and pagination of property listings for a rent/sale
//! marketplace, plus validation of new listing submissions.

#[macro_use]
mod macros;

pub mod config;
pub mod errors;
pub mod models;
pub mod query;
pub mod sources;
pub mod submission;

pub use config::QueryConfig;
pub use errors::{FieldError, InvariantError, SubmissionError, ValidationError, ValidationResult};
pub use models::{AreaUnit, ListingType, Location, Pricing, Property, PropertyType};
pub use query::{
    featured_listings, new_listings, new_listings_with, query, query_with, Criteria, QueryResult,
    RawCriteria, SortKey, SortOrder,
};
pub use sources::{load_checked, HttpSource, JsonFileSource, ListingSource};
pub use submission::PropertySubmission;
