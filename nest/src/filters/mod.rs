//! Listing search filters: raw query parsing, price band resolution and compilation
//! into a [`crate::search::FilterCondition`].

pub mod compiler;
pub mod normalizers;
pub mod price;
pub mod query;

pub use compiler::compile_filters;
pub use price::PriceBand;
pub use query::{ListingFilters, SearchQuery};
