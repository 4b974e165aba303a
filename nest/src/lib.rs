//! Himalayan Nest listing service.
//!
//! Search parameters arrive as a raw query-string bag ([`filters::SearchQuery`]), are parsed
//! once into typed [`filters::ListingFilters`] and compiled into a [`search::FilterCondition`]
//! that a [`store::PropertyStore`] evaluates.

pub mod api;
pub mod config;
pub mod errors;
pub mod filters;
pub mod id;
pub mod keys;
pub mod property;
pub mod search;
pub mod store;
pub mod validators;

pub use errors::*;
pub use filters::{ListingFilters, SearchQuery, compile_filters};
pub use property::{Category, NewProperty, Property, PropertyPatch, Purpose};
pub use search::{FilterCondition, SearchResult, SortOrder};
pub use store::{MemoryStore, PropertyStore, RedisStore};
