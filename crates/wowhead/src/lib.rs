//! Wowhead integration: page fetching, recipe/item cross-reference
//! resolution and display metadata.
//!
//! The resolver implements [`craftbook_core::enrichment::CrossReferenceResolver`]
//! and never surfaces transport errors; an unreachable page simply yields no
//! cross-reference.

pub mod api;
pub mod cache;
pub mod config;
pub mod lookup;
pub mod resolver;
pub mod scrape;

pub use api::{FetchedPage, PageFetcher, Tooltip, WowheadApi, WowheadApiError};
pub use cache::CachingResolver;
pub use config::WowheadConfig;
pub use lookup::{lookup, DisplayMetadata, DisplayMetadataSource, LookupResult};
pub use resolver::WowheadResolver;
