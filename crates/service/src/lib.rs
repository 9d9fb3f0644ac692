//! Service boundary of the trade-in price estimator.
//!
//! Everything a surrounding web framework mounts lives here: the cached
//! device lookup, the pricing entry points, validated admin mutations,
//! and the CSV interchange adapter. Services are constructed with their
//! collaborators (pool, cache) injected; nothing is globally reachable.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod interchange;
pub mod lookup;
pub mod pricing;

pub use cache::SearchCache;
pub use catalog::CatalogService;
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use interchange::InterchangeService;
pub use lookup::LookupService;
pub use pricing::PricingService;
