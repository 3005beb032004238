//! Router module for provider selection.
//!
//! Providers are scored on:
//! - Energy per 1000 tokens
//! - Region-adjusted CO2 per 1000 tokens
//! - Water per 1000 tokens
//!
//! each measured against a fixed worst case, with a small bonus for
//! complex queries.

mod catalog;
mod selector;

pub use catalog::{default_providers, Catalog, ProviderProfile, RegionIntensity, WorstCase};
pub use selector::{estimate_tokens, ResourceEstimate, ResourceUsage, Selector};
