//! willow - Sustainability-aware LLM chat
//!
//! This library provides the core functionality for willow: query
//! analysis, provider selection with resource estimation, configuration,
//! and the HTTP server that forwards chats upstream.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod proxy;
pub mod router;

pub use analyzer::{Category, QueryAnalysis, QueryAnalyzer};
pub use config::Config;
pub use error::{Error, Result};
pub use router::{Catalog, ProviderProfile, ResourceEstimate, Selector};
