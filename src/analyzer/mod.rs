//! Query analysis.
//!
//! Turns raw query text into a [`QueryAnalysis`]: a complexity score in
//! `0.0..=1.0` and a coarse [`Category`]. Both are cheap surface heuristics
//! over the text; nothing here calls a model.

mod category;
mod complexity;

pub use category::Category;
pub use complexity::TECHNICAL_TERMS;

use serde::Serialize;

/// Result of analyzing a single query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryAnalysis {
    /// Weighted complexity score, always within `0.0..=1.0`.
    pub complexity: f64,
    pub category: Category,
}

impl QueryAnalysis {
    /// Relative resource pressure of the query: complexity scaled by the
    /// category's multiplier.
    pub fn sustainability_impact(&self) -> f64 {
        self.complexity * self.category.impact_multiplier()
    }
}

/// Stateless query analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze `query`. Total over all inputs; the empty string yields
    /// complexity `0.0` and [`Category::General`].
    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let analysis = QueryAnalysis {
            complexity: complexity::score(query),
            category: Category::classify(query),
        };

        tracing::debug!(
            complexity = analysis.complexity,
            category = %analysis.category,
            "Analyzed query"
        );

        analysis
    }
}
