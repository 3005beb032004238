//! Provider selection and resource estimation.

use serde::Serialize;

use super::catalog::{Catalog, ProviderProfile};
use crate::analyzer::QueryAnalysis;
use crate::error::{Error, Result};

const ENERGY_WEIGHT: f64 = 0.4;
const CARBON_WEIGHT: f64 = 0.4;
const WATER_WEIGHT: f64 = 0.2;
const COMPLEXITY_BONUS: f64 = 0.2;

/// Approximate characters per token.
const CHARS_PER_TOKEN: usize = 4;

/// Outcome of evaluating one query against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceEstimate {
    pub provider: ProviderProfile,
    pub token_count: u64,
    /// Total score of the winning provider
    pub score: f64,
    /// Wh saved versus the worst case
    pub energy_saved: f64,
    /// Grams CO2 saved versus the worst case
    pub co2_saved: f64,
    /// Millilitres of water saved versus the worst case
    pub water_saved: f64,
}

/// Absolute resource usage for a number of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub energy_wh: f64,
    pub co2_g: f64,
    pub water_ml: f64,
}

/// Scores providers in a [`Catalog`] and picks the best one.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    catalog: Catalog,
}

impl Selector {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Select the best available provider for `query` and estimate the
    /// resources saved versus the worst case.
    ///
    /// `analysis` is expected to come from analyzing the same `query`.
    pub fn evaluate(&self, query: &str, analysis: &QueryAnalysis) -> Result<ResourceEstimate> {
        let token_count = estimate_tokens(query);

        let mut best: Option<(&ProviderProfile, f64)> = None;
        for provider in self.catalog.available() {
            let score = self.score(provider, analysis.complexity);
            tracing::trace!(provider = %provider.name, score, "Scored provider");
            // Strictly greater keeps the earliest provider on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((provider, score));
            }
        }

        let (provider, score) = best.ok_or(Error::NoAvailableProviders)?;

        let actual = self.usage(provider, token_count);
        let worst = self.worst_case_usage(token_count);

        tracing::debug!(
            provider = %provider.name,
            model = %provider.model,
            region = %provider.region,
            score,
            token_count,
            "Selected provider"
        );

        Ok(ResourceEstimate {
            provider: provider.clone(),
            token_count,
            score,
            energy_saved: worst.energy_wh - actual.energy_wh,
            co2_saved: worst.co2_g - actual.co2_g,
            water_saved: worst.water_ml - actual.water_ml,
        })
    }

    /// Composite score of `provider` for a query of the given complexity.
    ///
    /// All three sub-scores compare per-1000-token figures against the
    /// worst case; CO2 is region adjusted first.
    pub fn score(&self, provider: &ProviderProfile, complexity: f64) -> f64 {
        let worst = self.catalog.worst_case();

        let efficiency = 1.0 - provider.energy_wh_per_1k / worst.energy_wh_per_1k;
        let carbon = 1.0 - self.catalog.adjusted_co2_per_1k(provider) / worst.co2_g_per_1k;
        let water = 1.0 - provider.water_ml_per_1k / worst.water_ml_per_1k;

        let base = efficiency * ENERGY_WEIGHT + carbon * CARBON_WEIGHT + water * WATER_WEIGHT;
        base * (1.0 + complexity * COMPLEXITY_BONUS)
    }

    /// Estimated usage of `provider` for `token_count` tokens.
    pub fn usage(&self, provider: &ProviderProfile, token_count: u64) -> ResourceUsage {
        let scale = token_count as f64 / 1000.0;
        ResourceUsage {
            energy_wh: provider.energy_wh_per_1k * scale,
            co2_g: self.catalog.adjusted_co2_per_1k(provider) * scale,
            water_ml: provider.water_ml_per_1k * scale,
        }
    }

    /// Worst-case usage for `token_count` tokens.
    pub fn worst_case_usage(&self, token_count: u64) -> ResourceUsage {
        let worst = self.catalog.worst_case();
        let scale = token_count as f64 / 1000.0;
        ResourceUsage {
            energy_wh: worst.energy_wh_per_1k * scale,
            co2_g: worst.co2_g_per_1k * scale,
            water_ml: worst.water_ml_per_1k * scale,
        }
    }
}

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(query: &str) -> u64 {
    query.chars().count().div_ceil(CHARS_PER_TOKEN) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Category, QueryAnalyzer};
    use crate::router::catalog::{default_providers, RegionIntensity, WorstCase};

    fn analysis(complexity: f64) -> QueryAnalysis {
        QueryAnalysis {
            complexity,
            category: Category::General,
        }
    }

    fn selector_with(providers: Vec<ProviderProfile>) -> Selector {
        let catalog =
            Catalog::new(providers, RegionIntensity::default(), WorstCase::default()).unwrap();
        Selector::new(catalog)
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"a".repeat(400)), 100);
    }

    #[test]
    fn test_default_catalog_selects_mistral() {
        let selector = Selector::default();
        let query = "Explain how quantum computers work";
        let estimate = selector
            .evaluate(query, &QueryAnalyzer::new().analyze(query))
            .unwrap();
        assert_eq!(estimate.provider.name, "Mistral");
        assert_eq!(estimate.token_count, 9);
    }

    #[test]
    fn test_base_scores() {
        let selector = Selector::default();
        let scores: Vec<f64> = selector
            .catalog()
            .providers()
            .iter()
            .map(|p| selector.score(p, 0.0))
            .collect();

        // Claude: 0.4*0.4 + 0.4*(1 - 8.5/250) + 0.2*(1 - 800/1200)
        assert!((scores[0] - 0.613_066_666_666_666_7).abs() < 1e-9);
        // Mistral: 0.4*0.5 + 0.4*(1 - 18.48/250) + 0.2*(1 - 700/1200)
        assert!((scores[3] - 0.653_765_333_333_333_3).abs() < 1e-9);
    }

    #[test]
    fn test_savings() {
        let selector = Selector::default();
        let query = "a".repeat(4000);
        let estimate = selector.evaluate(&query, &analysis(0.0)).unwrap();

        assert_eq!(estimate.token_count, 1000);
        assert_eq!(estimate.provider.name, "Mistral");
        assert!((estimate.energy_saved - 250.0).abs() < 1e-9);
        assert!((estimate.co2_saved - (250.0 - 80.0 * 0.231)).abs() < 1e-9);
        assert!((estimate.water_saved - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_query_saves_nothing() {
        let estimate = Selector::default().evaluate("", &analysis(0.0)).unwrap();
        assert_eq!(estimate.token_count, 0);
        assert_eq!(estimate.energy_saved, 0.0);
        assert_eq!(estimate.co2_saved, 0.0);
        assert_eq!(estimate.water_saved, 0.0);
    }

    #[test]
    fn test_skips_unavailable() {
        let providers = default_providers()
            .into_iter()
            .map(|p| if p.name == "Mistral" { p.unavailable() } else { p })
            .collect();
        let estimate = selector_with(providers)
            .evaluate("hello", &analysis(0.5))
            .unwrap();
        assert_eq!(estimate.provider.name, "Claude");
    }

    #[test]
    fn test_all_unavailable_errors() {
        let providers = default_providers()
            .into_iter()
            .map(ProviderProfile::unavailable)
            .collect();
        let result = selector_with(providers).evaluate("hello", &analysis(0.5));
        assert!(matches!(result, Err(Error::NoAvailableProviders)));
    }

    #[test]
    fn test_empty_catalog_errors() {
        let result = selector_with(vec![]).evaluate("hello", &analysis(0.0));
        assert!(matches!(result, Err(Error::NoAvailableProviders)));
    }

    #[test]
    fn test_tie_keeps_first() {
        let providers = vec![
            ProviderProfile::new("first", "m", "europe", 100.0, 50.0, 100.0),
            ProviderProfile::new("second", "m", "europe", 100.0, 50.0, 100.0),
        ];
        let estimate = selector_with(providers)
            .evaluate("hello", &analysis(0.3))
            .unwrap();
        assert_eq!(estimate.provider.name, "first");
    }

    #[test]
    fn test_complexity_bonus_non_decreasing() {
        let selector = Selector::default();
        let query = "fixed length query";
        let mut previous = f64::MIN;
        for step in 0..=10 {
            let complexity = step as f64 / 10.0;
            let estimate = selector.evaluate(query, &analysis(complexity)).unwrap();
            assert!(estimate.score >= previous);
            previous = estimate.score;
        }
    }

    #[test]
    fn test_deterministic() {
        let selector = Selector::default();
        let query = "Compare a neural network and a compiler";
        let a = QueryAnalyzer::new().analyze(query);
        let first = selector.evaluate(query, &a).unwrap();
        let second = selector.evaluate(query, &a).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert_eq!(first.co2_saved.to_bits(), second.co2_saved.to_bits());
    }
}
