//! End-to-end tests for the analysis → selection → savings pipeline.
//!
//! Verifies that:
//! - Complexity stays within [0, 1] and the empty query is minimal
//! - Category priority is first-match-wins
//! - Selection only ever picks available providers
//! - Evaluation is deterministic and the complexity bonus never lowers a score
//! - The reference query resolves to the expected provider and savings

use willow::router::{default_providers, RegionIntensity, WorstCase};
use willow::{Catalog, Category, Error, ProviderProfile, QueryAnalysis, QueryAnalyzer, Selector};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn custom_selector(providers: Vec<ProviderProfile>) -> Selector {
    let catalog =
        Catalog::new(providers, RegionIntensity::default(), WorstCase::default()).unwrap();
    Selector::new(catalog)
}

#[test]
fn complexity_always_in_unit_interval() {
    let analyzer = QueryAnalyzer::new();
    let long_technical = format!(
        "{} algorithm function database api server quantum neural blockchain compiler framework",
        "?!#$ ".repeat(80)
    );
    let queries = [
        "",
        " ",
        "hi",
        "Explain how quantum computers work",
        "Write a function that sorts a list using the quicksort algorithm in Rust",
        long_technical.as_str(),
        "∑∫∂√∞ ≠ ≈",
    ];
    for query in queries {
        let analysis = analyzer.analyze(query);
        assert!(
            (0.0..=1.0).contains(&analysis.complexity),
            "{query:?} scored {}",
            analysis.complexity
        );
    }
}

#[test]
fn empty_query_is_minimal_and_general() {
    let analysis = QueryAnalyzer::new().analyze("");
    assert_eq!(analysis.complexity, 0.0);
    assert_eq!(analysis.category, Category::General);
}

#[test]
fn math_beats_programming() {
    let analysis = QueryAnalyzer::new().analyze("calculate the algorithm");
    assert_eq!(analysis.category, Category::Mathematical);
}

#[test]
fn repeated_technical_term_counts_once() {
    let analyzer = QueryAnalyzer::new();
    // Same length, word count and special characters; only repetition differs
    let repeated = analyzer.analyze("API API API");
    let single = analyzer.analyze("api xyz xyz");
    assert!(approx(repeated.complexity, single.complexity));
}

#[test]
fn token_estimates() {
    let selector = Selector::default();
    let analysis = QueryAnalyzer::new().analyze("abcd");
    assert_eq!(selector.evaluate("abcd", &analysis).unwrap().token_count, 1);

    let query = "a".repeat(400);
    let analysis = QueryAnalyzer::new().analyze(&query);
    assert_eq!(selector.evaluate(&query, &analysis).unwrap().token_count, 100);
}

#[test]
fn selects_only_available_providers() {
    let providers = default_providers()
        .into_iter()
        .map(|p| {
            if p.name == "OpenAI" {
                p
            } else {
                p.unavailable()
            }
        })
        .collect();
    let selector = custom_selector(providers);

    let analysis = QueryAnalyzer::new().analyze("anything at all");
    let estimate = selector.evaluate("anything at all", &analysis).unwrap();
    assert_eq!(estimate.provider.name, "OpenAI");
    assert!(estimate.provider.available);
}

#[test]
fn all_unavailable_is_a_configuration_error() {
    let providers = default_providers()
        .into_iter()
        .map(ProviderProfile::unavailable)
        .collect();
    let selector = custom_selector(providers);

    let analysis = QueryAnalyzer::new().analyze("hello");
    let err = selector.evaluate("hello", &analysis).unwrap_err();
    assert!(matches!(err, Error::NoAvailableProviders));
}

#[test]
fn evaluation_is_deterministic() {
    let selector = Selector::default();
    let query = "How does a blockchain server reach consensus?";
    let analysis = QueryAnalyzer::new().analyze(query);

    let first = selector.evaluate(query, &analysis).unwrap();
    let second = selector.evaluate(query, &analysis).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.energy_saved.to_bits(), second.energy_saved.to_bits());
    assert_eq!(first.water_saved.to_bits(), second.water_saved.to_bits());
}

#[test]
fn complexity_never_decreases_winning_score() {
    let selector = Selector::default();
    let query = "x".repeat(120);
    let low = QueryAnalysis {
        complexity: 0.1,
        category: Category::General,
    };
    let high = QueryAnalysis {
        complexity: 0.9,
        ..low
    };

    let low_estimate = selector.evaluate(&query, &low).unwrap();
    let high_estimate = selector.evaluate(&query, &high).unwrap();
    assert_eq!(low_estimate.token_count, high_estimate.token_count);
    assert!(high_estimate.score >= low_estimate.score);
}

#[test]
fn savings_are_never_negative_for_valid_catalogs() {
    let selector = Selector::default();
    let long = "z".repeat(5000);
    for query in ["a", "Explain how quantum computers work", long.as_str()] {
        let analysis = QueryAnalyzer::new().analyze(query);
        let estimate = selector.evaluate(query, &analysis).unwrap();
        assert!(estimate.energy_saved >= 0.0);
        assert!(estimate.co2_saved >= 0.0);
        assert!(estimate.water_saved >= 0.0);
    }
}

#[test]
fn quantum_reference_scenario() {
    let query = "Explain how quantum computers work";
    let analysis = QueryAnalyzer::new().analyze(query);

    assert_eq!(analysis.category, Category::Explanatory);
    // 34 chars, 5 words, no special characters, one technical term
    let expected_complexity = 34.0 / 200.0 * 0.3 + 5.0 / 50.0 * 0.3 + 1.0 / 5.0 * 0.2;
    assert!(approx(analysis.complexity, expected_complexity));

    let selector = Selector::default();
    let estimate = selector.evaluate(query, &analysis).unwrap();

    // The winner is the unique highest scorer among available providers
    let best_other = selector
        .catalog()
        .available()
        .filter(|p| p.name != estimate.provider.name)
        .map(|p| selector.score(p, analysis.complexity))
        .fold(f64::MIN, f64::max);
    assert!(estimate.score > best_other);

    assert_eq!(estimate.provider.name, "Mistral");
    assert_eq!(estimate.provider.model, "mistral-large");
    assert_eq!(estimate.provider.region, "europe");
    assert_eq!(estimate.token_count, 9);

    // 9 tokens: (500 - 250) Wh, (250 - 80 * 0.231) g, (1200 - 700) ml per 1k
    assert!(approx(estimate.energy_saved, 2.25));
    assert!(approx(estimate.co2_saved, (250.0 - 18.48) * 0.009));
    assert!(approx(estimate.water_saved, 4.5));
}
