//! Keyword-based query categorization.

use serde::Serialize;

/// Coarse query category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mathematical,
    Programming,
    Explanatory,
    Analytical,
    General,
}

/// Keyword groups in match priority order. The first group with a keyword
/// starting any word of the lowercased query wins, so inflections such as
/// "programming" or "mathematics" still match.
const RULES: [(Category, &[&str]); 4] = [
    (
        Category::Mathematical,
        &["math", "calculate", "compute", "solve", "equation"],
    ),
    (
        Category::Programming,
        &["code", "program", "function", "algorithm"],
    ),
    (Category::Explanatory, &["explain", "what", "how", "why"]),
    (Category::Analytical, &["analyze", "compare", "evaluate"]),
];

/// Keywords that only match a whole word. "computers" is not a math query.
const WHOLE_WORD: &[&str] = &["compute"];

fn keyword_matches(word: &str, keyword: &str) -> bool {
    if WHOLE_WORD.contains(&keyword) {
        word == keyword
    } else {
        word.starts_with(keyword)
    }
}

impl Category {
    /// Categorize `query`, falling back to [`Category::General`].
    pub fn classify(query: &str) -> Self {
        let lower = query.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        RULES
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|kw| words.iter().any(|word| keyword_matches(word, kw)))
            })
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }

    /// Multiplier applied to complexity when estimating impact.
    pub fn impact_multiplier(&self) -> f64 {
        match self {
            Category::Mathematical => 1.2,
            Category::Programming => 1.1,
            Category::Analytical => 1.0,
            Category::Explanatory => 0.8,
            Category::General => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mathematical => "mathematical",
            Category::Programming => "programming",
            Category::Explanatory => "explanatory",
            Category::Analytical => "analytical",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
