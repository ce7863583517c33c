use serde::Serialize;

use crate::catalogue::Descriptor;

/// A descriptor scored against one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    /// Relevance score. Lexical scores lie in (0, 1]; assisted scores are
    /// passed through unclamped.
    pub similarity: f64,
    /// Model explanation. Present (possibly empty) only on the assisted path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Suggestion {
    pub fn lexical(descriptor: Descriptor, similarity: f64) -> Self {
        Self {
            descriptor,
            similarity,
            explanation: None,
        }
    }

    pub fn assisted(descriptor: Descriptor, similarity: f64, explanation: String) -> Self {
        Self {
            descriptor,
            similarity,
            explanation: Some(explanation),
        }
    }

    pub fn id(&self) -> i64 {
        self.descriptor.id
    }
}

/// Which strategy produced a [`MatchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    Assisted,
    Lexical,
    /// Nothing was ranked (empty input or empty catalogue).
    None,
}

impl RankingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMethod::Assisted => "assisted",
            RankingMethod::Lexical => "lexical",
            RankingMethod::None => "none",
        }
    }

    /// Value written to the `method` field of `get_suggestions` activity rows,
    /// matching the labels already present in existing activity logs.
    pub fn activity_label(&self) -> &'static str {
        match self {
            RankingMethod::Assisted => "ai",
            RankingMethod::Lexical => "tfidf",
            RankingMethod::None => "none",
        }
    }
}

impl std::fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggestions for one request, sorted by descending similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub suggestions: Vec<Suggestion>,
    pub method: RankingMethod,
}

impl MatchOutcome {
    pub fn empty() -> Self {
        Self {
            suggestions: Vec::new(),
            method: RankingMethod::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}
