//! Descriptor matching: rank catalogue rows against a free-text observation.
//!
//! Two strategies are available. [`AssistedRanker`] asks the remote model for a
//! ranked JSON list; [`LexicalRanker`] scores TF-IDF cosine similarity locally.
//! [`RelevanceMatcher`] tries the assisted path first (when configured) and
//! falls back to the lexical path on any failure or empty result. Exactly one
//! strategy's output is returned per call.

pub mod assisted;
pub mod error;
pub mod lexical;
pub mod matcher;
mod stopwords;
pub mod types;

#[cfg(test)]
mod tests;

pub use assisted::{AssistedRanker, parse_ranking};
pub use error::MatchError;
pub use lexical::LexicalRanker;
pub use matcher::RelevanceMatcher;
pub use types::{MatchOutcome, RankingMethod, Suggestion};
