//! TF-IDF + cosine similarity ranking.
//!
//! The vector space is built over the descriptor texts plus the observation:
//! lower-cased tokens of two or more word characters, English stop words
//! removed, raw term counts weighted by smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`, each vector L2-normalised.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use super::stopwords::is_stop_word;
use super::types::Suggestion;
use crate::catalogue::Descriptor;
use crate::constants::LEXICAL_TOP_K;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

type TermVector<'a> = BTreeMap<&'a str, f64>;

/// Pure, deterministic lexical ranker.
#[derive(Debug, Clone)]
pub struct LexicalRanker {
    top_k: usize,
}

impl Default for LexicalRanker {
    fn default() -> Self {
        Self::new(LEXICAL_TOP_K)
    }
}

impl LexicalRanker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Lower-cased, stop-word-filtered tokens of `text`.
    pub fn tokenize(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .map(str::to_string)
            .collect()
    }

    /// Cosine similarity between `observation` and each document, in document
    /// order. Degenerate inputs (no documents, empty vocabulary) give zeros.
    pub fn similarities(&self, observation: &str, documents: &[&str]) -> Vec<f64> {
        if documents.is_empty() {
            return Vec::new();
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .copied()
            .chain(std::iter::once(observation))
            .map(Self::tokenize)
            .collect();

        let counts: Vec<BTreeMap<&str, f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf = BTreeMap::new();
                for t in tokens {
                    *tf.entry(t.as_str()).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let mut df: BTreeMap<&str, f64> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *df.entry(*term).or_insert(0.0) += 1.0;
            }
        }
        if df.is_empty() {
            debug!("Empty vocabulary, no lexical overlap possible");
            return vec![0.0; documents.len()];
        }

        let n = counts.len() as f64;
        let vectors: Vec<TermVector<'_>> = counts
            .iter()
            .map(|tf| {
                let mut v: TermVector<'_> = tf
                    .iter()
                    .map(|(term, count)| {
                        let idf = ((1.0 + n) / (1.0 + df[term])).ln() + 1.0;
                        (*term, count * idf)
                    })
                    .collect();
                let norm = v.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    v.values_mut().for_each(|w| *w /= norm);
                }
                v
            })
            .collect();

        let Some((query, docs)) = vectors.split_last() else {
            return vec![0.0; documents.len()];
        };
        docs.iter().map(|doc| dot(query, doc)).collect()
    }

    /// Top descriptors by similarity, excluding those with no lexical overlap.
    /// Ties keep catalogue order.
    pub fn rank(&self, observation: &str, descriptors: &[Descriptor]) -> Vec<Suggestion> {
        let texts: Vec<&str> = descriptors.iter().map(|d| d.text.as_str()).collect();
        let scores = self.similarities(observation, &texts);

        let mut scored: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.top_k);

        debug!(
            candidates = descriptors.len(),
            matched = scored.len(),
            "Lexical ranking complete"
        );

        scored
            .into_iter()
            .map(|(idx, score)| Suggestion::lexical(descriptors[idx].clone(), score))
            .collect()
    }
}

fn dot(a: &TermVector<'_>, b: &TermVector<'_>) -> f64 {
    a.iter()
        .filter_map(|(term, w)| b.get(term).map(|v| w * v))
        .sum()
}
