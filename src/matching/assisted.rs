//! LLM-assisted descriptor ranking.
//!
//! The remote model is asked for a bare JSON array of `{id, similarity,
//! explanation}` objects. Replies are untrusted: the array span is extracted
//! from free text, each entry object is read key by key, and only ids
//! present in the candidate slice survive.

use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument};

use super::types::Suggestion;
use crate::catalogue::Descriptor;
use crate::constants::{ASSISTED_CANDIDATE_LIMIT, DEFAULT_ASSISTED_SIMILARITY, MATCHING_TEMPERATURE};
use crate::llm::{CompletionProvider, CompletionRequest, ProviderError};

/// System instruction for descriptor matching.
pub const MATCHING_SYSTEM_PROMPT: &str = "You are an assistant specialised in formative \
assessment and the RIZA model (Resources, Interpretation, Action, Self-regulation). Your task \
is to analyse observations of students and link them to the most relevant RIZA descriptors.";

static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"));

const SIMILARITY_KEYS: [&str; 3] = ["similarity", "similarita", "score"];
const EXPLANATION_KEYS: [&str; 2] = ["explanation", "spiegazione"];

/// One reply entry. Keys are looked up in preference order, so an object
/// carrying both a key and one of its alternates still decodes.
#[derive(Debug)]
struct RankedEntry {
    id: Value,
    similarity: Option<Value>,
    explanation: Option<Value>,
}

impl RankedEntry {
    fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let id = fields.remove("id")?;
        let similarity = SIMILARITY_KEYS.iter().find_map(|k| fields.remove(*k));
        let explanation = EXPLANATION_KEYS.iter().find_map(|k| fields.remove(*k));
        Some(Self {
            id,
            similarity,
            explanation,
        })
    }
}

/// Ranks up to [`ASSISTED_CANDIDATE_LIMIT`] descriptors with the remote model.
#[derive(Clone)]
pub struct AssistedRanker {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
    temperature: f64,
    candidate_limit: usize,
}

impl std::fmt::Debug for AssistedRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistedRanker")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("candidate_limit", &self.candidate_limit)
            .finish()
    }
}

impl AssistedRanker {
    pub fn new(provider: Arc<dyn CompletionProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
            temperature: MATCHING_TEMPERATURE,
            candidate_limit: ASSISTED_CANDIDATE_LIMIT,
        }
    }

    pub fn candidate_limit(&self) -> usize {
        self.candidate_limit
    }

    /// Builds the user prompt listing every candidate descriptor.
    pub fn build_prompt(observation: &str, discipline: &str, candidates: &[Descriptor]) -> String {
        let mut prompt = format!(
            "Analyse the following student observation and identify which RIZA descriptors are \
             most relevant.\n\nObservation: \"{observation}\"\n\nDiscipline: {discipline}\n\n\
             Available descriptors:"
        );
        for d in candidates {
            let _ = write!(
                prompt,
                "\nID: {} - Dimension: {} - Process: {} - Level: {} - Descriptor: {}",
                d.id, d.dimension, d.process_verb, d.level, d.text
            );
        }
        prompt.push_str(
            "\n\nReturn the 3 most relevant descriptors as a JSON array with this structure:\n\
             [\n  {\n    \"id\": \"descriptor ID\",\n    \"similarity\": \"decimal from 0 to 1 \
             indicating relevance\",\n    \"explanation\": \"short explanation of why the \
             descriptor fits the observation\"\n  },\n  ...\n]\n\n\
             Reply with the JSON only, without any additional text.",
        );
        prompt
    }

    /// Asks the model to rank `candidates` (truncated to the candidate limit).
    ///
    /// `Err` means the provider call failed. A malformed reply is not an error:
    /// it yields an empty list, which callers treat the same way.
    #[instrument(skip(self, observation, candidates), fields(candidates = candidates.len()))]
    pub async fn rank(
        &self,
        observation: &str,
        discipline: &str,
        candidates: &[Descriptor],
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let candidates = &candidates[..candidates.len().min(self.candidate_limit)];
        let request = CompletionRequest::new(
            MATCHING_SYSTEM_PROMPT,
            Self::build_prompt(observation, discipline, candidates),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature);

        let reply = self.provider.complete(request).await?;
        Ok(parse_ranking(&reply, candidates))
    }
}

/// Parses a model reply into suggestions for `candidates`.
///
/// Sorted by descending similarity (stable, so equal scores keep reply order)
/// and deduplicated by id, keeping the highest-scored occurrence.
pub fn parse_ranking(raw: &str, candidates: &[Descriptor]) -> Vec<Suggestion> {
    let Some(entries) = extract_entries(raw) else {
        debug!(reply_len = raw.len(), "No JSON array in assisted reply");
        return Vec::new();
    };

    let mut suggestions: Vec<Suggestion> = entries
        .into_iter()
        .filter_map(RankedEntry::from_value)
        .filter_map(|entry| {
            let key = canonical_id(&entry.id)?;
            let descriptor = candidates.iter().find(|d| d.id_key() == key)?;
            Some(Suggestion::assisted(
                descriptor.clone(),
                coerce_similarity(entry.similarity.as_ref()),
                explanation_text(entry.explanation),
            ))
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.id()));
    suggestions
}

fn extract_entries(raw: &str) -> Option<Vec<Value>> {
    let from_span = ARRAY_SPAN
        .find(raw)
        .and_then(|m| serde_json::from_str::<Vec<Value>>(m.as_str()).ok());

    from_span.or_else(|| serde_json::from_str::<Vec<Value>>(raw.trim()).ok())
}

fn canonical_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| format!("{}", f as i64))
            }
        }
        _ => None,
    }
}

fn coerce_similarity(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .unwrap_or(DEFAULT_ASSISTED_SIMILARITY)
}

fn explanation_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
