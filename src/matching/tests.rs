use super::*;
use crate::catalogue::{Descriptor, MemoryCatalogue};
use crate::constants::{ASSISTED_CANDIDATE_LIMIT, MATCHING_TEMPERATURE};
use crate::llm::ScriptedProvider;
use std::sync::Arc;

const OBSERVATION: &str = "The student quickly identifies numeric patterns in sequences";

fn maths_rows() -> Vec<Descriptor> {
    vec![
        MemoryCatalogue::descriptor(1, "Mathematics", "identifies numeric patterns"),
        MemoryCatalogue::descriptor(2, "Mathematics", "struggles with abstraction"),
    ]
}

fn assisted_matcher(
    catalogue: Arc<MemoryCatalogue>,
    provider: Arc<ScriptedProvider>,
) -> RelevanceMatcher {
    RelevanceMatcher::new(catalogue, Some(AssistedRanker::new(provider, 1000)))
}

fn ids(suggestions: &[Suggestion]) -> Vec<i64> {
    suggestions.iter().map(Suggestion::id).collect()
}

// Lexical ranker

#[test]
fn test_tokenize_lowercases_and_drops_stop_words() {
    let tokens = LexicalRanker::tokenize("The Student IS reading a Map, again!");
    assert_eq!(tokens, vec!["student", "reading", "map"]);
}

#[test]
fn test_tokenize_skips_single_characters() {
    assert_eq!(LexicalRanker::tokenize("x y z 42"), vec!["42"]);
}

#[test]
fn test_identical_text_ranks_first_near_one() {
    let rows = vec![
        MemoryCatalogue::descriptor(10, "History", "compares primary sources"),
        MemoryCatalogue::descriptor(11, "History", "builds a chronological timeline"),
        MemoryCatalogue::descriptor(12, "History", "explains causes of events"),
    ];
    let ranked = LexicalRanker::default().rank("builds a chronological timeline", &rows);

    assert_eq!(ranked[0].id(), 11);
    assert!((ranked[0].similarity - 1.0).abs() < 1e-9);
    assert!(ranked.iter().all(|s| s.similarity <= ranked[0].similarity));
    assert!(ranked.iter().all(|s| s.explanation.is_none()));
}

#[test]
fn test_scenario_a_lexical() {
    let ranked = LexicalRanker::default().rank(OBSERVATION, &maths_rows());
    assert_eq!(ranked[0].id(), 1);
    if let Some(second) = ranked.iter().find(|s| s.id() == 2) {
        assert!(ranked[0].similarity > second.similarity);
    }
}

#[test]
fn test_never_more_than_five_and_always_positive() {
    let rows: Vec<Descriptor> = (1..=8)
        .map(|i| {
            MemoryCatalogue::descriptor(i, "Science", &format!("measures liquid volume case{i}"))
        })
        .chain(std::iter::once(MemoryCatalogue::descriptor(
            9,
            "Science",
            "draws birds",
        )))
        .collect();
    let ranked = LexicalRanker::default().rank("measures volume carefully", &rows);

    assert_eq!(ranked.len(), 5);
    assert!(ranked.iter().all(|s| s.similarity > 0.0));
    assert!(!ids(&ranked).contains(&9));
}

#[test]
fn test_ties_keep_catalogue_order() {
    let rows = vec![
        MemoryCatalogue::descriptor(3, "Geography", "reads maps"),
        MemoryCatalogue::descriptor(1, "Geography", "reads maps"),
        MemoryCatalogue::descriptor(2, "Geography", "reads maps"),
    ];
    let ranked = LexicalRanker::default().rank("reads maps", &rows);
    assert_eq!(ids(&ranked), vec![3, 1, 2]);
}

#[test]
fn test_degenerate_inputs_are_empty() {
    let ranker = LexicalRanker::default();
    assert!(ranker.rank(OBSERVATION, &[]).is_empty());
    assert!(ranker.rank("", &maths_rows()).is_empty());

    let only_stop_words = vec![MemoryCatalogue::descriptor(1, "English", "the and of")];
    assert!(ranker.rank("it is what it is", &only_stop_words).is_empty());
    assert_eq!(ranker.similarities("it is", &["the and"]), vec![0.0]);
}

#[test]
fn test_no_overlap_is_excluded() {
    let ranked = LexicalRanker::default().rank("paints landscapes", &maths_rows());
    assert!(ranked.is_empty());
}

// Assisted reply parsing

#[test]
fn test_parse_drops_orphan_ids_and_ignores_prose() {
    let raw = "Sure! Here is the ranking:\n\
        [{\"id\": 2, \"similarity\": 0.9, \"explanation\": \"abstract thinking\"},\n\
         {\"id\": 99, \"similarity\": 0.95, \"explanation\": \"invented\"}]\n\
        Hope this helps.";
    let parsed = parse_ranking(raw, &maths_rows());

    assert_eq!(ids(&parsed), vec![2]);
    assert_eq!(parsed[0].similarity, 0.9);
    assert_eq!(parsed[0].explanation.as_deref(), Some("abstract thinking"));
}

#[test]
fn test_parse_malformed_yields_empty() {
    let rows = maths_rows();
    assert!(parse_ranking("I cannot rank these descriptors.", &rows).is_empty());
    assert!(parse_ranking("[not json at all]", &rows).is_empty());
    assert!(parse_ranking("", &rows).is_empty());
    assert!(parse_ranking("{\"id\": 1}", &rows).is_empty());
    assert!(parse_ranking("[1, 2, \"three\"]", &rows).is_empty());
}

#[test]
fn test_parse_tolerates_id_representations() {
    let raw = r#"[
        {"id": "1", "similarity": 0.7},
        {"id": 2.0, "similarity": 0.6}
    ]"#;
    let parsed = parse_ranking(raw, &maths_rows());
    assert_eq!(ids(&parsed), vec![1, 2]);

    let padded = parse_ranking(r#"[{"id": " 2 ", "similarity": 0.4}]"#, &maths_rows());
    assert_eq!(ids(&padded), vec![2]);
}

#[test]
fn test_parse_similarity_coercion() {
    let raw = r#"[
        {"id": 1, "similarity": "0.8"},
        {"id": 2, "similarity": "very high"}
    ]"#;
    let parsed = parse_ranking(raw, &maths_rows());
    assert_eq!(parsed[0].similarity, 0.8);
    assert_eq!(parsed[1].similarity, 0.5);

    let missing = parse_ranking(r#"[{"id": 1}]"#, &maths_rows());
    assert_eq!(missing[0].similarity, 0.5);
    assert_eq!(missing[0].explanation.as_deref(), Some(""));
}

#[test]
fn test_parse_does_not_clamp_scores() {
    let parsed = parse_ranking(r#"[{"id": 1, "similarity": 1.7}]"#, &maths_rows());
    assert_eq!(parsed[0].similarity, 1.7);
}

#[test]
fn test_parse_accepts_italian_keys() {
    let raw = r#"[{"id": 1, "similarita": 0.65, "spiegazione": "riconosce schemi"}]"#;
    let parsed = parse_ranking(raw, &maths_rows());
    assert_eq!(parsed[0].similarity, 0.65);
    assert_eq!(parsed[0].explanation.as_deref(), Some("riconosce schemi"));
}

#[test]
fn test_parse_keeps_entries_with_alternate_keys_repeated() {
    let both_scores = r#"[{"id": 1, "similarity": 0.9, "score": 0.4, "explanation": "x"}]"#;
    let parsed = parse_ranking(both_scores, &maths_rows());
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].similarity, 0.9);
    assert_eq!(parsed[0].explanation.as_deref(), Some("x"));

    let both_explanations =
        r#"[{"id": 2, "similarita": 0.7, "explanation": "a", "spiegazione": "b"}]"#;
    let parsed = parse_ranking(both_explanations, &maths_rows());
    assert_eq!(ids(&parsed), vec![2]);
    assert_eq!(parsed[0].similarity, 0.7);
    assert_eq!(parsed[0].explanation.as_deref(), Some("a"));
}

#[test]
fn test_parse_sorts_descending_and_dedupes() {
    let raw = r#"[
        {"id": 1, "similarity": 0.3, "explanation": "weak"},
        {"id": 2, "similarity": 0.6},
        {"id": 1, "similarity": 0.9, "explanation": "strong"}
    ]"#;
    let parsed = parse_ranking(raw, &maths_rows());
    assert_eq!(ids(&parsed), vec![1, 2]);
    assert_eq!(parsed[0].explanation.as_deref(), Some("strong"));
}

#[test]
fn test_build_prompt_lists_candidates() {
    let prompt = AssistedRanker::build_prompt(OBSERVATION, "Mathematics", &maths_rows());
    assert!(prompt.contains(OBSERVATION));
    assert!(prompt.contains("Discipline: Mathematics"));
    assert!(prompt.contains("ID: 1 - Dimension: Interpretation - Process: identify"));
    assert!(prompt.contains("Descriptor: struggles with abstraction"));
    assert!(prompt.contains("JSON"));
}

#[tokio::test]
async fn test_assisted_rank_sends_bounded_request() {
    let rows: Vec<Descriptor> = (1..=20)
        .map(|i| MemoryCatalogue::descriptor(i, "Mathematics", &format!("descriptor {i}")))
        .collect();
    let provider = Arc::new(ScriptedProvider::replying(
        r#"[{"id": 18, "similarity": 0.9}, {"id": 15, "similarity": 0.4}]"#,
    ));
    let ranker = AssistedRanker::new(provider.clone(), 321);

    let ranked = ranker.rank(OBSERVATION, "Mathematics", &rows).await.unwrap();
    assert_eq!(ids(&ranked), vec![15]);

    let request = &provider.requests()[0];
    assert_eq!(request.max_tokens, 321);
    assert_eq!(request.temperature, MATCHING_TEMPERATURE);
    assert!(request.prompt.contains(&format!("ID: {ASSISTED_CANDIDATE_LIMIT} -")));
    assert!(!request.prompt.contains("ID: 16 -"));
}

#[tokio::test]
async fn test_assisted_rank_surfaces_transport_errors() {
    let ranker = AssistedRanker::new(Arc::new(ScriptedProvider::failing("connection reset")), 100);
    assert!(ranker.rank(OBSERVATION, "Mathematics", &maths_rows()).await.is_err());
}

// Orchestrator

#[tokio::test]
async fn test_blank_inputs_short_circuit() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    let provider = Arc::new(ScriptedProvider::replying("[]"));
    let matcher = assisted_matcher(catalogue.clone(), provider.clone());

    assert!(matcher.suggest("", "Mathematics").await.unwrap().is_empty());
    assert!(matcher.suggest("   ", "Mathematics").await.unwrap().is_empty());
    assert!(matcher.suggest(OBSERVATION, "").await.unwrap().is_empty());
    assert_eq!(catalogue.load_count(), 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_scenario_b_empty_catalogue() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    let provider = Arc::new(ScriptedProvider::replying("[]"));
    let matcher = assisted_matcher(catalogue, provider.clone());

    let outcome = matcher.suggest("draws with perspective", "Art").await.unwrap();
    assert_eq!(outcome, MatchOutcome::empty());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_disabled_matches_direct_lexical_call() {
    let matcher = RelevanceMatcher::lexical_only(Arc::new(MemoryCatalogue::new(maths_rows())));
    assert!(!matcher.assisted_enabled());

    let outcome = matcher.suggest(OBSERVATION, "Mathematics").await.unwrap();
    let direct = LexicalRanker::default().rank(OBSERVATION, &maths_rows());
    assert_eq!(outcome.suggestions, direct);
    assert_eq!(outcome.method, RankingMethod::Lexical);
    assert_eq!(outcome.suggestions[0].id(), 1);
}

#[tokio::test]
async fn test_scenario_c_transport_error_falls_back() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    let provider = Arc::new(ScriptedProvider::failing("503 service unavailable"));
    let matcher = assisted_matcher(catalogue.clone(), provider.clone());

    let outcome = matcher.suggest(OBSERVATION, "Mathematics").await.unwrap();
    let baseline = RelevanceMatcher::lexical_only(catalogue)
        .suggest(OBSERVATION, "Mathematics")
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(outcome, baseline);
    assert_eq!(outcome.method, RankingMethod::Lexical);
}

#[tokio::test]
async fn test_malformed_or_orphan_reply_falls_back() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    let provider = Arc::new(ScriptedProvider::replying("no json here"));
    provider.push_reply(r#"[{"id": 42, "similarity": 0.99}]"#);
    let matcher = assisted_matcher(catalogue, provider.clone());

    for _ in 0..2 {
        let outcome = matcher.suggest(OBSERVATION, "Mathematics").await.unwrap();
        assert_eq!(outcome.method, RankingMethod::Lexical);
        assert_eq!(outcome.suggestions[0].id(), 1);
    }
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_assisted_result_takes_precedence() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    let provider = Arc::new(ScriptedProvider::replying(
        r#"[{"id": 2, "similarity": 0.8, "explanation": "works with abstract sequences"}]"#,
    ));
    let matcher = assisted_matcher(catalogue, provider);

    let outcome = matcher.suggest(OBSERVATION, "Mathematics").await.unwrap();
    assert_eq!(outcome.method, RankingMethod::Assisted);
    assert_eq!(ids(&outcome.suggestions), vec![2]);
    assert_eq!(
        outcome.suggestions[0].explanation.as_deref(),
        Some("works with abstract sequences")
    );
}

#[tokio::test]
async fn test_catalogue_failure_is_an_error() {
    let catalogue = Arc::new(MemoryCatalogue::new(maths_rows()));
    catalogue.fail_reads();
    let matcher = RelevanceMatcher::lexical_only(catalogue);

    let result = matcher.suggest(OBSERVATION, "Mathematics").await;
    assert!(matches!(result, Err(MatchError::Catalogue(_))));
}

#[test]
fn test_suggestion_serialises_flat() {
    let lexical = Suggestion::lexical(maths_rows().remove(0), 0.75);
    let json = serde_json::to_value(&lexical).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["text"], "identifies numeric patterns");
    assert_eq!(json["similarity"], 0.75);
    assert!(json.get("explanation").is_none());

    let assisted = Suggestion::assisted(maths_rows().remove(1), 0.5, String::new());
    let json = serde_json::to_value(&assisted).unwrap();
    assert_eq!(json["explanation"], "");
    assert_eq!(RankingMethod::Assisted.to_string(), "assisted");
}
