use super::*;
use crate::llm::ScriptedProvider;

fn assistant(provider: &Arc<ScriptedProvider>) -> ChatAssistant {
    let provider: Arc<dyn CompletionProvider> = provider.clone();
    ChatAssistant::new(Some(provider), 1000, 0.3)
}

#[tokio::test]
async fn test_empty_query_gets_prompt_reply() {
    let provider = Arc::new(ScriptedProvider::new());
    let reply = assistant(&provider).answer("   ").await;

    assert_eq!(reply.response, EMPTY_QUERY_REPLY);
    assert!(reply.suggestions.is_empty());
    assert!(!reply.ai_generated);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_unavailable_reply_has_canned_suggestions() {
    let reply = ChatAssistant::unavailable()
        .answer("How do I run a peer review?")
        .await;

    assert_eq!(reply.response, UNAVAILABLE_REPLY);
    assert_eq!(reply.suggestions.len(), 3);
    assert!(!reply.ai_generated);
}

#[tokio::test]
async fn test_answer_with_follow_ups() {
    let provider = Arc::new(ScriptedProvider::replying(
        "Start with a short worked example.",
    ));
    provider.push_reply("How long should it take?\n\n  What if students disagree?  \nCan I grade it?\n");

    let reply = assistant(&provider).answer("How do I run a peer review?").await;

    assert!(reply.ai_generated);
    assert_eq!(reply.response, "Start with a short worked example.");
    assert_eq!(
        reply.suggestions,
        vec![
            "How long should it take?",
            "What if students disagree?",
            "Can I grade it?"
        ]
    );

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].system, ASSISTANT_SYSTEM_PROMPT);
    assert_eq!(requests[0].max_tokens, 1000);
    assert_eq!(requests[1].max_tokens, FOLLOW_UP_MAX_TOKENS);
    assert_eq!(requests[1].temperature, FOLLOW_UP_TEMPERATURE);
    assert!(requests[1].prompt.contains("Start with a short worked example."));
}

#[tokio::test]
async fn test_follow_up_failure_keeps_answer() {
    let provider = Arc::new(ScriptedProvider::replying("Use exit tickets."));
    provider.push_failure("rate limited");

    let reply = assistant(&provider).answer("Quick formative checks?").await;
    assert!(reply.ai_generated);
    assert_eq!(reply.response, "Use exit tickets.");
    assert!(reply.suggestions.is_empty());
}

#[tokio::test]
async fn test_answer_failure_returns_apology() {
    let provider = Arc::new(ScriptedProvider::failing("connection refused"));
    let reply = assistant(&provider).answer("Quick formative checks?").await;

    assert!(!reply.ai_generated);
    assert!(reply.response.contains("connection refused"));
    assert_eq!(reply.suggestions.len(), 3);
    assert_eq!(provider.call_count(), 1);
}

#[test]
fn test_reply_serialisation_omits_flag() {
    let reply = ChatReply {
        response: "ok".to_string(),
        suggestions: vec![],
        ai_generated: true,
    };
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json, serde_json::json!({"response": "ok", "suggestions": []}));
}
