//! Teaching-practice chat assistant.
//!
//! Each query makes up to two provider calls: the answer itself, then a short
//! list of follow-up questions. The follow-up call is best effort.

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::constants::{FOLLOW_UP_MAX_TOKENS, FOLLOW_UP_TEMPERATURE};
use crate::llm::{CompletionProvider, CompletionRequest, ProviderError};

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are an expert assistant in education and \
teaching, specialised in supporting teachers. Give detailed, practical, evidence-based answers. \
Where possible, offer concrete examples and suggestions that can be applied in the classroom.";

pub const FOLLOW_UP_SYSTEM_PROMPT: &str = "Generate 5 related questions a teacher might want to \
ask after receiving an answer to their initial question. Provide only the questions, one per \
line, without numbering or bullet points.";

pub const EMPTY_QUERY_REPLY: &str = "No question received. How can I help you?";

pub const UNAVAILABLE_REPLY: &str = "Sorry, the AI service is not currently available. Check \
the API configuration or contact the administrator.";

const UNAVAILABLE_SUGGESTIONS: [&str; 3] = [
    "How can I configure the OpenAI API?",
    "What are the alternatives to using OpenAI?",
    "How can I get an API key?",
];

const FAILURE_SUGGESTIONS: [&str; 3] = [
    "Could you try again with a simpler question?",
    "How can I phrase my questions better?",
    "Which topics can I ask for support on?",
];

/// Reply returned to the chat page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub suggestions: Vec<String>,
    /// True only when the response text came from the provider.
    #[serde(skip)]
    pub ai_generated: bool,
}

impl ChatReply {
    fn canned(response: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            response: response.into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            ai_generated: false,
        }
    }
}

#[derive(Clone)]
pub struct ChatAssistant {
    provider: Option<Arc<dyn CompletionProvider>>,
    max_tokens: u32,
    temperature: f64,
}

impl std::fmt::Debug for ChatAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAssistant")
            .field("available", &self.provider.is_some())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ChatAssistant {
    /// `provider` is `None` when AI assistance is disabled or unconfigured.
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        max_tokens: u32,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            max_tokens,
            temperature,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None, 0, 0.0)
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn answer(&self, query: &str) -> ChatReply {
        if query.trim().is_empty() {
            return ChatReply::canned(EMPTY_QUERY_REPLY, &[]);
        }
        let Some(provider) = &self.provider else {
            debug!("Chat requested with AI unavailable");
            return ChatReply::canned(UNAVAILABLE_REPLY, &UNAVAILABLE_SUGGESTIONS);
        };

        let request = CompletionRequest::new(ASSISTANT_SYSTEM_PROMPT, query)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        let response = match provider.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Chat answer failed");
                return failure_reply(&e);
            }
        };

        let suggestions = match follow_ups(provider.as_ref(), query, &response).await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "Follow-up generation failed");
                Vec::new()
            }
        };

        ChatReply {
            response,
            suggestions,
            ai_generated: true,
        }
    }
}

async fn follow_ups(
    provider: &dyn CompletionProvider,
    query: &str,
    response: &str,
) -> Result<Vec<String>, ProviderError> {
    let request = CompletionRequest::new(
        FOLLOW_UP_SYSTEM_PROMPT,
        format!("Initial question: {query}\nAnswer received: {response}"),
    )
    .with_max_tokens(FOLLOW_UP_MAX_TOKENS)
    .with_temperature(FOLLOW_UP_TEMPERATURE);

    let text = provider.complete(request).await?;
    Ok(split_lines(&text))
}

/// Non-blank trimmed lines of `text`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn failure_reply(error: &ProviderError) -> ChatReply {
    ChatReply::canned(
        format!(
            "Sorry, an error occurred while processing your request. Technical detail: {error}"
        ),
        &FAILURE_SUGGESTIONS,
    )
}
