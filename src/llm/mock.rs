use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::error::ProviderError;
use super::{CompletionProvider, CompletionRequest};

/// Scripted reply for [`ScriptedProvider`].
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Fail(String),
}

/// Provider that replays queued replies and records every request.
///
/// When the queue is empty every call fails with `RequestFailed`.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(text: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.push_reply(text);
        provider
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.push_failure(reason);
        provider
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().push_back(Scripted::Reply(text.into()));
    }

    pub fn push_failure(&self, reason: impl Into<String>) {
        self.script.lock().push_back(Scripted::Fail(reason.into()));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request);
        match self.script.lock().pop_front() {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(reason)) => Err(ProviderError::RequestFailed { reason }),
            None => Err(ProviderError::RequestFailed {
                reason: "no scripted reply".to_string(),
            }),
        }
    }
}
