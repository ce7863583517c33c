use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use std::time::Duration;
use tracing::{debug, instrument};

use super::config::AssistConfig;
use super::error::ProviderError;
use super::{CompletionProvider, CompletionRequest};

/// Provider backed by the `genai` multi-vendor client.
pub struct RemoteProvider {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for RemoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteProvider")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteProvider {
    pub fn new(config: &AssistConfig) -> Self {
        Self {
            client: Client::default(),
            model: config.model.clone(),
            timeout: config.timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for RemoteProvider {
    #[instrument(skip(self, request), fields(model = %self.model, max_tokens = request.max_tokens))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(request.system),
            ChatMessage::user(request.prompt),
        ]);
        let options = ChatOptions::default()
            .with_max_tokens(request.max_tokens)
            .with_temperature(request.temperature);

        let call = self.client.exec_chat(&self.model, chat_req, Some(&options));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(|e| ProviderError::RequestFailed {
                reason: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().to_string();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyReply);
        }

        debug!(reply_len = text.len(), "Provider reply received");
        Ok(text)
    }
}
