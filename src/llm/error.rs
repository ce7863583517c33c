use std::time::Duration;
use thiserror::Error;

/// Failures talking to the remote text-generation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport, authentication or rate-limit failure reported by the client.
    #[error("provider request failed: {reason}")]
    RequestFailed { reason: String },

    /// The call did not complete within the configured timeout.
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    /// The reply contained no text.
    #[error("provider returned an empty reply")]
    EmptyReply,
}
