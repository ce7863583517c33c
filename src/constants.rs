//! Shared constants for matching, sessions and HTTP status headers.

/// Maximum suggestions returned by the lexical ranker.
pub const LEXICAL_TOP_K: usize = 5;

/// Descriptors sent to the assisted ranker (bounds prompt size).
pub const ASSISTED_CANDIDATE_LIMIT: usize = 15;

/// Similarity assigned when the remote model omits or garbles the score.
pub const DEFAULT_ASSISTED_SIMILARITY: f64 = 0.5;

/// Sampling temperature used for descriptor matching prompts.
pub const MATCHING_TEMPERATURE: f64 = 0.2;

/// Output token budget for follow-up question generation.
pub const FOLLOW_UP_MAX_TOKENS: u32 = 200;

/// Sampling temperature for follow-up question generation.
pub const FOLLOW_UP_TEMPERATURE: f64 = 0.7;

/// Number of rows shown in the "recent activity" dashboard panel.
pub const RECENT_ACTIVITY_LIMIT: usize = 20;

/// Number of days shown in the daily activity dashboard panel.
pub const DAILY_ACTIVITY_DAYS: usize = 7;

/// Number of chatbot conversations listed for administrators.
pub const CONVERSATION_LIMIT: usize = 100;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "riza_session";

/// Response header carrying a short machine-readable status.
pub const RIZA_STATUS_HEADER: &str = "x-riza-status";

/// Status value for healthy components.
pub const RIZA_STATUS_HEALTHY: &str = "healthy";

/// Timestamp format stored in activity and observation rows.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
