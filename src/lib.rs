//! RIZA observation library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Matching core
//! - [`RelevanceMatcher`] - picks assisted or lexical ranking per request
//! - [`LexicalRanker`] - TF-IDF + cosine similarity, no external service
//! - [`AssistedRanker`], [`parse_ranking`] - remote-model ranking and reply parsing
//! - [`Descriptor`], [`Suggestion`], [`MatchOutcome`] - data flowing through the matcher
//!
//! ## Application services
//! - [`ChatAssistant`] - teaching-practice chat with follow-up questions
//! - [`ObservationStore`], [`UserStore`], [`ActivityLog`] - SQLite-backed stores
//! - [`SessionStore`] - cookie sessions
//! - [`gateway::create_router`] - the Axum application
//!
//! ## Configuration
//! - [`Config`] - server settings (`RIZA_*`)
//! - [`AssistConfig`] - remote provider switches and sampling settings
//!
//! ## Test/Mock Support
//! [`MemoryCatalogue`] and [`ScriptedProvider`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod accounts;
pub mod activity;
pub mod assistant;
pub mod catalogue;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod hashing;
pub mod llm;
pub mod matching;
pub mod observations;
pub mod session;
pub mod storage;

pub use accounts::{AccountError, Role, Status, User, UserStore};
pub use activity::{ActivityKind, ActivityLog};
pub use assistant::{ChatAssistant, ChatReply};
pub use catalogue::{Descriptor, DescriptorCatalogue, SqliteCatalogue};
pub use config::{Config, ConfigError};
pub use llm::{AssistConfig, CompletionProvider, CompletionRequest, ProviderError, RemoteProvider};
pub use matching::{
    AssistedRanker, LexicalRanker, MatchError, MatchOutcome, RankingMethod, RelevanceMatcher,
    Suggestion, parse_ranking,
};
pub use observations::{NewObservation, ObservationFilter, ObservationStore};
pub use session::{SessionStore, SessionUser};
pub use storage::{Database, Schema, StoreError};

#[cfg(any(test, feature = "mock"))]
pub use catalogue::MemoryCatalogue;
#[cfg(any(test, feature = "mock"))]
pub use llm::ScriptedProvider;
