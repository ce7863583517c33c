//! JSON endpoints used by the chat and assessment pages.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, instrument};

use super::state::AppState;
use crate::activity::ActivityKind;
use crate::assistant::ChatReply;
use crate::observations::NewObservation;
use crate::session::SessionUser;

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default, alias = "osservazione")]
    pub observation: String,
    #[serde(default, alias = "disciplina")]
    pub discipline: String,
}

#[instrument(skip_all)]
pub async fn chatbot_query(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<ChatQuery>,
) -> Json<ChatReply> {
    let reply = state.assistant.answer(&body.query).await;
    if reply.ai_generated {
        state
            .record(
                &user,
                ActivityKind::ChatbotQuery,
                Some(json!({
                    "query": body.query,
                    "response_length": reply.response.chars().count(),
                })),
            )
            .await;
    }
    Json(reply)
}

/// Ranks descriptors for an observation. Unexpected failures still answer
/// with an empty list plus an error description.
#[instrument(skip_all, fields(discipline = %body.discipline))]
pub async fn get_suggestions(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<SuggestionQuery>,
) -> Json<Value> {
    match state.matcher.suggest(&body.observation, &body.discipline).await {
        Ok(outcome) => {
            if !body.observation.trim().is_empty() && !body.discipline.trim().is_empty() {
                state
                    .record(
                        &user,
                        ActivityKind::GetSuggestions,
                        Some(json!({
                            "observation": body.observation,
                            "discipline": body.discipline,
                            "method": outcome.method.activity_label(),
                            "count": outcome.suggestions.len(),
                        })),
                    )
                    .await;
            }
            Json(json!({ "suggestions": outcome.suggestions }))
        }
        Err(e) => {
            error!(error = %e, "Suggestion request failed");
            Json(json!({ "error": e.to_string(), "suggestions": [] }))
        }
    }
}

#[instrument(skip_all)]
pub async fn save_observation(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(new): Json<NewObservation>,
) -> Json<Value> {
    let details = json!({
        "student": new.student,
        "class_name": new.class_name,
        "discipline": new.discipline,
    });
    match state.observations.save(new).await {
        Ok(id) => {
            let mut details = details;
            details["observation_id"] = json!(id);
            state
                .record(&user, ActivityKind::SaveObservation, Some(details))
                .await;
            Json(json!({ "success": true, "id": id }))
        }
        Err(e) => {
            error!(error = %e, "Failed to save observation");
            Json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}
