//! Page-data endpoints for the teacher-facing views.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::error::GatewayError;
use super::state::AppState;
use crate::activity::ActivityKind;
use crate::observations::{Observation, ObservationFilter};
use crate::session::SessionUser;

#[derive(Debug, Serialize)]
pub struct PageData {
    pub page: &'static str,
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disciplines: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ObservationsPage {
    pub observations: Vec<Observation>,
    pub disciplines: Vec<String>,
    pub dimensions: Vec<String>,
}

async fn page_view(state: &AppState, user: &SessionUser, page: &'static str) {
    state
        .record(user, ActivityKind::PageView, Some(json!({ "page": page })))
        .await;
}

pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Json<PageData> {
    page_view(&state, &user, "home").await;
    Json(PageData {
        page: "home",
        user,
        ai_available: None,
        disciplines: None,
    })
}

pub async fn chatbot(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Json<PageData> {
    page_view(&state, &user, "chatbot").await;
    Json(PageData {
        page: "chatbot",
        user,
        ai_available: Some(state.assistant.is_available()),
        disciplines: None,
    })
}

/// Assessment page: the discipline selector feeding `/get_suggestions`.
pub async fn valutazione(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<PageData>, GatewayError> {
    let disciplines = state.catalogue().disciplines().await?;
    page_view(&state, &user, "valutazione").await;
    Ok(Json(PageData {
        page: "valutazione",
        user,
        ai_available: Some(state.matcher.assisted_enabled()),
        disciplines: Some(disciplines),
    }))
}

#[instrument(skip(state, user))]
pub async fn view_observations(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(filter): Query<ObservationFilter>,
) -> Result<Json<ObservationsPage>, GatewayError> {
    let observations = state.observations.search(&filter).await?;
    let disciplines = state.catalogue().disciplines().await?;
    let dimensions = state.catalogue().dimensions().await?;

    state
        .record(
            &user,
            ActivityKind::SearchObservations,
            Some(json!({
                "student": filter.student,
                "class_name": filter.class_name,
                "discipline": filter.discipline,
                "dimension": filter.dimension,
                "results_count": observations.len(),
            })),
        )
        .await;

    Ok(Json(ObservationsPage {
        observations,
        disciplines,
        dimensions,
    }))
}

pub async fn observation_details(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
) -> Json<Value> {
    match state.observations.details(id).await {
        Ok(Some(details)) => {
            state
                .record(
                    &user,
                    ActivityKind::ViewObservationDetails,
                    Some(json!({ "observation_id": id })),
                )
                .await;
            Json(json!({ "success": true, "observation": details }))
        }
        Ok(None) => Json(json!({ "success": false, "error": "observation not found" })),
        Err(e) => {
            warn!(error = %e, id, "Failed to load observation");
            Json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}
