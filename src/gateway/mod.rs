//! HTTP gateway (Axum).
//!
//! Every route except `/login` and `/healthz` sits behind
//! [`auth::require_session`].

pub mod admin;
pub mod api;
pub mod auth;
pub mod error;
pub mod pages;
pub mod state;


use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use state::AppState;

use crate::constants::{RIZA_STATUS_HEADER, RIZA_STATUS_HEALTHY};

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(pages::home))
        .route("/chatbot", get(pages::chatbot))
        .route("/valutazione", get(pages::valutazione))
        .route("/view_observations", get(pages::view_observations))
        .route(
            "/get_observation_details/{id}",
            get(pages::observation_details),
        )
        .route("/chatbot_query", post(api::chatbot_query))
        .route("/get_suggestions", post(api::get_suggestions))
        .route("/save_observation", post(api::save_observation))
        .route("/logout", get(auth::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/users", get(admin::users))
        .route("/admin/conversations", get(admin::conversations))
        .route(
            "/admin/api/users",
            post(admin::create_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/login", get(auth::login_page).post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RIZA_STATUS_HEADER,
        HeaderValue::from_static(RIZA_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}
