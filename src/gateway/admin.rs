//! Administrator pages and the user-management API.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::error::GatewayError;
use super::state::AppState;
use crate::accounts::{AccountError, NewUser, RoleCounts, User, UserUpdate};
use crate::activity::{Activity, ActivityDashboard, ActivityKind};
use crate::session::SessionUser;

pub const UNAUTHORIZED: &str = "unauthorized";

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user_stats: RoleCounts,
    #[serde(flatten)]
    pub activity: ActivityDashboard,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserId {
    #[serde(default)]
    pub id: Option<i64>,
}

async fn page_view(state: &AppState, user: &SessionUser, page: &'static str) {
    state
        .record(user, ActivityKind::PageView, Some(json!({ "page": page })))
        .await;
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response, GatewayError> {
    if !user.is_admin() {
        return Ok(Redirect::to("/").into_response());
    }
    let page = DashboardPage {
        user_stats: state.users.role_counts().await?,
        activity: state.activity.dashboard().await?,
    };
    page_view(&state, &user, "admin_dashboard").await;
    Ok(Json(page).into_response())
}

pub async fn users(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response, GatewayError> {
    if !user.is_admin() {
        return Ok(Redirect::to("/").into_response());
    }
    let users: Vec<User> = state.users.list().await?;
    page_view(&state, &user, "admin_users").await;
    Ok(Json(json!({ "users": users })).into_response())
}

pub async fn conversations(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response, GatewayError> {
    if !user.is_admin() {
        return Ok(Redirect::to("/").into_response());
    }
    let conversations: Vec<Activity> = state.activity.conversations().await?;
    page_view(&state, &user, "admin_conversations").await;
    Ok(Json(json!({ "conversations": conversations })).into_response())
}

#[instrument(skip_all, fields(admin = user.user_id))]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Bytes,
) -> Json<Value> {
    let new: NewUser = match authorize_and_parse(&user, &body) {
        Ok(new) => new,
        Err(reply) => return reply,
    };
    let (name, role) = (new.name.clone(), new.role.unwrap_or_default());

    match state.users.create(new).await {
        Ok(id) => {
            state
                .record(
                    &user,
                    ActivityKind::CreateUser,
                    Some(json!({ "user_id": id, "name": name, "role": role })),
                )
                .await;
            Json(json!({ "success": true, "id": id }))
        }
        Err(e) => failure(e),
    }
}

#[instrument(skip_all, fields(admin = user.user_id))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Bytes,
) -> Json<Value> {
    let update: UserUpdate = match authorize_and_parse(&user, &body) {
        Ok(update) => update,
        Err(reply) => return reply,
    };
    let id = update.id;

    match state.users.update(update).await {
        Ok(fields) => {
            state
                .record(
                    &user,
                    ActivityKind::UpdateUser,
                    Some(json!({ "user_id": id, "updated_fields": fields })),
                )
                .await;
            Json(json!({ "success": true }))
        }
        Err(e) => failure(e),
    }
}

#[instrument(skip_all, fields(admin = user.user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Bytes,
) -> Json<Value> {
    let target: UserId = match authorize_and_parse(&user, &body) {
        Ok(target) => target,
        Err(reply) => return reply,
    };
    let Some(id) = target.id else {
        return failure(AccountError::MissingId);
    };

    match state.users.delete(id).await {
        Ok(()) => {
            state
                .record(&user, ActivityKind::DeleteUser, Some(json!({ "user_id": id })))
                .await;
            Json(json!({ "success": true }))
        }
        Err(e) => failure(e),
    }
}

/// Rejects non-admins before the body is decoded.
fn authorize_and_parse<T: DeserializeOwned>(
    user: &SessionUser,
    body: &[u8],
) -> Result<T, Json<Value>> {
    if !user.is_admin() {
        warn!(user_id = user.user_id, "Non-admin called user API");
        return Err(Json(json!({ "success": false, "error": UNAUTHORIZED })));
    }
    serde_json::from_slice(body)
        .map_err(|e| Json(json!({ "success": false, "error": format!("invalid body: {e}") })))
}

fn failure(error: AccountError) -> Json<Value> {
    Json(json!({ "success": false, "error": error.to_string() }))
}
