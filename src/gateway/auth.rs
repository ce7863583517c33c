//! Login, logout and the session gate in front of every protected route.

use axum::{
    Extension, Form,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::error::GatewayError;
use super::state::AppState;
use crate::activity::ActivityKind;
use crate::session::{SessionStore, SessionUser, token_from_headers};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Redirects requests without a live session to `/login`; otherwise attaches
/// the [`SessionUser`] as a request extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = token_from_headers(request.headers()).and_then(|t| state.sessions.get(&t));
    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            debug!(path = %request.uri().path(), "No session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

pub async fn login_page() -> Html<String> {
    Html(render_login(None))
}

#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, GatewayError> {
    let Some(user) = state.users.authenticate(&form.email, &form.password).await? else {
        info!("Login rejected");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(render_login(Some(INVALID_CREDENTIALS))),
        )
            .into_response());
    };

    let session = SessionUser::from(&user);
    let token = state.sessions.create(session.clone());
    state.record(&session, ActivityKind::Login, None).await;
    info!(user_id = user.id, "Login accepted");

    Ok(with_cookie(Redirect::to("/"), &state.sessions.cookie(&token)))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    headers: HeaderMap,
) -> Response {
    state.record(&user, ActivityKind::Logout, None).await;
    if let Some(token) = token_from_headers(&headers) {
        state.sessions.remove(&token);
    }
    with_cookie(Redirect::to("/login"), &SessionStore::clear_cookie())
}

fn with_cookie(redirect: Redirect, cookie: &str) -> Response {
    let mut response = redirect.into_response();
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

fn render_login(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{e}</p>"))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>RIZA - Login</title></head>\
         <body><h1>RIZA</h1>{error}\
         <form method=\"post\" action=\"/login\">\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Log in</button></form></body></html>"
    )
}
