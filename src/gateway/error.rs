use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::accounts::AccountError;
use crate::constants::RIZA_STATUS_HEADER;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("account error: {0}")]
    Account(#[from] AccountError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, riza_status) = match &self {
            GatewayError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            GatewayError::Account(_) => (StatusCode::INTERNAL_SERVER_ERROR, "account_error"),
        };

        tracing::error!(error = %self, status = status.as_u16(), "Request failed");

        let mut headers = HeaderMap::new();
        headers.insert(RIZA_STATUS_HEADER, HeaderValue::from_static(riza_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
