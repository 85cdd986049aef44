//! HTTPエラーレスポンス
//!
//! 失敗はすべて `{ "error": message }` で返す。
//! - 400: 識別できなかった / リクエスト不正
//! - 404: 図鑑に該当なし / 信頼度不足
//! - 500: 上流API・設定の失敗（メッセージはそのまま返す）

use crate::error::ReefIdError;
use crate::identify::IdentifyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reef_id_common::MatchFailure;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MatchFailure> for ApiError {
    fn from(failure: MatchFailure) -> Self {
        let message = failure.to_string();
        match failure {
            MatchFailure::NoIdentification => ApiError::BadRequest(message),
            MatchFailure::NoMatch { .. } | MatchFailure::LowConfidence { .. } => ApiError::NotFound(message),
            MatchFailure::Catalog(_) => ApiError::Internal(message),
        }
    }
}

impl From<ReefIdError> for ApiError {
    fn from(err: ReefIdError) -> Self {
        let message = err.to_string();
        match err {
            ReefIdError::InvalidImage(_) | ReefIdError::InvalidRequest(_) => ApiError::BadRequest(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl From<IdentifyError> for ApiError {
    fn from(err: IdentifyError) -> Self {
        match err {
            IdentifyError::Upstream(e) => e.into(),
            IdentifyError::Match(f) => f.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::info!(status = %status, error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
