//! # Todo Service エラー定義
//!
//! Todo Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | HTTP ステータス / `code` | `msg` |
//! |--------|-------------------------|-------|
//! | `BadRequest` | 400 | `Bad Request` |
//! | `NotFound` | 404 | `Not Found` |
//! | `PayloadTooLarge` | 413 | `Payload Too Large` |
//! | `TooManyRequests` | 429 | `Too Many Requests` |
//! | `Database` | 500 | `Internal Server Error` |
//!
//! エラー時の `data` は常に `null`。ストアのエラー内容はログにのみ出力し、
//! クライアントには返さない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_domain::DomainError;
use todo_shared::ErrorResponse;

/// Todo Service で発生するエラー
#[derive(Debug, Error)]
pub enum TodoServiceError {
    /// 不正なリクエスト（ボディ・パスパラメータ・バリデーション）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// ボディがサイズ上限を超えている
    #[error("リクエストボディが大きすぎます: {0}")]
    PayloadTooLarge(String),

    /// 同時処理数の上限に達している
    #[error("同時処理数の上限に達しました")]
    TooManyRequests,

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] todo_infra::InfraError),
}

impl From<DomainError> for TodoServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}

impl TodoServiceError {
    /// HTTP ステータス（エンベロープの `code` と同じ値）
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TodoServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest(msg) => tracing::debug!("不正なリクエスト: {}", msg),
            Self::NotFound(msg) => tracing::debug!("リソースが見つかりません: {}", msg),
            Self::PayloadTooLarge(msg) => tracing::debug!("リクエストボディが大きすぎます: {}", msg),
            Self::TooManyRequests => tracing::warn!("同時処理数の上限に達したためリクエストを拒否しました"),
            Self::Database(e) => tracing::error!(
                span_trace = %e.span_trace(),
                "データベースエラー: {}",
                e
            ),
        }

        let status = self.status_code();
        let msg = status.canonical_reason().unwrap_or("Error");
        (status, Json(ErrorResponse::new(status.as_u16(), msg))).into_response()
    }
}
