//! # 同時処理数の制限
//!
//! 処理中のリクエスト数が上限に達している場合、待たせずに
//! `429 Too Many Requests` をエンベロープ付きで返す。
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let app = Router::new()
//!     .route("/api/v1/todos", get(list_todos))
//!     .layer(from_fn_with_state(ThrottleState::new(100), throttle));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Semaphore;

use crate::error::TodoServiceError;

/// 処理中リクエストの枠を管理する State
#[derive(Debug, Clone)]
pub struct ThrottleState {
    permits: Arc<Semaphore>,
}

impl ThrottleState {
    pub fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit)),
        }
    }
}

/// 枠を確保できたリクエストだけを後続に渡す
///
/// 枠はレスポンスを返すまで保持する。
pub async fn throttle(
    State(state): State<ThrottleState>,
    request: Request,
    next: Next,
) -> Response {
    let Ok(_permit) = state.permits.try_acquire_owned() else {
        return TodoServiceError::TooManyRequests.into_response();
    };

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;

    fn request() -> Request {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    /// 呼ばれたことを `entered` で知らせ、`release` まで応答を保留するルーター
    fn blocking_app(limit: usize, entered: Arc<Notify>, release: Arc<Notify>) -> Router {
        Router::new()
            .route(
                "/",
                get(move || {
                    let entered = entered.clone();
                    let release = release.clone();
                    async move {
                        entered.notify_one();
                        release.notified().await;
                        "done"
                    }
                }),
            )
            .layer(from_fn_with_state(ThrottleState::new(limit), throttle))
    }

    #[tokio::test]
    async fn test_上限に達している間は429を返し解放後は受け付ける() {
        // Arrange
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let app = blocking_app(1, entered.clone(), release.clone());
        let in_flight = tokio::spawn(app.clone().oneshot(request()));
        entered.notified().await;

        // Act
        let rejected = app.clone().oneshot(request()).await.unwrap();

        // Assert
        assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);
        let bytes = to_bytes(rejected.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "code": 429, "msg": "Too Many Requests", "data": null })
        );

        release.notify_one();
        assert_eq!(in_flight.await.unwrap().unwrap().status(), StatusCode::OK);

        release.notify_one();
        let accepted = app.oneshot(request()).await.unwrap();
        assert_eq!(accepted.status(), StatusCode::OK);
    }
}
