//! # ルーター構築
//!
//! ルート定義とミドルウェアスタックを組み立てる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## ミドルウェア（外側から順に）
//!
//! 1. パス正規化（末尾スラッシュの除去、連続スラッシュと `.` / `..` の解決、[`into_service`]）
//! 2. CORS
//! 3. トレーシング（`TraceLayer`）
//! 4. パニック捕捉（500 を返す）
//! 5. リクエストタイムアウト（60 秒、408 を返す）
//! 6. 同時処理数の制限（100、超過分は待たせずに 429）
//! 7. レスポンス圧縮

use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    Router,
    extract::Request,
    http::{HeaderName, Method, StatusCode, header},
    middleware::from_fn_with_state,
    routing::{get, put},
};
use tower::{
    Layer,
    util::{MapRequest, MapRequestLayer},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    handler::{
        ReadinessState,
        TodoState,
        create_todo,
        delete_todo,
        get_todo,
        health_check,
        list_todos,
        readiness_check,
        update_todo,
        update_todo_status,
    },
    middleware::{ThrottleState, clean_path, throttle},
    openapi::ApiDoc,
};

/// リクエストタイムアウト
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// 同時に処理するリクエスト数の上限
pub const MAX_CONCURRENT_REQUESTS: usize = 100;

/// CORS プリフライト結果のキャッシュ期間
const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// パス正規化を含めたアプリケーション全体のサービス
pub type AppService = NormalizePath<MapRequest<Router, fn(Request) -> Request>>;

/// ルートとミドルウェアを組み立てる
pub fn build_app(todo_state: Arc<TodoState>, readiness_state: Arc<ReadinessState>) -> Router {
    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(todo_routes(todo_state));

    with_middleware(routes)
}

fn with_middleware(routes: Router) -> Router {
    routes
        .layer(CompressionLayer::new())
        .layer(from_fn_with_state(
            ThrottleState::new(MAX_CONCURRENT_REQUESTS),
            throttle,
        ))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// パスを正規化してからルーティングするサービスに変換する
///
/// ルーティング前にパスを書き換える必要があるため、`Router::layer` ではなく
/// Router 全体を包む。
pub fn into_service(router: Router) -> AppService {
    let cleaned = MapRequestLayer::new(clean_path as fn(Request) -> Request).layer(router);
    NormalizePathLayer::trim_trailing_slash().layer(cleaned)
}

/// `axum::serve` に渡せる形に変換する
pub fn into_make_service(router: Router) -> axum::routing::IntoMakeService<AppService> {
    axum::ServiceExt::<Request>::into_make_service(into_service(router))
}

fn todo_routes(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/v1/todos/{id}/status", put(update_todo_status))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

/// 生成済みの OpenAPI ドキュメントを返す
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
