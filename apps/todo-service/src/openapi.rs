//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Todo API の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::OpenApi;

use crate::handler::{health, todo};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Todo の作成・取得・更新・論理削除を提供する API"
    ),
    paths(
        // health
        health::health_check,
        health::readiness_check,
        // todos
        todo::create_todo,
        todo::list_todos,
        todo::get_todo,
        todo::update_todo,
        todo::update_todo_status,
        todo::delete_todo,
    ),
    components(schemas(
        todo_shared::ErrorResponse,
        todo_domain::todo::TodoStatus,
    )),
    tags(
        (name = "health", description = "ヘルスチェック"),
        (name = "todos", description = "Todo 管理"),
    )
)]
pub struct ApiDoc;
