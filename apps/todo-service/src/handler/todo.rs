//! # Todo API ハンドラ
//!
//! Todo の作成・一覧・取得・更新・ステータス更新・論理削除を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/v1/todos` - 作成
//! - `GET /api/v1/todos` - 一覧（論理削除済みを除く）
//! - `GET /api/v1/todos/{id}` - 取得（論理削除済みも含む）
//! - `PUT /api/v1/todos/{id}` - 更新
//! - `PUT /api/v1/todos/{id}/status` - ステータス更新
//! - `DELETE /api/v1/todos/{id}` - 論理削除（`204 No Content`、ボディなし）

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_domain::todo::{Todo, TodoStatus};
use todo_shared::{ApiResponse, ErrorResponse};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::TodoServiceError,
    extract::{TodoIdPath, ValidatedJson},
    usecase::{CreateTodoInput, TodoUseCaseImpl, UpdateTodoInput},
};

// --- リクエスト型 ---

/// Todo 作成・更新リクエスト
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TodoForm {
    #[validate(length(min = 1, max = 255))]
    pub title:       String,
    #[serde(default)]
    pub description: Option<String>,
    pub status:      TodoStatus,
}

/// ステータス更新リクエスト
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusForm {
    pub status: TodoStatus,
}

// --- レスポンス型 ---

/// Todo レスポンス
///
/// `description` は未設定（空文字列を含む）の場合、`deleted_at` は未削除の場合に省略する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoDto {
    pub id:          i64,
    pub title:       String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status:      TodoStatus,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at:  Option<DateTime<Utc>>,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:          todo.id().as_i64(),
            title:       todo.title().to_string(),
            description: todo
                .description()
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            status:      todo.status(),
            created_at:  todo.created_at(),
            updated_at:  todo.updated_at(),
            deleted_at:  todo.deleted_at(),
        }
    }
}

// --- State ---

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- ハンドラ ---

/// POST /api/v1/todos
///
/// Todo を作成する。
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    tag = "todos",
    request_body = TodoForm,
    responses(
        (status = 200, description = "作成成功", body = ApiResponse<TodoDto>),
        (status = 400, description = "バリデーションエラー", body = ErrorResponse),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    ValidatedJson(form): ValidatedJson<TodoForm>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let input = CreateTodoInput {
        title:       form.title,
        description: form.description,
        status:      form.status,
    };

    let todo = state.usecase.create_todo(input).await?;
    Ok(Json(ApiResponse::ok(TodoDto::from(&todo))))
}

/// GET /api/v1/todos
///
/// 論理削除されていない Todo を ID 昇順で返す。
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    tag = "todos",
    responses(
        (status = 200, description = "Todo 一覧", body = ApiResponse<Vec<TodoDto>>),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let todos = state.usecase.list_todos().await?;
    let dtos: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();
    Ok(Json(ApiResponse::ok(dtos)))
}

/// GET /api/v1/todos/{id}
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo 詳細（論理削除済みも含む）", body = ApiResponse<TodoDto>),
        (status = 400, description = "不正な ID", body = ErrorResponse),
        (status = 404, description = "Todo が見つからない", body = ErrorResponse),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_todo(
    State(state): State<Arc<TodoState>>,
    TodoIdPath(id): TodoIdPath,
) -> Result<impl IntoResponse, TodoServiceError> {
    let todo = state.usecase.get_todo(id).await?;
    Ok(Json(ApiResponse::ok(TodoDto::from(&todo))))
}

/// PUT /api/v1/todos/{id}
///
/// title / description / status を上書きする。
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = TodoForm,
    responses(
        (status = 200, description = "更新成功", body = ApiResponse<TodoDto>),
        (status = 400, description = "不正な ID またはバリデーションエラー", body = ErrorResponse),
        (status = 404, description = "Todo が見つからない", body = ErrorResponse),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    TodoIdPath(id): TodoIdPath,
    ValidatedJson(form): ValidatedJson<TodoForm>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let input = UpdateTodoInput {
        title:       form.title,
        description: form.description,
        status:      form.status,
    };

    let todo = state.usecase.update_todo(id, input).await?;
    Ok(Json(ApiResponse::ok(TodoDto::from(&todo))))
}

/// PUT /api/v1/todos/{id}/status
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}/status",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateStatusForm,
    responses(
        (status = 200, description = "ステータス更新成功", body = ApiResponse<TodoDto>),
        (status = 400, description = "不正な ID またはステータス", body = ErrorResponse),
        (status = 404, description = "Todo が見つからない", body = ErrorResponse),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_todo_status(
    State(state): State<Arc<TodoState>>,
    TodoIdPath(id): TodoIdPath,
    ValidatedJson(form): ValidatedJson<UpdateStatusForm>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let todo = state.usecase.update_todo_status(id, form.status).await?;
    Ok(Json(ApiResponse::ok(TodoDto::from(&todo))))
}

/// DELETE /api/v1/todos/{id}
///
/// 論理削除する。成功時はボディなしの `204 No Content`。
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "削除成功"),
        (status = 400, description = "不正な ID", body = ErrorResponse),
        (status = 404, description = "Todo が見つからない", body = ErrorResponse),
        (status = 500, description = "ストアエラー", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    TodoIdPath(id): TodoIdPath,
) -> Result<impl IntoResponse, TodoServiceError> {
    state.usecase.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use todo_domain::todo::{TodoId, TodoRecord, TodoTitle};

    use super::*;

    fn todo(description: Option<&str>, deleted: bool) -> Todo {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Todo::from_db(TodoRecord {
            id: TodoId::new(1),
            title: TodoTitle::new("buy milk").unwrap(),
            description: description.map(str::to_string),
            status: TodoStatus::Pending,
            created_at: at,
            updated_at: at,
            deleted_at: deleted.then_some(at),
        })
    }

    #[test]
    fn test_dtoは未設定の説明と削除日時を省略する() {
        let dto = TodoDto::from(&todo(None, false));

        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "id": 1,
                "title": "buy milk",
                "status": "PENDING",
                "created_at": "2023-11-14T22:13:20Z",
                "updated_at": "2023-11-14T22:13:20Z"
            })
        );
    }

    #[test]
    fn test_dtoは空文字列の説明も省略する() {
        let dto = TodoDto::from(&todo(Some(""), false));

        assert_eq!(dto.description, None);
    }

    #[test]
    fn test_dtoは説明と削除日時を出力する() {
        let dto = TodoDto::from(&todo(Some("2 liters"), true));
        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(value["description"], json!("2 liters"));
        assert_eq!(value["deleted_at"], json!("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_todo_formは空タイトルを検証エラーにする() {
        let form: TodoForm =
            serde_json::from_value(json!({ "title": "", "status": "PENDING" })).unwrap();

        assert!(form.validate().is_err());
    }

    #[test]
    fn test_todo_formは説明を省略できる() {
        let form: TodoForm =
            serde_json::from_value(json!({ "title": "buy milk", "status": "PROGRESS" })).unwrap();

        assert!(form.validate().is_ok());
        assert_eq!(form.description, None);
        assert_eq!(form.status, TodoStatus::Progress);
    }
}
