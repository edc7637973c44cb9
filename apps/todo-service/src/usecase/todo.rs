//! Todo 管理ユースケース
//!
//! 更新・ステータス更新・削除は「取得 → 書き込み」の 2 ステップで行い、
//! トランザクションは張らない。取得と書き込みの間に同じ行が更新された場合は後勝ちになる。

use std::sync::Arc;

use todo_domain::{
    DomainError,
    clock::Clock,
    todo::{NewTodo, Todo, TodoId, TodoStatus, TodoTitle, validate_description},
};
use todo_infra::repository::TodoRepository;

use crate::error::TodoServiceError;

/// Todo 作成の入力
pub struct CreateTodoInput {
    pub title:       String,
    pub description: Option<String>,
    pub status:      TodoStatus,
}

/// Todo 更新の入力
///
/// title / description / status をすべて上書きする。
/// `description: None` は説明を削除する。
pub struct UpdateTodoInput {
    pub title:       String,
    pub description: Option<String>,
    pub status:      TodoStatus,
}

/// Todo 管理ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
    clock:           Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            todo_repository,
            clock,
        }
    }

    /// Todo を作成する
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, TodoServiceError> {
        validate_description(input.description.as_deref())?;
        let new_todo = NewTodo {
            title:       TodoTitle::new(input.title)?,
            description: input.description,
            status:      input.status,
            now:         self.clock.now(),
        };

        let todo = self.todo_repository.insert(&new_todo).await?;
        tracing::info!(id = %todo.id(), "Todo を作成しました");
        Ok(todo)
    }

    /// 論理削除されていない Todo を ID 昇順で取得する
    pub async fn list_todos(&self) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = self.todo_repository.find_all_active().await?;
        Ok(todos)
    }

    /// ID で Todo を取得する
    ///
    /// 論理削除済みの Todo も返す。
    pub async fn get_todo(&self, id: TodoId) -> Result<Todo, TodoServiceError> {
        self.find_existing(id).await
    }

    /// Todo の title / description / status を更新する
    pub async fn update_todo(
        &self,
        id: TodoId,
        input: UpdateTodoInput,
    ) -> Result<Todo, TodoServiceError> {
        let title = TodoTitle::new(input.title)?;
        validate_description(input.description.as_deref())?;
        let current = self.find_existing(id).await?;

        let changed = current.updated(title, input.description, input.status, self.clock.now());
        let todo = self
            .todo_repository
            .update(&changed)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(%id, "Todo を更新しました");
        Ok(todo)
    }

    /// Todo のステータスのみを更新する
    pub async fn update_todo_status(
        &self,
        id: TodoId,
        status: TodoStatus,
    ) -> Result<Todo, TodoServiceError> {
        let current = self.find_existing(id).await?;

        let changed = current.with_status(status, self.clock.now());
        let todo = self
            .todo_repository
            .update(&changed)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(%id, %status, "Todo のステータスを更新しました");
        Ok(todo)
    }

    /// Todo を論理削除する
    ///
    /// 削除済みの Todo に対しても成功し、`deleted_at` を現在時刻で上書きする。
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), TodoServiceError> {
        self.find_existing(id).await?;

        let deleted_at = self.clock.now();
        if !self.todo_repository.soft_delete(id, deleted_at).await? {
            return Err(not_found(id));
        }

        tracing::info!(%id, "Todo を論理削除しました");
        Ok(())
    }

    async fn find_existing(&self, id: TodoId) -> Result<Todo, TodoServiceError> {
        self.todo_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: TodoId) -> TodoServiceError {
    DomainError::NotFound {
        entity_type: "Todo",
        id:          id.to_string(),
    }
    .into()
}
