//! # テスト用モックリポジトリ
//!
//! ユースケーステスト・ハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use todo_domain::todo::{NewTodo, Todo, TodoId, TodoRecord};

use crate::{error::InfraError, repository::TodoRepository};

// ===== MockTodoRepository =====

/// PostgreSQL 実装と同じ採番・絞り込み規則で振る舞うインメモリ実装
///
/// ID は 1 から連番で採番する。クローンは同じストアを共有する。
#[derive(Clone)]
pub struct MockTodoRepository {
    todos:   Arc<Mutex<Vec<Todo>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for MockTodoRepository {
    fn default() -> Self {
        Self {
            todos:   Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の Todo を直接登録する（テストの前提データ用）
    pub fn add_todo(&self, todo: Todo) {
        self.next_id
            .fetch_max(todo.id().as_i64() + 1, Ordering::SeqCst);
        self.todos.lock().unwrap().push(todo);
    }

    /// 現在のストアの内容を ID 昇順で取得する（論理削除済みも含む）
    pub fn snapshot(&self) -> Vec<Todo> {
        let mut todos = self.todos.lock().unwrap().clone();
        todos.sort_by_key(Todo::id);
        todos
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let inserted = Todo::from_db(TodoRecord {
            id:          TodoId::new(id),
            title:       todo.title.clone(),
            description: todo.description.clone(),
            status:      todo.status,
            created_at:  todo.now,
            updated_at:  todo.now,
            deleted_at:  None,
        });
        self.todos.lock().unwrap().push(inserted.clone());
        Ok(inserted)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn find_all_active(&self) -> Result<Vec<Todo>, InfraError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|t| !t.is_deleted())
            .collect())
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        let Some(stored) = todos.iter_mut().find(|t| t.id() == todo.id()) else {
            return Ok(None);
        };

        // 書き込むのは title / description / status / updated_at のみ
        let merged = Todo::from_db(TodoRecord {
            id:          stored.id(),
            title:       todo.title().clone(),
            description: todo.description().map(str::to_string),
            status:      todo.status(),
            created_at:  stored.created_at(),
            updated_at:  todo.updated_at(),
            deleted_at:  stored.deleted_at(),
        });
        *stored = merged.clone();
        Ok(Some(merged))
    }

    async fn soft_delete(
        &self,
        id: TodoId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        let Some(stored) = todos.iter_mut().find(|t| t.id() == id) else {
            return Ok(false);
        };
        *stored = stored.clone().soft_deleted(deleted_at);
        Ok(true)
    }
}

// ===== FailingTodoRepository =====

/// すべての操作がストアエラーを返す実装
///
/// 500 応答やエラーログ出力の検証に使用する。
#[derive(Clone, Copy, Default)]
pub struct FailingTodoRepository;

impl FailingTodoRepository {
    fn error() -> InfraError {
        InfraError::from(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl TodoRepository for FailingTodoRepository {
    async fn insert(&self, _todo: &NewTodo) -> Result<Todo, InfraError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: TodoId) -> Result<Option<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn find_all_active(&self) -> Result<Vec<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn update(&self, _todo: &Todo) -> Result<Option<Todo>, InfraError> {
        Err(Self::error())
    }

    async fn soft_delete(
        &self,
        _id: TodoId,
        _deleted_at: DateTime<Utc>,
    ) -> Result<bool, InfraError> {
        Err(Self::error())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use todo_domain::todo::{TodoStatus, TodoTitle};

    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title:       TodoTitle::new(title).unwrap(),
            description: None,
            status:      TodoStatus::Pending,
            now:         DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insertは1から連番でidを採番する() {
        let sut = MockTodoRepository::new();

        let first = sut.insert(&new_todo("a")).await.unwrap();
        let second = sut.insert(&new_todo("b")).await.unwrap();

        assert_eq!(first.id(), TodoId::new(1));
        assert_eq!(second.id(), TodoId::new(2));
    }

    #[tokio::test]
    async fn test_論理削除済みは一覧に含まれないがid指定では取得できる() {
        let sut = MockTodoRepository::new();
        let kept = sut.insert(&new_todo("kept")).await.unwrap();
        let removed = sut.insert(&new_todo("removed")).await.unwrap();

        let deleted = sut
            .soft_delete(removed.id(), Utc::now())
            .await
            .unwrap();

        assert!(deleted);
        let active = sut.find_all_active().await.unwrap();
        assert_eq!(active, vec![kept]);
        let found = sut.find_by_id(removed.id()).await.unwrap().unwrap();
        assert!(found.is_deleted());
    }

    #[tokio::test]
    async fn test_存在しないidの更新と削除は該当なしを返す() {
        let sut = MockTodoRepository::new();
        let ghost = sut.insert(&new_todo("ghost")).await.unwrap();
        let other = MockTodoRepository::new();

        assert_eq!(other.update(&ghost).await.unwrap(), None);
        assert!(!other.soft_delete(ghost.id(), Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_todo後の採番は既存idの次から始まる() {
        let seed = MockTodoRepository::new();
        let mut existing = seed.insert(&new_todo("seed")).await.unwrap();
        for _ in 0..4 {
            existing = seed.insert(&new_todo("seed")).await.unwrap();
        }
        let sut = MockTodoRepository::new();
        sut.add_todo(existing);

        let inserted = sut.insert(&new_todo("next")).await.unwrap();

        assert_eq!(inserted.id(), TodoId::new(6));
    }
}
