//! # TodoRepository
//!
//! `todo` テーブルに対する型付き CRUD を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **論理削除**: 物理削除は提供しない。`deleted_at` の設定のみ
//! - **一覧は未削除のみ**: `deleted_at IS NULL` で絞り込む。ID 指定の取得は削除状態を問わない
//! - **書き込み結果は RETURNING で返す**: 返却値は常に永続化された行と一致する
//! - **ステータスはテキストで受け渡し**: PostgreSQL の `todo_status` 列挙型とは
//!   SQL 側のキャストで相互変換し、ドメイン層を sqlx の型から切り離す
//!
//! ## 既知の制約
//!
//! ユースケース層の更新・削除は「取得 → 書き込み」の 2 ステップで、
//! トランザクションや楽観的ロックは使用しない。同一行への同時更新は後勝ちになる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo_domain::todo::{NewTodo, Todo, TodoId, TodoRecord, TodoStatus, TodoTitle};

use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todo を挿入し、採番された ID を含む永続化後の状態を返す
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError>;

    /// ID で Todo を検索する（論理削除済みも含む）
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError>;

    /// 論理削除されていない Todo を ID 昇順で取得する
    async fn find_all_active(&self) -> Result<Vec<Todo>, InfraError>;

    /// title / description / status / updated_at を書き込む
    ///
    /// 対象行が存在しない場合は `None` を返す。
    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError>;

    /// `deleted_at` を設定する
    ///
    /// 対象行が存在しない場合は `false` を返す。
    async fn soft_delete(&self, id: TodoId, deleted_at: DateTime<Utc>)
    -> Result<bool, InfraError>;
}

/// DB の todo テーブルの行を表す中間構造体
///
/// `TryFrom` で `Todo` への変換ロジックを一箇所に集約する。
/// `status` は列挙型のままでは `String` にデコードできないため、各クエリで `status::text` として取得する。
#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id:          i64,
    title:       String,
    description: Option<String>,
    status:      String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    deleted_at:  Option<DateTime<Utc>>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = InfraError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TodoStatus>()
            .map_err(|_| InfraError::invalid_row("status", row.status.as_str()))?;
        let title = TodoTitle::new(row.title.as_str())
            .map_err(|_| InfraError::invalid_row("title", row.title.as_str()))?;

        Ok(Todo::from_db(TodoRecord {
            id:          TodoId::new(row.id),
            title,
            description: row.description,
            status,
            created_at:  row.created_at,
            updated_at:  row.updated_at,
            deleted_at:  row.deleted_at,
        }))
    }
}

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(status = %todo.status))]
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError> {
        let status: &'static str = todo.status.into();
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todo (title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3::todo_status, $4, $4)
            RETURNING
                id,
                title,
                description,
                status::text AS status,
                created_at,
                updated_at,
                deleted_at
            "#,
        )
        .bind(todo.title.as_str())
        .bind(todo.description.as_deref())
        .bind(status)
        .bind(todo.now)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT
                id,
                title,
                description,
                status::text AS status,
                created_at,
                updated_at,
                deleted_at
            FROM todo
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all_active(&self) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT
                id,
                title,
                description,
                status::text AS status,
                created_at,
                updated_at,
                deleted_at
            FROM todo
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id()))]
    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError> {
        let status: &'static str = todo.status().into();
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todo
            SET title = $2, description = $3, status = $4::todo_status, updated_at = $5
            WHERE id = $1
            RETURNING
                id,
                title,
                description,
                status::text AS status,
                created_at,
                updated_at,
                deleted_at
            "#,
        )
        .bind(todo.id().as_i64())
        .bind(todo.title().as_str())
        .bind(todo.description())
        .bind(status)
        .bind(todo.updated_at())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn soft_delete(
        &self,
        id: TodoId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE todo
            SET deleted_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, title: &str) -> TodoRow {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        TodoRow {
            id: 7,
            title: title.to_string(),
            description: Some("memo".to_string()),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_行からtodoに変換できる() {
        let todo = Todo::try_from(row("PROGRESS", "buy milk")).unwrap();

        assert_eq!(todo.id(), TodoId::new(7));
        assert_eq!(todo.title().as_str(), "buy milk");
        assert_eq!(todo.description(), Some("memo"));
        assert_eq!(todo.status(), TodoStatus::Progress);
        assert!(!todo.is_deleted());
    }

    #[test]
    fn test_列挙値外のステータスは不正な行データになる() {
        let err = Todo::try_from(row("ARCHIVED", "buy milk")).unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::error::InfraErrorKind::InvalidRow { column: "status", .. }
        ));
    }

    #[test]
    fn test_空のタイトルは不正な行データになる() {
        let err = Todo::try_from(row("PENDING", "  ")).unwrap_err();

        assert_eq!(err.to_string(), r#"不正な行データ: title = "  ""#);
    }

    #[test]
    fn test_postgres_todo_repositoryはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresTodoRepository>();
        assert_send_sync::<Box<dyn TodoRepository>>();
    }
}
