//! db モジュール統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p todo-infra --test db_test
//! ```

use sqlx::PgPool;
use todo_infra::db;

#[sqlx::test(migrations = "../../migrations")]
async fn test_pingが成功する(pool: PgPool) {
    let result = db::ping(&pool).await;

    assert!(result.is_ok());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_マイグレーションは再実行しても成功する(pool: PgPool) {
    let result = db::run_migrations(&pool).await;

    assert!(result.is_ok());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ステータスのデフォルトはpending(pool: PgPool) {
    // Act
    let status: String =
        sqlx::query_scalar("INSERT INTO todo (title) VALUES ('x') RETURNING status::text")
            .fetch_one(&pool)
            .await
            .unwrap();

    // Assert
    assert_eq!(status, "PENDING");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_列挙値以外のステータスは拒否される(pool: PgPool) {
    let result = sqlx::query("INSERT INTO todo (title, status) VALUES ('x', 'DONE')")
        .execute(&pool)
        .await;

    assert!(result.is_err());
}
