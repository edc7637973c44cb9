//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use todo_domain::todo::{NewTodo, TodoStatus, TodoTitle};

/// テスト用の固定日時
///
/// PostgreSQL の TIMESTAMPTZ はマイクロ秒精度のため、秒単位の値を使う。
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// `test_now()` から指定秒数後の日時
pub fn test_later(secs: i64) -> DateTime<Utc> {
    test_now() + Duration::seconds(secs)
}

/// 説明なし・PENDING の挿入用 Todo を作成する
pub fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title:       TodoTitle::new(title).unwrap(),
        description: None,
        status:      TodoStatus::Pending,
        now:         test_now(),
    }
}
