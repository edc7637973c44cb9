//! # Todo
//!
//! Todo エンティティと値オブジェクトを定義する。
//!
//! ## ライフサイクル
//!
//! ```text
//! 作成（id はストアが採番）
//!   → 更新（title / description / status）・ステータス更新
//!   → 論理削除（deleted_at を設定。行は残る）
//! ```
//!
//! 物理削除は存在しない。論理削除済みの Todo は一覧から除外されるが、
//! ID 指定の取得では引き続き返される。
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::Utc;
//! use todo_domain::todo::{NewTodo, TodoStatus, TodoTitle};
//!
//! let new_todo = NewTodo {
//!     title:       TodoTitle::new("buy milk").unwrap(),
//!     description: None,
//!     status:      TodoStatus::default(),
//!     now:         Utc::now(),
//! };
//! assert_eq!(new_todo.status, TodoStatus::Pending);
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// タイトルの最大文字数
pub const MAX_TITLE_LENGTH: usize = 255;

// =========================================================================
// TodoId
// =========================================================================

/// Todo の識別子
///
/// ストア（`BIGSERIAL`）が採番する整数。作成後は変化しない。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    /// パスパラメータ等の文字列から ID をパースする
    ///
    /// 数値として解釈できない場合はバリデーションエラー。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::Validation(format!("不正な Todo ID: {s}")))
    }
}

// =========================================================================
// TodoTitle
// =========================================================================

/// Todo のタイトル（値オブジェクト）
///
/// # 不変条件
///
/// - 空白のみ・空文字列ではない
/// - 最大 255 文字
/// - 制御文字（NUL、改行、タブなど）を含まない
///
/// 入力値はトリムせずにそのまま保持する（送信された値と永続化される値を一致させる）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::Validation("タイトルは必須です".to_string()));
        }

        if value.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::Validation(format!(
                "タイトルは {MAX_TITLE_LENGTH} 文字以内である必要があります"
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(DomainError::Validation(
                "タイトルに制御文字は使用できません".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 説明文を検証する
///
/// 空文字列は許可する。PostgreSQL の `TEXT` は NUL 文字を格納できないため拒否する。
pub fn validate_description(value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(text) if text.contains('\0') => Err(DomainError::Validation(
            "説明に NUL 文字は使用できません".to_string(),
        )),
        _ => Ok(()),
    }
}

// =========================================================================
// TodoStatus
// =========================================================================

/// Todo のステータス
///
/// 永続化・JSON ともに大文字の文字列（`PENDING` など）で表現する。
/// 列挙値以外はデシリアライズ時点で拒否される。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TodoStatus {
    /// 未着手
    #[default]
    Pending,
    /// 完了
    Completed,
    /// 進行中
    Progress,
}

impl FromStr for TodoStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "PROGRESS" => Ok(Self::Progress),
            _ => Err(DomainError::Validation(format!(
                "不正な Todo ステータス: {s}"
            ))),
        }
    }
}

// =========================================================================
// Todo（エンティティ）
// =========================================================================

/// 挿入前の Todo
///
/// ID はストアが採番するため、この時点では持たない。
/// `now` は `created_at` と `updated_at` の両方に使われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title:       TodoTitle,
    pub description: Option<String>,
    pub status:      TodoStatus,
    pub now:         DateTime<Utc>,
}

/// DB から Todo を復元する際のレコード
#[derive(Debug, Clone)]
pub struct TodoRecord {
    pub id:          TodoId,
    pub title:       TodoTitle,
    pub description: Option<String>,
    pub status:      TodoStatus,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
    pub deleted_at:  Option<DateTime<Utc>>,
}

/// Todo エンティティ
///
/// # 不変条件
///
/// - `id` は作成後に変化しない
/// - `updated_at >= created_at`
/// - `updated_at` は更新のたびに単調非減少
/// - `deleted_at` が `Some` なら論理削除済み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:          TodoId,
    title:       TodoTitle,
    description: Option<String>,
    status:      TodoStatus,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    deleted_at:  Option<DateTime<Utc>>,
}

impl Todo {
    /// データベースから Todo を復元する
    pub fn from_db(record: TodoRecord) -> Self {
        Self {
            id:          record.id,
            title:       record.title,
            description: record.description,
            status:      record.status,
            created_at:  record.created_at,
            updated_at:  record.updated_at,
            deleted_at:  record.deleted_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// 論理削除済みか
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    // ビジネスロジックメソッド

    /// タイトル・説明・ステータスを上書きした新しい状態を返す
    pub fn updated(
        self,
        title: TodoTitle,
        description: Option<String>,
        status: TodoStatus,
        now: DateTime<Utc>,
    ) -> Self {
        let updated_at = self.next_updated_at(now);
        Self {
            title,
            description,
            status,
            updated_at,
            ..self
        }
    }

    /// ステータスのみを変更した新しい状態を返す
    pub fn with_status(self, status: TodoStatus, now: DateTime<Utc>) -> Self {
        let updated_at = self.next_updated_at(now);
        Self {
            status,
            updated_at,
            ..self
        }
    }

    /// 論理削除した新しい状態を返す
    ///
    /// `updated_at` は変更しない（削除は内容の更新ではない）。
    pub fn soft_deleted(self, now: DateTime<Utc>) -> Self {
        Self {
            deleted_at: Some(now),
            ..self
        }
    }

    /// 時計が巻き戻っても `updated_at` が後退しないようにする
    fn next_updated_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.updated_at)
    }
}
