//! # Todo ドメイン層
//!
//! Todo 管理のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）に一切依存しない。
//! ステータスの永続化形式（文字列）との相互変換も `FromStr` / `Display` で表現し、
//! sqlx の型には依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の抽象化
//! - [`error`] - ドメイン層エラー
//! - [`todo`] - Todo エンティティと値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::{DomainError, todo::TodoTitle};
//!
//! let title = TodoTitle::new("buy milk").unwrap();
//! assert_eq!(title.as_str(), "buy milk");
//!
//! let error = TodoTitle::new("").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! ```

pub mod clock;
pub mod error;
pub mod todo;

pub use error::DomainError;
