//! # リポジトリ実装
//!
//! ドメインエンティティの永続化を担当するリポジトリトレイトと、
//! その PostgreSQL 実装を提供する。
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存し、`Arc<dyn Trait>` で注入される
//! - **テスタビリティ**: `test-utils` feature でインメモリ実装を利用可能

pub mod todo_repository;

pub use todo_repository::{PostgresTodoRepository, TodoRepository};
