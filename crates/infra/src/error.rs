//! # インフラ層エラー定義
//!
//! PostgreSQL とのやり取りで発生するエラーを表す。
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）に加えて、生成時点の [`SpanTrace`] を保持する。
//! リポジトリメソッドは `#[tracing::instrument]` されているため、
//! ログに出した SpanTrace からどの操作・どの ID で失敗したかを辿れる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// SQL 実行・接続・制約違反などのデータベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 起動時のスキーマ適用の失敗
    #[error("マイグレーションエラー: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// 行の値がドメインの制約を満たさない
    ///
    /// 列挙値外のステータスや空のタイトルなど、アプリケーション外から書き込まれた行で起こる。
    #[error("不正な行データ: {column} = {value:?}")]
    InvalidRow { column: &'static str, value: String },
}

impl InfraError {
    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// 不正な行データのエラーを生成する
    pub fn invalid_row(column: &'static str, value: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::InvalidRow {
            column,
            value: value.into(),
        })
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\n{}", self.kind, self.span_trace)
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::new(InfraErrorKind::Database(source))
    }
}

impl From<sqlx::migrate::MigrateError> for InfraError {
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::new(InfraErrorKind::Migration(source))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    #[test]
    fn test_エラー生成時のスパンがspan_traceに残る() {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        let span = tracing::debug_span!("soft_delete", id = 7);
        let _entered = span.enter();

        let err = InfraError::from(sqlx::Error::PoolTimedOut);

        assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
        let trace = err.span_trace().to_string();
        assert!(trace.contains("soft_delete"), "span trace: {trace}");
    }

    #[test]
    fn test_invalid_rowは列名と値をメッセージに含める() {
        let err = InfraError::invalid_row("status", "ARCHIVED");

        assert_eq!(err.to_string(), r#"不正な行データ: status = "ARCHIVED""#);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_データベースエラーは元のsqlxエラーをsourceに持つ() {
        let err = InfraError::from(sqlx::Error::RowNotFound);

        let source = err.source().unwrap();
        assert!(source.downcast_ref::<sqlx::Error>().is_some());
    }
}
