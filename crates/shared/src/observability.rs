//! # ログ出力
//!
//! `tracing-subscriber` の初期化を一箇所にまとめる。
//!
//! | 環境変数 | 値 | 既定 |
//! |----------|----|------|
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字を区別しない） | `pretty` |
//! | `RUST_LOG` | `EnvFilter` の書式 | [`DEFAULT_LOG_FILTER`] |

use std::{env, str::FromStr};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,todo_service=debug,todo_infra=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（ログ収集基盤向け）
    Json,
    /// 端末向けの整形出力
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(format!("未知のログ形式です: {s:?}")),
        }
    }
}

impl LogFormat {
    /// `LOG_FORMAT` を読む。未設定・未知の値なら `Pretty`
    ///
    /// subscriber 初期化前に呼ばれるため、未知の値の警告は stderr に直接出す。
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                eprintln!("{e}（pretty で出力します）");
                Self::Pretty
            }),
            Err(_) => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// 初期化ログに出すサービス名
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバル subscriber を登録する
///
/// プロセスで一度だけ呼ぶ。`tracing_error::ErrorLayer` を含むため、
/// インフラ層エラーの `SpanTrace` にスパン情報が記録される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let output = if config.log_format == LogFormat::Json {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ログ形式は大文字小文字を区別せずに解釈する() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" JSON ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    }

    #[test]
    fn test_未知のログ形式はエラーになる() {
        assert!("yaml".parse::<LogFormat>().is_err());
        assert!("".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_ログ形式の既定はpretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_tracing_configはサービス名と形式を保持する() {
        assert_eq!(
            TracingConfig::new("todo-service", LogFormat::Json),
            TracingConfig {
                service_name: "todo-service".to_string(),
                log_format:   LogFormat::Json,
            }
        );
    }
}
