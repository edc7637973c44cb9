//! # Todo Service 設定
//!
//! 環境変数から Todo Service サーバーの設定を読み込む。
//!
//! 起動時に `config.env`、続いて `.env` を dotenvy で読み込むため、
//! どちらのファイルに書いても環境変数として扱われる（既存の環境変数が優先）。
//!
//! 認証関連の項目（トークン有効期間・鍵）は読み込みのみで、現時点ではどこからも参照しない。

use std::env;

use thiserror::Error;

/// トークン有効期間のデフォルト（アクセストークン、秒）
const DEFAULT_ACCESS_TOKEN_DURATION_SECS: u64 = 15 * 60;

/// トークン有効期間のデフォルト（リフレッシュトークン、秒）
const DEFAULT_REFRESH_TOKEN_DURATION_SECS: u64 = 24 * 60 * 60;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Todo Service サーバーの設定
#[derive(Debug, Clone)]
pub struct TodoConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 認証設定（未使用）
    pub auth: AuthConfig,
}

/// 認証関連の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub access_token_duration_secs:  u64,
    pub refresh_token_duration_secs: u64,
    pub secret_key_hex:              Option<String>,
    pub public_key_hex:              Option<String>,
}

impl TodoConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストではプロセス環境を書き換えずに値を注入するために使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TODO_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse(&lookup, "TODO_PORT")?.ok_or(ConfigError::Missing("TODO_PORT"))?;
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host,
            port,
            database_url,
            auth: AuthConfig {
                access_token_duration_secs:  parse(&lookup, "ACCESS_TOKEN_DURATION_SECS")?
                    .unwrap_or(DEFAULT_ACCESS_TOKEN_DURATION_SECS),
                refresh_token_duration_secs: parse(&lookup, "REFRESH_TOKEN_DURATION_SECS")?
                    .unwrap_or(DEFAULT_REFRESH_TOKEN_DURATION_SECS),
                secret_key_hex:              lookup("SECRET_KEY_HEX"),
                public_key_hex:              lookup("PUBLIC_KEY_HEX"),
            },
        })
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 設定値をパースする。未設定なら `None`
fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
