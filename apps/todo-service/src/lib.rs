//! # Todo Service ライブラリ
//!
//! Todo API サーバーの設定・ハンドラ・ユースケース・ルーターを公開する。
//! `main.rs` と統合テスト（`tests/`）の双方から利用する。
//!
//! ## モジュール構成
//!
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `extract`: ボディの検証・パスパラメータの extractor
//! - `handler`: HTTP ハンドラ
//! - `middleware`: パス正規化・同時処理数の制限
//! - `openapi`: OpenAPI 仕様定義
//! - `router`: ルートとミドルウェアの構築
//! - `usecase`: ビジネスロジック

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod usecase;
