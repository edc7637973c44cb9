//! # Todo Service サーバー
//!
//! Todo の CRUD を HTTP/JSON で提供する API サーバー。
//!
//! ## 起動シーケンス
//!
//! ```text
//! config.env / .env 読み込み → トレーシング初期化 → 設定読み込み
//!   → 接続プール作成 + マイグレーション → DI 構築 → サーバー起動
//! ```
//!
//! 設定・接続・マイグレーションのいずれかに失敗した場合は、
//! リクエストを受け付ける前に非ゼロで終了する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TODO_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `TODO_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_FORMAT` | No | `json` で JSON ログ（デフォルト: pretty） |
//! | `RUST_LOG` | No | ログレベル |
//!
//! ## 起動方法
//!
//! ```bash
//! TODO_PORT=8080 DATABASE_URL=postgres://... cargo run -p todo-service --release
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use todo_domain::clock::SystemClock;
use todo_infra::{db, repository::PostgresTodoRepository};
use todo_service::{
    config::TodoConfig,
    handler::{ReadinessState, TodoState},
    router,
    usecase::TodoUseCaseImpl,
};
use todo_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 設定ファイルを読み込む（存在する場合）。既存の環境変数が優先される
    dotenvy::from_filename("config.env").ok();
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("todo-service"));

    let config = TodoConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Todo Service サーバーを起動します: {}",
        config.bind_address()
    );

    let pool = db::open(&config.database_url)
        .await
        .context("データベースの初期化に失敗しました")?;
    tracing::info!("データベースに接続しました");

    // 依存コンポーネントを初期化
    let todo_repository = Arc::new(PostgresTodoRepository::new(pool.clone()));
    let usecase = TodoUseCaseImpl::new(todo_repository, Arc::new(SystemClock));
    let todo_state = Arc::new(TodoState { usecase });
    let readiness_state = Arc::new(ReadinessState { pool });

    let app = router::build_app(todo_state, readiness_state);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("{} へのバインドに失敗しました", config.bind_address()))?;
    tracing::info!("Todo Service サーバーが起動しました: {}", listener.local_addr()?);

    axum::serve(listener, router::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Todo Service サーバーを停止しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を待つ
///
/// シグナル受信後は新規接続の受け付けを止め、処理中のリクエストの完了を待つ。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl-C ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
