//! postboard/bin: 投稿ビューアの入口
//!
//! 流れ（最小）
//! 1) ログを用意する（`RUST_LOG` で出力レベルを変更可。既定は info）
//! 2) reqwest のクライアントと `DataClient` を作る
//! 3) 空の文書にホストページ（セレクトボックス + main）を組み立てる
//! 4) `App::init` でユーザー一覧を読み込む
//! 5) 既定のユーザーを選んだことにして投稿を表示する
//! 6) できあがった DOM ツリーを標準出力に書き出す
//!
//! ログは標準エラーに出るので、DOM の出力とは混ざりません。

use net_reqwest::http::ReqwestClient;
use postboard_core::api::client::DataClient;
use postboard_core::app::mount_host_page;
use postboard_core::app::App;
use postboard_core::config::Config;
use postboard_core::error::Error;
use postboard_core::renderer::dom::node::Window;
use postboard_core::utils::convert_dom_to_string;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: Config) -> Result<Window, Error> {
    let http = ReqwestClient::new(config.request_timeout)?;
    let client = DataClient::new(Rc::new(http), &config.base_url)?;

    let window = Window::new();
    mount_host_page(&window, &config)?;

    let default_user_id = config.default_user_id;
    let mut app = App::new(window.clone(), client, config);
    let users = app.init().await?;
    info!(count = users.len(), "employees loaded");

    app.select_user(default_user_id)?;
    app.process_selection().await?;
    Ok(window)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    match run(Config::default()).await {
        Ok(window) => {
            println!("{}", convert_dom_to_string(&Some(window.document())));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "postboard failed");
            ExitCode::FAILURE
        }
    }
}
