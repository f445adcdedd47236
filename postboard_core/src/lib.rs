//! postboard_core: 社員の投稿ページを組み立てる“コア”ライブラリ
//!
//! 目的（なにを入れる？）
//! - デモ用 REST API（ユーザー / 投稿 / コメント）から取ってきたデータを、
//!   メモリ上の DOM ツリーへ組み立てるロジックをまとめる場所です。
//! - 実ブラウザの DOM の代わりに、`Rc<RefCell<Node>>` で組んだ小さな DOM モデルを使います。
//!   そのため、ブラウザが無くても（テストでも）同じ手順でページを作れます。
//!
//! モジュール構成
//! - `error`:
//!   - 共有の `Error` 型と、API 呼び出し専用の `ApiError`。
//! - `constants` / `config`:
//!   - API の URL やラベル文字列などの固定値と、実行時に変えられる設定。
//! - `url` / `http`:
//!   - URL の分解・組み立てと、HTTP レスポンスの表現。実際の送受信は `net_reqwest` が担当。
//! - `api`:
//!   - 4 つの GET（全ユーザー / ユーザー / ユーザーの投稿 / 投稿のコメント）を行うクライアント。
//! - `renderer`:
//!   - DOM 本体（`dom`）、要素ビルダー（`builder`）、投稿・コメントの組み立て（`section`）、
//!     ページ全体を操作するコントローラ（`page`）。
//! - `app`:
//!   - 起動処理。ホストページの用意と、セレクトボックスの change イベントの配線。
//!
//! 使い方（超ミニ例）
//! ```ignore
//! let window = Window::new();
//! mount_host_page(&window, &config)?;
//! let mut app = App::new(window, client, config);
//! app.init().await?;
//! app.select_user(1)?;
//! app.process_selection().await?;
//! ```
//!
//! メモ（設計指針）
//! - 失敗は `panic!` ではなく `Result` で上位に伝えます。
//! - ネットワーク I/O は上位クレートに任せ、ここは `HttpClient` トレイト越しに呼ぶだけにします。

pub mod api;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod renderer;
pub mod url;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
