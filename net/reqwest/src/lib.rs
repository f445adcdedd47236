//! net_reqwest: `postboard_core` 向けのネットワーク層
//!
//! 役割
//! - `postboard_core::http::HttpClient` トレイトを reqwest で実装した“薄いラッパー”です。
//! - URL の組み立てや JSON のデコードはコア側の仕事で、ここでは送受信だけを行います。
//!
//! モジュール
//! - `http`: HTTPS に対応した GET クライアント（タイムアウト付き）。
//!
//! 使い方（例）
//! ```ignore
//! use net_reqwest::http::ReqwestClient;
//!
//! let client = ReqwestClient::new(Duration::from_secs(10))?;
//! let res = client.get(&url).await?;
//! ```

pub mod http;
