//! net_reqwest::http: reqwest を使った GET クライアント
//!
//! 入出力
//! - 入力: `HttpClient::get(&Url)`（例: "https://jsonplaceholder.typicode.com/users"）。
//! - 出力: `Result<HttpResponse, Error>`。2xx 以外でも `Ok` で返し、判定は呼び出し側に任せます。
//!   接続・タイムアウト・本文の読み込みに失敗したときは `Error::Network`。
//!
//! 注意
//! - リダイレクトは reqwest の既定（最大 10 回）に従います。
//! - 本文は UTF-8 の文字列として読みます。

use async_trait::async_trait;
use postboard_core::error::Error;
use postboard_core::http::Header;
use postboard_core::http::HttpClient;
use postboard_core::http::HttpResponse;
use postboard_core::url::Url;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("postboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// `timeout` はリクエスト 1 回ぶん（接続から本文の読み終わりまで）の上限
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(format!("failed to build http client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Network(format!("failed to send a request to {}: {}", url, e)))?;

        let version = format!("{:?}", response.version());
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| Header::new(name.to_string(), value.to_string()))
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read a response from {}: {}", url, e)))?;
        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "received response");

        Ok(HttpResponse::new(
            version,
            status.as_u16(),
            reason,
            headers,
            body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        assert!(ReqwestClient::new(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = ReqwestClient::new(Duration::from_secs(2)).expect("failed to build client");
        let url = Url::new("http://127.0.0.1:9/users".to_string())
            .parse()
            .expect("failed to parse url");

        let result = client.get(&url).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
