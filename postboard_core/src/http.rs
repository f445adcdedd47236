//! postboard_core::http: HTTP レスポンス表現と、送受信を担当するトレイト
//!
//! 目的（概要）
//! - HTTP レスポンス（ステータス・ヘッダ・本文）を `HttpResponse` にまとめます。
//! - 実際の送受信は `HttpClient` トレイトの実装（`net_reqwest` やテスト用の偽物）に任せます。
//!
//! 入出力（このモジュール）
//! - `HttpResponse::new(...)`: 受信済みの値から組み立てる（ネットワーク実装が使う）。
//! - `HttpResponse::parse(raw)`: 生のレスポンステキストを分解する（テスト用の偽サーバが使う）。
//! - `HttpClient::get(url)`: GET を 1 回行い `Result<HttpResponse, Error>` を返す。
//!
//! 注意（簡易パーサ）
//! - CRLF(\r\n) を LF(\n) に正規化し、`"\n\n"` でヘッダとボディを分割するシンプル実装です。

use crate::error::Error;
use crate::url::Url;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
/// 単一HTTPヘッダを表す(name, value)ペア。
/// - 例: `("Content-Type", "application/json")`
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: String, value: String) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// 簡易HTTPレスポンス。
/// - `version`: 例 `"HTTP/1.1"`
/// - `status_code`: 例 `200`
/// - `reason`: 例 `"OK"`
/// - `headers`: 例 `[Header { name: "Content-Type", value: "application/json" }]`
/// - `body`: 本文（JSON テキスト）
pub struct HttpResponse {
    version: String,
    status_code: u16,
    reason: String,
    headers: Vec<Header>,
    body: String,
}

impl HttpResponse {
    pub fn new(
        version: String,
        status_code: u16,
        reason: String,
        headers: Vec<Header>,
        body: String,
    ) -> Self {
        Self {
            version,
            status_code,
            reason,
            headers,
            body,
        }
    }

    /// 生のHTTPレスポンス文字列を解析して `HttpResponse` を作ります。
    ///
    /// 振る舞い（簡易）：
    /// - 先頭の空白を除去し、改行を CRLF→LF に正規化します。
    /// - 1行目をステータス行 (`HTTP/1.1 200 OK`) として分解します。理由句の空白はそのまま残します。
    /// - 続くブロックを `\n\n` でヘッダ/ボディに分割し、ヘッダは `:` で `name: value` に分けます。
    /// - 想定と異なる形の場合は `Error::Network` を返します。
    pub fn parse(raw_response: String) -> Result<Self, Error> {
        let preprocessed_response = raw_response.trim_start().replace("\r\n", "\n");

        let (status_line, remaining) = match preprocessed_response.split_once('\n') {
            Some((s, r)) => (s, r),
            None => {
                return Err(Error::Network(format!(
                    "invalid http response: {}",
                    preprocessed_response
                )));
            }
        };

        let (headers, body) = match remaining.split_once("\n\n") {
            Some((h, b)) => {
                let mut headers = Vec::new();
                for header in h.split('\n').filter(|line| !line.is_empty()) {
                    let (name, value) = header.split_once(':').ok_or_else(|| {
                        Error::Network(format!("invalid http header: {}", header))
                    })?;
                    headers.push(Header::new(
                        name.trim().to_string(),
                        value.trim().to_string(),
                    ));
                }
                (headers, b)
            }
            None => (Vec::new(), remaining),
        };

        let mut statuses = status_line.splitn(3, ' ');
        let version = statuses.next().unwrap_or_default().to_string();
        let status_code = statuses
            .next()
            .and_then(|code| code.parse().ok())
            .ok_or_else(|| Error::Network(format!("invalid status line: {}", status_line)))?;
        let reason = statuses.next().unwrap_or_default().to_string();

        Ok(Self::new(
            version,
            status_code,
            reason,
            headers,
            body.to_string(),
        ))
    }

    pub fn version(&self) -> String {
        self.version.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn reason(&self) -> String {
        self.reason.clone()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// ステータスコードが 200〜299 に入っているか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// 指定したヘッダ名の値を返します（見つからなければ `Err(String)`）。
    /// - ヘッダ名の大文字小文字は区別しません。
    pub fn header_value(&self, name: &str) -> Result<String, String> {
        for h in &self.headers {
            if h.name().eq_ignore_ascii_case(name) {
                return Ok(h.value().to_string());
            }
        }

        Err(format!("failed to find {} in headers", name))
    }
}

/// GET を 1 回行う送受信担当。
///
/// DOM と同じスレッドで動かすので `Send` は要求しません。
#[async_trait(?Send)]
pub trait HttpClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_invalid() {
        let raw = "HTTP/1.1 200 OK".to_string();
        assert!(HttpResponse::parse(raw).is_err());
    }

    #[test]
    fn test_status_line_only() {
        let raw = "HTTP/1.1 200 OK\n\n".to_string();
        let res = HttpResponse::parse(raw).expect("failed to parse http response");
        assert_eq!(res.version(), "HTTP/1.1");
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.reason(), "OK");
    }

    #[test]
    fn test_reason_with_white_space() {
        let raw = "HTTP/1.1 404 Not Found\n\n".to_string();
        let res = HttpResponse::parse(raw).expect("failed to parse http response");
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.reason(), "Not Found");
    }

    #[test]
    fn test_two_headers_with_white_space() {
        let raw =
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n[]"
                .to_string();
        let res = HttpResponse::parse(raw).expect("failed to parse http response");
        assert_eq!(
            res.header_value("content-type"),
            Ok("application/json".to_string())
        );
        assert_eq!(res.header_value("Content-Length"), Ok("2".to_string()));
        assert_eq!(res.body(), "[]");
    }

    #[test]
    fn test_invalid_status_code() {
        let raw = "HTTP/1.1 abc OK\n\n".to_string();
        assert!(matches!(HttpResponse::parse(raw), Err(Error::Network(_))));
    }

    #[rstest]
    #[case(199, false)]
    #[case(200, true)]
    #[case(204, true)]
    #[case(299, true)]
    #[case(300, false)]
    #[case(404, false)]
    #[case(500, false)]
    fn test_is_success(#[case] status_code: u16, #[case] expected: bool) {
        let res = HttpResponse::new(
            "HTTP/1.1".to_string(),
            status_code,
            String::new(),
            Vec::new(),
            String::new(),
        );
        assert_eq!(res.is_success(), expected);
    }
}
