//! postboard_core::url: API 用のシンプルな URL パーサ / ビルダー
//!
//! なにをする？
//! - `http(s)://host[:port][/path][?query]` 形式の文字列から、`host` / `port` / `path` /
//!   `searchpart`（クエリ文字列）を取り出して `Url` 構造体に入れます。
//! - API の URL（ベース）に `users/1` や `posts?userId=1` をつなげた URL を組み立てます。
//! - ネットワーク I/O は行いません。純粋に“文字列の分解と組み立て”だけです。
//!
//! 注意
//! - `#fragment` やパーセントエンコードは扱いません（API の URL には出てこないため）。

use crate::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

static HTTP_SCHEME: &str = "http://";
static HTTPS_SCHEME: &str = "https://";

#[derive(Debug, Clone, PartialEq)]
pub struct Url {
    url: String,        // 元のURL文字列（例: "https://example.com:8443/posts?userId=1"）
    host: String,       // 例: "example.com"
    port: String,       // 例: "80" / "443" / "8443"
    path: String,       // 例: "posts"（先頭のスラッシュは除いた形）
    searchpart: String, // 例: "userId=1"（? の後ろ全体）
}

impl Url {
    // まだ分解はせず、空のフィールドで作ります。`parse` で中身が埋まります。
    pub fn new(url: String) -> Self {
        Self {
            url,
            host: "".to_string(),
            port: "".to_string(),
            path: "".to_string(),
            searchpart: "".to_string(),
        }
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    pub fn port(&self) -> String {
        self.port.clone()
    }

    pub fn path(&self) -> String {
        self.path.clone()
    }

    pub fn searchpart(&self) -> String {
        self.searchpart.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    fn is_https(&self) -> bool {
        self.url.starts_with(HTTPS_SCHEME)
    }

    fn scheme(&self) -> &'static str {
        if self.is_https() {
            HTTPS_SCHEME
        } else {
            HTTP_SCHEME
        }
    }

    fn default_port(&self) -> &'static str {
        if self.is_https() {
            "443"
        } else {
            "80"
        }
    }

    // スキームを取り除いた "host[:port]/path?query" 部分
    fn without_scheme(&self) -> &str {
        self.url.trim_start_matches(self.scheme())
    }

    // "host[:port]" と "path?query" の 2 つに分ける
    fn split_authority(&self) -> (&str, Option<&str>) {
        match self.without_scheme().split_once('/') {
            Some((authority, rest)) => (authority, Some(rest)),
            None => match self.without_scheme().split_once('?') {
                // "host?query" のようにパスが無いケース
                Some((authority, _)) => (authority, None),
                None => (self.without_scheme(), None),
            },
        }
    }

    fn extract_host(&self) -> String {
        let (authority, _) = self.split_authority();
        match authority.split_once(':') {
            Some((host, _)) => host.to_string(),
            None => authority.to_string(),
        }
    }

    // コロン以降があれば `port` として取り出し、なければスキームの既定値。
    fn extract_port(&self) -> String {
        let (authority, _) = self.split_authority();
        match authority.split_once(':') {
            Some((_, port)) => port.to_string(),
            None => self.default_port().to_string(),
        }
    }

    fn extract_path(&self) -> String {
        match self.split_authority() {
            (_, Some(rest)) => match rest.split_once('?') {
                Some((path, _)) => path.to_string(),
                None => rest.to_string(),
            },
            (_, None) => "".to_string(),
        }
    }

    fn extract_searchpart(&self) -> String {
        match self.without_scheme().split_once('?') {
            Some((_, searchpart)) => searchpart.to_string(),
            None => "".to_string(),
        }
    }

    // スキームを確認し、各フィールドを抽出して `Ok(self.clone())` を返します。
    pub fn parse(&mut self) -> Result<Self, Error> {
        if !self.url.starts_with(HTTP_SCHEME) && !self.url.starts_with(HTTPS_SCHEME) {
            return Err(Error::UnexpectedInput(
                "Only HTTP and HTTPS schemes are supported.".to_string(),
            ));
        }

        self.host = self.extract_host();
        if self.host.is_empty() {
            return Err(Error::UnexpectedInput(format!(
                "missing host in url: {}",
                self.url
            )));
        }
        self.port = self.extract_port();
        self.path = self.extract_path();
        self.searchpart = self.extract_searchpart();

        Ok(self.clone())
    }

    /// ベース URL の後ろに `path` と `searchpart` をつなげた新しい URL を返す
    ///
    /// - `join("users/1", None)` → `https://host/users/1`
    /// - `join("posts", Some("userId=1"))` → `https://host/posts?userId=1`
    /// - ポートは既定値と異なるときだけ出力します。
    pub fn join(&self, path: &str, searchpart: Option<&str>) -> Result<Self, Error> {
        let mut joined = String::from(self.scheme());
        joined.push_str(&self.host);
        if self.port != self.default_port() {
            joined.push(':');
            joined.push_str(&self.port);
        }
        joined.push('/');

        let base_path = self.path.trim_matches('/');
        if !base_path.is_empty() {
            joined.push_str(base_path);
            joined.push('/');
        }
        joined.push_str(path.trim_start_matches('/'));

        if let Some(searchpart) = searchpart {
            joined.push('?');
            joined.push_str(searchpart);
        }

        Url::new(joined).parse()
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
