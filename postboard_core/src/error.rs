//! postboard_core::error: アプリ全体で使うエラー型
//!
//! 目的（概要）
//! - よくある失敗パターンをざっくり分類した `Error` と、
//!   API 呼び出しの失敗を表す `ApiError` を提供します。
//! - どちらも `thiserror` で `Display` / `std::error::Error` を実装しています。
//!
//! 使い方（例）
//! ```ignore
//! use postboard_core::error::{ApiError, Error};
//!
//! fn fetch() -> Result<(), Error> {
//!     Err(ApiError::status(500, "https://example.com/users"))?
//! }
//! ```

use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// ネットワーク関連の失敗（接続不可・送受信エラー・DNS失敗など）
    #[error("network error: {0}")]
    Network(String),
    /// 予期しない入力（フォーマット不正・未対応の値など）
    #[error("unexpected input: {0}")]
    UnexpectedInput(String),
    /// UIまわりの不整合（ホストページに必要な要素が無いなど）
    #[error("invalid ui: {0}")]
    InvalidUI(String),
    /// 探した要素が DOM 上に見つからない
    #[error("element not found: {0}")]
    NotFound(String),
    /// REST API の呼び出しに失敗した
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 上記に当てはまらない汎用的な失敗
    #[error("{0}")]
    Other(String),
}

/// REST API 呼び出しの失敗理由。
///
/// 成功時のデータと取り違えないよう、呼び出し側は必ず `Result` で分岐します。
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ApiError {
    /// 2xx 以外のステータスが返ってきた
    #[error("Status code not in 200-299 range: {status} from {url}")]
    Status { status: u16, url: String },
    /// レスポンスを受け取る前に通信が失敗した
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// 本文が期待した JSON の形ではなかった
    #[error("response decode failed: {message}")]
    Decode { message: String },
    /// リクエストを送る前に URL を組み立てられなかった
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
