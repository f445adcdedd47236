//! 実行時設定（Config）
//!
//! `constants` の既定値をひとまとめにした構造体です。
//! テストでは `base_url` を差し替えたり、既定ユーザーを変えたりします。

use crate::constants::{API_BASE_URL, DEFAULT_USER_ID, REQUEST_TIMEOUT, SELECT_MENU_ID};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST API の URL（例: "https://jsonplaceholder.typicode.com"）
    pub base_url: String,
    /// ユーザーを選ぶセレクトボックスの id
    pub selector_id: String,
    /// 選択値が空のときに使うユーザー id
    pub default_user_id: u32,
    /// HTTP リクエストのタイムアウト
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            selector_id: SELECT_MENU_ID.to_string(),
            default_user_id: DEFAULT_USER_ID,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}
