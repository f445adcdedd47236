//! ページ/API のための固定定数
//!
//! ホストページの要素 id、ボタンのラベル、クラス名など、
//! コード中で何度も出てくる文字列をここにまとめます。
//! 実行時に差し替えたい値（API の URL など）の既定値もここに置き、`config` から参照します。

use std::time::Duration;

// デモ用 REST API の URL（末尾のスラッシュなし）
pub static API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

// ホストページ側に用意されているセレクトボックスの id
pub static SELECT_MENU_ID: &str = "selectMenu";

// change イベントに値が無いときに使うユーザー id
pub static DEFAULT_USER_ID: u32 = 1;

// 1 リクエストあたりのタイムアウト
pub static REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// コメント表示切替ボタンのラベル
// 非表示 ⇔ "Show Comments" / 表示 ⇔ "Hide Comments"
pub static SHOW_COMMENTS_LABEL: &str = "Show Comments";
pub static HIDE_COMMENTS_LABEL: &str = "Hide Comments";

// 投稿が無いときに main に出す案内文
pub static DEFAULT_TEXT: &str = "Select an Employee to display their posts.";

// 読み込み失敗時の表示
pub static COMMENTS_FAILED_TEXT: &str = "Comments failed to load.";
pub static USERS_FAILED_TEXT: &str = "Failed to load employees.";
pub static POSTS_FAILED_TEXT: &str = "Posts failed to load.";
pub static AUTHOR_FAILED_TEXT: &str = "Author: failed to load";

// セレクトボックスの先頭に置く案内用 option
pub static SELECT_PLACEHOLDER_TEXT: &str = "Select an Employee";

// クラス名と属性名
pub static COMMENTS_CLASS: &str = "comments";
pub static HIDE_CLASS: &str = "hide";
pub static DEFAULT_TEXT_CLASS: &str = "default-text";
pub static ERROR_TEXT_CLASS: &str = "error-text";
pub static POST_ID_ATTRIBUTE: &str = "data-post-id";
