//! DataClient: 4 つの固定エンドポイントに GET を投げるクライアント
//!
//! 役割
//! - URL の組み立て、ステータスの確認、JSON のデコードを担当します。
//! - 送受信そのものは `HttpClient` トレイト越しに呼ぶので、テストでは偽サーバに差し替えられます。
//!
//! 戻り値の約束
//! - id が無い（`None`）ときはリクエストを送らず `Ok(None)`。
//! - 2xx かつ JSON として読めたら `Ok(Some(data))`。
//! - それ以外は `Err(ApiError::...)`。失敗をデータのふりをして返すことはしません。

use crate::api::model::Comment;
use crate::api::model::Post;
use crate::api::model::User;
use crate::error::ApiError;
use crate::error::Error;
use crate::http::HttpClient;
use crate::url::Url;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;
use tracing::debug;
use tracing::warn;

#[derive(Clone)]
pub struct DataClient {
    http: Rc<dyn HttpClient>,
    base_url: Url,
}

impl Debug for DataClient {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl DataClient {
    /// `base_url` は "https://jsonplaceholder.typicode.com" のような API の URL
    pub fn new(http: Rc<dyn HttpClient>, base_url: &str) -> Result<Self, Error> {
        let base_url = Url::new(base_url.to_string()).parse()?;
        Ok(Self { http, base_url })
    }

    /// GET {base}/users
    pub async fn fetch_all_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint("users", None)?;
        self.get_json(&url).await
    }

    /// GET {base}/users/{user_id}
    pub async fn fetch_user(&self, user_id: Option<u32>) -> Result<Option<User>, ApiError> {
        let user_id = match user_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let url = self.endpoint(&format!("users/{}", user_id), None)?;
        self.get_json(&url).await.map(Some)
    }

    /// GET {base}/posts?userId={user_id}
    pub async fn fetch_posts_for_user(
        &self,
        user_id: Option<u32>,
    ) -> Result<Option<Vec<Post>>, ApiError> {
        let user_id = match user_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let url = self.endpoint("posts", Some(&format!("userId={}", user_id)))?;
        self.get_json(&url).await.map(Some)
    }

    /// GET {base}/comments?postId={post_id}
    pub async fn fetch_comments_for_post(
        &self,
        post_id: Option<u32>,
    ) -> Result<Option<Vec<Comment>>, ApiError> {
        let post_id = match post_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let url = self.endpoint("comments", Some(&format!("postId={}", post_id)))?;
        self.get_json(&url).await.map(Some)
    }

    fn endpoint(&self, path: &str, searchpart: Option<&str>) -> Result<Url, ApiError> {
        self.base_url
            .join(path, searchpart)
            .map_err(|e| ApiError::invalid_request(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        debug!(url = %url, "GET");
        let response = self.http.get(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "request failed");
            ApiError::transport(e.to_string())
        })?;

        debug!(
            url = %url,
            version = %response.version(),
            status = response.status_code(),
            "response received"
        );
        if !response.is_success() {
            warn!(
                url = %url,
                status = response.status_code(),
                reason = %response.reason(),
                "unexpected status"
            );
            return Err(ApiError::status(response.status_code(), url.to_string()));
        }

        serde_json::from_str(response.body()).map_err(|e| {
            let content_type = response.header_value("content-type").unwrap_or_default();
            warn!(url = %url, content_type = %content_type, error = %e, "invalid JSON payload");
            ApiError::decode(format!("invalid JSON payload from {}: {}", url, e))
        })
    }
}
