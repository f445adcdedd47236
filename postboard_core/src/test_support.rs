//! テスト用の偽 API サーバとデータ
//!
//! `FakeHttpClient` は URL（パス + クエリ）ごとに用意した生の HTTP レスポンスを返し、
//! 受け取ったリクエストを記録します。`on_request` で、リクエストの途中に
//! 別のイベントを起こすこともできます（選択の競合を再現するため）。

use crate::api::client::DataClient;
use crate::api::model::Company;
use crate::api::model::Post;
use crate::api::model::User;
use crate::app::mount_host_page;
use crate::config::Config;
use crate::error::Error;
use crate::http::HttpClient;
use crate::http::HttpResponse;
use crate::renderer::dom::node::Window;
use crate::url::Url;
use async_trait::async_trait;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub(crate) static TEST_BASE_URL: &str = "http://api.test";

type RequestHook = Box<dyn FnMut(&str)>;

#[derive(Default)]
pub(crate) struct FakeHttpClient {
    routes: RefCell<BTreeMap<String, Result<String, Error>>>,
    requests: RefCell<Vec<String>>,
    hook: RefCell<Option<RequestHook>>,
}

impl FakeHttpClient {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// ユーザー 2 人・投稿 3 件・コメント 4 件の固定データを返す偽サーバ
    pub(crate) fn with_fixtures() -> Rc<Self> {
        let http = Self::new();
        let leanne = user_json(
            1,
            "Leanne Graham",
            "Romaguera-Crona",
            "Multi-layered client-server neural-net",
        );
        let ervin = user_json(
            2,
            "Ervin Howell",
            "Deckow-Crist",
            "Proactive didactic contingency",
        );
        http.respond_json("/users", &json!([leanne.clone(), ervin.clone()]).to_string());
        http.respond_json("/users/1", &leanne.to_string());
        http.respond_json("/users/2", &ervin.to_string());

        http.respond_json(
            "/posts?userId=1",
            &json!([
                { "userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit" },
                { "userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore" },
            ])
            .to_string(),
        );
        http.respond_json(
            "/posts?userId=2",
            &json!([
                { "userId": 2, "id": 11, "title": "et ea vero quia", "body": "delectus reiciendis" },
            ])
            .to_string(),
        );

        http.respond_json(
            "/comments?postId=1",
            &json!([
                { "postId": 1, "id": 1, "name": "id labore ex et", "email": "Eliseo@gardner.biz", "body": "laudantium enim" },
                { "postId": 1, "id": 2, "name": "quo vero reiciendis", "email": "Jayne_Kuhic@sydney.com", "body": "est natus enim" },
            ])
            .to_string(),
        );
        http.respond_json(
            "/comments?postId=2",
            &json!([
                { "postId": 2, "id": 6, "name": "et fugit eligendi", "email": "Presley.Mueller@myrl.com", "body": "doloribus at sed" },
            ])
            .to_string(),
        );
        http.respond_json(
            "/comments?postId=11",
            &json!([
                { "postId": 11, "id": 51, "name": "molestias et odio", "email": "Laurie@lincoln.us", "body": "perferendis temporibus" },
            ])
            .to_string(),
        );
        http
    }

    pub(crate) fn respond_json(&self, route: &str, body: &str) {
        self.respond(route, 200, "OK", body);
    }

    pub(crate) fn respond_status(&self, route: &str, status_code: u16) {
        let reason = match status_code {
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Error",
        };
        self.respond(route, status_code, reason, "{}");
    }

    pub(crate) fn fail(&self, route: &str, message: &str) {
        self.routes
            .borrow_mut()
            .insert(route.to_string(), Err(Error::Network(message.to_string())));
    }

    fn respond(&self, route: &str, status_code: u16, reason: &str, body: &str) {
        let raw = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\n\r\n{}",
            status_code, reason, body
        );
        self.routes.borrow_mut().insert(route.to_string(), Ok(raw));
    }

    pub(crate) fn on_request(&self, hook: impl FnMut(&str) + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    /// 受け取ったリクエストの“パス + クエリ”部分
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

fn route_of(url: &Url) -> String {
    if url.searchpart().is_empty() {
        format!("/{}", url.path())
    } else {
        format!("/{}?{}", url.path(), url.searchpart())
    }
}

#[async_trait(?Send)]
impl HttpClient for FakeHttpClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        let route = route_of(url);
        self.requests.borrow_mut().push(route.clone());

        let hook = self.hook.borrow_mut().take();
        if let Some(mut hook) = hook {
            hook(&route);
            *self.hook.borrow_mut() = Some(hook);
        }

        let raw = self.routes.borrow().get(&route).cloned();
        match raw {
            Some(Ok(raw)) => HttpResponse::parse(raw),
            Some(Err(e)) => Err(e),
            None => HttpResponse::parse("HTTP/1.1 404 Not Found\r\n\r\n{}".to_string()),
        }
    }
}

fn user_json(id: u32, name: &str, company: &str, catch_phrase: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "username": name.split(' ').next().unwrap_or(name),
        "email": format!("user{}@example.com", id),
        "company": { "name": company, "catchPhrase": catch_phrase, "bs": "synergize" },
    })
}

pub(crate) fn user(id: u32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: None,
        email: None,
        company: Company {
            name: "Romaguera-Crona".to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
        },
    }
}

pub(crate) fn post(id: u32, user_id: u32, title: &str) -> Post {
    Post {
        id,
        user_id,
        title: title.to_string(),
        body: format!("body of {}", title),
    }
}

pub(crate) fn test_config() -> Config {
    Config {
        base_url: TEST_BASE_URL.to_string(),
        ..Config::default()
    }
}

pub(crate) fn client(http: &Rc<FakeHttpClient>) -> DataClient {
    DataClient::new(http.clone(), TEST_BASE_URL).expect("failed to build data client")
}

/// `select#selectMenu` と `main` を持つホストページ
pub(crate) fn mounted_window() -> Window {
    let window = Window::new();
    mount_host_page(&window, &test_config()).expect("failed to mount host page");
    window
}
