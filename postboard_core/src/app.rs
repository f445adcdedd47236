//! App: ページの起動と、セレクトボックスの `change` の配線
//!
//! ブラウザでいう「スクリプトの読み込み完了時」にあたる処理をまとめています。
//! 1) `init`: ユーザー一覧を読み込み、セレクトボックスに `change` リスナーを付ける
//! 2) リスナーは選ばれた値を `Selection` に記録するだけ（同期）
//! 3) `process_selection`: 記録された最新の選択を取り出して投稿を表示する（非同期）

use crate::api::client::DataClient;
use crate::api::model::User;
use crate::config::Config;
use crate::constants::SELECT_PLACEHOLDER_TEXT;
use crate::error::Error;
use crate::renderer::builder::make_element;
use crate::renderer::dom::api::append_child;
use crate::renderer::dom::api::children;
use crate::renderer::dom::api::create_element;
use crate::renderer::dom::api::get_target_element_node;
use crate::renderer::dom::event::dispatch_event;
use crate::renderer::dom::event::Event;
use crate::renderer::dom::event::EventListener;
use crate::renderer::dom::event::EventType;
use crate::renderer::dom::node::ElementKind;
use crate::renderer::dom::node::Window;
use crate::renderer::page::Page;
use crate::renderer::page::Refresh;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// 空の文書にホストページを組み立てる
///
/// `html > body > (select#selectMenu > option[value=""], main)`
pub fn mount_host_page(window: &Window, config: &Config) -> Result<(), Error> {
    let document = window.document();
    if get_target_element_node(&document, ElementKind::Html).is_some() {
        return Err(Error::InvalidUI("host page is already mounted".to_string()));
    }

    let html = create_element(ElementKind::Html);
    let body = create_element(ElementKind::Body);

    let select = create_element(ElementKind::Select);
    select.borrow_mut().set_attribute("id", &config.selector_id);
    let placeholder = make_element(ElementKind::Option, SELECT_PLACEHOLDER_TEXT, None);
    placeholder.borrow_mut().set_attribute("value", "");
    append_child(&select, placeholder);

    append_child(&body, select);
    append_child(&body, create_element(ElementKind::Main));
    append_child(&html, body);
    append_child(&document, html);
    Ok(())
}

pub struct App {
    page: Page,
    change_listener: Option<EventListener>,
}

impl Debug for App {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("App")
            .field("page", &self.page)
            .field("listening", &self.change_listener.is_some())
            .finish()
    }
}

impl App {
    pub fn new(window: Window, client: DataClient, config: Config) -> Self {
        Self {
            page: Page::new(window, client, config),
            change_listener: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// ユーザー一覧を読み込み、`change` リスナーを付ける
    ///
    /// 一覧の読み込みに失敗してもリスナーは付けます（エラーはそのまま返します）。
    /// `main` が空なら案内文を出します。
    pub async fn init(&mut self) -> Result<Vec<User>, Error> {
        let users = self.page.init_page().await.map(|(users, _)| users);
        self.attach_change_listener()?;

        let main = self.page.main_element()?;
        if children(&main).is_empty() {
            self.page.render_main(None).await?;
        }
        users
    }

    fn attach_change_listener(&mut self) -> Result<(), Error> {
        if self.change_listener.is_some() {
            return Ok(());
        }
        let selector = self.page.selector()?;
        let selection = Rc::downgrade(&self.page.selection());
        let listener: EventListener = Rc::new(move |event: &Event| {
            let value = event.target_value().unwrap_or_default();
            match selection.upgrade() {
                Some(selection) => {
                    debug!(event = ?event.event_type(), value = %value, "selection changed");
                    selection.borrow_mut().record(value);
                }
                None => warn!("selection changed after the page was dropped"),
            }
        });
        selector
            .borrow_mut()
            .add_event_listener(EventType::Change, listener.clone());
        self.change_listener = Some(listener);
        Ok(())
    }

    /// ブラウザでユーザーを選んだときと同じことをする（value を設定して `change` を送る）
    ///
    /// 呼ばれたリスナーの数を返します。
    pub fn select_user(&self, user_id: u32) -> Result<usize, Error> {
        let selector = self.page.selector()?;
        selector
            .borrow_mut()
            .set_attribute("value", &user_id.to_string());
        Ok(dispatch_event(&selector, EventType::Change))
    }

    /// 記録された選択がなくなるまで、最新のものから順に処理する
    ///
    /// 読み込み中に新しい選択が入ったときは、古い結果を捨てて新しい方を処理します。
    /// 戻り値は最後に処理した選択の結果です（何も無ければ `Ok(None)`）。
    pub async fn process_selection(&mut self) -> Result<Option<Refresh>, Error> {
        let mut outcome = Ok(None);
        loop {
            let pending = self.page.selection().borrow_mut().take();
            let value = match pending {
                Some(value) => value,
                None => return outcome,
            };
            info!(value = %value, "processing selection");
            outcome = self.page.on_user_selected(Some(&value)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::renderer::dom::api::get_element_by_id;
    use crate::renderer::dom::api::text_content;
    use crate::renderer::dom::event::dispatch_event;
    use crate::test_support::client;
    use crate::test_support::mounted_window;
    use crate::test_support::test_config;
    use crate::test_support::FakeHttpClient;
    use crate::utils::convert_dom_to_string;
    use std::cell::Cell;

    fn app_with(http: &Rc<FakeHttpClient>) -> App {
        App::new(mounted_window(), client(http), test_config())
    }

    fn main_texts(app: &App) -> Vec<String> {
        let main = app.page().main_element().expect("main should exist");
        children(&main).iter().map(text_content).collect()
    }

    #[test]
    fn test_mount_host_page() {
        let window = Window::new();
        mount_host_page(&window, &test_config()).expect("mount should succeed");

        let select = get_element_by_id(&window.document(), "selectMenu")
            .expect("selector should exist");
        let options = children(&select);
        assert_eq!(options.len(), 1);
        assert_eq!(text_content(&options[0]), "Select an Employee");
        assert_eq!(
            options[0].borrow().get_attribute("value"),
            Some(String::new())
        );
        assert!(get_target_element_node(&window.document(), ElementKind::Main).is_some());

        assert!(matches!(
            mount_host_page(&window, &test_config()),
            Err(Error::InvalidUI(_))
        ));
    }

    #[tokio::test]
    async fn test_init_then_select_user() {
        let http = FakeHttpClient::with_fixtures();
        let mut app = app_with(&http);

        let users = app.init().await.expect("init should succeed");
        assert_eq!(users.len(), 2);
        assert_eq!(
            main_texts(&app),
            vec!["Select an Employee to display their posts."]
        );

        assert_eq!(app.select_user(2).expect("select should succeed"), 1);
        let refresh = app
            .process_selection()
            .await
            .expect("selection should succeed")
            .expect("main should be refreshed");
        assert_eq!(refresh.removed, 1);
        assert_eq!(refresh.bound_buttons.len(), 1);

        let texts = main_texts(&app);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("et ea vero quia"));
        assert!(texts[0].contains("Author: Ervin Howell with Deckow-Crist"));
    }

    #[tokio::test]
    async fn test_init_twice_attaches_one_listener() {
        let http = FakeHttpClient::with_fixtures();
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");
        app.attach_change_listener().expect("attach should succeed");

        let selector = app.page().selector().expect("selector should exist");
        assert_eq!(selector.borrow().listener_count(EventType::Change), 1);
    }

    #[tokio::test]
    async fn test_init_failure_still_listens() {
        let http = FakeHttpClient::with_fixtures();
        http.respond_status("/users", 500);
        let mut app = app_with(&http);

        let err = app.init().await.expect_err("init should fail");
        assert!(matches!(err, Error::Api(ApiError::Status { status: 500, .. })));

        let dom = convert_dom_to_string(&Some(app.page().window().document()));
        assert!(dom.contains("Failed to load employees."));

        assert_eq!(app.select_user(1).expect("select should succeed"), 1);
        assert!(app
            .process_selection()
            .await
            .expect("selection should succeed")
            .is_some());
    }

    #[tokio::test]
    async fn test_process_selection_without_pending_is_noop() {
        let http = FakeHttpClient::with_fixtures();
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");

        assert!(app
            .process_selection()
            .await
            .expect("nothing to process")
            .is_none());
        assert_eq!(http.requests(), vec!["/users"]);
    }

    #[tokio::test]
    async fn test_only_latest_of_queued_selections_is_loaded() {
        let http = FakeHttpClient::with_fixtures();
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");

        app.select_user(1).expect("select should succeed");
        app.select_user(2).expect("select should succeed");
        app.process_selection()
            .await
            .expect("selection should succeed");

        let requests = http.requests();
        assert!(!requests.contains(&"/posts?userId=1".to_string()));
        assert!(requests.contains(&"/posts?userId=2".to_string()));
    }

    #[tokio::test]
    async fn test_selection_changed_while_loading_is_discarded() {
        let http = FakeHttpClient::with_fixtures();
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");

        // user 1 の投稿を読み込んでいる最中に user 2 が選ばれる
        let selector = app.page().selector().expect("selector should exist");
        let fired = Rc::new(Cell::new(false));
        let hook_fired = fired.clone();
        http.on_request(move |route| {
            if route == "/posts?userId=1" && !hook_fired.get() {
                hook_fired.set(true);
                selector.borrow_mut().set_attribute("value", "2");
                dispatch_event(&selector, EventType::Change);
            }
        });

        app.select_user(1).expect("select should succeed");
        let refresh = app
            .process_selection()
            .await
            .expect("selection should succeed");
        assert!(fired.get());
        assert!(refresh.is_some());

        let requests = http.requests();
        assert_eq!(
            &requests[1..],
            &[
                "/posts?userId=1",
                "/posts?userId=2",
                "/users/2",
                "/comments?postId=11"
            ]
        );
        let texts = main_texts(&app);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("et ea vero quia"));
    }

    #[tokio::test]
    async fn test_failed_latest_selection_keeps_content() {
        let http = FakeHttpClient::with_fixtures();
        http.fail("/posts?userId=2", "connection reset");
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");

        app.select_user(1).expect("select should succeed");
        app.process_selection()
            .await
            .expect("selection should succeed");
        let before = main_texts(&app);

        app.select_user(2).expect("select should succeed");
        let err = app
            .process_selection()
            .await
            .expect_err("selection should fail");
        assert!(matches!(err, Error::Api(ApiError::Transport { .. })));

        let mut expected = before;
        expected.push("Posts failed to load.".to_string());
        assert_eq!(main_texts(&app), expected);
    }

    #[tokio::test]
    async fn test_failed_first_selection_is_visible() {
        let http = FakeHttpClient::with_fixtures();
        http.respond_status("/posts?userId=2", 503);
        let mut app = app_with(&http);
        app.init().await.expect("init should succeed");

        app.select_user(2).expect("select should succeed");
        let err = app
            .process_selection()
            .await
            .expect_err("selection should fail");
        assert!(matches!(err, Error::Api(ApiError::Status { status: 503, .. })));
        assert_eq!(
            main_texts(&app),
            vec![
                "Select an Employee to display their posts.",
                "Posts failed to load."
            ]
        );
    }
}
