//! Page: 投稿ビューアの“1 ページ”を操作するコントローラ
//!
//! 役割
//! - ホストページ（`select#selectMenu` と `main`）を受け取り、API から取ってきたデータで中身を入れ替えます。
//! - `main` 内の「Show Comments」ボタンにクリックリスナーを付け外しします。
//!
//! 状態の持ち方
//! - コメント欄の表示/非表示は `post id → 表示中か` の表（`CommentToggles`）が正です。
//!   クラス `hide` とボタンの文言は、この表から毎回作り直します。
//! - 付けたリスナーは `(post id, ボタン, リスナーの Rc)` として覚えておき、外すときは同じ `Rc` を渡します。
//!   同じ関数をもう一度作っても“別物”なので、覚えておかないと外せません。
//! - 選択の競合は `Selection` の世代番号で判定します。投稿を読み込んでいる間に
//!   別のユーザーが選ばれたら、古い結果は `main` に反映しません（最後の選択が勝つ）。
//!
//! 更新の手順（refresh）
//! 1) 新しい中身を文書の外で組み立てる（ここで失敗したら `main` は元のまま）
//! 2) リスナーを外す → `main` を空にする → 中身を入れる → リスナーを付ける

use crate::api::client::DataClient;
use crate::api::model::Post;
use crate::api::model::User;
use crate::config::Config;
use crate::constants::DEFAULT_TEXT;
use crate::constants::DEFAULT_TEXT_CLASS;
use crate::constants::ERROR_TEXT_CLASS;
use crate::constants::HIDE_CLASS;
use crate::constants::HIDE_COMMENTS_LABEL;
use crate::constants::POSTS_FAILED_TEXT;
use crate::constants::POST_ID_ATTRIBUTE;
use crate::constants::SHOW_COMMENTS_LABEL;
use crate::constants::USERS_FAILED_TEXT;
use crate::error::Error;
use crate::renderer::builder::make_element;
use crate::renderer::builder::make_select_options;
use crate::renderer::dom::api::append_child;
use crate::renderer::dom::api::children;
use crate::renderer::dom::api::get_element_by_id;
use crate::renderer::dom::api::get_elements_by_kind;
use crate::renderer::dom::api::get_target_element_node;
use crate::renderer::dom::api::query_element_by_post_id;
use crate::renderer::dom::api::remove_all_children;
use crate::renderer::dom::api::set_text_content;
use crate::renderer::dom::event::Event;
use crate::renderer::dom::event::EventListener;
use crate::renderer::dom::event::EventType;
use crate::renderer::dom::node::ElementKind;
use crate::renderer::dom::node::Node;
use crate::renderer::dom::node::Window;
use crate::renderer::section::build_posts_fragment;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

/// セレクトボックスで最後に選ばれた値と、その世代番号
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pending: Option<String>,
    generation: u64,
}

impl Selection {
    /// 新しい選択を記録する。まだ処理していない古い選択は上書きされます。
    pub fn record(&mut self, value: String) {
        self.pending = Some(value);
        self.generation += 1;
    }

    /// 未処理の選択を取り出す
    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// コメント欄の表示状態（post id → 表示中か）
#[derive(Debug)]
struct CommentToggles {
    document: Rc<RefCell<Node>>,
    visible: BTreeMap<String, bool>,
}

impl CommentToggles {
    fn toggle(&mut self, post_id: &str) -> Result<bool, Error> {
        let section = query_element_by_post_id(&self.document, ElementKind::Section, post_id)
            .ok_or_else(|| Error::NotFound(format!("comments section for post {}", post_id)))?;
        let button = query_element_by_post_id(&self.document, ElementKind::Button, post_id)
            .ok_or_else(|| Error::NotFound(format!("comments button for post {}", post_id)))?;

        let visible = !self.visible.get(post_id).copied().unwrap_or(false);
        self.visible.insert(post_id.to_string(), visible);

        if let Some(e) = section.borrow_mut().element_mut() {
            if visible {
                e.remove_class(HIDE_CLASS);
            } else {
                e.add_class(HIDE_CLASS);
            }
        }
        let label = if visible {
            HIDE_COMMENTS_LABEL
        } else {
            SHOW_COMMENTS_LABEL
        };
        set_text_content(&button, label);
        Ok(visible)
    }
}

struct ToggleBinding {
    post_id: String,
    button: Rc<RefCell<Node>>,
    listener: EventListener,
}

impl Debug for ToggleBinding {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "ToggleBinding({})", self.post_id)
    }
}

/// `refresh` で実際に行ったこと
#[derive(Debug, Clone)]
pub struct Refresh {
    /// リスナーを外したボタン（前の中身のもの）
    pub unbound_buttons: Vec<Rc<RefCell<Node>>>,
    /// `main` から外したノードの数
    pub removed: usize,
    /// リスナーを付けたボタン（新しい中身のもの）
    pub bound_buttons: Vec<Rc<RefCell<Node>>>,
}

#[derive(Debug)]
pub struct Page {
    window: Window,
    client: DataClient,
    config: Config,
    toggles: Rc<RefCell<CommentToggles>>,
    bindings: Vec<ToggleBinding>,
    selection: Rc<RefCell<Selection>>,
}

impl Page {
    pub fn new(window: Window, client: DataClient, config: Config) -> Self {
        let toggles = Rc::new(RefCell::new(CommentToggles {
            document: window.document(),
            visible: BTreeMap::new(),
        }));
        Self {
            window,
            client,
            config,
            toggles,
            bindings: Vec::new(),
            selection: Rc::new(RefCell::new(Selection::default())),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn selection(&self) -> Rc<RefCell<Selection>> {
        self.selection.clone()
    }

    /// コメント欄が表示中なら `Some(true)`。まだ一度も切り替えていなければ `None`。
    pub fn comments_visible(&self, post_id: &str) -> Option<bool> {
        self.toggles.borrow().visible.get(post_id).copied()
    }

    /// いまリスナーが付いているボタンの数
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// `#selectMenu`（id は設定で変更可）
    pub fn selector(&self) -> Result<Rc<RefCell<Node>>, Error> {
        get_element_by_id(&self.window.document(), &self.config.selector_id).ok_or_else(|| {
            Error::InvalidUI(format!(
                "selector #{} is missing from the page",
                self.config.selector_id
            ))
        })
    }

    pub fn main_element(&self) -> Result<Rc<RefCell<Node>>, Error> {
        get_target_element_node(&self.window.document(), ElementKind::Main)
            .ok_or_else(|| Error::InvalidUI("main is missing from the page".to_string()))
    }

    /// ユーザーごとの `option` をセレクトボックスの末尾に足す（既存の選択肢は消さない）
    ///
    /// `users` が `None` なら何もせず `Ok(None)`。
    pub fn populate_selector(
        &self,
        users: Option<&[User]>,
    ) -> Result<Option<Rc<RefCell<Node>>>, Error> {
        let options = match make_select_options(users) {
            Some(options) => options,
            None => return Ok(None),
        };
        let selector = self.selector()?;
        debug!(count = options.len(), "populating selector");
        for option in options {
            append_child(&selector, option);
        }
        Ok(Some(selector))
    }

    /// 投稿があれば投稿ブロック、無ければ案内文を `main` の末尾に足す
    ///
    /// `main` の既存の中身は消しません（入れ替えは `refresh`）。
    pub async fn render_main(&self, posts: Option<&[Post]>) -> Result<(), Error> {
        let main = self.main_element()?;
        let content = match build_posts_fragment(&self.client, posts).await {
            Some(fragment) => fragment,
            None => make_element(ElementKind::default(), DEFAULT_TEXT, Some(DEFAULT_TEXT_CLASS)),
        };
        append_child(&main, content);
        Ok(())
    }

    /// `main` 内のボタンすべてにクリックリスナーを付け、付けたボタンを返す
    ///
    /// 先に `unbind_toggle_listeners` を呼ぶので、二重に付くことはありません。
    pub fn bind_toggle_listeners(&mut self) -> Result<Vec<Rc<RefCell<Node>>>, Error> {
        let main = self.main_element()?;
        self.unbind_toggle_listeners();

        let mut bound = Vec::new();
        for button in get_elements_by_kind(&main, ElementKind::Button) {
            let post_id = match button.borrow().get_attribute(POST_ID_ATTRIBUTE) {
                Some(post_id) => post_id,
                None => {
                    warn!("button without {} is left unbound", POST_ID_ATTRIBUTE);
                    continue;
                }
            };
            let listener = self.toggle_listener(post_id.clone());
            button
                .borrow_mut()
                .add_event_listener(EventType::Click, listener.clone());
            self.bindings.push(ToggleBinding {
                post_id,
                button: button.clone(),
                listener,
            });
            bound.push(button);
        }
        debug!(count = bound.len(), "bound comment toggles");
        Ok(bound)
    }

    /// 付けたリスナーをすべて外し、外したボタンを返す
    pub fn unbind_toggle_listeners(&mut self) -> Vec<Rc<RefCell<Node>>> {
        let mut unbound = Vec::new();
        for binding in self.bindings.drain(..) {
            let removed = binding
                .button
                .borrow_mut()
                .remove_event_listener(EventType::Click, &binding.listener);
            if !removed {
                warn!(post_id = %binding.post_id, "toggle listener was already gone");
            }
            unbound.push(binding.button);
        }
        if !unbound.is_empty() {
            debug!(count = unbound.len(), "unbound comment toggles");
        }
        unbound
    }

    // ボタンのクリック → 表示状態の切り替え
    // 文書 → ボタン → リスナー → 表示状態 の循環を作らないよう Weak で持つ
    fn toggle_listener(&self, post_id: String) -> EventListener {
        let toggles = Rc::downgrade(&self.toggles);
        Rc::new(move |_event: &Event| {
            let toggles = match toggles.upgrade() {
                Some(toggles) => toggles,
                None => return,
            };
            let result = toggles.borrow_mut().toggle(&post_id);
            match result {
                Ok(visible) => debug!(post_id = %post_id, visible, "toggled comments"),
                Err(e) => warn!(post_id = %post_id, error = %e, "failed to toggle comments"),
            }
        })
    }

    /// 投稿 `post_id` のコメント欄を開閉し、切り替え後に表示中なら `Some(true)` を返す
    ///
    /// - `None` なら何もせず `Ok(None)`。
    /// - コメント欄かボタンが見つからなければ `Error::NotFound`（何も変えない）。
    pub fn toggle_comments(&self, post_id: Option<&str>) -> Result<Option<bool>, Error> {
        match post_id {
            Some(post_id) => self.toggles.borrow_mut().toggle(post_id).map(Some),
            None => Ok(None),
        }
    }

    /// `main` の中身を `posts` の投稿ブロックで丸ごと入れ替える
    ///
    /// `None` なら何もせず `Ok(None)`（DOM は一切変わりません）。
    pub async fn refresh(&mut self, posts: Option<&[Post]>) -> Result<Option<Refresh>, Error> {
        if posts.is_none() {
            return Ok(None);
        }
        let main = self.main_element()?;
        let fragment = match build_posts_fragment(&self.client, posts).await {
            Some(fragment) => fragment,
            None => return Ok(None),
        };
        self.replace_main(&main, fragment).map(Some)
    }

    fn replace_main(
        &mut self,
        main: &Rc<RefCell<Node>>,
        fragment: Rc<RefCell<Node>>,
    ) -> Result<Refresh, Error> {
        let unbound_buttons = self.unbind_toggle_listeners();
        let removed = remove_all_children(main);
        self.toggles.borrow_mut().visible.clear();
        append_child(main, fragment);
        let bound_buttons = self.bind_toggle_listeners()?;
        info!(
            removed,
            buttons = bound_buttons.len(),
            "main content replaced"
        );
        Ok(Refresh {
            unbound_buttons,
            removed,
            bound_buttons,
        })
    }

    /// 選択値（文字列）を user id にする。空・数字でないときは既定のユーザー。
    pub fn resolve_user_id(&self, user_id: Option<&str>) -> u32 {
        match user_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => match value.parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    warn!(value, "selected value is not a user id, using the default user");
                    self.config.default_user_id
                }
            },
            None => self.config.default_user_id,
        }
    }

    /// ユーザーが選ばれたときの処理：投稿を取得して `main` を入れ替える
    ///
    /// - 取得に失敗したら `main` の中身は残したまま、末尾に `p.error-text`
    ///   （"Posts failed to load."）を 1 つだけ足してエラーを返します。次に入れ替えが成功すると消えます。
    /// - 読み込み中に新しい選択が記録されたら、結果を捨てて `Ok(None)` を返します。
    pub async fn on_user_selected(
        &mut self,
        user_id: Option<&str>,
    ) -> Result<Option<Refresh>, Error> {
        let generation = self.selection.borrow().generation();
        let user_id = self.resolve_user_id(user_id);
        info!(user_id, "loading posts");

        let main = self.main_element()?;
        let posts = match self.client.fetch_posts_for_user(Some(user_id)).await {
            Ok(posts) => posts,
            Err(e) => {
                error!(user_id, error = %e, "failed to load posts");
                if !self.is_superseded(generation) {
                    show_posts_failed(&main);
                }
                return Err(e.into());
            }
        };
        if self.is_superseded(generation) {
            info!(user_id, "selection changed while loading posts, dropping result");
            return Ok(None);
        }

        let fragment = match build_posts_fragment(&self.client, posts.as_deref()).await {
            Some(fragment) => fragment,
            None => return Ok(None),
        };
        if self.is_superseded(generation) {
            info!(user_id, "selection changed while rendering posts, dropping result");
            return Ok(None);
        }
        self.replace_main(&main, fragment).map(Some)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.selection.borrow().generation() != generation
    }

    /// 起動時の処理：ユーザー一覧を取得してセレクトボックスに並べる
    ///
    /// 失敗したら `option.error-text`（"Failed to load employees."）を足してエラーを返します。
    pub async fn init_page(&self) -> Result<(Vec<User>, Rc<RefCell<Node>>), Error> {
        let selector = self.selector()?;
        match self.client.fetch_all_users().await {
            Ok(users) => {
                info!(count = users.len(), "loaded users");
                self.populate_selector(Some(users.as_slice()))?;
                Ok((users, selector))
            }
            Err(e) => {
                error!(error = %e, "failed to load users");
                append_child(
                    &selector,
                    make_element(
                        ElementKind::Option,
                        USERS_FAILED_TEXT,
                        Some(ERROR_TEXT_CLASS),
                    ),
                );
                Err(e.into())
            }
        }
    }
}

// `main` 直下に失敗の案内が無ければ 1 つ足す（既存の中身はそのまま）
fn show_posts_failed(main: &Rc<RefCell<Node>>) {
    let shown = children(main).iter().any(|child| {
        let child = child.borrow();
        child.element_kind() == Some(ElementKind::P) && child.has_class(ERROR_TEXT_CLASS)
    });
    if !shown {
        append_child(
            main,
            make_element(
                ElementKind::default(),
                POSTS_FAILED_TEXT,
                Some(ERROR_TEXT_CLASS),
            ),
        );
    }
}
