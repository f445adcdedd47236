//! DOM ノード（Window/Document/DocumentFragment/Element/Text）の最小実装
//!
//! これはページを組み立てるための“DOM（Document Object Model）”の小さなモデルです。
//! - `Window`（最上位）→ `Document` → `Element`/`Text` という階層を `Node` で表現します。
//! - `DocumentFragment` は、まだ文書に入っていない要素をまとめておく“一時置き場”です。
//!   fragment を `append_child` すると、中身（子ノード）だけが一度に移動します。
//! - `Element` はタグ種別（`ElementKind`）と属性（`attributes: Vec<Attribute>`）を持ち、
//!   `class` 属性をクラスリストとして扱うヘルパーもここにあります。
//! - 兄弟/親子リンクを持つ「双方向の木」を、`Rc<RefCell<...>>` と `Weak` で実現します。
//!   親や前の兄弟へのリンクは `Weak` にして、`Rc` の循環を防ぎます。
//! - イベントリスナーは `Node` が持ちます。登録解除は関数の“同一性”（`Rc::ptr_eq`）で判定するので、
//!   解除したいときは登録時と同じ `Rc` を渡す必要があります（ブラウザと同じ挙動）。
//!
//! 例（<p class="default-text">Hello</p>）
//! ```ignore
//! let p = create_element(ElementKind::P);
//! p.borrow_mut().add_class("default-text");
//! set_text_content(&p, "Hello");
//! ```

use crate::renderer::dom::attribute::Attribute;
use crate::renderer::dom::event::EventListener;
use crate::renderer::dom::event::EventType;
use std::cell::RefCell;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;
use std::rc::Weak;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Window {
    document: Rc<RefCell<Node>>,
}

impl Window {
    // ブラウザの `window` に相当。作成時に空の `Document` ノードを用意します。
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(Node::new(NodeKind::Document))),
        }
    }

    // 実ブラウザ API の `window.document` に相当。
    pub fn document(&self) -> Rc<RefCell<Node>> {
        self.document.clone()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct RegisteredListener {
    event_type: EventType,
    callback: EventListener,
}

impl Debug for RegisteredListener {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Listener({:?})", self.event_type)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Weak<RefCell<Node>>,
    first_child: Option<Rc<RefCell<Node>>>,
    last_child: Weak<RefCell<Node>>,
    previous_sibling: Weak<RefCell<Node>>,
    next_sibling: Option<Rc<RefCell<Node>>>,
    listeners: Vec<RegisteredListener>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Node {
    // ノードを新規に作成。リンク（親/兄弟/子）は空で、種別だけを持ちます。
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: Weak::new(),
            first_child: None,
            last_child: Weak::new(),
            previous_sibling: Weak::new(),
            next_sibling: None,
            listeners: Vec::new(),
        }
    }

    pub fn set_parent(&mut self, parent: Weak<RefCell<Node>>) {
        self.parent = parent;
    }

    pub fn parent(&self) -> Weak<RefCell<Node>> {
        self.parent.clone()
    }

    pub fn set_first_child(&mut self, first_child: Option<Rc<RefCell<Node>>>) {
        self.first_child = first_child;
    }

    pub fn first_child(&self) -> Option<Rc<RefCell<Node>>> {
        self.first_child.as_ref().cloned()
    }

    pub fn set_last_child(&mut self, last_child: Weak<RefCell<Node>>) {
        self.last_child = last_child;
    }

    pub fn last_child(&self) -> Weak<RefCell<Node>> {
        self.last_child.clone()
    }

    pub fn set_previous_sibling(&mut self, previous_sibling: Weak<RefCell<Node>>) {
        self.previous_sibling = previous_sibling;
    }

    pub fn previous_sibling(&self) -> Weak<RefCell<Node>> {
        self.previous_sibling.clone()
    }

    pub fn set_next_sibling(&mut self, next_sibling: Option<Rc<RefCell<Node>>>) {
        self.next_sibling = next_sibling;
    }

    pub fn next_sibling(&self) -> Option<Rc<RefCell<Node>>> {
        self.next_sibling.as_ref().cloned()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind.clone()
    }

    // Element ノードなら要素情報を返す（タグ名や属性群）。それ以外は None。
    pub fn get_element(&self) -> Option<Element> {
        match self.kind {
            NodeKind::Element(ref e) => Some(e.clone()),
            _ => None,
        }
    }

    // 属性を書き換えたいとき用。Element 以外なら None。
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self.kind {
            NodeKind::Element(ref mut e) => Some(e),
            _ => None,
        }
    }

    pub fn element_kind(&self) -> Option<ElementKind> {
        match self.kind {
            NodeKind::Element(ref e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match self.kind {
            NodeKind::Element(ref e) => e.get_attribute(name),
            _ => None,
        }
    }

    /// 属性を設定する。Element 以外のノードでは何もせず `false` を返します。
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        match self.element_mut() {
            Some(e) => {
                e.set_attribute(name, value);
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        match self.kind {
            NodeKind::Element(ref e) => e.has_class(class_name),
            _ => false,
        }
    }

    pub fn add_class(&mut self, class_name: &str) -> bool {
        match self.element_mut() {
            Some(e) => {
                e.add_class(class_name);
                true
            }
            None => false,
        }
    }

    /// `classList.toggle` 相当。切り替え後にクラスが付いていれば `Some(true)`。
    pub fn toggle_class(&mut self, class_name: &str) -> Option<bool> {
        self.element_mut().map(|e| e.toggle_class(class_name))
    }

    /// リスナーを登録する。
    ///
    /// 同じ種類・同じ `Rc` の組み合わせが既に登録済みなら二重登録はしません。
    pub fn add_event_listener(&mut self, event_type: EventType, listener: EventListener) {
        let registered = self
            .listeners
            .iter()
            .any(|l| l.event_type == event_type && Rc::ptr_eq(&l.callback, &listener));
        if registered {
            return;
        }
        self.listeners.push(RegisteredListener {
            event_type,
            callback: listener,
        });
    }

    /// 登録時と同じ `Rc` を渡したときだけ解除できます。解除できたら `true`。
    pub fn remove_event_listener(&mut self, event_type: EventType, listener: &EventListener) -> bool {
        let before = self.listeners.len();
        self.listeners
            .retain(|l| !(l.event_type == event_type && Rc::ptr_eq(&l.callback, listener)));
        self.listeners.len() != before
    }

    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }

    // dispatch 用に、指定種類のリスナーを登録順で複製して返す
    pub fn listeners(&self, event_type: EventType) -> Vec<EventListener> {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .map(|l| l.callback.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Eq)]
pub enum NodeKind {
    /// https://dom.spec.whatwg.org/#interface-document
    Document,
    /// https://dom.spec.whatwg.org/#interface-documentfragment
    DocumentFragment,
    /// https://dom.spec.whatwg.org/#interface-element
    Element(Element),
    /// https://dom.spec.whatwg.org/#interface-text
    Text(String),
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        match &self {
            NodeKind::Document => matches!(other, NodeKind::Document),
            NodeKind::DocumentFragment => matches!(other, NodeKind::DocumentFragment),
            NodeKind::Element(e1) => match &other {
                NodeKind::Element(e2) => e1.kind == e2.kind,
                _ => false,
            },
            NodeKind::Text(_) => matches!(other, NodeKind::Text(_)),
        }
    }
}

/// https://dom.spec.whatwg.org/#interface-element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(kind: ElementKind, attributes: Vec<Attribute>) -> Self {
        Self { kind, attributes }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        self.attributes.clone()
    }

    /// 属性 `name` の値を返す（存在しなければ `None`）
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|attr| attr.name() == name)
            .map(|attr| attr.value())
    }

    /// 属性を設定する。同名があれば上書き、なければ末尾に追加します。
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|attr| attr.name() == name) {
            Some(attr) => attr.set_value(value),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|attr| attr.name() != name);
    }

    /// `class` 属性を空白で区切ったクラス名の一覧
    pub fn class_list(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_list().iter().any(|c| c == class_name)
    }

    pub fn add_class(&mut self, class_name: &str) {
        if class_name.is_empty() || self.has_class(class_name) {
            return;
        }
        let mut classes = self.class_list();
        classes.push(class_name.to_string());
        self.set_attribute("class", &classes.join(" "));
    }

    pub fn remove_class(&mut self, class_name: &str) {
        let classes: Vec<String> = self
            .class_list()
            .into_iter()
            .filter(|c| c != class_name)
            .collect();
        if classes.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", &classes.join(" "));
        }
    }

    /// クラスを付け外しして、切り替え後に付いていれば `true` を返す
    pub fn toggle_class(&mut self, class_name: &str) -> bool {
        if self.has_class(class_name) {
            self.remove_class(class_name);
            false
        } else {
            self.add_class(class_name);
            true
        }
    }
}

/// https://dom.spec.whatwg.org/#interface-element
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ElementKind {
    /// https://html.spec.whatwg.org/multipage/semantics.html#the-html-element
    Html,
    /// https://html.spec.whatwg.org/multipage/sections.html#the-body-element
    Body,
    /// https://html.spec.whatwg.org/multipage/grouping-content.html#the-main-element
    Main,
    /// https://html.spec.whatwg.org/multipage/form-elements.html#the-select-element
    Select,
    /// https://html.spec.whatwg.org/multipage/form-elements.html#the-option-element
    Option,
    /// https://html.spec.whatwg.org/multipage/sections.html#the-article-element
    Article,
    /// https://html.spec.whatwg.org/multipage/sections.html#the-section-element
    Section,
    /// https://html.spec.whatwg.org/multipage/sections.html#the-h1,-h2,-h3,-h4,-h5,-and-h6-elements
    H2,
    H3,
    /// https://html.spec.whatwg.org/multipage/grouping-content.html#the-p-element
    #[default]
    P,
    /// https://html.spec.whatwg.org/multipage/form-elements.html#the-button-element
    Button,
    /// https://html.spec.whatwg.org/multipage/grouping-content.html#the-div-element
    Div,
}

// ElementKind ↔ タグ名（文字列）の相互変換
// - Display: ElementKind::P → "p"
// - FromStr: "section" → ElementKind::Section
impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let s = match self {
            ElementKind::Html => "html",
            ElementKind::Body => "body",
            ElementKind::Main => "main",
            ElementKind::Select => "select",
            ElementKind::Option => "option",
            ElementKind::Article => "article",
            ElementKind::Section => "section",
            ElementKind::H2 => "h2",
            ElementKind::H3 => "h3",
            ElementKind::P => "p",
            ElementKind::Button => "button",
            ElementKind::Div => "div",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(ElementKind::Html),
            "body" => Ok(ElementKind::Body),
            "main" => Ok(ElementKind::Main),
            "select" => Ok(ElementKind::Select),
            "option" => Ok(ElementKind::Option),
            "article" => Ok(ElementKind::Article),
            "section" => Ok(ElementKind::Section),
            "h2" => Ok(ElementKind::H2),
            "h3" => Ok(ElementKind::H3),
            "p" => Ok(ElementKind::P),
            "button" => Ok(ElementKind::Button),
            "div" => Ok(ElementKind::Div),
            _ => Err(format!("unimplemented element name {:?}", s)),
        }
    }
}
