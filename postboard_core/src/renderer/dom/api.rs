//! DOM のユーティリティ API
//!
//! ノードの生成、木の付け替え（append/remove）、テキストの読み書き、
//! それから `getElementById` / `querySelector` / `querySelectorAll` をごく限定的にした検索を提供します。
//!
//! 検索はすべて「渡したノード自身 → 子孫」の順の DFS（深さ優先探索）で、
//! 渡したノードの兄弟には広がりません。
//!
//! 例（概念）
//! - ツリー: Document → html → body → (select#selectMenu, main)
//! - `get_element_by_id(&document, "selectMenu")` → select ノード
//! - `get_target_element_node(&document, ElementKind::Main)` → main ノード
//! - `query_element_by_post_id(&main, ElementKind::Button, "5")`
//!   → `button[data-post-id='5']`

use crate::constants::POST_ID_ATTRIBUTE;
use crate::error::Error;
use crate::renderer::dom::node::Element;
use crate::renderer::dom::node::ElementKind;
use crate::renderer::dom::node::Node;
use crate::renderer::dom::node::NodeKind;
use std::cell::RefCell;
use std::rc::Rc;
use std::rc::Weak;

pub fn create_element(kind: ElementKind) -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node::new(NodeKind::Element(Element::new(
        kind,
        Vec::new(),
    )))))
}

pub fn create_text_node(text: &str) -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node::new(NodeKind::Text(text.to_string()))))
}

pub fn create_document_fragment() -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node::new(NodeKind::DocumentFragment)))
}

/// `parent` の末尾に `child` を追加する
///
/// - `child` が別の親にぶら下がっていれば、先にそこから外します（DOM と同じ“移動”）。
/// - `child` が `DocumentFragment` なら、fragment 自体ではなく中身を順番に移します。
///   移し終わった fragment は空になります。
pub fn append_child(parent: &Rc<RefCell<Node>>, child: Rc<RefCell<Node>>) {
    if Rc::ptr_eq(parent, &child) {
        return;
    }

    if child.borrow().kind == NodeKind::DocumentFragment {
        for grandchild in children(&child) {
            append_child(parent, grandchild);
        }
        return;
    }

    detach(&child);

    let last = parent.borrow().last_child().upgrade();
    match last {
        Some(last) => {
            last.borrow_mut().set_next_sibling(Some(child.clone()));
            child
                .borrow_mut()
                .set_previous_sibling(Rc::downgrade(&last));
        }
        None => parent.borrow_mut().set_first_child(Some(child.clone())),
    }
    parent.borrow_mut().set_last_child(Rc::downgrade(&child));
    child.borrow_mut().set_parent(Rc::downgrade(parent));
}

/// `child` を `parent` から外す。`parent` の子でなければ `Error::NotFound`。
pub fn remove_child(parent: &Rc<RefCell<Node>>, child: &Rc<RefCell<Node>>) -> Result<(), Error> {
    let is_child = child
        .borrow()
        .parent()
        .upgrade()
        .is_some_and(|p| Rc::ptr_eq(&p, parent));
    if !is_child {
        return Err(Error::NotFound(
            "the node to be removed is not a child of this node".to_string(),
        ));
    }
    detach(child);
    Ok(())
}

// 親・兄弟とのリンクを切って、前後の兄弟同士をつなぎ直す
fn detach(node: &Rc<RefCell<Node>>) {
    let parent = match node.borrow().parent().upgrade() {
        Some(parent) => parent,
        None => return,
    };
    let previous = node.borrow().previous_sibling().upgrade();
    let next = node.borrow().next_sibling();

    match &previous {
        Some(previous) => previous.borrow_mut().set_next_sibling(next.clone()),
        None => parent.borrow_mut().set_first_child(next.clone()),
    }
    let previous_weak = previous.as_ref().map_or_else(Weak::new, Rc::downgrade);
    match &next {
        Some(next) => next.borrow_mut().set_previous_sibling(previous_weak),
        None => parent.borrow_mut().set_last_child(previous_weak),
    }

    let mut node = node.borrow_mut();
    node.set_parent(Weak::new());
    node.set_previous_sibling(Weak::new());
    node.set_next_sibling(None);
}

/// 直下の子ノードを順番どおりに返す
pub fn children(node: &Rc<RefCell<Node>>) -> Vec<Rc<RefCell<Node>>> {
    let mut result = Vec::new();
    let mut current = node.borrow().first_child();
    while let Some(child) = current {
        current = child.borrow().next_sibling();
        result.push(child);
    }
    result
}

/// 子ノードを最後から順にすべて外し、外した数を返す
pub fn remove_all_children(parent: &Rc<RefCell<Node>>) -> usize {
    let mut removed = 0;
    loop {
        let last = parent.borrow().last_child().upgrade();
        match last {
            Some(child) => {
                detach(&child);
                removed += 1;
            }
            None => return removed,
        }
    }
}

/// 子孫のテキストノードをつなげた文字列（`textContent` 相当）
pub fn text_content(node: &Rc<RefCell<Node>>) -> String {
    if let NodeKind::Text(ref s) = node.borrow().kind {
        return s.clone();
    }
    children(node)
        .iter()
        .map(text_content)
        .collect::<Vec<String>>()
        .concat()
}

/// 子ノードを全部外して、`text` のテキストノード 1 つに置き換える
pub fn set_text_content(node: &Rc<RefCell<Node>>, text: &str) {
    remove_all_children(node);
    if !text.is_empty() {
        append_child(node, create_text_node(text));
    }
}

fn find_first<F>(node: &Rc<RefCell<Node>>, predicate: &F) -> Option<Rc<RefCell<Node>>>
where
    F: Fn(&Node) -> bool,
{
    if predicate(&node.borrow()) {
        return Some(node.clone());
    }
    children(node)
        .iter()
        .find_map(|child| find_first(child, predicate))
}

fn find_all<F>(node: &Rc<RefCell<Node>>, predicate: &F, result: &mut Vec<Rc<RefCell<Node>>>)
where
    F: Fn(&Node) -> bool,
{
    if predicate(&node.borrow()) {
        result.push(node.clone());
    }
    for child in children(node) {
        find_all(&child, predicate, result);
    }
}

/// `document.getElementById(id)` 相当
pub fn get_element_by_id(root: &Rc<RefCell<Node>>, id: &str) -> Option<Rc<RefCell<Node>>> {
    find_first(root, &|n: &Node| {
        n.get_attribute("id").is_some_and(|value| value == id)
    })
}

/// 最初に見つかった `element_kind` の要素ノードを返す（`querySelector("tag")` 相当）
pub fn get_target_element_node(
    root: &Rc<RefCell<Node>>,
    element_kind: ElementKind,
) -> Option<Rc<RefCell<Node>>> {
    find_first(root, &|n: &Node| n.element_kind() == Some(element_kind))
}

/// `root` の子孫にある `element_kind` の要素をすべて返す（`querySelectorAll("main button")` 相当）
///
/// `root` 自身は含めません。
pub fn get_elements_by_kind(
    root: &Rc<RefCell<Node>>,
    element_kind: ElementKind,
) -> Vec<Rc<RefCell<Node>>> {
    let mut result = Vec::new();
    for child in children(root) {
        find_all(
            &child,
            &|n: &Node| n.element_kind() == Some(element_kind),
            &mut result,
        );
    }
    result
}

/// `tag[data-post-id='{post_id}']` に一致する最初の要素
pub fn query_element_by_post_id(
    root: &Rc<RefCell<Node>>,
    element_kind: ElementKind,
    post_id: &str,
) -> Option<Rc<RefCell<Node>>> {
    find_first(root, &|n: &Node| {
        n.element_kind() == Some(element_kind)
            && n.get_attribute(POST_ID_ATTRIBUTE)
                .is_some_and(|value| value == post_id)
    })
}
