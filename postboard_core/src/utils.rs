//! utils: DOM をインデント付きの文字列にする
//!
//! ヘッドレスで動かしたとき、組み上がったページの“概形”を確認する用途に使います。
//!
//! 出力イメージ
//! ```text
//! Document
//!   <html>
//!     <body>
//!       <select id="selectMenu">
//!       <main>
//!         <p class="default-text">
//!           "Select an Employee to display their posts."
//! ```

use crate::renderer::dom::node::Node;
use crate::renderer::dom::node::NodeKind;
use std::cell::RefCell;
use std::rc::Rc;

pub fn convert_dom_to_string(root: &Option<Rc<RefCell<Node>>>) -> String {
    let mut result = String::from("\n");
    if let Some(root) = root {
        convert_dom_to_string_internal(root, 0, &mut result);
    }
    result
}

// 再帰で (1) 自分を出力 → (2) 子を順番に深さ+1で出力
fn convert_dom_to_string_internal(node: &Rc<RefCell<Node>>, depth: usize, result: &mut String) {
    result.push_str(&"  ".repeat(depth));
    result.push_str(&describe(&node.borrow()));
    result.push('\n');

    let mut child = node.borrow().first_child();
    while let Some(c) = child {
        convert_dom_to_string_internal(&c, depth + 1, result);
        child = c.borrow().next_sibling();
    }
}

fn describe(node: &Node) -> String {
    match node.kind {
        NodeKind::Document => "Document".to_string(),
        NodeKind::DocumentFragment => "DocumentFragment".to_string(),
        NodeKind::Text(ref text) => format!("{:?}", text),
        NodeKind::Element(ref e) => {
            let mut tag = format!("<{}", e.kind());
            for attr in e.attributes() {
                tag.push_str(&format!(" {}=\"{}\"", attr.name(), attr.value()));
            }
            tag.push('>');
            tag
        }
    }
}
