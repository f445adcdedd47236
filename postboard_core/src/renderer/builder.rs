//! 要素ビルダー: プリミティブな値から 1 つずつ要素を作る
//!
//! ここで作る要素はどれも“まだ文書に入っていない”状態です。挿入は呼び出し側が行います。

use crate::api::model::User;
use crate::renderer::dom::api::create_element;
use crate::renderer::dom::api::set_text_content;
use crate::renderer::dom::node::ElementKind;
use crate::renderer::dom::node::Node;
use std::cell::RefCell;
use std::rc::Rc;

/// `kind` の要素を作り、テキストと（あれば）クラスを 1 つ付けて返す
///
/// - 種類を決めていないときは `ElementKind::default()`（`p`）を渡します。
/// - テキストが空文字ならテキストノードは作りません。
pub fn make_element(kind: ElementKind, text: &str, class_name: Option<&str>) -> Rc<RefCell<Node>> {
    let element = create_element(kind);
    set_text_content(&element, text);
    if let Some(class_name) = class_name {
        element.borrow_mut().add_class(class_name);
    }
    element
}

/// ユーザー 1 人につき `option` を 1 つ作る（value = id、ラベル = 名前）
///
/// - `None`（入力なし）なら `None` を返します。
/// - 空のスライスなら空の `Vec` を返します。
pub fn make_select_options(users: Option<&[User]>) -> Option<Vec<Rc<RefCell<Node>>>> {
    let users = users?;
    let options = users
        .iter()
        .map(|user| {
            let option = make_element(ElementKind::Option, &user.name, None);
            option
                .borrow_mut()
                .set_attribute("value", &user.id.to_string());
            option
        })
        .collect();
    Some(options)
}
