//! DOM イベント（click / change）とディスパッチ
//!
//! - リスナーは `Rc<dyn Fn(&Event)>`。登録解除には登録時と同じ `Rc` が必要です。
//! - バブリングはしません。ターゲット自身に登録されたリスナーだけを、登録順に呼びます。

use crate::renderer::dom::node::Node;
use std::cell::RefCell;
use std::rc::Rc;

pub type EventListener = Rc<dyn Fn(&Event)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventType {
    /// https://w3c.github.io/uievents/#event-type-click
    Click,
    /// https://html.spec.whatwg.org/multipage/indices.html#event-change
    Change,
}

#[derive(Debug, Clone)]
pub struct Event {
    event_type: EventType,
    target: Rc<RefCell<Node>>,
}

impl Event {
    pub fn new(event_type: EventType, target: Rc<RefCell<Node>>) -> Self {
        Self { event_type, target }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn target(&self) -> Rc<RefCell<Node>> {
        self.target.clone()
    }

    // `event.target.value` 相当。値が無ければ None。
    pub fn target_value(&self) -> Option<String> {
        self.target.borrow().get_attribute("value")
    }
}

/// `target` にイベントを送り、呼び出したリスナーの数を返す
///
/// リスナーの中でターゲットを書き換えられるよう、借用を解放してから呼び出します。
pub fn dispatch_event(target: &Rc<RefCell<Node>>, event_type: EventType) -> usize {
    let listeners = target.borrow().listeners(event_type);
    let event = Event::new(event_type, target.clone());
    for listener in &listeners {
        listener(&event);
    }
    listeners.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::dom::node::Element;
    use crate::renderer::dom::node::ElementKind;
    use crate::renderer::dom::node::NodeKind;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_calls_matching_listeners() {
        let select = Rc::new(RefCell::new(Node::new(NodeKind::Element(Element::new(
            ElementKind::Select,
            Vec::new(),
        )))));
        select.borrow_mut().set_attribute("value", "3");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let clicks = Rc::new(Cell::new(0));

        let seen_in_listener = seen.clone();
        select.borrow_mut().add_event_listener(
            EventType::Change,
            Rc::new(move |e: &Event| seen_in_listener.borrow_mut().push(e.target_value())),
        );
        let clicks_in_listener = clicks.clone();
        select.borrow_mut().add_event_listener(
            EventType::Click,
            Rc::new(move |_: &Event| clicks_in_listener.set(clicks_in_listener.get() + 1)),
        );

        assert_eq!(dispatch_event(&select, EventType::Change), 1);
        assert_eq!(*seen.borrow(), vec![Some("3".to_string())]);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_listener_may_mutate_target() {
        let button = Rc::new(RefCell::new(Node::new(NodeKind::Element(Element::new(
            ElementKind::Button,
            Vec::new(),
        )))));
        button.borrow_mut().add_event_listener(
            EventType::Click,
            Rc::new(|e: &Event| {
                e.target().borrow_mut().toggle_class("active");
            }),
        );

        dispatch_event(&button, EventType::Click);
        assert!(button.borrow().has_class("active"));
    }
}
