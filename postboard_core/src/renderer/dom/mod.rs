pub mod api;
pub mod attribute;
pub mod event;
pub mod node;
