pub mod builder;
pub mod dom;
pub mod page;
pub mod section;
