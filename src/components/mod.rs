pub mod hooks;
pub mod tree;
pub mod ui;
