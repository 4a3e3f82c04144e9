// Public library interface for sunburst-rs
// The window binary and the debug CLI tool both build on these modules

pub mod animation;
pub mod config;
pub mod layout;
pub mod render;
pub mod tree;
pub mod ui;
