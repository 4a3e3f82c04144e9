pub mod breadcrumb;
pub mod config_dialog;
pub mod input;
pub mod interaction;
pub mod navigation;
pub mod percentage;
