//! UI layer: app shell, user table, user form and the blocking notice.

pub mod app;
pub mod notice;
pub mod user_form;
pub mod user_list;

pub use app::DirectoryApp;
