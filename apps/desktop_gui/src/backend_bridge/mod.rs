//! Bridge between the UI thread and the async worker that talks to the user store.

pub mod commands;
pub mod runtime;
