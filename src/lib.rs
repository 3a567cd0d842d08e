// Library target for integration tests and embedding the lesson runtime.
// The binary entry point is main.rs, which re-declares the same module tree.
// Front-end pieces are only exercised through the binary, so suppress
// dead_code warnings here.
#![allow(dead_code)]

pub mod config;
pub mod content;
pub mod lesson;
pub mod store;

// Private: terminal front end, compiled so the module tree matches main.rs.
mod app;
mod event;
mod ui;
