//! Eternal History: keeps browsing history indefinitely by storing it in a
//! bookmark-style folder tree (`root / year / month / day / hour`), with
//! visit metadata packed into each leaf's title, plus search over it.
//!
//! This library crate exposes all modules for use by the RPC binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod tree_store;
pub mod types;
