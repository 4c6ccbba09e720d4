// Library root - exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod api;
pub mod classification;
pub mod db;
pub mod error;
pub mod metrics;
pub mod repository;
pub mod server;
pub mod store;

// Binary-facing modules, public so `main.rs` and tests can reach them.
pub mod cli;
pub mod config;
pub mod logging;
