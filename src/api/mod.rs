//! Order export HTTP API
//!
//! Run with `order-forge serve` or `order-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
