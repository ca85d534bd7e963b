//! MySQL connector
//!
//! Connects to a MySQL server and exposes a query result as a
//! [`sluice_engine::ResultCursor`].

pub mod config;
pub mod cursor;
pub mod types;

pub use config::MySqlConfig;
pub use cursor::{connect, MySqlCursor};
