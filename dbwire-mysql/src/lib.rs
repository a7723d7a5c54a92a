//! MySQL database driver for dbwire.
//!
//! This crate provides MySQL support for dbwire, using the `mysql_async` driver
//! for asynchronous database operations.
//!
//! # Features
//!
//! - Reads the `tcp(host:port)` DSN produced by the resolver
//! - Single-connection `Database` with query logging
//! - JSON argument binding
//!
//! # Example
//!
//! ```rust,no_run
//! use dbwire_core::{ConfigTree, open_with, resolve};
//! use dbwire_mysql::MysqlConnector;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dbwire_core::DriverError> {
//!     let config = ConfigTree::load("dbwire.toml")?;
//!     let options = resolve("database.mysql", &config, None)?;
//!     let db = open_with(&MysqlConnector, options).await?;
//!
//!     db.execute("DELETE FROM sessions WHERE expired = ?", &[true.into()]).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod types;

pub use config::{MysqlConfig, TlsMode};
pub use connection::{MysqlConnector, MysqlDatabase};
pub use error::{MysqlError, MysqlResult};
