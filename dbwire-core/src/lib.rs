//! # dbwire-core
//!
//! Configuration-driven connection setup shared by the dbwire drivers.
//!
//! This crate provides:
//! - Adapter resolution from a key-value configuration tree
//! - Adapter-correct connection URLs (`tcp(host)` wrapping for MySQL)
//! - Composable connection options and the connection factory
//! - The driver boundary (`Connector`, `Database`, `SqlDatabase`)
//! - Query logging through `tracing`
//!
//! ## Resolving and opening
//!
//! ```rust,no_run
//! use dbwire_core::{ConfigTree, Connector, open_with, resolve};
//!
//! # async fn example(connector: &dyn Connector) -> Result<(), dbwire_core::DriverError> {
//! let config = ConfigTree::load("dbwire.toml")?;
//! let options = resolve("database.postgres", &config, None)?;
//! let db = open_with(connector, options).await?;
//! db.execute("SELECT 1", &[]).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod config;
pub mod database;
pub mod error;
pub mod factory;
pub mod locator;
pub mod logging;
pub mod options;
pub mod resolver;
pub mod sql;

#[cfg(test)]
mod test_support;

pub use adapter::Adapter;
pub use config::{ConfigError, ConfigResult, ConfigSource, ConfigTree};
pub use database::{Connector, Database, QueryEvent, QueryLog, QueryLogger, SqlDatabase};
pub use error::{
    ConnectionError, ConnectionResult, DriverError, DriverResult, ErrorKind, ResultExt,
};
pub use factory::open_with;
pub use locator::{ConnectionUrl, UserInfo};
pub use logging::{TracingQueryLogger, normalize_query};
pub use options::{ConnectionOption, ConnectionOptions};
pub use resolver::resolve;
pub use sql::{Dialect, SqlBuilder};

/// Re-export of the `tracing` dispatcher used as the injected logger.
pub use tracing::Dispatch;
