//! # dbwire-postgres
//!
//! PostgreSQL driver for dbwire over `tokio-postgres`.
//!
//! This crate provides:
//! - Translation of a resolved `ConnectionUrl` into a `tokio_postgres::Config`
//! - A single-connection `Database` with query logging
//! - JSON argument binding
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbwire_core::{ConnectionOption, ConnectionUrl, UserInfo, open_with};
//! use dbwire_postgres::PgConnector;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dbwire_core::DriverError> {
//!     let url = ConnectionUrl::new("postgresql", "localhost:5432", "app")
//!         .with_user(UserInfo::with_password("app", "secret"));
//!
//!     let db = open_with(
//!         &PgConnector,
//!         [ConnectionOption::adapter("postgres"), ConnectionOption::url(url)],
//!     )
//!     .await?;
//!
//!     db.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod types;

pub use config::{PgConfig, SslMode};
pub use connection::{PgConnector, PgDatabase};
pub use error::{PgError, PgResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::PgConfig;
    pub use crate::connection::{PgConnector, PgDatabase};
    pub use crate::error::{PgError, PgResult};
}
