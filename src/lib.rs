//! # dbwire
//!
//! Configuration-driven database connections.
//!
//! dbwire turns an adapter-agnostic configuration subtree into a validated,
//! pinged connection:
//! - Adapter resolution (`postgres`, `mysql`, `mssql`, `mongo` and aliases)
//! - Adapter-correct connection URLs, including MySQL's `tcp(host)` DSN form
//! - Composable connection options with optional query logging
//! - Native PostgreSQL and MySQL drivers
//!
//! ## Quick Start
//!
//! ```toml
//! [database.postgres]
//! adapter = "postgres"
//! hostname = "127.0.0.1:5432"
//! database = "app"
//! username = "app"
//! password = "secret"
//! debug = true
//!
//! [database.postgres.options]
//! sslmode = "disable"
//! ```
//!
//! ```rust,no_run
//! use dbwire::{ConfigTree, new_postgres_connection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dbwire::DriverError> {
//!     dbwire::logging::init();
//!
//!     let mut config = ConfigTree::load("dbwire.toml")?;
//!     if let Ok(password) = std::env::var("PG_PASSWORD") {
//!         config.set("database.postgres.password", password);
//!     }
//!
//!     let logger = dbwire::logging::dispatch("debug", "compact");
//!     let pg = new_postgres_connection(&config, Some(&logger)).await?;
//!
//!     let mut stmt = pg.builder();
//!     stmt.push("DELETE FROM sessions WHERE id = ").push_param(42);
//!     pg.exec(stmt).await?;
//!
//!     pg.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Explicit options
//!
//! ```rust,no_run
//! use dbwire::{ConnectionOption, ConnectionUrl, UserInfo};
//!
//! # async fn example() -> Result<(), dbwire::DriverError> {
//! let url = ConnectionUrl::new("postgresql", "localhost:5432", "app")
//!     .with_user(UserInfo::with_password("app", "secret"));
//!
//! let db = dbwire::open([
//!     ConnectionOption::adapter("postgres"),
//!     ConnectionOption::url(url),
//! ])
//! .await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod connector;
pub mod module;

pub use dbwire_core::*;

pub use connector::{NativeConnector, NoDriverError};
pub use module::{
    Connections, MYSQL_KEY, MySql, POSTGRES_KEY, Pg, new_mysql_connection,
    new_mysql_connection_with, new_postgres_connection, new_postgres_connection_with,
};

/// PostgreSQL driver.
#[cfg(feature = "postgres")]
pub mod postgres {
    pub use dbwire_postgres::*;
}

/// MySQL driver.
#[cfg(feature = "mysql")]
pub mod mysql {
    pub use dbwire_mysql::*;
}

/// Open a connection with the native drivers.
///
/// See [`open_with`] for the steps performed.
pub async fn open<I>(options: I) -> ConnectionResult<Box<dyn Database>>
where
    I: IntoIterator<Item = ConnectionOption>,
{
    open_with(&NativeConnector, options).await
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::module::{Connections, MySql, Pg};
    pub use dbwire_core::{
        ConfigSource, ConfigTree, ConnectionError, ConnectionOption, ConnectionUrl, Database,
        ErrorKind, ResultExt, SqlDatabase,
    };
}
