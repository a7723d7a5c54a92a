//! The connector backed by the drivers compiled into this crate.

use async_trait::async_trait;
use dbwire_core::{Adapter, ConnectionUrl, Connector, Database, DriverResult};
use thiserror::Error;

/// No driver for the adapter was compiled in.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no driver available for adapter `{0}`")]
pub struct NoDriverError(pub Adapter);

/// Dispatches connections to the native drivers.
///
/// PostgreSQL and MySQL are served by `dbwire-postgres` and `dbwire-mysql`
/// when their cargo features are enabled. Every other adapter fails with
/// [`NoDriverError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeConnector;

impl NativeConnector {
    /// Whether a driver for `adapter` is compiled in.
    pub fn supports(adapter: Adapter) -> bool {
        match adapter {
            Adapter::Postgres => cfg!(feature = "postgres"),
            Adapter::MySql => cfg!(feature = "mysql"),
            Adapter::MsSql | Adapter::Mongo => false,
        }
    }
}

#[async_trait]
impl Connector for NativeConnector {
    async fn connect(
        &self,
        adapter: Adapter,
        url: &ConnectionUrl,
    ) -> DriverResult<Box<dyn Database>> {
        match adapter {
            #[cfg(feature = "postgres")]
            Adapter::Postgres => dbwire_postgres::PgConnector.connect(adapter, url).await,
            #[cfg(feature = "mysql")]
            Adapter::MySql => dbwire_mysql::MysqlConnector.connect(adapter, url).await,
            other => Err(Box::new(NoDriverError(other))),
        }
    }
}
