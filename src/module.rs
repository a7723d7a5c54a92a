//! Ready-made connections for the conventional configuration keys.
//!
//! Applications usually describe their databases under `database.mysql` and
//! `database.postgres`. The constructors here resolve those keys, open the
//! connection and check that it can build SQL.

use std::fmt;
use std::ops::Deref;

use dbwire_core::{
    ConfigSource, ConnectionError, ConnectionResult, Connector, Database, Dispatch, DriverResult,
    ResultExt, SqlDatabase, open_with, resolve,
};
use tracing::warn;

use crate::connector::NativeConnector;

/// Configuration key of the MySQL connection.
pub const MYSQL_KEY: &str = "database.mysql";

/// Configuration key of the PostgreSQL connection.
pub const POSTGRES_KEY: &str = "database.postgres";

macro_rules! sql_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name(Box<dyn SqlDatabase>);

        impl $name {
            /// Close the connection.
            pub async fn close(self) -> DriverResult<()> {
                self.0.close().await
            }

            /// Unwrap the connection.
            pub fn into_inner(self) -> Box<dyn SqlDatabase> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = dyn SqlDatabase;

            fn deref(&self) -> &Self::Target {
                self.0.as_ref()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("adapter", &self.0.adapter())
                    .field("logging", &self.0.logging())
                    .finish()
            }
        }
    };
}

sql_handle! {
    /// A MySQL connection that can build SQL.
    MySql
}

sql_handle! {
    /// A PostgreSQL connection that can build SQL.
    Pg
}

/// Narrow a connection to its SQL capability, closing it when it has none.
async fn into_sql(db: Box<dyn Database>) -> ConnectionResult<Box<dyn SqlDatabase>> {
    match db.into_sql() {
        Ok(db) => Ok(db),
        Err(db) => {
            let adapter = db.adapter();
            if let Err(e) = db.close().await {
                warn!(adapter = %adapter, error = %e, "failed to close connection");
            }
            Err(ConnectionError::MissingCapability(adapter))
        }
    }
}

async fn connect<C: ConfigSource + ?Sized>(
    connector: &dyn Connector,
    key: &str,
    name: &str,
    source: &C,
    logger: Option<&Dispatch>,
) -> ConnectionResult<Box<dyn SqlDatabase>> {
    let options =
        resolve(key, source, logger).context(format!("could not prepare {} config", name))?;
    let db = open_with(connector, options)
        .await
        .context(format!("could not create {} connection", name))?;
    into_sql(db).await
}

/// Open the MySQL connection configured under `database.mysql`.
pub async fn new_mysql_connection<C: ConfigSource + ?Sized>(
    source: &C,
    logger: Option<&Dispatch>,
) -> ConnectionResult<MySql> {
    new_mysql_connection_with(&NativeConnector, source, logger).await
}

/// Open the MySQL connection configured under `database.mysql` through `connector`.
pub async fn new_mysql_connection_with<C: ConfigSource + ?Sized>(
    connector: &dyn Connector,
    source: &C,
    logger: Option<&Dispatch>,
) -> ConnectionResult<MySql> {
    connect(connector, MYSQL_KEY, "mysql", source, logger)
        .await
        .map(MySql)
}

/// Open the PostgreSQL connection configured under `database.postgres`.
pub async fn new_postgres_connection<C: ConfigSource + ?Sized>(
    source: &C,
    logger: Option<&Dispatch>,
) -> ConnectionResult<Pg> {
    new_postgres_connection_with(&NativeConnector, source, logger).await
}

/// Open the PostgreSQL connection configured under `database.postgres` through `connector`.
pub async fn new_postgres_connection_with<C: ConfigSource + ?Sized>(
    connector: &dyn Connector,
    source: &C,
    logger: Option<&Dispatch>,
) -> ConnectionResult<Pg> {
    connect(connector, POSTGRES_KEY, "postgres", source, logger)
        .await
        .map(Pg)
}

/// Every configured connection.
///
/// A backend whose key is absent from the configuration is `None`.
#[derive(Debug, Default)]
pub struct Connections {
    /// The MySQL connection.
    pub mysql: Option<MySql>,
    /// The PostgreSQL connection.
    pub postgres: Option<Pg>,
}

impl Connections {
    /// Open every configured connection with the native drivers.
    pub async fn from_config<C: ConfigSource + ?Sized>(
        source: &C,
        logger: Option<&Dispatch>,
    ) -> ConnectionResult<Self> {
        Self::from_config_with(&NativeConnector, source, logger).await
    }

    /// Open every configured connection through `connector`.
    ///
    /// Fails on the first backend that cannot be opened; connections opened
    /// before it are closed.
    pub async fn from_config_with<C: ConfigSource + ?Sized>(
        connector: &dyn Connector,
        source: &C,
        logger: Option<&Dispatch>,
    ) -> ConnectionResult<Self> {
        let mut conns = Self::default();

        if source.is_set(MYSQL_KEY) {
            conns.mysql = Some(new_mysql_connection_with(connector, source, logger).await?);
        }

        if source.is_set(POSTGRES_KEY) {
            match new_postgres_connection_with(connector, source, logger).await {
                Ok(pg) => conns.postgres = Some(pg),
                Err(e) => {
                    if let Err(close) = conns.close().await {
                        warn!(error = %close, "failed to close connection");
                    }
                    return Err(e);
                }
            }
        }

        Ok(conns)
    }

    /// Whether no connection is configured.
    pub fn is_empty(&self) -> bool {
        self.mysql.is_none() && self.postgres.is_none()
    }

    /// Close every connection, returning the first error.
    pub async fn close(self) -> DriverResult<()> {
        let mysql = match self.mysql {
            Some(db) => db.close().await,
            None => Ok(()),
        };
        let postgres = match self.postgres {
            Some(db) => db.close().await,
            None => Ok(()),
        };
        mysql.and(postgres)
    }
}
