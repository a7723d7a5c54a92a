//! Supported database adapters.

use std::fmt;

use crate::error::{ConnectionError, ConnectionResult};

/// Database adapter type.
///
/// The set of adapters is closed: resolving configuration or opening a
/// connection for any other name fails with
/// [`ConnectionError::UnknownAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adapter {
    /// PostgreSQL
    Postgres,
    /// MySQL / MariaDB
    MySql,
    /// Microsoft SQL Server
    MsSql,
    /// MongoDB
    Mongo,
}

impl Adapter {
    /// All adapters, in declaration order.
    pub const ALL: [Adapter; 4] = [Self::Postgres, Self::MySql, Self::MsSql, Self::Mongo];

    /// Get the canonical adapter name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::MySql => "mysql",
            Self::MsSql => "mssql",
            Self::Mongo => "mongodb",
        }
    }

    /// Get the URL scheme used when rendering a connection URL.
    pub fn scheme(&self) -> &'static str {
        self.name()
    }

    /// Alternative names accepted in configuration.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Postgres => &["postgres"],
            Self::MySql | Self::MsSql => &[],
            Self::Mongo => &["mongo"],
        }
    }

    /// Get the default port.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::MySql => 3306,
            Self::MsSql => 1433,
            Self::Mongo => 27017,
        }
    }

    /// Parse an adapter from its canonical name or an alias.
    ///
    /// Matching is exact: configuration values are expected in lower case.
    ///
    /// ```rust
    /// use dbwire_core::Adapter;
    ///
    /// assert_eq!(Adapter::from_name("postgres").unwrap(), Adapter::Postgres);
    /// assert_eq!(Adapter::from_name("postgresql").unwrap(), Adapter::Postgres);
    /// assert_eq!(Adapter::from_name("mongo").unwrap(), Adapter::Mongo);
    /// assert!(Adapter::from_name("oracle").is_err());
    /// ```
    pub fn from_name(name: &str) -> ConnectionResult<Self> {
        match name {
            "" => Err(ConnectionError::EmptyAdapter),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            "mssql" => Ok(Self::MsSql),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(ConnectionError::UnknownAdapter(other.to_string())),
        }
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Adapter {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
