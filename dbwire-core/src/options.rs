//! Connection options.
//!
//! A connection is described by a list of [`ConnectionOption`]s applied to
//! an empty [`ConnectionOptions`]. Options of different kinds are
//! independent; a later option of the same kind overwrites an earlier one.
//!
//! ```rust
//! use dbwire_core::{ConnectionOption, ConnectionOptions, ConnectionUrl};
//!
//! let opts: ConnectionOptions = [
//!     ConnectionOption::adapter("mysql"),
//!     ConnectionOption::url(ConnectionUrl::default()),
//!     ConnectionOption::adapter("postgres"),
//!     ConnectionOption::debug(),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(opts.adapter, "postgres");
//! assert!(opts.debug);
//! ```

use tracing::Dispatch;

use crate::adapter::Adapter;
use crate::error::{ConnectionError, ConnectionResult};
use crate::locator::ConnectionUrl;

/// Settings assembled before opening a connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Adapter name, canonical or alias.
    pub adapter: String,
    /// Connection URL.
    pub url: Option<ConnectionUrl>,
    /// Logger receiving query events when `debug` is set.
    pub logger: Option<Dispatch>,
    /// Enable query logging.
    pub debug: bool,
}

/// A single change applied to [`ConnectionOptions`].
#[derive(Debug, Clone)]
pub enum ConnectionOption {
    /// Set the adapter name.
    Adapter(String),
    /// Set the connection URL.
    Url(ConnectionUrl),
    /// Set the logger.
    Logger(Dispatch),
    /// Enable query logging.
    Debug,
}

impl ConnectionOption {
    /// Set the adapter name.
    pub fn adapter(adapter: impl Into<String>) -> Self {
        Self::Adapter(adapter.into())
    }

    /// Set the connection URL.
    pub fn url(url: ConnectionUrl) -> Self {
        Self::Url(url)
    }

    /// Set the logger.
    pub fn logger(logger: Dispatch) -> Self {
        Self::Logger(logger)
    }

    /// Enable query logging.
    pub fn debug() -> Self {
        Self::Debug
    }
}

impl ConnectionOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single option.
    pub fn apply(&mut self, option: ConnectionOption) {
        match option {
            ConnectionOption::Adapter(adapter) => self.adapter = adapter,
            ConnectionOption::Url(url) => self.url = Some(url),
            ConnectionOption::Logger(logger) => self.logger = Some(logger),
            ConnectionOption::Debug => self.debug = true,
        }
    }

    /// Apply an option, builder style.
    pub fn with(mut self, option: ConnectionOption) -> Self {
        self.apply(option);
        self
    }

    /// Check that the options describe an openable connection.
    ///
    /// The adapter is checked before the URL.
    pub fn validate(&self) -> ConnectionResult<(Adapter, &ConnectionUrl)> {
        if self.adapter.is_empty() {
            return Err(ConnectionError::EmptyAdapter);
        }
        let url = self.url.as_ref().ok_or(ConnectionError::EmptyConfig)?;
        let adapter = Adapter::from_name(&self.adapter)?;
        Ok((adapter, url))
    }
}

impl Extend<ConnectionOption> for ConnectionOptions {
    fn extend<I: IntoIterator<Item = ConnectionOption>>(&mut self, iter: I) {
        for option in iter {
            self.apply(option);
        }
    }
}

impl FromIterator<ConnectionOption> for ConnectionOptions {
    fn from_iter<I: IntoIterator<Item = ConnectionOption>>(iter: I) -> Self {
        let mut opts = Self::default();
        opts.extend(iter);
        opts
    }
}
