//! Error types for configuration resolution and connection setup.
//!
//! Every failure of the resolver or the connection factory is a
//! [`ConnectionError`]. Call sites add context with [`ResultExt::context`],
//! which keeps the original error reachable:
//!
//! ```rust
//! use dbwire_core::{ConnectionError, ErrorKind, ResultExt};
//!
//! let result: Result<(), ConnectionError> = Err(ConnectionError::EmptyAdapter);
//! let err = result.context("could not prepare mysql config").unwrap_err();
//!
//! assert_eq!(err.kind(), ErrorKind::EmptyAdapter);
//! assert_eq!(err.to_string(), "could not prepare mysql config: empty adapter");
//! ```

use thiserror::Error;

use crate::adapter::Adapter;

/// Opaque error produced by a database driver.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Errors that can occur while resolving configuration or opening a connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No connection URL was passed to the factory.
    #[error("empty config")]
    EmptyConfig,

    /// The adapter name is missing.
    #[error("empty adapter")]
    EmptyAdapter,

    /// The adapter name does not match any supported backend.
    #[error("unknown adapter `{0}`")]
    UnknownAdapter(String),

    /// The configuration key does not exist or has no `adapter` entry.
    #[error("configuration for key `{0}` not found")]
    ConfigNotFound(String),

    /// The driver failed to open a connection.
    #[error("could not connect to `{adapter}`: {source}")]
    Open {
        /// Adapter that was being opened.
        adapter: Adapter,
        /// Underlying driver error.
        source: DriverError,
    },

    /// The liveness check failed after the connection was opened.
    #[error("could not ping `{adapter}`: {source}")]
    Ping {
        /// Adapter that was being pinged.
        adapter: Adapter,
        /// Underlying driver error.
        source: DriverError,
    },

    /// The driver does not provide a SQL builder.
    #[error("adapter `{0}` does not provide a SQL builder")]
    MissingCapability(Adapter),

    /// An error wrapped with call-site context.
    #[error("{context}: {source}")]
    Context {
        /// Description of the failed operation.
        context: String,
        /// Wrapped error.
        source: Box<ConnectionError>,
    },
}

/// Fixed classification of a [`ConnectionError`], independent of context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ConnectionError::EmptyConfig`].
    EmptyConfig,
    /// See [`ConnectionError::EmptyAdapter`].
    EmptyAdapter,
    /// See [`ConnectionError::UnknownAdapter`].
    UnknownAdapter,
    /// See [`ConnectionError::ConfigNotFound`].
    ConfigNotFound,
    /// See [`ConnectionError::Open`].
    Open,
    /// See [`ConnectionError::Ping`].
    Ping,
    /// See [`ConnectionError::MissingCapability`].
    MissingCapability,
}

impl ConnectionError {
    /// Wrap this error with a description of the failed operation.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through every context layer.
    pub fn root(&self) -> &ConnectionError {
        let mut err = self;
        while let Self::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// The kind of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::EmptyConfig => ErrorKind::EmptyConfig,
            Self::EmptyAdapter => ErrorKind::EmptyAdapter,
            Self::UnknownAdapter(_) => ErrorKind::UnknownAdapter,
            Self::ConfigNotFound(_) => ErrorKind::ConfigNotFound,
            Self::Open { .. } => ErrorKind::Open,
            Self::Ping { .. } => ErrorKind::Ping,
            Self::MissingCapability(_) => ErrorKind::MissingCapability,
            Self::Context { .. } => unreachable!("root() never returns a context layer"),
        }
    }

    /// Check whether the innermost error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Extension for attaching context to connection results.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a description of the failed operation.
    fn context(self, context: impl Into<String>) -> ConnectionResult<T>;
}

impl<T> ResultExt<T> for ConnectionResult<T> {
    fn context(self, context: impl Into<String>) -> ConnectionResult<T> {
        self.map_err(|err| err.context(context))
    }
}
