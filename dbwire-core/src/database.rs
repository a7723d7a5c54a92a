//! The driver boundary.
//!
//! A [`Connector`] opens a [`Database`] for an adapter and a URL. The
//! factory only calls `connect`, `ping`, `set_logging` and `set_logger`;
//! everything else on [`Database`] is a pass-through to the driver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::Adapter;
use crate::error::DriverResult;
use crate::locator::ConnectionUrl;
use crate::logging::normalize_query;
use crate::sql::{Dialect, SqlBuilder};

/// A statement executed by a driver, as reported to a [`QueryLogger`].
#[derive(Debug, Clone)]
pub struct QueryEvent {
    /// When execution started.
    pub start: Instant,
    /// When execution finished.
    pub end: Instant,
    /// Raw statement text.
    pub query: String,
    /// Positional arguments.
    pub args: Vec<Value>,
}

impl QueryEvent {
    /// Time spent executing the statement.
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }
}

/// Sink for query events.
pub trait QueryLogger: Send + Sync {
    /// Record one executed statement.
    fn log(&self, event: &QueryEvent);
}

/// Logging state shared by the driver implementations.
///
/// When logging is enabled every event goes to the installed logger, or to
/// the ambient `tracing` subscriber when none is installed.
#[derive(Clone, Default)]
pub struct QueryLog {
    enabled: bool,
    logger: Option<Arc<dyn QueryLogger>>,
}

impl QueryLog {
    /// Create a disabled query log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable logging.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Install a logger.
    pub fn set_logger(&mut self, logger: Arc<dyn QueryLogger>) {
        self.logger = Some(logger);
    }

    /// Whether a logger is installed.
    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// Record a statement that ran between `start` and now.
    pub fn record(&self, start: Instant, query: &str, args: &[Value]) {
        if !self.enabled {
            return;
        }

        let event = QueryEvent {
            start,
            end: Instant::now(),
            query: query.to_string(),
            args: args.to_vec(),
        };

        match self.logger {
            Some(ref logger) => logger.log(&event),
            None => tracing::debug!(
                target: "dbwire::query",
                spent = ?event.elapsed(),
                query = %normalize_query(&event.query),
                args = ?event.args,
                "exec query"
            ),
        }
    }
}

impl std::fmt::Debug for QueryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryLog")
            .field("enabled", &self.enabled)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// An open database connection.
#[async_trait]
pub trait Database: Send + Sync {
    /// Adapter of this connection.
    fn adapter(&self) -> Adapter;

    /// Round-trip to the server.
    async fn ping(&self) -> DriverResult<()>;

    /// Enable or disable query logging.
    fn set_logging(&mut self, enabled: bool);

    /// Whether query logging is enabled.
    fn logging(&self) -> bool;

    /// Install the sink for query events.
    fn set_logger(&mut self, logger: Arc<dyn QueryLogger>);

    /// Execute a statement with positional arguments, returning affected rows.
    async fn execute(&self, query: &str, args: &[Value]) -> DriverResult<u64>;

    /// Close the connection.
    async fn close(self: Box<Self>) -> DriverResult<()>;

    /// Narrow to a SQL-capable connection.
    ///
    /// Drivers without SQL building capability hand the connection back.
    fn into_sql(self: Box<Self>) -> Result<Box<dyn SqlDatabase>, Box<dyn Database>>;
}

/// A connection that can build SQL for its dialect.
#[async_trait]
pub trait SqlDatabase: Database {
    /// SQL dialect of the connection.
    fn dialect(&self) -> Dialect;

    /// Start a new statement.
    fn builder(&self) -> SqlBuilder {
        SqlBuilder::new(self.dialect())
    }

    /// Execute a built statement.
    async fn exec(&self, builder: SqlBuilder) -> DriverResult<u64> {
        let (query, args) = builder.build();
        self.execute(&query, &args).await
    }
}

/// Opens connections for an adapter.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection. The URL is already validated and bound to `adapter`.
    async fn connect(&self, adapter: Adapter, url: &ConnectionUrl)
    -> DriverResult<Box<dyn Database>>;
}
