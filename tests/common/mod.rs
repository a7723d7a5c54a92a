//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dbwire::{
    Adapter, ConnectionUrl, Connector, Database, Dialect, Dispatch, DriverResult, QueryLog,
    QueryLogger, SqlDatabase,
};
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MemoryError(pub String);

/// Everything the in-memory backend observed.
#[derive(Debug, Default)]
pub struct Journal {
    /// `(adapter, rendered url)` per successful connect.
    pub connects: Vec<(Adapter, String)>,
    /// Executed statements.
    pub statements: Vec<(String, Vec<Value>)>,
    /// Adapters whose connection was closed.
    pub closed: Vec<Adapter>,
}

/// Connector backed by memory, failing on demand.
#[derive(Default, Clone)]
pub struct MemoryConnector {
    pub refuse: Vec<Adapter>,
    pub fail_ping: Vec<Adapter>,
    pub without_sql: Vec<Adapter>,
    pub journal: Arc<Mutex<Journal>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse(mut self, adapter: Adapter) -> Self {
        self.refuse.push(adapter);
        self
    }

    pub fn fail_ping(mut self, adapter: Adapter) -> Self {
        self.fail_ping.push(adapter);
        self
    }

    pub fn without_sql(mut self, adapter: Adapter) -> Self {
        self.without_sql.push(adapter);
        self
    }

    pub fn connects(&self) -> Vec<(Adapter, String)> {
        self.journal.lock().connects.clone()
    }

    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.journal.lock().statements.clone()
    }

    pub fn closed(&self) -> Vec<Adapter> {
        self.journal.lock().closed.clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(
        &self,
        adapter: Adapter,
        url: &ConnectionUrl,
    ) -> DriverResult<Box<dyn Database>> {
        if self.refuse.contains(&adapter) {
            return Err(Box::new(MemoryError(format!("{} refused", url))));
        }
        self.journal.lock().connects.push((adapter, url.to_string()));

        Ok(Box::new(MemoryDatabase {
            adapter,
            fail_ping: self.fail_ping.contains(&adapter),
            sql: !self.without_sql.contains(&adapter),
            log: QueryLog::new(),
            journal: self.journal.clone(),
        }))
    }
}

pub struct MemoryDatabase {
    adapter: Adapter,
    fail_ping: bool,
    sql: bool,
    log: QueryLog,
    journal: Arc<Mutex<Journal>>,
}

#[async_trait]
impl Database for MemoryDatabase {
    fn adapter(&self) -> Adapter {
        self.adapter
    }

    async fn ping(&self) -> DriverResult<()> {
        if self.fail_ping {
            return Err(Box::new(MemoryError("server has gone away".into())));
        }
        Ok(())
    }

    fn set_logging(&mut self, enabled: bool) {
        self.log.set_enabled(enabled);
    }

    fn logging(&self) -> bool {
        self.log.is_enabled()
    }

    fn set_logger(&mut self, logger: Arc<dyn QueryLogger>) {
        self.log.set_logger(logger);
    }

    async fn execute(&self, query: &str, args: &[Value]) -> DriverResult<u64> {
        let start = Instant::now();
        self.journal
            .lock()
            .statements
            .push((query.to_string(), args.to_vec()));
        self.log.record(start, query, args);
        Ok(1)
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        self.journal.lock().closed.push(self.adapter);
        Ok(())
    }

    fn into_sql(self: Box<Self>) -> Result<Box<dyn SqlDatabase>, Box<dyn Database>> {
        if self.sql { Ok(self) } else { Err(self) }
    }
}

impl SqlDatabase for MemoryDatabase {
    fn dialect(&self) -> Dialect {
        match self.adapter {
            Adapter::MySql => Dialect::MySql,
            _ => Dialect::Postgres,
        }
    }
}

/// In-memory log sink.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Buffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A debug-level dispatcher writing plain text into a buffer.
pub fn capture() -> (Dispatch, Buffer) {
    let buffer = Buffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    (Dispatch::new(subscriber), buffer)
}
