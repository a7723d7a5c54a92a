//! PostgreSQL connection wrapper.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dbwire_core::{
    Adapter, ConnectionUrl, Connector, Database, Dialect, DriverResult, QueryLog, QueryLogger,
    SqlDatabase,
};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info, warn};

use crate::config::PgConfig;
use crate::error::PgResult;
use crate::types::values_to_params;

/// A single PostgreSQL connection with query logging.
pub struct PgDatabase {
    client: Client,
    driver: JoinHandle<()>,
    log: QueryLog,
}

impl PgDatabase {
    /// Open a connection.
    ///
    /// The connection task is spawned on the current tokio runtime and ends
    /// when the connection is closed.
    pub async fn connect(config: &PgConfig) -> PgResult<Self> {
        let (client, connection) = config.to_pg_config().connect(NoTls).await?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "PostgreSQL connection terminated");
            }
        });

        info!(
            host = %config.host,
            port = %config.port,
            database = %config.database,
            "PostgreSQL connection opened"
        );

        Ok(Self {
            client,
            driver,
            log: QueryLog::new(),
        })
    }

    /// Execute a statement and return the number of affected rows.
    pub async fn execute_params(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> PgResult<u64> {
        debug!(sql = %sql, "Executing statement");
        let count = self.client.execute(sql, params).await?;
        Ok(count)
    }

    /// Get the underlying tokio-postgres client.
    ///
    /// This is useful for advanced operations not covered by this wrapper.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Database for PgDatabase {
    fn adapter(&self) -> Adapter {
        Adapter::Postgres
    }

    async fn ping(&self) -> DriverResult<()> {
        self.client.simple_query("SELECT 1").await?;
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
        let params = values_to_params(args)?;
        let param_refs: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p.as_ref() as _).collect();

        let start = Instant::now();
        let result = self.execute_params(query, &param_refs).await;
        self.log.record(start, query, args);

        Ok(result?)
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        let Self { client, driver, .. } = *self;
        drop(client);
        driver.await?;
        debug!("PostgreSQL connection closed");
        Ok(())
    }

    fn into_sql(self: Box<Self>) -> Result<Box<dyn SqlDatabase>, Box<dyn Database>> {
        Ok(self)
    }
}

impl SqlDatabase for PgDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}

/// Connector opening [`PgDatabase`] connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(
        &self,
        _adapter: Adapter,
        url: &ConnectionUrl,
    ) -> DriverResult<Box<dyn Database>> {
        let config = PgConfig::from_connection_url(url)?;
        let db = PgDatabase::connect(&config).await?;
        Ok(Box::new(db))
    }
}
