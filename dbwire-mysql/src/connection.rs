//! MySQL connection wrapper.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dbwire_core::{
    Adapter, ConnectionUrl, Connector, Database, Dialect, DriverResult, QueryLog, QueryLogger,
    SqlDatabase,
};
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, Params};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::MysqlConfig;
use crate::error::{MysqlError, MysqlResult};
use crate::types::json_to_params;

/// A single MySQL connection with query logging.
///
/// Statements are serialized on the underlying connection.
pub struct MysqlDatabase {
    conn: Mutex<Conn>,
    log: QueryLog,
}

impl MysqlDatabase {
    /// Open a connection, bounded by the configured connect timeout.
    pub async fn connect(config: &MysqlConfig) -> MysqlResult<Self> {
        let opts = Opts::from(config.to_opts_builder());

        let conn = match config.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, Conn::new(opts))
                .await
                .map_err(|_| {
                    MysqlError::timeout(format!("could not connect within {:?}", timeout))
                })??,
            None => Conn::new(opts).await?,
        };

        info!(
            host = %config.host,
            port = %config.port,
            database = %config.database,
            "MySQL connection opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            log: QueryLog::new(),
        })
    }

    /// Execute a statement with parameters and return the number of affected rows.
    ///
    /// Statements without parameters go through the text protocol.
    pub async fn execute_params(&self, query: &str, params: Params) -> MysqlResult<u64> {
        let mut conn = self.conn.lock().await;
        if params == Params::Empty {
            debug!(query = %query, "Executing statement");
            conn.query_drop(query).await?;
        } else {
            debug!(query = %query, "Executing parameterized statement");
            conn.exec_drop(query, params).await?;
        }
        Ok(conn.affected_rows())
    }

    /// Consume and return the inner connection.
    pub fn into_inner(self) -> Conn {
        self.conn.into_inner()
    }
}

#[async_trait]
impl Database for MysqlDatabase {
    fn adapter(&self) -> Adapter {
        Adapter::MySql
    }

    async fn ping(&self) -> DriverResult<()> {
        self.conn.lock().await.ping().await?;
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
        let result = self.execute_params(query, json_to_params(args)).await;
        self.log.record(start, query, args);

        Ok(result?)
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        (*self).into_inner().disconnect().await?;
        debug!("MySQL connection closed");
        Ok(())
    }

    fn into_sql(self: Box<Self>) -> Result<Box<dyn SqlDatabase>, Box<dyn Database>> {
        Ok(self)
    }
}

impl SqlDatabase for MysqlDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }
}

/// Connector opening [`MysqlDatabase`] connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

#[async_trait]
impl Connector for MysqlConnector {
    async fn connect(
        &self,
        _adapter: Adapter,
        url: &ConnectionUrl,
    ) -> DriverResult<Box<dyn Database>> {
        let config = MysqlConfig::from_connection_url(url)?;
        let db = MysqlDatabase::connect(&config).await?;
        Ok(Box::new(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbwire_core::UserInfo;

    #[tokio::test]
    async fn test_connector_rejects_bad_config() {
        let url = ConnectionUrl::new("mysql", "tcp(127.0.0.1:3306)", "mysql")
            .with_adapter(Adapter::MySql)
            .with_user(UserInfo::with_password("root", ""))
            .with_query("tls=maybe");

        let err = MysqlConnector
            .connect(Adapter::MySql, &url)
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Configuration error: invalid tls: maybe");
    }
}
