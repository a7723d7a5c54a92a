//! PostgreSQL connection configuration.

use std::time::Duration;

use dbwire_core::{Adapter, ConnectionUrl};

use crate::error::{PgError, PgResult};

/// PostgreSQL connection configuration.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// Host.
    pub host: String,
    /// Port (default: 5432).
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Username.
    pub user: String,
    /// Password.
    pub password: Option<String>,
    /// SSL mode.
    pub ssl_mode: SslMode,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Application name (shown in pg_stat_activity).
    pub application_name: Option<String>,
    /// Parameters passed to the server at startup.
    pub options: Vec<(String, String)>,
}

/// SSL mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    /// Disable SSL.
    Disable,
    /// Prefer SSL but allow non-SSL.
    #[default]
    Prefer,
}

impl PgConfig {
    /// Create a configuration from a resolved connection URL.
    pub fn from_connection_url(url: &ConnectionUrl) -> PgResult<Self> {
        if url.scheme() != Adapter::Postgres.scheme() {
            return Err(PgError::config(format!(
                "invalid scheme: expected '{}', got '{}'",
                Adapter::Postgres.scheme(),
                url.scheme()
            )));
        }

        let (host, port) = url.address();
        if host.is_empty() {
            return Err(PgError::config("missing host in URL"));
        }

        let user = match url.username() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "postgres".to_string(),
        };

        let mut ssl_mode = SslMode::Prefer;
        let mut connect_timeout = Duration::from_secs(30);
        let mut application_name = None;
        let mut options = Vec::new();

        for (key, value) in url.query_pairs() {
            match key.as_str() {
                "sslmode" => {
                    ssl_mode = match value.as_str() {
                        "disable" => SslMode::Disable,
                        "prefer" => SslMode::Prefer,
                        "require" | "verify-ca" | "verify-full" => {
                            return Err(PgError::config(format!(
                                "sslmode {} is not supported without a TLS connector",
                                value
                            )));
                        }
                        other => {
                            return Err(PgError::config(format!("invalid sslmode: {}", other)));
                        }
                    };
                }
                "connect_timeout" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| PgError::config("invalid connect_timeout"))?;
                    connect_timeout = Duration::from_secs(secs);
                }
                "application_name" => {
                    application_name = Some(value);
                }
                _ => options.push((key, value)),
            }
        }

        Ok(Self {
            host: host.to_string(),
            port: port.unwrap_or(Adapter::Postgres.default_port()),
            database: url.path().to_string(),
            user,
            password: url.password().map(String::from),
            ssl_mode,
            connect_timeout,
            application_name,
            options,
        })
    }

    /// Convert to tokio-postgres config.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.user(&self.user);

        if !self.database.is_empty() {
            config.dbname(&self.database);
        }

        if let Some(ref password) = self.password {
            config.password(password);
        }

        if let Some(ref app_name) = self.application_name {
            config.application_name(app_name);
        }

        config.ssl_mode(match self.ssl_mode {
            SslMode::Disable => tokio_postgres::config::SslMode::Disable,
            SslMode::Prefer => tokio_postgres::config::SslMode::Prefer,
        });

        if !self.options.is_empty() {
            let startup = self
                .options
                .iter()
                .map(|(key, value)| format!("-c {}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            config.options(&startup);
        }

        config.connect_timeout(self.connect_timeout);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbwire_core::UserInfo;
    use pretty_assertions::assert_eq;

    fn url(host: &str, query: &str) -> ConnectionUrl {
        ConnectionUrl::new("postgresql", host, "mydb")
            .with_adapter(Adapter::Postgres)
            .with_user(UserInfo::with_password("user", "pass"))
            .with_query(query)
    }

    #[test]
    fn test_config_from_connection_url() {
        let config = PgConfig::from_connection_url(&url("localhost:5433", "")).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5433);
        assert_eq!(config.database, "mydb");
        assert_eq!(config.user, "user");
        assert_eq!(config.password, Some("pass".to_string()));
        assert_eq!(config.ssl_mode, SslMode::Prefer);
    }

    #[test]
    fn test_config_with_params() {
        let config = PgConfig::from_connection_url(&url(
            "localhost",
            "application_name=dbwire&search_path=app&sslmode=disable",
        ))
        .unwrap();

        assert_eq!(config.port, 5432);
        assert_eq!(config.ssl_mode, SslMode::Disable);
        assert_eq!(config.application_name, Some("dbwire".to_string()));
        assert_eq!(
            config.options,
            vec![("search_path".to_string(), "app".to_string())]
        );
    }

    #[test]
    fn test_config_invalid_params() {
        let err = PgConfig::from_connection_url(&url("localhost", "sslmode=sometimes")).unwrap_err();
        assert!(err.is_config_error());

        let err =
            PgConfig::from_connection_url(&url("localhost", "connect_timeout=soon")).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_rejects_required_tls() {
        for mode in ["require", "verify-ca", "verify-full"] {
            let err = PgConfig::from_connection_url(&url("localhost", &format!("sslmode={}", mode)))
                .unwrap_err();
            assert!(err.is_config_error());
            assert_eq!(
                err.to_string(),
                format!(
                    "configuration error: sslmode {} is not supported without a TLS connector",
                    mode
                )
            );
        }
    }

    #[test]
    fn test_config_invalid_scheme() {
        let url = ConnectionUrl::new("mysql", "tcp(localhost)", "db");
        assert!(PgConfig::from_connection_url(&url).is_err());
    }

    #[test]
    fn test_config_missing_host() {
        assert!(PgConfig::from_connection_url(&url("", "")).is_err());
    }

    #[test]
    fn test_to_pg_config() {
        let config = PgConfig::from_connection_url(&url("db:6432", "sslmode=disable"))
            .unwrap()
            .to_pg_config();

        assert_eq!(config.get_ports(), &[6432]);
        assert_eq!(config.get_user(), Some("user"));
        assert_eq!(config.get_dbname(), Some("mydb"));
        assert_eq!(config.get_password(), Some(&b"pass"[..]));
        assert_eq!(
            config.get_ssl_mode(),
            tokio_postgres::config::SslMode::Disable
        );
    }
}
