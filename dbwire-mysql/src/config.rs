//! MySQL configuration.
//!
//! A resolved MySQL URL renders as a DSN such as
//! `root:secret@tcp(127.0.0.1:3306)/app?parseTime=true`. This module reads
//! the pieces the `mysql_async` driver understands and keeps the rest as
//! plain options.

use std::time::Duration;

use dbwire_core::{Adapter, ConnectionUrl};
use mysql_async::{OptsBuilder, SslOpts};

use crate::error::{MysqlError, MysqlResult};

/// MySQL database configuration.
#[derive(Debug, Clone)]
pub struct MysqlConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Username for authentication.
    pub username: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// TLS mode.
    pub tls: TlsMode,
    /// Maximum packet size accepted from the server.
    pub max_allowed_packet: Option<usize>,
    /// Options without a `mysql_async` counterpart.
    pub options: Vec<(String, String)>,
}

/// TLS mode, following the `tls` DSN parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// No TLS.
    #[default]
    Disabled,
    /// TLS with certificate verification.
    Enabled,
    /// TLS without certificate verification.
    SkipVerify,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: Adapter::MySql.default_port(),
            database: String::new(),
            username: None,
            password: None,
            connect_timeout: Some(Duration::from_secs(30)),
            tls: TlsMode::default(),
            max_allowed_packet: None,
            options: Vec::new(),
        }
    }
}

/// Parse a duration such as `30s`, `500ms`, `1m` or a bare number of seconds.
fn parse_duration(value: &str) -> Option<Duration> {
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);
    let amount: u64 = amount.parse().ok()?;

    match unit {
        "" | "s" => Some(Duration::from_secs(amount)),
        "ms" => Some(Duration::from_millis(amount)),
        "m" => Some(Duration::from_secs(amount.checked_mul(60)?)),
        "h" => Some(Duration::from_secs(amount.checked_mul(3600)?)),
        _ => None,
    }
}

impl MysqlConfig {
    /// Create a configuration from a resolved connection URL.
    pub fn from_connection_url(url: &ConnectionUrl) -> MysqlResult<Self> {
        if url.scheme() != Adapter::MySql.scheme() {
            return Err(MysqlError::config(format!(
                "invalid scheme '{}', expected '{}'",
                url.scheme(),
                Adapter::MySql.scheme()
            )));
        }

        let (host, port) = url.address();
        let mut config = Self {
            host: if host.is_empty() {
                "localhost".to_string()
            } else {
                host.to_string()
            },
            port: port.unwrap_or(Adapter::MySql.default_port()),
            database: url.path().to_string(),
            username: url.username().filter(|u| !u.is_empty()).map(String::from),
            password: url.password().filter(|p| !p.is_empty()).map(String::from),
            ..Default::default()
        };

        for (key, value) in url.query_pairs() {
            match key.as_str() {
                "timeout" | "connect_timeout" => {
                    let timeout = parse_duration(&value)
                        .ok_or_else(|| MysqlError::config(format!("invalid {}: {}", key, value)))?;
                    config.connect_timeout = Some(timeout);
                }
                "tls" => {
                    config.tls = match value.as_str() {
                        "true" | "preferred" => TlsMode::Enabled,
                        "skip-verify" => TlsMode::SkipVerify,
                        "false" => TlsMode::Disabled,
                        other => {
                            return Err(MysqlError::config(format!("invalid tls: {}", other)));
                        }
                    };
                }
                "maxAllowedPacket" => {
                    let size: usize = value
                        .parse()
                        .map_err(|_| MysqlError::config("invalid maxAllowedPacket"))?;
                    config.max_allowed_packet = (size > 0).then_some(size);
                }
                _ => config.options.push((key, value)),
            }
        }

        Ok(config)
    }

    /// Get an option without a driver counterpart.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Convert to mysql_async OptsBuilder.
    pub fn to_opts_builder(&self) -> OptsBuilder {
        let mut builder = OptsBuilder::default()
            .ip_or_hostname(&self.host)
            .tcp_port(self.port)
            .db_name((!self.database.is_empty()).then_some(&self.database))
            .max_allowed_packet(self.max_allowed_packet);

        if let Some(ref user) = self.username {
            builder = builder.user(Some(user));
        }

        if let Some(ref pass) = self.password {
            builder = builder.pass(Some(pass));
        }

        match self.tls {
            TlsMode::Disabled => builder.ssl_opts(None::<SslOpts>),
            TlsMode::Enabled => builder.ssl_opts(Some(SslOpts::default())),
            TlsMode::SkipVerify => builder.ssl_opts(Some(
                SslOpts::default().with_danger_accept_invalid_certs(true),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbwire_core::UserInfo;
    use pretty_assertions::assert_eq;

    fn url(host: &str, query: &str) -> ConnectionUrl {
        ConnectionUrl::new("mysql", host, "testdb")
            .with_adapter(Adapter::MySql)
            .with_user(UserInfo::with_password("user", "pass"))
            .with_query(query)
    }

    #[test]
    fn test_config_default() {
        let config = MysqlConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
    }

    #[test]
    fn test_config_from_tcp_host() {
        let config = MysqlConfig::from_connection_url(&url("tcp(db.local:3307)", "")).unwrap();

        assert_eq!(config.host, "db.local");
        assert_eq!(config.port, 3307);
        assert_eq!(config.database, "testdb");
        assert_eq!(config.username, Some("user".to_string()));
        assert_eq!(config.password, Some("pass".to_string()));
    }

    #[test]
    fn test_config_default_port_and_empty_password() {
        let url = ConnectionUrl::new("mysql", "tcp(127.0.0.1)", "mysql")
            .with_user(UserInfo::with_password("root", ""));
        let config = MysqlConfig::from_connection_url(&url).unwrap();

        assert_eq!(config.port, 3306);
        assert_eq!(config.username, Some("root".to_string()));
        assert!(config.password.is_none());
    }

    #[test]
    fn test_config_invalid_scheme() {
        let url = ConnectionUrl::new("postgresql", "localhost", "mydb");
        assert!(MysqlConfig::from_connection_url(&url).is_err());
    }

    #[test]
    fn test_config_with_options() {
        let config = MysqlConfig::from_connection_url(&url(
            "tcp(localhost:3306)",
            "maxAllowedPacket=4194304&parseTime=true&timeout=5s&tls=skip-verify",
        ))
        .unwrap();

        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.tls, TlsMode::SkipVerify);
        assert_eq!(config.max_allowed_packet, Some(4194304));
        assert_eq!(config.option("parseTime"), Some("true"));
        assert_eq!(config.option("timeout"), None);
    }

    #[test]
    fn test_config_invalid_options() {
        assert!(MysqlConfig::from_connection_url(&url("tcp(localhost)", "timeout=soon")).is_err());
        assert!(MysqlConfig::from_connection_url(&url("tcp(localhost)", "tls=maybe")).is_err());

        let err = MysqlConfig::from_connection_url(&url(
            "tcp(localhost)",
            "timeout=400000000000000000m",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("invalid timeout"));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("1.5s"), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("400000000000000000m"), None);
        assert_eq!(parse_duration("18446744073709551615h"), None);
    }
}
