//! Adapter-aware connection URLs.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::adapter::Adapter;

/// Characters escaped in the userinfo component.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Characters escaped in the path component.
const PATH: &AsciiSet = &USERINFO.remove(b':').remove(b'@').remove(b'/');

/// Username and optional password of a connection URL.
///
/// An empty password (`Some("")`) is rendered as `user:@`, an absent one as
/// `user@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// Username.
    pub username: String,
    /// Password, if one was supplied.
    pub password: Option<String>,
}

impl UserInfo {
    /// Userinfo with a username only.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    /// Userinfo with a username and a password.
    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }
}

impl fmt::Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", utf8_percent_encode(&self.username, USERINFO))?;
        if let Some(ref password) = self.password {
            write!(f, ":{}", utf8_percent_encode(password, USERINFO))?;
        }
        Ok(())
    }
}

/// A connection locator understood by one adapter.
///
/// The host is kept verbatim so that driver-specific host syntax such as the
/// MySQL `tcp(host:port)` wrapper survives rendering. Two renderings exist:
///
/// - [`ConnectionUrl::to_url_string`] always includes the scheme;
/// - [`Display`](fmt::Display) is the form handed to the driver, which for
///   MySQL omits the leading `mysql://`.
///
/// ```rust
/// use dbwire_core::{Adapter, ConnectionUrl, UserInfo};
///
/// let url = ConnectionUrl::new(Adapter::MySql.scheme(), "tcp(127.0.0.1:3306)", "app")
///     .with_adapter(Adapter::MySql)
///     .with_user(UserInfo::with_password("root", ""));
///
/// assert_eq!(url.to_url_string(), "mysql://root:@tcp(127.0.0.1:3306)/app");
/// assert_eq!(url.to_string(), "root:@tcp(127.0.0.1:3306)/app");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionUrl {
    adapter: Option<Adapter>,
    scheme: String,
    host: String,
    path: String,
    user: Option<UserInfo>,
    query: String,
}

impl ConnectionUrl {
    /// Create a URL from its scheme, host and path (database name).
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            adapter: None,
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            user: None,
            query: String::new(),
        }
    }

    /// Bind the URL to an adapter, which selects its driver rendering.
    pub fn with_adapter(mut self, adapter: Adapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Set the userinfo.
    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the encoded query string (without the leading `?`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the scheme.
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    /// Set the host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Get the adapter this URL is bound to.
    pub fn adapter(&self) -> Option<Adapter> {
        self.adapter
    }

    /// Get the scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the host, including any driver-specific wrapper.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Split the host into a network address and an optional port.
    ///
    /// A `tcp(...)` wrapper is removed and IPv6 brackets are stripped.
    ///
    /// ```rust
    /// use dbwire_core::ConnectionUrl;
    ///
    /// let url = ConnectionUrl::new("mysql", "tcp(127.0.0.1:3306)", "app");
    /// assert_eq!(url.address(), ("127.0.0.1", Some(3306)));
    ///
    /// let url = ConnectionUrl::new("postgresql", "[::1]", "app");
    /// assert_eq!(url.address(), ("::1", None));
    /// ```
    pub fn address(&self) -> (&str, Option<u16>) {
        let host = self
            .host
            .strip_prefix("tcp(")
            .and_then(|h| h.strip_suffix(')'))
            .unwrap_or(self.host.as_str());

        if let Some(rest) = host.strip_prefix('[') {
            return match rest.split_once(']') {
                Some((addr, tail)) => (addr, tail.strip_prefix(':').and_then(|p| p.parse().ok())),
                None => (host, None),
            };
        }

        match host.rsplit_once(':') {
            Some((addr, port)) if !addr.contains(':') => match port.parse() {
                Ok(port) => (addr, Some(port)),
                Err(_) => (host, None),
            },
            _ => (host, None),
        }
    }

    /// Get the path (database name), without a leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the userinfo.
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// Get the username.
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// Get the password.
    pub fn password(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.password.as_deref())
    }

    /// Get the encoded query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Decoded query parameters, in encoded order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        ::url::form_urlencoded::parse(self.query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Get the first value of a query parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Render the URL with its scheme, regardless of the adapter.
    pub fn to_url_string(&self) -> String {
        let mut url = String::new();
        if !self.scheme.is_empty() {
            url.push_str(&self.scheme);
            url.push(':');
        }
        if !self.host.is_empty() || self.user.is_some() {
            url.push_str("//");
        }
        url.push_str(&self.authority_and_rest());
        url
    }

    fn authority_and_rest(&self) -> String {
        let mut url = String::new();

        if let Some(ref user) = self.user {
            url.push_str(&user.to_string());
            url.push('@');
        }

        url.push_str(&self.host);

        if !self.path.is_empty() {
            if !self.path.starts_with('/') && (!self.host.is_empty() || self.user.is_some()) {
                url.push('/');
            }
            url.push_str(&utf8_percent_encode(&self.path, PATH).to_string());
        }

        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }

        url
    }
}

impl fmt::Display for ConnectionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adapter {
            Some(Adapter::MySql) => f.write_str(&self.authority_and_rest()),
            _ => f.write_str(&self.to_url_string()),
        }
    }
}
