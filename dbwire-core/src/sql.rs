//! SQL building for SQL-capable connections.

use serde_json::Value;

/// Reserved words that always need quoting.
const RESERVED: &[&str] = &[
    "user", "order", "group", "select", "from", "where", "table", "index", "key", "primary",
    "foreign", "check", "default", "null", "not", "and", "or", "in", "is", "like", "between",
    "case", "when", "then", "else", "end", "as", "on", "join", "left", "right", "inner", "outer",
    "limit", "offset", "union", "all", "distinct", "having", "create", "alter", "drop", "insert",
    "update", "delete", "into", "values", "set", "returning",
];

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    RESERVED.contains(&name.to_lowercase().as_str())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// SQL dialect of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL uses $1, $2, etc. and double-quoted identifiers.
    Postgres,
    /// MySQL uses ? and backtick-quoted identifiers.
    MySql,
}

impl Dialect {
    /// Get the parameter placeholder for a 1-based index.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${}", index),
            Self::MySql => "?".to_string(),
        }
    }

    /// Quote an identifier unconditionally.
    pub fn escape_identifier(&self, name: &str) -> String {
        match self {
            Self::Postgres => format!("\"{}\"", name.replace('"', "\"\"")),
            Self::MySql => format!("`{}`", name.replace('`', "``")),
        }
    }

    /// Quote an identifier if needed.
    pub fn quote_identifier(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.escape_identifier(name)
        } else {
            name.to_string()
        }
    }
}

/// A SQL builder for constructing statements with positional parameters.
///
/// ```rust
/// use dbwire_core::{Dialect, SqlBuilder};
///
/// let mut builder = SqlBuilder::new(Dialect::Postgres);
/// builder
///     .push("SELECT * FROM ")
///     .push_identifier("user")
///     .push(" WHERE id = ")
///     .push_param(42);
///
/// let (sql, args) = builder.build();
/// assert_eq!(sql, "SELECT * FROM \"user\" WHERE id = $1");
/// assert_eq!(args, vec![serde_json::json!(42)]);
/// ```
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    dialect: Dialect,
    parts: Vec<String>,
    params: Vec<Value>,
}

impl SqlBuilder {
    /// Create a new SQL builder.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            parts: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Get the dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Push a literal SQL string.
    pub fn push(&mut self, sql: impl AsRef<str>) -> &mut Self {
        self.parts.push(sql.as_ref().to_string());
        self
    }

    /// Push a parameter placeholder and record its value.
    pub fn push_param(&mut self, value: impl Into<Value>) -> &mut Self {
        let index = self.params.len() + 1;
        self.parts.push(self.dialect.placeholder(index));
        self.params.push(value.into());
        self
    }

    /// Push an identifier (quoted if needed).
    pub fn push_identifier(&mut self, name: &str) -> &mut Self {
        self.parts.push(self.dialect.quote_identifier(name));
        self
    }

    /// Push a comma-separated list of parameters.
    pub fn push_params<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_param(value);
        }
        self
    }

    /// Start an `INSERT INTO table (columns) VALUES (...)` statement.
    pub fn insert_into<V: Into<Value>>(
        dialect: Dialect,
        table: &str,
        values: impl IntoIterator<Item = (&'static str, V)>,
    ) -> Self {
        let (columns, values): (Vec<_>, Vec<_>) = values.into_iter().unzip();
        let mut builder = Self::new(dialect);
        builder.push("INSERT INTO ").push_identifier(table).push(" (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push_identifier(column);
        }
        builder.push(") VALUES (").push_params(values).push(")");
        builder
    }

    /// Get the current SQL string (without consuming).
    pub fn sql(&self) -> String {
        self.parts.join("")
    }

    /// Get the current parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<Value>) {
        (self.parts.join(""), self.params)
    }
}
