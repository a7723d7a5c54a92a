//! Key-value configuration consumed by the resolver.
//!
//! Configuration is addressed by dotted, case-insensitive paths such as
//! `database.mysql.hostname`. The resolver reads it through the
//! [`ConfigSource`] trait; [`ConfigTree`] is the bundled implementation over
//! a TOML document.
//!
//! ```rust
//! use dbwire_core::{ConfigSource, ConfigTree};
//!
//! let config = ConfigTree::from_toml_str(r#"
//!     [database.postgres]
//!     adapter = "postgres"
//!     hostname = "127.0.0.1:5432"
//!     debug = true
//! "#).unwrap();
//!
//! assert!(config.is_set("database.postgres.adapter"));
//! assert_eq!(config.get_string("Database.Postgres.Hostname"), "127.0.0.1:5432");
//! assert!(config.get_bool("database.postgres.debug"));
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::{Table, Value};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config file {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read access to a key-value configuration tree.
///
/// Only [`ConfigSource::get`] is required; the typed getters follow the
/// usual loose conversions (missing values read as empty or false).
pub trait ConfigSource {
    /// Look up the value at a dotted path.
    fn get(&self, path: &str) -> Option<&Value>;

    /// Check whether a value exists at the path.
    fn is_set(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Read a value as a string. Scalars are converted, anything else is empty.
    fn get_string(&self, path: &str) -> String {
        self.get(path).and_then(scalar_to_string).unwrap_or_default()
    }

    /// Read a value as a boolean.
    fn get_bool(&self, path: &str) -> bool {
        match self.get(path) {
            Some(Value::Boolean(b)) => *b,
            Some(Value::Integer(i)) => *i != 0,
            Some(Value::String(s)) => {
                matches!(s.as_str(), "1" | "t" | "T" | "true" | "TRUE" | "True")
            }
            _ => false,
        }
    }

    /// Read a table.
    fn get_table(&self, path: &str) -> Option<&Table> {
        self.get(path).and_then(Value::as_table)
    }

    /// Read a value as a list of strings.
    ///
    /// Arrays yield one entry per scalar element, strings are split on
    /// whitespace and other scalars yield a single entry.
    fn get_string_slice(&self, path: &str) -> Vec<String> {
        match self.get(path) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

fn split_path(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase)
}

fn lowercase_keys(table: Table) -> Table {
    table
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), lowercase_value(value)))
        .collect()
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::Table(table) => Value::Table(lowercase_keys(table)),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_value).collect()),
        other => other,
    }
}

/// In-memory configuration tree with case-insensitive keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Table,
}

impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree from a TOML table. Keys are lowercased.
    pub fn from_table(table: Table) -> Self {
        Self {
            root: lowercase_keys(table),
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let table: Table = toml::from_str(input)?;
        Ok(Self::from_table(table))
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Set a value, creating intermediate tables as needed.
    ///
    /// An intermediate non-table value is replaced by a table.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments: Vec<String> = split_path(path).collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut table = &mut self.root;
        for segment in segments {
            let entry = table
                .entry(segment)
                .or_insert_with(|| Value::Table(Table::new()));
            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }
            let Value::Table(next) = entry else {
                return;
            };
            table = next;
        }

        table.insert(last, lowercase_value(value.into()));
    }

    /// Set a value only if nothing is set at the path yet.
    pub fn set_default(&mut self, path: &str, value: impl Into<Value>) {
        if !self.is_set(path) {
            self.set(path, value);
        }
    }

    /// Get the root table.
    pub fn as_table(&self) -> &Table {
        &self.root
    }
}

impl ConfigSource for ConfigTree {
    fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = split_path(path);
        let mut value = self.root.get(&segments.next()?)?;
        for segment in segments {
            value = value.as_table()?.get(&segment)?;
        }
        Some(value)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, path: &str) -> Option<&Value> {
        (**self).get(path)
    }
}
