//! Raw option values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

/// Name of a recognized pool option.
///
/// Variants are listed in schema order, which is also the order in which
/// validation errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum OptionName {
    /// Adapter key selecting a connector from the registry.
    Adapter,
    /// Raw JDBC connection URL.
    JdbcUrl,
    /// Login user name.
    Username,
    /// Login password.
    Password,
    /// Database name passed to the connector's property bag.
    DatabaseName,
    /// Server name passed to the connector's property bag.
    ServerName,
    /// Auto-commit behavior of pooled connections.
    AutoCommit,
    /// Connection acquisition timeout in milliseconds.
    ConnectionTimeout,
    /// Idle timeout in milliseconds.
    IdleTimeout,
    /// Maximum connection lifetime in milliseconds.
    MaxLifetime,
    /// Maximum number of pooled connections.
    MaximumPoolSize,
    /// Minimum number of idle connections.
    MinimumIdle,
    /// Query used to test connections.
    ConnectionTestQuery,
    /// Pool name used in logs and management.
    PoolName,
}

impl OptionName {
    /// All option names, in schema order.
    pub const ALL: [OptionName; 14] = [
        Self::Adapter,
        Self::JdbcUrl,
        Self::Username,
        Self::Password,
        Self::DatabaseName,
        Self::ServerName,
        Self::AutoCommit,
        Self::ConnectionTimeout,
        Self::IdleTimeout,
        Self::MaxLifetime,
        Self::MaximumPoolSize,
        Self::MinimumIdle,
        Self::ConnectionTestQuery,
        Self::PoolName,
    ];

    /// The option key as it appears in raw input and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Adapter => "adapter",
            Self::JdbcUrl => "jdbc_url",
            Self::Username => "username",
            Self::Password => "password",
            Self::DatabaseName => "database_name",
            Self::ServerName => "server_name",
            Self::AutoCommit => "auto_commit",
            Self::ConnectionTimeout => "connection_timeout",
            Self::IdleTimeout => "idle_timeout",
            Self::MaxLifetime => "max_lifetime",
            Self::MaximumPoolSize => "maximum_pool_size",
            Self::MinimumIdle => "minimum_idle",
            Self::ConnectionTestQuery => "connection_test_query",
            Self::PoolName => "pool_name",
        }
    }

    /// Look up an option by its key. Returns `None` for unknown keys.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == key)
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed option value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
}

impl OptionValue {
    /// Get the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload, if this is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the boolean payload, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value counts as filled: anything except an empty string.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !matches!(self, Self::Str(s) if s.is_empty())
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Raw, unvalidated pool options keyed by option name.
///
/// A key that is not present is an absent option.
///
/// ```rust
/// use dbpool_config::{OptionName, RawOptions};
///
/// let options = RawOptions::new()
///     .with(OptionName::Adapter, "postgresql")
///     .with(OptionName::Username, "app")
///     .with(OptionName::Password, "secret")
///     .with(OptionName::MaximumPoolSize, 20);
///
/// assert_eq!(options.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    values: BTreeMap<OptionName, OptionValue>,
}

impl RawOptions {
    /// Create an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, consuming and returning `self`.
    #[must_use]
    pub fn with(mut self, name: OptionName, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an option, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: OptionName,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.values.insert(name, value.into())
    }

    /// Remove an option, returning its value if it was present.
    pub fn remove(&mut self, name: OptionName) -> Option<OptionValue> {
        self.values.remove(&name)
    }

    /// Get the value of an option.
    #[must_use]
    pub fn get(&self, name: OptionName) -> Option<&OptionValue> {
        self.values.get(&name)
    }

    /// Whether an option is present.
    #[must_use]
    pub fn contains(&self, name: OptionName) -> bool {
        self.values.contains_key(&name)
    }

    /// Number of present options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over present options in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, &OptionValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

impl<V: Into<OptionValue>> FromIterator<(OptionName, V)> for RawOptions {
    fn from_iter<I: IntoIterator<Item = (OptionName, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RawOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, Option<OptionValue>>::deserialize(deserializer)?;
        let mut options = RawOptions::new();
        for (key, value) in map {
            let Some(name) = OptionName::from_key(&key) else {
                tracing::warn!(option = %key, "ignoring unknown pool option");
                continue;
            };
            // null means absent
            if let Some(value) = value {
                options.values.insert(name, value);
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_option_name_keys_round_trip() {
        for name in OptionName::ALL {
            assert_eq!(OptionName::from_key(name.as_str()), Some(name));
        }
        assert_eq!(OptionName::from_key("maximumPoolSize"), None);
    }

    #[test]
    fn test_option_name_order_matches_all() {
        let mut sorted = OptionName::ALL;
        sorted.sort();
        assert_eq!(sorted, OptionName::ALL);
    }

    #[test]
    fn test_option_value_filled() {
        assert!(!OptionValue::from("").is_filled());
        assert!(OptionValue::from("x").is_filled());
        assert!(OptionValue::from(0).is_filled());
        assert!(OptionValue::from(false).is_filled());
    }

    #[test]
    fn test_integer_literal_conversion() {
        assert_eq!(OptionValue::from(250), OptionValue::Int(250));
        assert_eq!(OptionValue::from(7u32).as_int(), Some(7));
    }

    #[test]
    fn test_raw_options_builder() {
        let mut options = RawOptions::new()
            .with(OptionName::Username, "u")
            .with(OptionName::AutoCommit, false);

        assert_eq!(
            options.get(OptionName::Username).and_then(OptionValue::as_str),
            Some("u")
        );
        assert_eq!(
            options.get(OptionName::AutoCommit).and_then(OptionValue::as_bool),
            Some(false)
        );
        assert!(!options.contains(OptionName::Password));

        assert!(options.remove(OptionName::Username).is_some());
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_collect_and_iterate_in_schema_order() {
        let options: RawOptions = [
            (OptionName::PoolName, OptionValue::from("reports")),
            (OptionName::Adapter, OptionValue::from("h2")),
            (OptionName::MinimumIdle, OptionValue::from(1)),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = options.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![OptionName::Adapter, OptionName::MinimumIdle, OptionName::PoolName]
        );
    }

    #[test]
    fn test_deserialize_ignores_unknown_and_null() {
        let options: RawOptions = serde_json::from_str(
            r#"{"adapter": "mysql", "jdbc_url": null, "flavor": "vanilla", "idle_timeout": 0}"#,
        )
        .unwrap();

        assert_eq!(options.len(), 2);
        assert!(!options.contains(OptionName::JdbcUrl));
        assert_eq!(options.get(OptionName::IdleTimeout), Some(&OptionValue::Int(0)));
    }

    #[test]
    fn test_deserialize_rejects_unsupported_value() {
        let result = serde_json::from_str::<RawOptions>(r#"{"idle_timeout": 1.5}"#);
        assert!(result.is_err());
    }
}
