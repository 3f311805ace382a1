//! Typed pool settings projected from validated options.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::adapter::Adapter;
use crate::error::{ConfigError, Result};
use crate::schema::{self, Fallback};
use crate::value::{OptionName, OptionValue, RawOptions};

/// Property bag key for `database_name`.
pub const DATABASE_NAME_PROPERTY: &str = "databaseName";

/// Property bag key for `server_name`.
pub const SERVER_NAME_PROPERTY: &str = "serverName";

/// How the pool engine reaches the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// Instantiate the adapter's data source class.
    DataSource {
        /// The adapter the connector was resolved from.
        adapter: Adapter,
    },
    /// Connect through a raw JDBC URL.
    JdbcUrl(String),
}

impl ConnectionTarget {
    /// The connector identifier, when connecting through a data source.
    #[must_use]
    pub fn data_source_class_name(&self) -> Option<&'static str> {
        match self {
            Self::DataSource { adapter } => Some(adapter.connector()),
            Self::JdbcUrl(_) => None,
        }
    }
}

/// Validated, immutable pool settings.
///
/// Values exist only for options that passed validation; absent optional
/// options carry their schema default, or `None` where the pool engine
/// supplies its own.
///
/// ```rust
/// use std::time::Duration;
/// use dbpool_config::{Adapter, OptionName, PoolSettings, RawOptions};
///
/// let options = RawOptions::new()
///     .with(OptionName::Adapter, "postgresql")
///     .with(OptionName::Username, "app")
///     .with(OptionName::Password, "secret");
///
/// let settings = PoolSettings::from_options(&options)?;
/// assert_eq!(settings.adapter(), Some(Adapter::Postgresql));
/// assert_eq!(settings.data_source_class_name(), Some("org.postgresql.ds.PGSimpleDataSource"));
/// assert_eq!(settings.connection_timeout(), Duration::from_secs(30));
/// # Ok::<(), dbpool_config::ConfigError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PoolSettings {
    target: ConnectionTarget,
    username: String,
    password: String,
    data_source_properties: BTreeMap<String, String>,
    auto_commit: bool,
    connection_timeout: Duration,
    idle_timeout: Duration,
    max_lifetime: Duration,
    maximum_pool_size: Option<u32>,
    minimum_idle: Option<u32>,
    connection_test_query: Option<String>,
    pool_name: Option<String>,
}

impl PoolSettings {
    /// Validate raw options and project them into settings.
    ///
    /// Fails with [`ConfigError::InvalidConfiguration`] listing every
    /// violation when any option is invalid.
    pub fn from_options(options: &RawOptions) -> Result<Self> {
        let errors = schema::check(options);
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "pool configuration rejected");
            return Err(ConfigError::InvalidConfiguration { errors });
        }

        let view = Validated(options);

        let target = match view.string(OptionName::Adapter).and_then(Adapter::from_name) {
            Some(adapter) => ConnectionTarget::DataSource { adapter },
            None => ConnectionTarget::JdbcUrl(view.owned(OptionName::JdbcUrl).unwrap_or_default()),
        };

        let mut data_source_properties = BTreeMap::new();
        if let Some(database_name) = view.owned(OptionName::DatabaseName) {
            data_source_properties.insert(DATABASE_NAME_PROPERTY.to_owned(), database_name);
        }
        if let Some(server_name) = view.owned(OptionName::ServerName) {
            data_source_properties.insert(SERVER_NAME_PROPERTY.to_owned(), server_name);
        }

        let settings = Self {
            target,
            username: view.owned(OptionName::Username).unwrap_or_default(),
            password: view.owned(OptionName::Password).unwrap_or_default(),
            data_source_properties,
            auto_commit: view.bool(OptionName::AutoCommit),
            connection_timeout: view.millis(OptionName::ConnectionTimeout),
            idle_timeout: view.millis(OptionName::IdleTimeout),
            max_lifetime: view.millis(OptionName::MaxLifetime),
            maximum_pool_size: view.count(OptionName::MaximumPoolSize),
            minimum_idle: view.count(OptionName::MinimumIdle),
            connection_test_query: view.owned(OptionName::ConnectionTestQuery),
            pool_name: view.owned(OptionName::PoolName),
        };

        tracing::trace!(settings = ?settings, "pool configuration accepted");
        Ok(settings)
    }

    /// How the engine connects.
    #[must_use]
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// The adapter, when connecting through a data source.
    #[must_use]
    pub fn adapter(&self) -> Option<Adapter> {
        match self.target {
            ConnectionTarget::DataSource { adapter } => Some(adapter),
            ConnectionTarget::JdbcUrl(_) => None,
        }
    }

    /// The connector identifier the adapter resolved to.
    #[must_use]
    pub fn data_source_class_name(&self) -> Option<&'static str> {
        self.target.data_source_class_name()
    }

    /// The JDBC URL, when connecting through one.
    #[must_use]
    pub fn jdbc_url(&self) -> Option<&str> {
        match &self.target {
            ConnectionTarget::JdbcUrl(url) => Some(url),
            ConnectionTarget::DataSource { .. } => None,
        }
    }

    /// Login user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Properties handed to the connector, keyed `databaseName` / `serverName`.
    #[must_use]
    pub fn data_source_properties(&self) -> &BTreeMap<String, String> {
        &self.data_source_properties
    }

    /// Whether pooled connections auto-commit.
    #[must_use]
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Time to wait for a connection.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Time a connection may sit idle. Zero disables idle eviction.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Maximum connection lifetime. Zero means unlimited.
    #[must_use]
    pub fn max_lifetime(&self) -> Duration {
        self.max_lifetime
    }

    /// Maximum pool size, if set.
    #[must_use]
    pub fn maximum_pool_size(&self) -> Option<u32> {
        self.maximum_pool_size
    }

    /// Minimum idle connections, if set.
    #[must_use]
    pub fn minimum_idle(&self) -> Option<u32> {
        self.minimum_idle
    }

    /// Connection test query, if set.
    #[must_use]
    pub fn connection_test_query(&self) -> Option<&str> {
        self.connection_test_query.as_deref()
    }

    /// Pool name, if set.
    #[must_use]
    pub fn pool_name(&self) -> Option<&str> {
        self.pool_name.as_deref()
    }
}

impl TryFrom<&RawOptions> for PoolSettings {
    type Error = ConfigError;

    fn try_from(options: &RawOptions) -> Result<Self> {
        Self::from_options(options)
    }
}

impl fmt::Debug for PoolSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the password in debug output
        f.debug_struct("PoolSettings")
            .field("target", &self.target)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("data_source_properties", &self.data_source_properties)
            .field("auto_commit", &self.auto_commit)
            .field("connection_timeout", &self.connection_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .field("maximum_pool_size", &self.maximum_pool_size)
            .field("minimum_idle", &self.minimum_idle)
            .field("connection_test_query", &self.connection_test_query)
            .field("pool_name", &self.pool_name)
            .finish()
    }
}

/// Typed reads over options that already passed [`schema::check`].
struct Validated<'a>(&'a RawOptions);

impl<'a> Validated<'a> {
    fn string(&self, name: OptionName) -> Option<&'a str> {
        self.0.get(name).and_then(OptionValue::as_str)
    }

    fn owned(&self, name: OptionName) -> Option<String> {
        self.string(name).map(str::to_owned)
    }

    fn int(&self, name: OptionName) -> Option<i64> {
        self.0.get(name).and_then(OptionValue::as_int).or_else(|| {
            match schema::option_spec(name).default {
                Some(Fallback::Int(v)) => Some(v),
                _ => None,
            }
        })
    }

    fn bool(&self, name: OptionName) -> bool {
        self.0
            .get(name)
            .and_then(OptionValue::as_bool)
            .or_else(|| match schema::option_spec(name).default {
                Some(Fallback::Bool(b)) => Some(b),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn millis(&self, name: OptionName) -> Duration {
        let ms = self.int(name).and_then(|v| u64::try_from(v).ok()).unwrap_or(0);
        Duration::from_millis(ms)
    }

    fn count(&self, name: OptionName) -> Option<u32> {
        self.int(name).and_then(|v| u32::try_from(v).ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn required() -> RawOptions {
        RawOptions::new()
            .with(OptionName::Adapter, "postgresql")
            .with(OptionName::Username, "app")
            .with(OptionName::Password, "app")
    }

    #[test]
    fn test_defaults_for_required_only() {
        let settings = PoolSettings::from_options(&required()).unwrap();

        assert!(settings.auto_commit());
        assert_eq!(settings.connection_timeout(), Duration::from_millis(30_000));
        assert_eq!(settings.idle_timeout(), Duration::from_millis(600_000));
        assert_eq!(settings.max_lifetime(), Duration::from_millis(1_800_000));
        assert_eq!(settings.maximum_pool_size(), None);
        assert_eq!(settings.minimum_idle(), None);
        assert!(settings.data_source_properties().is_empty());
        assert_eq!(settings.connection_test_query(), None);
        assert_eq!(settings.pool_name(), None);
    }

    #[test]
    fn test_bool_uses_given_value_then_schema_default() {
        let given = required().with(OptionName::AutoCommit, false);
        assert!(!Validated(&given).bool(OptionName::AutoCommit));
        assert!(Validated(&required()).bool(OptionName::AutoCommit));
    }

    #[test]
    fn test_adapter_resolves_alongside_key() {
        let settings = PoolSettings::from_options(&required()).unwrap();

        assert_eq!(settings.adapter(), Some(Adapter::Postgresql));
        assert_eq!(
            settings.data_source_class_name(),
            Some("org.postgresql.ds.PGSimpleDataSource")
        );
        assert_eq!(settings.jdbc_url(), None);
        assert_eq!(settings.username(), "app");
        assert_eq!(settings.password(), "app");
    }

    #[test]
    fn test_jdbc_url_target() {
        let mut options = required();
        options.remove(OptionName::Adapter);
        options.insert(OptionName::JdbcUrl, "jdbc:postgresql://postgres/app");

        let settings = PoolSettings::try_from(&options).unwrap();
        assert_eq!(
            settings.target(),
            &ConnectionTarget::JdbcUrl("jdbc:postgresql://postgres/app".into())
        );
        assert_eq!(settings.adapter(), None);
        assert_eq!(settings.data_source_class_name(), None);
    }

    #[test]
    fn test_all_options_projected() {
        let options = required()
            .with(OptionName::AutoCommit, false)
            .with(OptionName::DatabaseName, "app")
            .with(OptionName::ServerName, "postgres")
            .with(OptionName::ConnectionTimeout, 250)
            .with(OptionName::IdleTimeout, 0)
            .with(OptionName::MaxLifetime, 60_000)
            .with(OptionName::MaximumPoolSize, 20)
            .with(OptionName::MinimumIdle, 2)
            .with(OptionName::ConnectionTestQuery, "SELECT 1")
            .with(OptionName::PoolName, "reports");

        let settings = PoolSettings::from_options(&options).unwrap();

        assert!(!settings.auto_commit());
        assert_eq!(
            settings.data_source_properties().get(DATABASE_NAME_PROPERTY).map(String::as_str),
            Some("app")
        );
        assert_eq!(
            settings.data_source_properties().get(SERVER_NAME_PROPERTY).map(String::as_str),
            Some("postgres")
        );
        assert_eq!(settings.connection_timeout(), Duration::from_millis(250));
        assert_eq!(settings.idle_timeout(), Duration::ZERO);
        assert_eq!(settings.max_lifetime(), Duration::from_secs(60));
        assert_eq!(settings.maximum_pool_size(), Some(20));
        assert_eq!(settings.minimum_idle(), Some(2));
        assert_eq!(settings.connection_test_query(), Some("SELECT 1"));
        assert_eq!(settings.pool_name(), Some("reports"));
    }

    #[test]
    fn test_invalid_options_produce_no_settings() {
        let options = required().with(OptionName::Username, "");
        let err = PoolSettings::from_options(&options).unwrap_err();

        assert_eq!(err.to_string(), "username must be filled");
        assert!(err.has_error_for("username"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = PoolSettings::from_options(
            &required().with(OptionName::Password, "super-secret"),
        )
        .unwrap();
        let debug = format!("{settings:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
