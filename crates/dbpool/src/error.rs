//! Pool error types.

use dbpool_config::ConfigError;
use thiserror::Error;

/// Errors that can occur during pool operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The raw options failed validation.
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    /// The pool engine failed to start or to hand out a connection.
    ///
    /// The engine's error is kept as-is and can be recovered with
    /// [`PoolError::engine_error`].
    #[error("pool engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Pool is closed.
    #[error("pool is closed")]
    PoolClosed,
}

impl PoolError {
    pub(crate) fn engine(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Engine(Box::new(err))
    }

    /// Downcast an engine failure to the engine's own error type.
    #[must_use]
    pub fn engine_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Engine(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Whether this error comes from rejected configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

/// Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dbpool_config::{OptionName, PoolSettings, RawOptions};

    #[derive(Debug, PartialEq, Eq, Error)]
    #[error("driver unavailable")]
    struct DriverError;

    #[test]
    fn test_configuration_error_keeps_message() {
        let config_err = PoolSettings::from_options(&RawOptions::new()).unwrap_err();
        let err = PoolError::from(config_err.clone());

        assert!(err.is_configuration());
        assert_eq!(err.to_string(), config_err.to_string());
        assert!(err.engine_error::<DriverError>().is_none());
    }

    #[test]
    fn test_engine_error_downcast() {
        let err = PoolError::engine(DriverError);

        assert!(!err.is_configuration());
        assert_eq!(err.engine_error::<DriverError>(), Some(&DriverError));
        assert_eq!(err.to_string(), "pool engine error: driver unavailable");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_everything() {
        let options = RawOptions::new().with(OptionName::PoolName, "reports");
        let err = PoolError::from(PoolSettings::from_options(&options).unwrap_err());

        assert_eq!(
            err.to_string(),
            "username is missing, password is missing, adapter/jdbc_url options are invalid. \
             Either adapter or jdbc_url must be filled"
        );
    }
}
