//! # dbpool-config
//!
//! Validation of raw connection pool options and their projection into
//! typed, immutable [`PoolSettings`].
//!
//! Options are checked against a static schema: required fields, types,
//! range constraints, adapter membership and the rule that exactly one of
//! `adapter` or `jdbc_url` is filled. Every violation is collected, so a
//! single error reports all problems at once.
//!
//! ## Example
//!
//! ```rust
//! use dbpool_config::{OptionName, RawOptions, validate};
//!
//! let options = RawOptions::new()
//!     .with(OptionName::Adapter, "postgresql")
//!     .with(OptionName::JdbcUrl, "jdbc:postgresql://db/app")
//!     .with(OptionName::Username, "")
//!     .with(OptionName::Password, "secret");
//!
//! let err = validate(&options).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "username must be filled, adapter/jdbc_url options are invalid. \
//!      Either adapter or jdbc_url must be filled"
//! );
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod schema;
pub mod settings;
pub mod value;

pub use adapter::Adapter;
pub use error::{ConfigError, FieldError};
pub use schema::{EXCLUSIVITY_MESSAGE, EXCLUSIVITY_RULE, MAX_LIFETIME_FLOOR_MS};
pub use settings::{ConnectionTarget, PoolSettings};
pub use value::{OptionName, OptionValue, RawOptions};

/// Outcome of validating raw options.
pub type ValidationResult = Result<PoolSettings, ConfigError>;

/// Validate raw options, producing settings or every violation found.
pub fn validate(options: &RawOptions) -> ValidationResult {
    PoolSettings::from_options(options)
}
