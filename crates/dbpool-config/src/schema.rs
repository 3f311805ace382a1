//! Option schema and the validation routine that interprets it.
//!
//! The schema is a static table. Its order is the order of error messages,
//! so adding an option means adding one row here and one field to
//! [`PoolSettings`](crate::PoolSettings).

use crate::adapter::Adapter;
use crate::error::FieldError;
use crate::value::{OptionName, OptionValue, RawOptions};

use Constraint as C;
use Presence::{Optional, Required};
use ValueKind::{Bool, Int, Str};

/// Lower bound for a non-zero `max_lifetime`, in milliseconds.
pub const MAX_LIFETIME_FLOOR_MS: i64 = 30_000;

/// Lower bound for a non-zero `idle_timeout`, in milliseconds.
pub const IDLE_TIMEOUT_FLOOR_MS: i64 = 10_000;

/// Lower bound for `connection_timeout`, in milliseconds.
pub const CONNECTION_TIMEOUT_FLOOR_MS: i64 = 250;

/// Name of the adapter/jdbc_url exclusivity rule.
pub const EXCLUSIVITY_RULE: &str = "adapter/jdbc_url options";

/// Message reported when the exclusivity rule is violated.
pub const EXCLUSIVITY_MESSAGE: &str =
    "adapter/jdbc_url options are invalid. Either adapter or jdbc_url must be filled";

/// Whether an option must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and filled.
    Required,
    /// May be absent.
    Optional,
}

/// Primitive type an option must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A string.
    Str,
    /// An integer.
    Int,
    /// A boolean.
    Bool,
}

impl ValueKind {
    fn matches(self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (Self::Str, OptionValue::Str(_))
                | (Self::Int, OptionValue::Int(_))
                | (Self::Bool, OptionValue::Bool(_))
        )
    }

    fn expectation(self) -> &'static str {
        match self {
            Self::Str => "must be a string",
            Self::Int => "must be an integer",
            Self::Bool => "must be boolean",
        }
    }
}

/// Constraint checked once an option has the right type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// No constraint beyond the type.
    None,
    /// String must be non-empty.
    Filled,
    /// Integer must be at least the bound.
    AtLeast(i64),
    /// Integer must be exactly 0 or at least the bound.
    ZeroOrAtLeast(i64),
    /// String must name a registered adapter.
    Adapter,
}

impl Constraint {
    fn check(self, value: &OptionValue) -> Option<String> {
        match (self, value) {
            (Self::Filled, OptionValue::Str(s)) if s.is_empty() => Some("must be filled".into()),
            (Self::AtLeast(min), OptionValue::Int(v)) if *v < min => {
                Some(format!("must be greater than or equal to {min}"))
            }
            (Self::ZeroOrAtLeast(min), OptionValue::Int(v)) if *v != 0 && *v < min => {
                Some(format!("must be 0 or greater than or equal to {min}"))
            }
            (Self::Adapter, OptionValue::Str(s)) if Adapter::from_name(s).is_none() => {
                Some(format!("must be one of: {}", Adapter::names()))
            }
            _ => None,
        }
    }
}

/// Default applied to an optional option that is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int(i64),
}

/// Description of one recognized option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Option name.
    pub name: OptionName,
    /// Whether it must be supplied.
    pub presence: Presence,
    /// Expected type.
    pub kind: ValueKind,
    /// Constraint on the value.
    pub constraint: Constraint,
    /// Default when absent.
    pub default: Option<Fallback>,
}

const fn spec(
    name: OptionName,
    presence: Presence,
    kind: ValueKind,
    constraint: Constraint,
    default: Option<Fallback>,
) -> OptionSpec {
    OptionSpec {
        name,
        presence,
        kind,
        constraint,
        default,
    }
}

/// Every recognized option, in declared order.
pub static SCHEMA: [OptionSpec; 14] = [
    spec(OptionName::Adapter, Optional, Str, C::Adapter, None),
    spec(OptionName::JdbcUrl, Optional, Str, C::Filled, None),
    spec(OptionName::Username, Required, Str, C::Filled, None),
    spec(OptionName::Password, Required, Str, C::Filled, None),
    spec(OptionName::DatabaseName, Optional, Str, C::Filled, None),
    spec(OptionName::ServerName, Optional, Str, C::Filled, None),
    spec(OptionName::AutoCommit, Optional, Bool, C::None, Some(Fallback::Bool(true))),
    spec(
        OptionName::ConnectionTimeout,
        Optional,
        Int,
        C::AtLeast(CONNECTION_TIMEOUT_FLOOR_MS),
        Some(Fallback::Int(30_000)),
    ),
    spec(
        OptionName::IdleTimeout,
        Optional,
        Int,
        C::ZeroOrAtLeast(IDLE_TIMEOUT_FLOOR_MS),
        Some(Fallback::Int(600_000)),
    ),
    spec(
        OptionName::MaxLifetime,
        Optional,
        Int,
        C::ZeroOrAtLeast(MAX_LIFETIME_FLOOR_MS),
        Some(Fallback::Int(1_800_000)),
    ),
    // Pool sizes have no default here; the engine applies its own.
    spec(OptionName::MaximumPoolSize, Optional, Int, C::AtLeast(1), None),
    spec(OptionName::MinimumIdle, Optional, Int, C::AtLeast(1), None),
    spec(OptionName::ConnectionTestQuery, Optional, Str, C::Filled, None),
    spec(OptionName::PoolName, Optional, Str, C::Filled, None),
];

/// Look up the schema row for an option.
#[must_use]
pub fn option_spec(name: OptionName) -> &'static OptionSpec {
    // SCHEMA lists every OptionName exactly once, in declaration order.
    &SCHEMA[name as usize]
}

/// Check raw options against the schema and cross-field rules.
///
/// Returns every violation in schema order, with rule violations last.
/// An empty vector means the options are valid.
#[must_use]
pub fn check(options: &RawOptions) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = SCHEMA
        .iter()
        .filter_map(|row| check_field(row, options.get(row.name)))
        .collect();

    if !exactly_one_target(options) {
        errors.push(FieldError::new(EXCLUSIVITY_RULE, EXCLUSIVITY_MESSAGE));
    }

    errors
}

fn check_field(spec: &OptionSpec, value: Option<&OptionValue>) -> Option<FieldError> {
    let field = spec.name.as_str();
    let problem = match value {
        None if spec.presence == Required => Some("is missing".to_owned()),
        None => None,
        Some(value) if !spec.kind.matches(value) => Some(spec.kind.expectation().to_owned()),
        Some(value) => spec
            .constraint
            .check(value)
            .or_else(|| check_range(spec, value)),
    }?;

    Some(FieldError::new(field, format!("{field} {problem}")))
}

/// Integer options are projected into `u32`/`u64`; reject values that cannot be.
fn check_range(spec: &OptionSpec, value: &OptionValue) -> Option<String> {
    let v = value.as_int()?;
    match spec.constraint {
        C::AtLeast(1) if v > i64::from(u32::MAX) => {
            Some(format!("must be less than or equal to {}", u32::MAX))
        }
        _ => None,
    }
}

fn exactly_one_target(options: &RawOptions) -> bool {
    let filled = |name| options.get(name).is_some_and(OptionValue::is_filled);
    filled(OptionName::Adapter) != filled(OptionName::JdbcUrl)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> RawOptions {
        RawOptions::new()
            .with(OptionName::Adapter, "postgresql")
            .with(OptionName::Username, "u")
            .with(OptionName::Password, "p")
    }

    fn messages(options: &RawOptions) -> Vec<String> {
        check(options).into_iter().map(|e| e.message().to_owned()).collect()
    }

    #[test]
    fn test_schema_rows_follow_option_order() {
        for (index, name) in OptionName::ALL.into_iter().enumerate() {
            assert_eq!(SCHEMA[index].name, name);
            assert_eq!(option_spec(name).name, name);
        }
    }

    #[test]
    fn test_valid_minimal_options() {
        assert!(check(&base()).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let options = RawOptions::new().with(OptionName::Adapter, "h2");
        assert_eq!(messages(&options), vec!["username is missing", "password is missing"]);
    }

    #[test]
    fn test_empty_required_field() {
        let options = base().with(OptionName::Username, "");
        assert_eq!(messages(&options), vec!["username must be filled"]);
    }

    #[test]
    fn test_wrong_types() {
        let options = base()
            .with(OptionName::Password, 1234)
            .with(OptionName::AutoCommit, "yes")
            .with(OptionName::IdleTimeout, "10000");
        assert_eq!(
            messages(&options),
            vec![
                "password must be a string",
                "auto_commit must be boolean",
                "idle_timeout must be an integer",
            ]
        );
    }

    #[test]
    fn test_connection_timeout_bound() {
        let low = base().with(OptionName::ConnectionTimeout, 249);
        assert_eq!(
            messages(&low),
            vec!["connection_timeout must be greater than or equal to 250"]
        );
        assert!(check(&base().with(OptionName::ConnectionTimeout, 250)).is_empty());
    }

    #[test]
    fn test_zero_or_floor_bounds() {
        for ok in [0, 10_000, 600_000] {
            assert!(check(&base().with(OptionName::IdleTimeout, ok)).is_empty(), "{ok}");
        }
        for bad in [-1, 1, 9_999] {
            assert_eq!(
                messages(&base().with(OptionName::IdleTimeout, bad)),
                vec!["idle_timeout must be 0 or greater than or equal to 10000"]
            );
        }
        assert!(check(&base().with(OptionName::MaxLifetime, 0)).is_empty());
        assert!(check(&base().with(OptionName::MaxLifetime, MAX_LIFETIME_FLOOR_MS)).is_empty());
        assert_eq!(
            messages(&base().with(OptionName::MaxLifetime, MAX_LIFETIME_FLOOR_MS - 1)),
            vec!["max_lifetime must be 0 or greater than or equal to 30000"]
        );
    }

    #[test]
    fn test_pool_size_bounds() {
        let options = base()
            .with(OptionName::MaximumPoolSize, 0)
            .with(OptionName::MinimumIdle, i64::from(u32::MAX) + 1);
        assert_eq!(
            messages(&options),
            vec![
                "maximum_pool_size must be greater than or equal to 1",
                "minimum_idle must be less than or equal to 4294967295",
            ]
        );
    }

    #[test]
    fn test_empty_optional_strings() {
        let options = base()
            .with(OptionName::DatabaseName, "")
            .with(OptionName::PoolName, "");
        assert_eq!(
            messages(&options),
            vec!["database_name must be filled", "pool_name must be filled"]
        );
    }

    #[test]
    fn test_empty_adapter_reports_membership_and_rule() {
        let options = base().with(OptionName::Adapter, "");
        let errors = check(&options);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field(), "adapter");
        assert_eq!(errors[1].field(), EXCLUSIVITY_RULE);
    }

    #[test]
    fn test_empty_jdbc_url_does_not_count_as_target() {
        let options = base().with(OptionName::JdbcUrl, "");
        assert_eq!(messages(&options), vec!["jdbc_url must be filled"]);
    }
}
