//! # dbpool
//!
//! Lifecycle handle for a connection pool configured from raw options.
//!
//! The handle validates options up front through `dbpool-config`, then
//! creates the pool engine lazily on first use. The engine itself (physical
//! connections, health checks, eviction) is supplied by the caller through
//! the [`EngineFactory`] and [`PoolEngine`] traits.
//!
//! ## Features
//!
//! - Fail-fast validation with one aggregated error message
//! - At-most-once engine creation, even under concurrent `open()` calls
//! - Scoped connection borrowing with release on every exit path
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbpool::{OptionName, PoolHandle, RawOptions};
//! use dbpool_testing::MockEngineFactory;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RawOptions::new()
//!     .with(OptionName::Adapter, "postgresql")
//!     .with(OptionName::DatabaseName, "app")
//!     .with(OptionName::ServerName, "postgres")
//!     .with(OptionName::Username, "app")
//!     .with(OptionName::Password, "secret");
//!
//! let pool = PoolHandle::new(&options, MockEngineFactory::new())?;
//! let answer = pool
//!     .with_connection(async |conn| -> Result<i64, Box<dyn std::error::Error>> {
//!         Ok(conn.query_scalar("SELECT 42 AS answer")?)
//!     })
//!     .await?;
//! assert_eq!(answer, 42);
//! pool.close().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod pool;

pub use dbpool_config::{
    Adapter, ConfigError, ConnectionTarget, OptionName, OptionValue, PoolSettings, RawOptions,
};
pub use engine::{ConnectionLease, EngineConnection, EngineFactory, PoolEngine};
pub use error::{PoolError, Result};
pub use pool::PoolHandle;
