//! Mock pool engine for unit testing.
//!
//! The engine lends out in-memory connections and records every lifecycle
//! event, so tests can assert how a [`PoolHandle`](dbpool::PoolHandle)
//! drives it without a database.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbpool::{OptionName, PoolError, PoolHandle, RawOptions};
//! use dbpool_testing::MockEngineFactory;
//!
//! # async fn run() -> Result<(), PoolError> {
//! let options = RawOptions::new()
//!     .with(OptionName::Adapter, "h2")
//!     .with(OptionName::Username, "sa")
//!     .with(OptionName::Password, "sa");
//! let factory = MockEngineFactory::new();
//! let stats = factory.stats();
//! let pool = PoolHandle::new(&options, factory)?;
//!
//! pool.with_connection(async |conn| Ok::<_, PoolError>(conn.id()))
//!     .await?;
//!
//! assert_eq!(stats.released(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};

use dbpool::{EngineFactory, PoolEngine, PoolSettings};
use parking_lot::Mutex;
use thiserror::Error;

/// Error type for mock engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockEngineError {
    /// Engine creation was configured to fail.
    #[error("failed to start mock engine")]
    StartFailed,

    /// Connection acquisition was configured to fail.
    #[error("connection acquisition failed")]
    AcquireFailed,

    /// Engine already closed.
    #[error("mock engine has been closed")]
    Closed,

    /// Query the mock connection cannot answer.
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),
}

/// Result type for mock engine operations.
pub type Result<T> = std::result::Result<T, MockEngineError>;

/// Lifecycle event recorded by the mock engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    /// Engine created.
    Created,
    /// Connection handed out.
    Acquired(u64),
    /// Connection returned.
    Released(u64),
    /// Engine closed.
    Closed,
}

/// Counters and event log shared by a factory and the engines it builds.
#[derive(Debug, Default)]
pub struct MockStats {
    create_failures: AtomicU32,
    fail_acquire: AtomicBool,
    created: AtomicUsize,
    closed: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    events: Mutex<Vec<MockEvent>>,
}

impl MockStats {
    /// Engines created.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Engines closed.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Connections handed out.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Connections returned.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Connections currently on loan.
    pub fn in_use(&self) -> usize {
        self.acquired().saturating_sub(self.released())
    }

    /// Every event recorded so far, in order.
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().clone()
    }

    /// Make subsequent acquisitions fail (or succeed again).
    pub fn set_fail_acquire(&self, fail: bool) {
        self.fail_acquire.store(fail, Ordering::SeqCst);
    }

    fn record(&self, event: MockEvent) {
        self.events.lock().push(event);
    }

    fn take_create_failure(&self) -> bool {
        self.create_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Factory building [`MockEngine`]s.
#[derive(Debug, Clone, Default)]
pub struct MockEngineFactory {
    stats: Arc<MockStats>,
}

impl MockEngineFactory {
    /// Create a factory whose engines always start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` engine creations.
    #[must_use]
    pub fn with_create_failures(self, count: u32) -> Self {
        self.stats.create_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Make every connection acquisition fail.
    #[must_use]
    pub fn with_failing_acquire(self) -> Self {
        self.stats.set_fail_acquire(true);
        self
    }

    /// Shared counters for engines built by this factory.
    pub fn stats(&self) -> Arc<MockStats> {
        Arc::clone(&self.stats)
    }
}

impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    async fn create(&self, settings: &PoolSettings) -> Result<MockEngine> {
        // Give concurrent openers a chance to interleave.
        tokio::task::yield_now().await;

        if self.stats.take_create_failure() {
            tracing::debug!("mock engine creation failed");
            return Err(MockEngineError::StartFailed);
        }

        self.stats.created.fetch_add(1, Ordering::SeqCst);
        self.stats.record(MockEvent::Created);

        Ok(MockEngine {
            settings: settings.clone(),
            stats: Arc::clone(&self.stats),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        })
    }
}

/// In-memory pool engine.
#[derive(Debug)]
pub struct MockEngine {
    settings: PoolSettings,
    stats: Arc<MockStats>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl MockEngine {
    /// The settings this engine was created from.
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Check if the engine is closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl PoolEngine for MockEngine {
    type Connection = MockConnection;
    type Error = MockEngineError;

    async fn get_connection(&self) -> Result<MockConnection> {
        if self.is_closed() {
            return Err(MockEngineError::Closed);
        }
        if self.stats.fail_acquire.load(Ordering::SeqCst) {
            return Err(MockEngineError::AcquireFailed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        self.stats.record(MockEvent::Acquired(id));

        Ok(MockConnection {
            id,
            statements: Vec::new(),
        })
    }

    fn release(&self, conn: MockConnection) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
        self.stats.record(MockEvent::Released(conn.id));
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
            self.stats.record(MockEvent::Closed);
        }
    }
}

/// Connection lent out by a [`MockEngine`].
#[derive(Debug)]
pub struct MockConnection {
    id: u64,
    statements: Vec<String>,
}

impl MockConnection {
    /// Connection identifier, unique per engine.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Statements run on this connection.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Answer `SELECT <integer> [AS <name>]` with the integer.
    pub fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        self.statements.push(sql.to_owned());

        let mut words = sql.split_whitespace();
        let value = match (words.next(), words.next()) {
            (Some(select), Some(value)) if select.eq_ignore_ascii_case("SELECT") => {
                value.parse::<i64>().ok()
            }
            _ => None,
        };
        value.ok_or_else(|| MockEngineError::UnsupportedQuery(sql.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_scalar() {
        let mut conn = MockConnection {
            id: 1,
            statements: Vec::new(),
        };

        assert_eq!(conn.query_scalar("SELECT 42 AS answer").unwrap(), 42);
        assert_eq!(conn.query_scalar("select -1").unwrap(), -1);
        assert!(matches!(
            conn.query_scalar("SELECT name FROM users"),
            Err(MockEngineError::UnsupportedQuery(_))
        ));
        assert_eq!(conn.statements().len(), 3);
    }

    #[test]
    fn test_create_failures_are_consumed() {
        let factory = MockEngineFactory::new().with_create_failures(2);
        let stats = factory.stats();

        assert!(stats.take_create_failure());
        assert!(stats.take_create_failure());
        assert!(!stats.take_create_failure());
    }

    #[test]
    fn test_in_use_counts() {
        let stats = MockStats::default();
        stats.acquired.store(3, Ordering::SeqCst);
        stats.released.store(1, Ordering::SeqCst);

        assert_eq!(stats.in_use(), 2);
    }
}
