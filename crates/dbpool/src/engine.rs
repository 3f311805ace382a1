//! Pool engine interface.
//!
//! The handle does not pool connections itself. It configures an external
//! engine through these traits and drives its lifecycle: create once, lend
//! connections, close.

use dbpool_config::PoolSettings;

/// A running connection pool engine.
///
/// Implementations must be safe to share between tasks; concurrent
/// checkout and checkin are the engine's responsibility.
#[allow(async_fn_in_trait)]
pub trait PoolEngine: Send + Sync {
    /// A connection lent out by the engine.
    type Connection: Send;

    /// Engine failure (driver errors, acquisition timeouts, ...).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Borrow a connection, waiting up to the configured connection timeout.
    async fn get_connection(&self) -> Result<Self::Connection, Self::Error>;

    /// Return a connection previously obtained from [`get_connection`].
    ///
    /// [`get_connection`]: PoolEngine::get_connection
    fn release(&self, conn: Self::Connection);

    /// Shut the engine down, closing every connection it holds.
    async fn close(&self);
}

/// Builds a [`PoolEngine`] from validated settings.
#[allow(async_fn_in_trait)]
pub trait EngineFactory: Send + Sync {
    /// The engine this factory builds.
    type Engine: PoolEngine;

    /// Create and start an engine.
    async fn create(
        &self,
        settings: &PoolSettings,
    ) -> Result<Self::Engine, <Self::Engine as PoolEngine>::Error>;
}

/// Connection type lent out by the engine a factory builds.
pub type EngineConnection<F> = <<F as EngineFactory>::Engine as PoolEngine>::Connection;

/// A connection on loan from an engine.
///
/// The connection goes back to the engine when the lease is dropped,
/// whether the borrower finished normally, returned early with an error,
/// panicked, or was cancelled.
pub struct ConnectionLease<'a, E: PoolEngine> {
    engine: &'a E,
    conn: Option<E::Connection>,
}

impl<'a, E: PoolEngine> ConnectionLease<'a, E> {
    pub(crate) async fn acquire(engine: &'a E) -> Result<Self, E::Error> {
        tracing::trace!("acquiring connection from pool");
        let conn = engine.get_connection().await?;
        Ok(Self {
            engine,
            conn: Some(conn),
        })
    }
}

impl<E: PoolEngine> std::ops::Deref for ConnectionLease<'_, E> {
    type Target = E::Connection;

    fn deref(&self) -> &Self::Target {
        match &self.conn {
            Some(conn) => conn,
            None => unreachable!("connection lease already released"),
        }
    }
}

impl<E: PoolEngine> std::ops::DerefMut for ConnectionLease<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.conn {
            Some(conn) => conn,
            None => unreachable!("connection lease already released"),
        }
    }
}

impl<E: PoolEngine> Drop for ConnectionLease<'_, E> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::trace!("returning connection to pool");
            self.engine.release(conn);
        }
    }
}

impl<E: PoolEngine> std::fmt::Debug for ConnectionLease<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionLease")
            .field("released", &self.conn.is_none())
            .finish_non_exhaustive()
    }
}
