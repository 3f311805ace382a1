//! Pool handle implementation.

use std::sync::atomic::{AtomicBool, Ordering};

use dbpool_config::{PoolSettings, RawOptions};
use tokio::sync::OnceCell;

use crate::engine::{ConnectionLease, EngineConnection, EngineFactory, PoolEngine};
use crate::error::{PoolError, Result};

/// A handle to a lazily created connection pool.
///
/// Construction validates the options and stores the resulting settings;
/// the engine is created on first use.
pub struct PoolHandle<F: EngineFactory> {
    settings: PoolSettings,
    factory: F,
    engine: OnceCell<F::Engine>,
    closed: AtomicBool,
    engine_closed: AtomicBool,
}

impl<F: EngineFactory> PoolHandle<F> {
    /// Validate `options` and create an unopened handle.
    ///
    /// Fails with [`PoolError::InvalidConfiguration`] before any engine is
    /// created if the options are invalid.
    pub fn new(options: &RawOptions, factory: F) -> Result<Self> {
        let settings = PoolSettings::from_options(options)?;
        Ok(Self::from_settings(settings, factory))
    }

    /// Create an unopened handle from already validated settings.
    pub fn from_settings(settings: PoolSettings, factory: F) -> Self {
        Self {
            settings,
            factory,
            engine: OnceCell::new(),
            closed: AtomicBool::new(false),
            engine_closed: AtomicBool::new(false),
        }
    }

    /// Get the pool settings.
    #[must_use]
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Open the pool, creating the engine on the first call.
    ///
    /// Later calls, including concurrent ones, return the same engine. If
    /// creation fails the handle stays unopened and the next call retries.
    /// If the handle is closed while the engine is being created, the new
    /// engine is closed and the call fails with [`PoolError::PoolClosed`].
    pub async fn open(&self) -> Result<&F::Engine> {
        if self.is_closed() {
            return Err(PoolError::PoolClosed);
        }

        let engine = self
            .engine
            .get_or_try_init(|| async {
                let engine = self
                    .factory
                    .create(&self.settings)
                    .await
                    .map_err(PoolError::engine)?;
                if self.is_closed() {
                    tracing::debug!("pool closed while the engine was being created");
                    engine.close().await;
                    return Err(PoolError::PoolClosed);
                }
                tracing::info!(
                    pool = self.settings.pool_name().unwrap_or_default(),
                    adapter = ?self.settings.adapter(),
                    "connection pool opened"
                );
                Ok::<_, PoolError>(engine)
            })
            .await?;

        // close() may have run between the check above and the engine being stored.
        if self.is_closed() {
            self.shutdown(engine).await;
            return Err(PoolError::PoolClosed);
        }
        Ok(engine)
    }

    /// Close the pool.
    ///
    /// Closing a handle that was never opened does not create an engine; an
    /// engine still being created is closed by the pending `open()`.
    /// Closing twice is a no-op.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.engine.get() {
            Some(engine) => self.shutdown(engine).await,
            None => tracing::debug!("closing pool that was never opened"),
        }
    }

    /// Close the stored engine exactly once.
    async fn shutdown(&self, engine: &F::Engine) {
        if !self.engine_closed.swap(true, Ordering::SeqCst) {
            engine.close().await;
            tracing::info!("connection pool closed");
        }
    }

    /// Check if the engine has been created.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.engine.initialized() && !self.is_closed()
    }

    /// Check if the pool is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Borrow a connection, opening the pool if needed.
    ///
    /// The connection is returned to the pool when the lease is dropped.
    pub async fn acquire(&self) -> Result<ConnectionLease<'_, F::Engine>> {
        let engine = self.open().await?;
        ConnectionLease::acquire(engine)
            .await
            .map_err(PoolError::engine)
    }

    /// Run `f` with a borrowed connection.
    ///
    /// Opens the pool if needed and acquires one connection. The connection
    /// is released when `f` finishes, on every exit path; the pool itself
    /// stays open. Errors returned by `f` propagate unchanged, and pool
    /// failures are converted with `From<PoolError>`.
    ///
    /// ```rust,no_run
    /// use dbpool::{OptionName, PoolError, PoolHandle, RawOptions};
    /// use dbpool_testing::MockEngineFactory;
    ///
    /// # async fn run() -> Result<(), PoolError> {
    /// let options = RawOptions::new()
    ///     .with(OptionName::JdbcUrl, "jdbc:h2:mem:app")
    ///     .with(OptionName::Username, "sa")
    ///     .with(OptionName::Password, "sa");
    /// let pool = PoolHandle::new(&options, MockEngineFactory::new())?;
    ///
    /// let id = pool
    ///     .with_connection(async |conn| Ok::<_, PoolError>(conn.id()))
    ///     .await?;
    /// # let _ = id;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_connection<T, E, Fun>(&self, f: Fun) -> std::result::Result<T, E>
    where
        Fun: AsyncFnOnce(&mut EngineConnection<F>) -> std::result::Result<T, E>,
        E: From<PoolError>,
    {
        let mut lease = self.acquire().await?;
        f(&mut *lease).await
    }
}

impl<F: EngineFactory> std::fmt::Debug for PoolHandle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolHandle")
            .field("settings", &self.settings)
            .field("open", &self.engine.initialized())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
