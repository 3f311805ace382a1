//! Pool handle example.
//!
//! This example validates a set of pool options, opens the pool lazily and
//! borrows a connection from it. It runs against the in-memory engine from
//! `dbpool-testing`; a real application supplies its own `EngineFactory`.
//!
//! # Running
//!
//! ```bash
//! cargo run -p dbpool --example pool_handle
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use dbpool::{OptionName, PoolError, PoolHandle, RawOptions};
use dbpool_testing::MockEngineFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Pool Handle Example ===\n");

    // 1. Invalid options are rejected with every problem listed at once.
    let invalid = RawOptions::new()
        .with(OptionName::Adapter, "postgres")
        .with(OptionName::JdbcUrl, "jdbc:postgresql://localhost/app")
        .with(OptionName::Username, "")
        .with(OptionName::IdleTimeout, 5_000);

    match PoolHandle::new(&invalid, MockEngineFactory::new()) {
        Err(err) => println!("1. Rejected configuration:\n  {err}\n"),
        Ok(_) => unreachable!("options are invalid"),
    }

    // 2. Valid options produce settings with defaults filled in.
    let options = RawOptions::new()
        .with(OptionName::Adapter, "postgresql")
        .with(OptionName::DatabaseName, "app")
        .with(OptionName::ServerName, "localhost")
        .with(OptionName::Username, "app")
        .with(OptionName::Password, "secret")
        .with(OptionName::PoolName, "example");

    let factory = MockEngineFactory::new();
    let stats = factory.stats();
    let pool = PoolHandle::new(&options, factory)?;

    let settings = pool.settings();
    println!("2. Pool settings:");
    println!("  Connector: {:?}", settings.data_source_class_name());
    println!("  Properties: {:?}", settings.data_source_properties());
    println!("  Connection timeout: {:?}", settings.connection_timeout());
    println!("  Idle timeout: {:?}", settings.idle_timeout());
    println!("  Max lifetime: {:?}", settings.max_lifetime());
    println!();

    // 3. The engine is created on first use and the connection is returned
    //    to it when the closure finishes.
    let answer = pool
        .with_connection(async |conn| -> Result<i64, Box<dyn std::error::Error>> {
            Ok(conn.query_scalar("SELECT 42 AS answer")?)
        })
        .await?;
    println!("3. The answer is {answer}");
    println!("  Engines created: {}", stats.created());
    println!("  Connections in use: {}", stats.in_use());

    pool.close().await;
    println!("\n4. Pool closed: {}", pool.is_closed());

    assert!(matches!(pool.open().await, Err(PoolError::PoolClosed)));
    Ok(())
}
