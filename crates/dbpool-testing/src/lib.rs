//! # dbpool-testing
//!
//! Test infrastructure for `dbpool`.
//!
//! Provides an in-memory [`MockEngine`] and its [`MockEngineFactory`]. The
//! factory shares a [`MockStats`] handle with every engine it builds, which
//! counts engine creation, connection checkout and checkin, and close.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod mock_engine;

pub use mock_engine::{
    MockConnection, MockEngine, MockEngineError, MockEngineFactory, MockEvent, MockStats,
};
