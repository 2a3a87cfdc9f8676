//! Adapter implementations for task lifecycle ports.
//!
//! - [`memory`]: thread-safe in-memory repository for tests and embedding
//! - [`postgres`]: Diesel-backed `PostgreSQL` repository
//! - [`wire`]: request and response shapes exchanged with outer adapters

pub mod memory;
pub mod postgres;
pub mod wire;
