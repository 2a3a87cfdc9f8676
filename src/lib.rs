//! Taskdesk: user-owned task tracking backend.
//!
//! This crate provides the task lifecycle core of a web backend: creating,
//! reading, listing, editing, soft-deleting and updating the status of tasks that
//! belong to authenticated users.
//!
//! # Architecture
//!
//! Taskdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, wire shapes)
//!
//! # Modules
//!
//! - [`task`]: Task domain, persistence and lifecycle service
//! - [`config`]: Database configuration read from the environment
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod task;
pub mod telemetry;
