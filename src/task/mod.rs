//! Task lifecycle management.
//!
//! Users create tasks, list them with optional status and calendar-day
//! filters, edit them, change their status and soft-delete them. Status
//! changes are only accepted from the task owner. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
