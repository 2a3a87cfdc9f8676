//! Step definitions for task ownership scenarios.

pub mod given;
