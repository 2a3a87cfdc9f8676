//! Domain model for task lifecycle management.
//!
//! The task domain models ownership, editable fields, status and listing
//! filters while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod filter;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use filter::{DayWindow, TaskFilter, parse_day};
pub use ids::{TaskId, UserId};
pub use task::{NewTask, PersistedTaskData, Task, TaskDetails, TaskStatus};
