//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    TaskDetailsRequest, TaskErrorKind, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
