//! Domain logic for minder: authentication, the task-list state machine,
//! plan generation, and session tokens.

pub mod auth;
pub mod plan;
pub mod session;
pub mod tasklist;
