//! Plan generation for tasks.
//!
//! A task's name is sent to an external completion service together with a
//! fixed system instruction asking for a step-by-step plan. Failures are
//! converted into [`PlanError::GenerationFailed`] and surfaced as a
//! message; they never abort the session. The caller attaches the result
//! via `TaskList::attach_plan`, which discards it if the task has been
//! deleted in the meantime.

mod anthropic;

use async_trait::async_trait;
use tracing::warn;

pub use anthropic::AnthropicClient;

/// Fixed system instruction sent with every plan request.
pub const PLAN_SYSTEM_PROMPT: &str = "You are a helpful assistant. Create a detailed plan to \
     achieve the given goal, breaking it down into actionable steps with a timeline. Make sure \
     the plan is practical and achievable, including daily or weekly tasks, milestones, and any \
     additional tips or resources that might be helpful. Reply with the plan as a numbered list \
     of steps, nothing else.";

/// Errors from plan generation. Always recoverable: the task itself is
/// never modified by a failed request.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("plan generation failed: {0}")]
    GenerationFailed(String),
}

/// A completion service: one request in, one text blob out. No streaming,
/// no retries.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PlanError>;
}

/// Generate a plan for a task name.
///
/// Service errors are logged and returned as [`PlanError::GenerationFailed`].
pub async fn generate_plan(
    client: &dyn CompletionClient,
    task_name: &str,
) -> Result<String, PlanError> {
    match client.complete(PLAN_SYSTEM_PROMPT, task_name).await {
        Ok(plan) => Ok(plan),
        Err(e) => {
            warn!(task_name, error = %e, "plan generation failed");
            Err(e)
        }
    }
}
