//! The `plan` command: generate a step-by-step plan for a task.

use anyhow::{Result, bail};

use minder_core::plan::{self, AnthropicClient};
use minder_core::tasklist::TaskList;

/// Execute `minder plan`: send the task name to the completion service and
/// attach the result.
///
/// A failed service call is surfaced as a message, never as a process
/// abort; the task itself is left untouched.
pub async fn run_plan(list: &mut TaskList, id: i64) -> Result<()> {
    let Some(task) = list.get(id) else {
        bail!("task {id} not found");
    };
    let name = task.name.clone();

    let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") else {
        bail!("ANTHROPIC_API_KEY is not set; plan generation needs an API key");
    };
    let client = AnthropicClient::new(api_key);

    match plan::generate_plan(&client, &name).await {
        Ok(text) => {
            list.attach_plan(id, &text).await?;
            println!("\n{text}");
        }
        Err(e) => {
            // Recoverable: show the placeholder message and keep the session.
            println!("Plan unavailable for task {id}: {e}");
        }
    }
    Ok(())
}
