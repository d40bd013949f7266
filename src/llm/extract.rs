//! Structured-command extraction.
//!
//! One chat call turning a natural-language instruction into an ordered list
//! of operations. The serde parse here is the structural trust boundary for
//! model output — wrong shapes are rejected, not coerced. Whether a command
//! makes sense (a name for adds, an id for updates/deletes) is the
//! executor's call.

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::llm::json::extract_array;
use crate::llm::prompts::extraction_messages;
use crate::llm::transport::ChatBackend;
use crate::types::OperationCommand;

/// Extract the operation list for a modification command.
pub async fn extract_commands(
    chat: &dyn ChatBackend,
    user_text: &str,
    schedule_text: &str,
    today: NaiveDate,
) -> Result<Vec<OperationCommand>, PipelineError> {
    let response = chat
        .send(&extraction_messages(user_text, schedule_text, today))
        .await?;

    let payload = extract_array(&response).ok_or_else(|| PipelineError::CommandParse {
        detail: "expected a JSON array".to_string(),
        raw: response.clone(),
    })?;

    let commands: Vec<OperationCommand> =
        serde_json::from_str(payload).map_err(|e| PipelineError::CommandParse {
            detail: e.to_string(),
            raw: response.clone(),
        })?;

    log::debug!("extracted {} operation(s)", commands.len());
    Ok(commands)
}
