//! Intent classification.
//!
//! One chat call per user command. The model's reply is treated as untrusted
//! input: the first JSON object is pulled out (fence tolerant) and parsed
//! strictly; anything else is a single `IntentParse` error, never retried.

use serde::Deserialize;

use crate::error::PipelineError;
use crate::llm::json::extract_object;
use crate::llm::prompts::intent_messages;
use crate::llm::transport::ChatBackend;

/// The five recognized command intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Help,
    SuggestWithInfo,
    SuggestWithoutInfo,
    ModifyWithInfo,
    ModifyWithoutInfo,
}

impl Intent {
    /// Map the model's intent string; `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "help" => Some(Self::Help),
            "suggest_with_info" => Some(Self::SuggestWithInfo),
            "suggest_without_info" => Some(Self::SuggestWithoutInfo),
            "modify_with_info" => Some(Self::ModifyWithInfo),
            "modify_without_info" => Some(Self::ModifyWithoutInfo),
            _ => None,
        }
    }
}

/// Classifier output. `intent` is kept raw so an unrecognized value can be
/// named in the terminal error instead of failing the parse.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub intent: String,
    #[serde(default)]
    pub missing_info: Option<String>,
}

/// Classify the user's command against the current schedule context.
pub async fn classify(
    chat: &dyn ChatBackend,
    user_text: &str,
    schedule_text: &str,
) -> Result<Classification, PipelineError> {
    let response = chat.send(&intent_messages(user_text, schedule_text)).await?;

    let payload = extract_object(&response).ok_or_else(|| PipelineError::IntentParse {
        detail: "no JSON object in response".to_string(),
        raw: response.clone(),
    })?;

    let classification: Classification =
        serde_json::from_str(payload).map_err(|e| PipelineError::IntentParse {
            detail: e.to_string(),
            raw: response.clone(),
        })?;

    if classification.intent.is_empty() {
        return Err(PipelineError::IntentParse {
            detail: "intent field is empty".to_string(),
            raw: response,
        });
    }

    Ok(classification)
}
