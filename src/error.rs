//! Pipeline error taxonomy.
//!
//! Errors are classified by where they originate:
//! - Transport: network/timeout/HTTP-status failures from the chat endpoint
//! - Parse: model responses that are not the expected JSON shape
//! - Validation: structurally valid commands missing required fields
//!
//! None of these escape `pipeline::process_command`; they collapse into a
//! terminal error outcome with the most specific available message.

use thiserror::Error;

use crate::llm::transport::ChatError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Transport(#[from] ChatError),

    #[error("failed to parse intent: {detail}; model returned: {raw}")]
    IntentParse { detail: String, raw: String },

    #[error("failed to parse operation commands: {detail}; model returned: {raw}")]
    CommandParse { detail: String, raw: String },

    #[error("{0}")]
    Validation(String),

    #[error("unrecognized intent: {0}")]
    UnknownIntent(String),
}

impl PipelineError {
    /// True for failures of the model's output shape (as opposed to the
    /// network or the user's input). Never retried automatically either way.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            PipelineError::IntentParse { .. } | PipelineError::CommandParse { .. }
        )
    }
}
