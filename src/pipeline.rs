//! The command pipeline orchestrator.
//!
//! One invocation takes a raw user command through classification and into
//! one of five branches: a help answer, a suggestion, a need-more-info halt,
//! or extraction + execution of schedule operations. Every path — including
//! transport and parse failures anywhere in the chain — resolves to a
//! returned [`CommandOutcome`]; nothing panics or throws past this boundary.
//!
//! There is no resumption state: after a need-more-info outcome the caller
//! concatenates the original text with the supplement and re-enters from the
//! start. Overlapping invocations against one store are not serialized; the
//! last writer wins, as in the original client.

use crate::describe::describe;
use crate::error::PipelineError;
use crate::executor;
use crate::llm::extract::extract_commands;
use crate::llm::intent::{classify, Intent};
use crate::llm::prompts::{help_messages, suggestion_messages};
use crate::llm::transport::ChatBackend;
use crate::store::EventStore;
use crate::types::{CommandOutcome, OutcomeStatus};

/// Fixed prompt-back for a suggestion request without a stated free time.
const FREE_TIME_PROMPT: &str =
    "Please add how much free time you have today (e.g. \"I have 4 free hours\").";
const FREE_TIME_FIELD: &str = "free time available today";
const MISSING_DETAIL_FALLBACK: &str = "more detail about the event";

/// Process one natural-language command against the store.
///
/// `schedule_text` is the schedule description the caller rendered for
/// classification context; the suggestion and extraction branches re-derive
/// a fresh description so they never act on a stale listing.
pub async fn process_command(
    chat: &dyn ChatBackend,
    store: &mut EventStore,
    user_text: &str,
    schedule_text: &str,
) -> CommandOutcome {
    match run(chat, store, user_text, schedule_text).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("command pipeline failed: {e}");
            CommandOutcome::error(e.to_string())
        }
    }
}

async fn run(
    chat: &dyn ChatBackend,
    store: &mut EventStore,
    user_text: &str,
    schedule_text: &str,
) -> Result<CommandOutcome, PipelineError> {
    let classification = classify(chat, user_text, schedule_text).await?;

    let Some(intent) = Intent::parse(&classification.intent) else {
        return Err(PipelineError::UnknownIntent(classification.intent));
    };

    match intent {
        Intent::Help => {
            let answer = chat.send(&help_messages(user_text)).await?;
            Ok(CommandOutcome::success(answer))
        }
        Intent::SuggestWithoutInfo => Ok(CommandOutcome::need_more_info(
            FREE_TIME_PROMPT,
            FREE_TIME_FIELD,
        )),
        Intent::SuggestWithInfo => {
            let schedule = describe(&store.list_all());
            let today = chrono::Local::now().date_naive();
            let answer = chat
                .send(&suggestion_messages(user_text, &schedule, today))
                .await?;
            Ok(CommandOutcome::success(answer))
        }
        Intent::ModifyWithoutInfo => {
            let missing = classification
                .missing_info
                .unwrap_or_else(|| MISSING_DETAIL_FALLBACK.to_string());
            Ok(CommandOutcome::need_more_info(
                format!("Please supply: {missing}"),
                missing,
            ))
        }
        Intent::ModifyWithInfo => {
            let schedule = describe(&store.list_all());
            let today = chrono::Local::now().date_naive();
            let commands = extract_commands(chat, user_text, &schedule, today).await?;

            let result = executor::execute(store, &commands);
            Ok(CommandOutcome {
                status: if result.success {
                    OutcomeStatus::Success
                } else {
                    OutcomeStatus::Error
                },
                message: result.message,
                commands: Some(commands),
                missing_info: None,
                events: Some(store.list_all()),
            })
        }
    }
}
