//! quadra — quadrant schedule assistant.
//!
//! An event store plotted on an importance × urgency board, driven by
//! free-form natural-language commands. A chat-completion model classifies
//! each command's intent, then either answers directly (help, suggestions)
//! or emits structured add/update/delete operations that are validated and
//! executed against the store.

pub mod describe;
pub mod error;
pub mod executor;
pub mod llm;
pub mod pipeline;
pub mod storage;
pub mod store;
pub mod types;
pub mod urgency;

pub use error::PipelineError;
pub use llm::transport::{ChatBackend, ChatMessage, HttpChatTransport, TransportConfig};
pub use pipeline::process_command;
pub use store::EventStore;
pub use types::{CommandOutcome, Event, EventPatch, OperationCommand, OutcomeStatus};
