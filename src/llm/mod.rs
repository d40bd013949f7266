//! The language-model side of the command pipeline: transport, prompts,
//! response scavenging, intent classification and command extraction.

pub mod extract;
pub mod intent;
pub mod json;
pub mod prompts;
pub mod transport;
