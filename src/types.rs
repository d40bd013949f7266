//! Core data types shared across the crate.
//!
//! The wire format (camelCase, optional `details`) matches the JSON blob the
//! original web client persisted under `schedule_events`, so an existing blob
//! rehydrates unchanged.

use serde::{Deserialize, Serialize};

/// A schedulable task plotted on the importance × urgency board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque unique id. Assigned by the store on creation if absent; never
    /// reassigned afterwards.
    pub id: String,
    /// Display label. Non-empty for created events.
    pub name: String,
    /// Remaining workload, percent in [0, 100].
    #[serde(default)]
    pub size: f64,
    /// Display color hex. Derived from urgency; see `urgency::color`.
    #[serde(default)]
    pub color: String,
    /// Normalized importance in [0, 1].
    #[serde(default)]
    pub importance: f64,
    /// Normalized urgency in [0, 1]. Derived, not user-set once computed.
    #[serde(default)]
    pub urgency: f64,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub details: EventDetails,
}

/// Optional substructure of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Estimated effort in hours; > 0 when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

/// All-optional mirror of [`Event`], used for partial merges and as the
/// untrusted shape the command extractor parses model output into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
}

impl EventPatch {
    /// True when no field is set; merging it is the identity.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single structured instruction derived from natural language.
///
/// Produced only by the command extractor, consumed only by the executor.
/// `operation` is kept as the raw string so unknown values can be skipped
/// with a warning instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationCommand {
    pub operation: String,
    #[serde(default)]
    pub event: EventPatch,
}

/// Terminal status of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    NeedMoreInfo,
    Error,
}

/// What one `process_command` call resolved to. Every path through the
/// pipeline produces one of these; nothing throws past the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub status: OutcomeStatus,
    pub message: String,
    /// The parsed operations, present for modify outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<OperationCommand>>,
    /// What the user still needs to supply, for need-more-info outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_info: Option<String>,
    /// Refreshed listing after a successful modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

impl CommandOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
            commands: None,
            missing_info: None,
            events: None,
        }
    }

    pub fn need_more_info(message: impl Into<String>, missing: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::NeedMoreInfo,
            message: message.into(),
            commands: None,
            missing_info: Some(missing.into()),
            events: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
            commands: None,
            missing_info: None,
            events: None,
        }
    }
}

/// Starter schedule used when the blob store holds no events yet.
pub fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: "evt_001".to_string(),
            name: "Project review".to_string(),
            size: 80.0,
            color: "#ff6b6b".to_string(),
            importance: 0.85,
            urgency: 0.9,
            start_time: "2026-09-04 14:00".to_string(),
            end_time: "2026-09-04 16:00".to_string(),
            details: EventDetails {
                location: Some("Conference room A".to_string()),
                notes: Some("Prepare slides and demo material".to_string()),
                estimated_hours: Some(2.0),
            },
        },
        Event {
            id: "evt_002".to_string(),
            name: "Team weekly sync".to_string(),
            size: 60.0,
            color: "#4ecdc4".to_string(),
            importance: 0.7,
            urgency: 0.6,
            start_time: "2026-09-02 10:00".to_string(),
            end_time: "2026-09-02 11:30".to_string(),
            details: EventDetails {
                location: Some("Online".to_string()),
                notes: Some("Review project progress".to_string()),
                estimated_hours: None,
            },
        },
        Event {
            id: "evt_003".to_string(),
            name: "Tidy up documentation".to_string(),
            size: 40.0,
            color: "#ffe66d".to_string(),
            importance: 0.4,
            urgency: 0.3,
            start_time: "2026-09-03 09:00".to_string(),
            end_time: "2026-09-03 12:00".to_string(),
            details: EventDetails::default(),
        },
    ]
}
