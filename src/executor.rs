//! Command execution against the event store.
//!
//! Runs in two phases: validate the whole batch first, then apply. A batch
//! that fails validation leaves the store untouched — a deliberate semantic
//! tightening over the partial-apply behavior of the original client.
//! Unknown operations are skipped with a warning, never fatal.

use crate::store::{generate_id, EventStore};
use crate::types::{Event, EventPatch, OperationCommand};

/// Fixed color assigned to freshly added events until the next urgency
/// refresh recomputes it.
const DEFAULT_ADD_COLOR: &str = "#4caf50";

/// Aggregate result of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
}

/// Validated, ready-to-apply form of one command.
enum PlannedOp {
    Add(Event),
    Update { id: String, patch: EventPatch },
    Delete { id: String },
}

/// Validate and apply an ordered command batch.
pub fn execute(store: &mut EventStore, commands: &[OperationCommand]) -> ExecutionResult {
    // Phase 1: validate everything before touching the store.
    let mut planned = Vec::with_capacity(commands.len());
    for command in commands {
        match plan(command) {
            Ok(Some(op)) => planned.push(op),
            Ok(None) => {} // unknown operation, already warned
            Err(reason) => {
                return ExecutionResult {
                    success: false,
                    message: format!("execution failed: {reason}"),
                };
            }
        }
    }

    if planned.is_empty() {
        return ExecutionResult {
            success: true,
            message: "no operations to execute".to_string(),
        };
    }

    // Phase 2: apply in order, reporting one clause per command.
    let mut clauses = Vec::with_capacity(planned.len());
    for op in planned {
        match op {
            PlannedOp::Add(event) => {
                let name = event.name.clone();
                let id = event.id.clone();
                if let Err(e) = store.add(event) {
                    // Generated ids make this unreachable in practice, but a
                    // collision still must not pass silently.
                    return ExecutionResult {
                        success: false,
                        message: format!("execution failed: {e}"),
                    };
                }
                clauses.push(format!("added \"{name}\" ({id})"));
            }
            PlannedOp::Update { id, patch } => {
                if store.update(&id, &patch) {
                    clauses.push(format!("updated {id}"));
                } else {
                    clauses.push(format!("update {id}: no matching event"));
                }
            }
            PlannedOp::Delete { id } => {
                if store.delete(&id) {
                    clauses.push(format!("deleted {id}"));
                } else {
                    clauses.push(format!("delete {id}: no matching event"));
                }
            }
        }
    }

    ExecutionResult {
        success: true,
        message: format!("executed {} operation(s): {}", clauses.len(), clauses.join("; ")),
    }
}

/// Validate one command; `Ok(None)` means skip (unknown operation).
fn plan(command: &OperationCommand) -> Result<Option<PlannedOp>, String> {
    let event = &command.event;
    match command.operation.as_str() {
        "add" => {
            let name = event
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or("adding an event requires an event name")?;
            Ok(Some(PlannedOp::Add(build_event(name, event))))
        }
        "update" => {
            let id = require_id(event, "updating")?;
            Ok(Some(PlannedOp::Update {
                id,
                patch: event.clone(),
            }))
        }
        "delete" => {
            let id = require_id(event, "deleting")?;
            Ok(Some(PlannedOp::Delete { id }))
        }
        other => {
            log::warn!("skipping unknown operation: {other}");
            Ok(None)
        }
    }
}

fn require_id(event: &EventPatch, verb: &str) -> Result<String, String> {
    event
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("{verb} an event requires an event id"))
}

/// Assemble a full event from an add patch. A fresh date-anchored id and the
/// fixed default color are assigned here; model-suggested id/color are
/// ignored.
fn build_event(name: &str, patch: &EventPatch) -> Event {
    let urgency_value = patch.urgency.unwrap_or(0.5).clamp(0.0, 1.0);
    Event {
        id: generate_id(),
        name: name.to_string(),
        size: patch.size.unwrap_or(100.0),
        color: DEFAULT_ADD_COLOR.to_string(),
        importance: patch.importance.unwrap_or(0.5),
        urgency: urgency_value,
        start_time: patch.start_time.clone().unwrap_or_default(),
        end_time: patch.end_time.clone().unwrap_or_default(),
        details: patch.details.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlobStore, MemoryStore};
    use crate::store::EVENTS_KEY;
    use crate::types::EventDetails;

    fn store_with(events: serde_json::Value) -> EventStore {
        let storage = MemoryStore::new();
        storage.set(EVENTS_KEY, &events).unwrap();
        EventStore::new(Box::new(storage))
    }

    fn command(operation: &str, event: EventPatch) -> OperationCommand {
        OperationCommand {
            operation: operation.to_string(),
            event,
        }
    }

    #[test]
    fn add_without_name_fails_and_store_is_unchanged() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_a", "name": "keep me"}
        ]));
        let before = store.list_all();

        let result = execute(&mut store, &[command("add", EventPatch::default())]);
        assert!(!result.success);
        assert!(result.message.contains("execution failed"));
        assert_eq!(store.list_all(), before);
    }

    #[test]
    fn invalid_command_anywhere_aborts_whole_batch_before_applying() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_a", "name": "keep me"}
        ]));
        let before = store.list_all();

        let batch = [
            command(
                "add",
                EventPatch {
                    name: Some("valid add".to_string()),
                    ..Default::default()
                },
            ),
            // No id: fails validation, so the add above must not land either.
            command("update", EventPatch::default()),
        ];
        let result = execute(&mut store, &batch);
        assert!(!result.success);
        assert_eq!(store.list_all(), before);
    }

    #[test]
    fn delete_removes_event_and_reports_success() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_x", "name": "\u{5468}\u{62a5}\u{4f1a}\u{8bae}"}
        ]));
        let result = execute(
            &mut store,
            &[command(
                "delete",
                EventPatch {
                    id: Some("evt_x".to_string()),
                    ..Default::default()
                },
            )],
        );
        assert!(result.success);
        assert!(result.message.contains("deleted evt_x"));
        assert!(store.get("evt_x").is_none());
    }

    #[test]
    fn add_ignores_model_suggested_id_and_color() {
        let mut store = store_with(serde_json::json!([]));
        // Seeded store isn't empty; clear it down to a known state.
        for event in store.list_all() {
            store.delete(&event.id);
        }

        let result = execute(
            &mut store,
            &[command(
                "add",
                EventPatch {
                    id: Some("evt_from_model".to_string()),
                    color: Some("#123456".to_string()),
                    name: Some("standup".to_string()),
                    importance: Some(0.9),
                    details: Some(EventDetails {
                        estimated_hours: Some(0.5),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )],
        );
        assert!(result.success);
        assert_eq!(store.len(), 1);
        let added = &store.list_all()[0];
        assert_ne!(added.id, "evt_from_model");
        assert!(added.id.starts_with("evt_"));
        assert_eq!(added.color, DEFAULT_ADD_COLOR);
        assert_eq!(added.importance, 0.9);
        assert_eq!(added.details.estimated_hours, Some(0.5));
    }

    #[test]
    fn unknown_operation_is_skipped_not_fatal() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_x", "name": "target"}
        ]));
        let batch = [
            command("archive", EventPatch::default()),
            command(
                "delete",
                EventPatch {
                    id: Some("evt_x".to_string()),
                    ..Default::default()
                },
            ),
        ];
        let result = execute(&mut store, &batch);
        assert!(result.success);
        assert!(result.message.contains("executed 1 operation(s)"));
        assert!(store.is_empty());
    }

    #[test]
    fn batch_message_reports_every_command() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_a", "name": "one"},
            {"id": "evt_b", "name": "two"}
        ]));
        let batch = [
            command(
                "update",
                EventPatch {
                    id: Some("evt_a".to_string()),
                    importance: Some(0.9),
                    ..Default::default()
                },
            ),
            command(
                "delete",
                EventPatch {
                    id: Some("evt_b".to_string()),
                    ..Default::default()
                },
            ),
        ];
        let result = execute(&mut store, &batch);
        assert!(result.success);
        assert!(result.message.contains("updated evt_a"));
        assert!(result.message.contains("deleted evt_b"));
    }

    #[test]
    fn update_of_missing_id_is_reported_but_not_an_error() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_a", "name": "one"}
        ]));
        let result = execute(
            &mut store,
            &[command(
                "update",
                EventPatch {
                    id: Some("evt_zzz".to_string()),
                    name: Some("ghost".to_string()),
                    ..Default::default()
                },
            )],
        );
        assert!(result.success);
        assert!(result.message.contains("no matching event"));
    }

    #[test]
    fn empty_batch_is_a_successful_noop() {
        let mut store = store_with(serde_json::json!([
            {"id": "evt_a", "name": "one"}
        ]));
        let result = execute(&mut store, &[]);
        assert!(result.success);
        assert_eq!(store.len(), 1);
    }
}
