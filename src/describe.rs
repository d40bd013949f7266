//! Schedule narration for LLM context.
//!
//! Renders the event listing into deterministic natural language the
//! classifier and extractor prompts embed. Same events in, same text out:
//! ordering is descending importance with urgency as the tie-break, and no
//! wall clock is consulted.

use crate::store::parse_time;
use crate::types::Event;

/// Fixed sentence for an empty schedule.
pub const EMPTY_SCHEDULE: &str = "There are no scheduled events at the moment.";

/// Describe the full schedule: a count header, one numbered line per event,
/// and a trailing priority-distribution summary.
pub fn describe(events: &[Event]) -> String {
    if events.is_empty() {
        return EMPTY_SCHEDULE.to_string();
    }

    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then(b.urgency.total_cmp(&a.urgency))
    });

    let mut lines = Vec::with_capacity(events.len() + 4);
    lines.push(format!("There are {} scheduled events:", events.len()));
    lines.push(String::new());
    for (index, event) in ordered.iter().enumerate() {
        lines.push(describe_event(event, index));
    }
    lines.push(String::new());
    lines.push(priority_summary(events));

    lines.join("\n")
}

/// One numbered line per event.
fn describe_event(event: &Event, index: usize) -> String {
    let mut parts = vec![format!("{}. [{}]", index + 1, event.name)];

    match (event.start_time.is_empty(), event.end_time.is_empty()) {
        (false, false) => parts.push(format!(
            "time: {} to {}",
            format_time(&event.start_time),
            format_time(&event.end_time)
        )),
        (false, true) => parts.push(format!("starts: {}", format_time(&event.start_time))),
        _ => {}
    }

    parts.push(format!(
        "importance: {}, urgency: {}",
        level_text(event.importance),
        level_text(event.urgency)
    ));

    if let Some(location) = &event.details.location {
        parts.push(format!("location: {location}"));
    }
    if let Some(hours) = event.details.estimated_hours {
        parts.push(format!("estimated effort: {hours} hours"));
    }
    if let Some(notes) = &event.details.notes {
        parts.push(format!("notes: \"{}\"", notes.replace('\n', "\\n")));
    }

    parts.join(", ")
}

/// Five-level qualitative bucket for a normalized score.
pub fn level_text(value: f64) -> &'static str {
    if value >= 0.8 {
        "very high"
    } else if value >= 0.6 {
        "high"
    } else if value >= 0.4 {
        "moderate"
    } else if value >= 0.2 {
        "low"
    } else {
        "very low"
    }
}

/// Calendar form of a stored timestamp; falls back to the raw string when
/// the timestamp doesn't parse.
fn format_time(value: &str) -> String {
    match parse_time(value) {
        Some(dt) => dt.format("%A, %B %-d, %Y %H:%M").to_string(),
        None => value.to_string(),
    }
}

fn priority_summary(events: &[Event]) -> String {
    let high = events
        .iter()
        .filter(|e| e.importance >= 0.7 && e.urgency >= 0.7)
        .count();
    let medium = events
        .iter()
        .filter(|e| e.importance >= 0.4 || e.urgency >= 0.4)
        .count()
        - high;
    let low = events.len() - high - medium;

    let mut buckets = Vec::new();
    if high > 0 {
        buckets.push(format!("{high} high-priority"));
    }
    if medium > 0 {
        buckets.push(format!("{medium} medium-priority"));
    }
    if low > 0 {
        buckets.push(format!("{low} low-priority"));
    }
    format!("Priority distribution: {}.", buckets.join(", "))
}
