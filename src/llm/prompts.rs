//! Prompt construction for the classifier, responders and extractor.
//!
//! Every call site sends exactly one system/user pair. Prompts that need a
//! date take it as a parameter so the builders stay deterministic.

use chrono::NaiveDate;

use crate::llm::transport::ChatMessage;

/// Intent classification: the model must answer with a single JSON object
/// `{"intent": ..., "missing_info": ...}` and nothing else.
pub fn intent_messages(user_text: &str, schedule: &str) -> Vec<ChatMessage> {
    let mut prompt = String::with_capacity(1_500 + schedule.len());
    prompt.push_str(
        "You are a schedule management assistant. Classify the user's request and \
         respond with a single JSON object holding two fields: intent and missing_info.\n\n",
    );
    prompt.push_str("Possible intents:\n");
    prompt.push_str("- help: the user asks how to use the app or what it can do\n");
    prompt.push_str(
        "- suggest_with_info: the user wants a plan for today and has stated how much \
         free time they have (e.g. \"I have 4 free hours today\")\n",
    );
    prompt.push_str(
        "- suggest_without_info: the user wants a plan for today but has not stated \
         their free time\n",
    );
    prompt.push_str(
        "- modify_with_info: the user wants to add, update or delete events and has \
         given enough detail (note: deleting or updating only needs the event name)\n",
    );
    prompt.push_str(
        "- modify_without_info: the user wants to add, update or delete events but \
         detail is missing (a time, an event name, ...); again, deleting or updating \
         only needs the event name\n\n",
    );
    prompt.push_str(
        "When the intent is a modification with missing detail, say in missing_info \
         what the user still has to supply (e.g. \"please provide the event time\").\n\n",
    );
    prompt.push_str("Current schedule:\n");
    prompt.push_str(schedule);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("User input: {user_text}\n\n"));
    prompt.push_str("Respond with ONLY the JSON object, no fences, no commentary.");

    vec![
        ChatMessage::system(
            "You are an assistant that classifies user requests and answers in JSON.",
        ),
        ChatMessage::user(prompt),
    ]
}

/// Help responder: answer usage questions from the fixed app manual only.
pub fn help_messages(user_text: &str) -> Vec<ChatMessage> {
    let mut prompt = String::with_capacity(2_500);
    prompt.push_str(
        "You are a schedule management assistant. Introduce your features and how to \
         use them, based strictly on the material below; mention nothing beyond it.\n",
    );
    prompt.push_str(&format!("The user's question is: {user_text}\n\n"));
    prompt.push_str("# App manual\n\n");
    prompt.push_str("## Quadrant time management\n");
    prompt.push_str(
        "Events are plotted on an importance x urgency board. Top-right: important and \
         urgent (do now). Top-left: important, not urgent (plan). Bottom-right: urgent, \
         not important (do soon). Bottom-left: neither (can wait).\n\n",
    );
    prompt.push_str("## Event management\n");
    prompt.push_str(
        "Add, edit and delete events; set time, location and notes; adjust importance \
         (0-1) and remaining workload (0-100%). Event color follows urgency, shifting \
         from calm blue to alarm red as pressure rises.\n\n",
    );
    prompt.push_str("## Natural-language commands\n");
    prompt.push_str(
        "Free-form requests such as \"team meeting at 3pm today, room A\", \"move the \
         design review to tomorrow morning\", \"delete the lunch meeting\" or \"I have \
         2 free hours this afternoon, any suggestions?\" are parsed into schedule \
         operations. Voice input feeds the same command box.\n\n",
    );
    prompt.push_str("## Settings\n");
    prompt.push_str(
        "Endpoint URL, API key, model name and temperature can be changed and restored \
         to defaults. Schedule data persists locally and reloads automatically.\n",
    );

    vec![
        ChatMessage::system("You are a helpful schedule management assistant."),
        ChatMessage::user(prompt),
    ]
}

/// Suggestion responder: plan today within the user's stated free time.
pub fn suggestion_messages(user_text: &str, schedule: &str, today: NaiveDate) -> Vec<ChatMessage> {
    let mut prompt = String::with_capacity(1_000 + schedule.len());
    prompt.push_str(
        "You are a schedule management assistant. Using the user's stated free time \
         and the current schedule, propose a plan for today.\n",
    );
    prompt.push_str(&format!("Today's date is {today}.\n"));
    prompt.push_str("Current schedule:\n");
    prompt.push_str(schedule);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("User input: {user_text}\n\n"));
    prompt.push_str(
        "Propose a sensible plan that fits inside the free time, scheduling important \
         and urgent events first.",
    );

    vec![
        ChatMessage::system("You are a professional schedule planner."),
        ChatMessage::user(prompt),
    ]
}

/// Command extraction: turn natural language into a JSON array of
/// add/update/delete operations.
pub fn extraction_messages(user_text: &str, schedule: &str, today: NaiveDate) -> Vec<ChatMessage> {
    let mut prompt = String::with_capacity(2_000 + schedule.len());
    prompt.push_str(
        "You are a schedule management assistant. Convert the user's natural-language \
         instruction into machine-readable JSON operations.\n",
    );
    prompt.push_str(&format!("Today's date is {today}.\n"));
    prompt.push_str("Current schedule:\n");
    prompt.push_str(schedule);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("User input: {user_text}\n"));
    prompt.push_str(
        "When the input is incomplete, estimate a reasonable value. Unless the user \
         explicitly says otherwise, all operations target one single event.\n",
    );
    prompt.push_str(
        "Respond with a JSON array; each element is one operation with these fields:\n\
         - operation: one of \"add\", \"delete\", \"update\"\n\
         - event: an event object with these fields:\n\
           * id: unique event id (required; derive it from today's date)\n\
           * name: event name (required for add)\n\
           * startTime: start time (ISO-8601)\n\
           * endTime: end time (ISO-8601)\n\
           * importance: number between 0 and 1\n\
           * size: remaining workload, integer between 0 and 100\n\
           * details: object with location, notes, estimatedHours\n\n",
    );
    prompt.push_str("Example:\n");
    prompt.push_str(
        r#"[
  {
    "operation": "add",
    "event": {
      "id": "evt_20260830_1",
      "name": "Team meeting",
      "startTime": "2026-08-30T10:00:00",
      "endTime": "2026-08-30T11:30:00",
      "importance": 0.8,
      "size": 100,
      "details": { "location": "Conference room A", "estimatedHours": 1.5 }
    }
  },
  {
    "operation": "delete",
    "event": { "id": "evt_20260830_1", "name": "Old meeting" }
  }
]"#,
    );
    prompt.push_str("\n\nRespond with ONLY the JSON array, no fences, no commentary.");

    vec![
        ChatMessage::system(
            "You are an instruction converter that turns natural language into JSON \
             machine commands.",
        ),
        ChatMessage::user(prompt),
    ]
}
