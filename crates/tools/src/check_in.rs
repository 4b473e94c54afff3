//! Daily wellness check-in tools.

use parley_core::domain::check_in::{self, SCHEMA};
use parley_core::entry::LogEntry;
use parley_core::error::SlotError;
use parley_core::log::SessionLog;
use parley_core::record::SessionRecord;
use parley_core::tool::ToolRegistry;
use std::sync::Arc;

use crate::finalize::FinalizeTool;
use crate::history::HistoryTool;
use crate::slot::{AddItemTool, SetFieldTool};
use crate::status::StatusTool;
use crate::summary::SummaryTool;

const NOT_RECORDED: &str = "not recorded";

pub fn register(
    registry: &mut ToolRegistry,
    log: Arc<dyn SessionLog>,
    history_days: i64,
) -> Result<(), SlotError> {
    registry.register(Box::new(
        SetFieldTool::new(
            "capture_mood",
            "Capture the user's current mood.",
            &SCHEMA,
            check_in::MOOD,
            "mood",
        )?
        .with_value_description("How the user is feeling (e.g., good, stressed, a bit anxious)")
        .with_ack("Thanks for sharing that you're {value}."),
    ));
    registry.register(Box::new(
        SetFieldTool::new(
            "capture_energy_level",
            "Capture the user's energy level.",
            &SCHEMA,
            check_in::ENERGY_LEVEL,
            "energy",
        )?
        .with_value_description("The user's energy (e.g., low, medium, high, or a number out of 10)")
        .with_ack("Thanks, {value} energy level noted."),
    ));
    registry.register(Box::new(
        AddItemTool::new(
            "add_objective",
            "Add a daily objective or intention to the check-in. \
             Can be called multiple times for multiple objectives.",
            &SCHEMA,
            check_in::OBJECTIVES,
            "objective",
        )?
        .with_value_description("Something the user wants to focus on or accomplish today")
        .with_acks(
            "Great! I've noted that you want to {value}. That makes {count} on your list so far.",
            "You already mentioned {value}.",
        )
        .with_more_prompt("Would you like to add another goal, or are you all set?"),
    ));
    registry.register(Box::new(StatusTool::new(
        "check_check_in_status",
        "Check the current status of the check-in and see what information is still needed. \
         Use this to understand what questions to ask next.",
        &SCHEMA,
        describe_complete,
    )));
    registry.register(Box::new(
        HistoryTool::new(
            "get_previous_check_ins",
            "Get recent check-in entries from the last N days for context.",
            SCHEMA.noun,
            log.clone(),
            describe_full,
            describe_brief,
        )
        .with_default_days(history_days),
    ));
    registry.register(Box::new(
        SummaryTool::new(
            "generate_summary",
            "Generate a brief summary of the current check-in based on mood, energy, and objectives. \
             This summary will be saved with the check-in.",
            &SCHEMA,
            compose_summary,
        )?
        .with_ack("Summary generated. Ready to save your check-in!"),
    ));
    registry.register(Box::new(
        FinalizeTool::new(
            "save_check_in",
            "Save the completed check-in to the wellness log. Only call this when all required \
             fields are filled and the summary is generated.",
            &SCHEMA,
            log,
            confirm,
        )
        .with_action("save check-in")
        .with_incomplete_hint("Please complete the check-in first.")
        .with_summary_tool("generate_summary"),
    ));
    Ok(())
}

fn field(record: &SessionRecord, name: &str) -> String {
    record.text_by_name(name).unwrap_or_default().to_string()
}

fn objectives(record: &SessionRecord) -> String {
    record.list_by_name(check_in::OBJECTIVES).join(", ")
}

fn describe_complete(record: &SessionRecord) -> String {
    format!(
        "Check-in is complete! Here's what we have: Mood: {}, Energy: {}, Objectives: {}.",
        field(record, check_in::MOOD),
        field(record, check_in::ENERGY_LEVEL),
        objectives(record)
    )
}

fn compose_summary(record: &SessionRecord) -> String {
    format!(
        "Wellness check-in: User is {} with {} energy. Focused on: {}.",
        field(record, check_in::MOOD),
        field(record, check_in::ENERGY_LEVEL),
        objectives(record)
    )
}

fn confirm(record: &SessionRecord) -> String {
    format!(
        "Perfect! I've saved your check-in to your wellness log. Here's a quick recap: \
         You're feeling {} with {} energy. Your goals for today are: {}. Does this sound right?",
        field(record, check_in::MOOD),
        field(record, check_in::ENERGY_LEVEL),
        objectives(record)
    )
}

fn mood_and_energy(entry: &LogEntry) -> String {
    format!(
        "Mood: {}, Energy: {}",
        entry.text(check_in::MOOD).unwrap_or(NOT_RECORDED),
        entry
            .scalar(check_in::ENERGY_LEVEL)
            .unwrap_or_else(|| NOT_RECORDED.to_string())
    )
}

fn describe_full(entry: &LogEntry) -> String {
    format!(
        "{}, Objectives: {}.",
        mood_and_energy(entry),
        entry.items(check_in::OBJECTIVES).join(", ")
    )
}

fn describe_brief(entry: &LogEntry) -> String {
    format!("{}.", mood_and_energy(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::tool::ToolCall;
    use parley_log::InMemoryLog;
    use serde_json::json;

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: format!("call_{name}"),
            name: name.into(),
            arguments,
        }
    }

    fn registry(log: Arc<InMemoryLog>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        register(&mut registry, log, 7).unwrap();
        registry
    }

    #[test]
    fn registers_the_check_in_catalogue() {
        let registry = registry(Arc::new(InMemoryLog::new()));
        assert_eq!(
            registry.names(),
            vec![
                "add_objective",
                "capture_energy_level",
                "capture_mood",
                "check_check_in_status",
                "generate_summary",
                "get_previous_check_ins",
                "save_check_in",
            ]
        );
    }

    #[tokio::test]
    async fn acknowledgments_prompt_for_what_is_next() {
        let registry = registry(Arc::new(InMemoryLog::new()));
        let mut record = SessionRecord::new(&SCHEMA);

        let ack = registry
            .execute(&mut record, &call("capture_mood", json!({"mood": "a bit anxious"})))
            .await
            .unwrap();
        assert_eq!(
            ack.output,
            "Thanks for sharing that you're a bit anxious. \
             How would you describe your energy level today?"
        );

        let ack = registry
            .execute(&mut record, &call("capture_energy_level", json!({"energy": "low"})))
            .await
            .unwrap();
        assert_eq!(
            ack.output,
            "Thanks, low energy level noted. \
             What are 1 to 3 things you'd like to focus on or accomplish today?"
        );

        let ack = registry
            .execute(&mut record, &call("add_objective", json!({"objective": "go for a walk"})))
            .await
            .unwrap();
        assert_eq!(
            ack.output,
            "Great! I've noted that you want to go for a walk. That makes 1 on your list so far. \
             Would you like to add another goal, or are you all set?"
        );
    }

    #[tokio::test]
    async fn summary_then_save() {
        let log = Arc::new(InMemoryLog::new());
        let registry = registry(log.clone());
        let mut record = SessionRecord::new(&SCHEMA);
        record.set_field(check_in::MOOD, "good").unwrap();
        record.set_field(check_in::ENERGY_LEVEL, "high").unwrap();
        record.add_list_value(check_in::OBJECTIVES, "ship the release").unwrap();

        let refused = registry
            .execute(&mut record, &call("save_check_in", json!({})))
            .await
            .unwrap_err();
        assert!(refused.to_string().contains("Summary not generated"));

        let ack = registry
            .execute(&mut record, &call("generate_summary", json!({})))
            .await
            .unwrap();
        assert_eq!(ack.output, "Summary generated. Ready to save your check-in!");
        assert_eq!(
            record.text_by_name(check_in::SUMMARY),
            Some("Wellness check-in: User is good with high energy. Focused on: ship the release.")
        );

        let saved = registry
            .execute(&mut record, &call("save_check_in", json!({})))
            .await
            .unwrap();
        assert!(saved.output.contains("You're feeling good with high energy."));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn new_mood_after_summary_needs_a_fresh_summary() {
        let log = Arc::new(InMemoryLog::new());
        let registry = registry(log.clone());
        let mut record = SessionRecord::new(&SCHEMA);
        record.set_field(check_in::MOOD, "good").unwrap();
        record.set_field(check_in::ENERGY_LEVEL, "high").unwrap();
        record.add_list_value(check_in::OBJECTIVES, "ship the release").unwrap();
        registry
            .execute(&mut record, &call("generate_summary", json!({})))
            .await
            .unwrap();

        registry
            .execute(&mut record, &call("capture_mood", json!({"mood": "stressed"})))
            .await
            .unwrap();
        assert_eq!(record.text_by_name(check_in::SUMMARY), None);

        let refused = registry
            .execute(&mut record, &call("save_check_in", json!({})))
            .await
            .unwrap_err();
        assert!(refused.to_string().contains("Summary not generated"));
        assert!(log.is_empty());

        registry
            .execute(&mut record, &call("generate_summary", json!({})))
            .await
            .unwrap();
        registry
            .execute(&mut record, &call("save_check_in", json!({})))
            .await
            .unwrap();
        let saved = log.load();
        assert_eq!(
            saved[0].text(check_in::SUMMARY),
            Some("Wellness check-in: User is stressed with high energy. Focused on: ship the release.")
        );
    }

    #[tokio::test]
    async fn previous_check_ins_read_legacy_keys() {
        let now = chrono::Utc::now() - chrono::Duration::hours(2);
        let legacy: LogEntry = serde_json::from_value(json!({
            "mood": "tired",
            "energy_level": "low",
            "objectives": ["sleep early"],
            "date_time": now.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
        }))
        .unwrap();
        let registry = registry(Arc::new(InMemoryLog::with_entries(vec![legacy])));
        let mut record = SessionRecord::new(&SCHEMA);

        let result = registry
            .execute(&mut record, &call("get_previous_check_ins", json!({})))
            .await
            .unwrap();
        assert!(result.output.starts_with("Your last check-in was on "));
        assert!(result.output.ends_with("Mood: tired, Energy: low, Objectives: sleep early."));
    }
}
