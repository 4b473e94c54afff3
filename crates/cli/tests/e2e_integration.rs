//! End-to-end integration tests for Parley conversations.
//!
//! These tests drive whole conversations through the agent crate against a
//! real JSON document log in a temporary directory, the way `parley session`
//! does, and then read the document back.

use std::sync::Arc;

use chrono::{Duration, Utc};
use parley_agent::{Conversation, ConversationEvent};
use parley_core::continuity::ContinuityPolicy;
use parley_core::domain::{Domain, check_in, lead, order};
use parley_core::log::SessionLog;
use parley_core::tool::ToolCall;
use parley_log::JsonFileLog;
use serde_json::{Value, json};

// ── Helpers ──────────────────────────────────────────────────────────────

fn call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: format!("call_{name}"),
        name: name.into(),
        arguments,
    }
}

fn file_log(dir: &tempfile::TempDir, file: &str) -> Arc<JsonFileLog> {
    Arc::new(JsonFileLog::new(dir.path().join("data").join(file)))
}

async fn say(conversation: &mut Conversation, name: &str, arguments: Value) -> String {
    conversation
        .handle(&call(name, arguments))
        .await
        .unwrap_or_else(|e| panic!("{name} failed: {e}"))
        .output
}

fn read_document(log: &JsonFileLog) -> Vec<Value> {
    let raw = std::fs::read_to_string(log.path()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ── Check-in ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_check_in_walkthrough_saves_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "wellness_log.json");
    let mut conversation = Conversation::new(Domain::CheckIn, log.clone()).unwrap();

    let opening = conversation.opening_context(&ContinuityPolicy::default(), Utc::now());
    assert_eq!(opening, "", "first check-in has nothing to reference");

    let ack = say(&mut conversation, "capture_mood", json!({"mood": "a bit anxious"})).await;
    assert!(ack.ends_with("How would you describe your energy level today?"), "{ack}");

    let ack = say(&mut conversation, "capture_energy_level", json!({"energy": "low"})).await;
    assert!(
        ack.ends_with("What are 1 to 3 things you'd like to focus on or accomplish today?"),
        "{ack}"
    );

    // Saving before the summary exists is refused, and nothing is written
    let refused = conversation
        .handle(&call("save_check_in", json!({})))
        .await
        .unwrap_err();
    assert!(refused.is_retryable());
    assert!(refused.to_string().starts_with("Cannot save check-in. Still missing:"));
    assert!(!log.path().exists());

    say(&mut conversation, "add_objective", json!({"objective": "go for a walk"})).await;
    let summary = say(&mut conversation, "generate_summary", json!({})).await;
    assert_eq!(summary, "Summary generated. Ready to save your check-in!");

    let saved = say(&mut conversation, "save_check_in", json!({})).await;
    assert!(saved.starts_with("Perfect! I've saved your check-in"), "{saved}");

    let document = read_document(&log);
    assert_eq!(document.len(), 1);
    let entry = &document[0];
    assert_eq!(entry["mood"], "a bit anxious");
    assert_eq!(entry["energyLevel"], "low");
    assert_eq!(entry["objectives"], json!(["go for a walk"]));
    assert_eq!(
        entry["summary"],
        "Wellness check-in: User is a bit anxious with low energy. Focused on: go for a walk."
    );
    assert_eq!(entry["sessionId"], conversation.id());
    assert!(entry["dateTime"].is_string());
    assert_eq!(entry["isComplete"], true);

    match conversation.finish() {
        ConversationEvent::Done { saved, .. } => assert!(saved),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn e2e_second_check_in_opens_with_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "wellness_log.json");

    let mut first = Conversation::new(Domain::CheckIn, log.clone()).unwrap();
    say(&mut first, "capture_mood", json!({"mood": "tired"})).await;
    say(&mut first, "capture_energy_level", json!({"energy": "low"})).await;
    say(&mut first, "add_objective", json!({"objective": "sleep early"})).await;
    say(&mut first, "generate_summary", json!({})).await;
    say(&mut first, "save_check_in", json!({})).await;

    // Pretend the next conversation happens a day later
    let tomorrow = Utc::now() + Duration::days(1) + Duration::hours(1);
    let second = Conversation::new(Domain::CheckIn, log.clone()).unwrap();
    assert_ne!(second.id(), first.id());

    let opening = second.opening_event(&ContinuityPolicy::default(), tomorrow);
    assert_eq!(
        opening,
        Some(ConversationEvent::Opening {
            context: "Last time we talked, you mentioned being low on energy. How does today compare?"
                .into()
        })
    );
}

#[tokio::test]
async fn e2e_previous_check_ins_reads_back_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "wellness_log.json");

    let mut first = Conversation::new(Domain::CheckIn, log.clone()).unwrap();
    say(&mut first, "capture_mood", json!({"mood": "calm"})).await;
    say(&mut first, "capture_energy_level", json!({"energy": "7"})).await;
    say(&mut first, "add_objective", json!({"objective": "write tests"})).await;
    say(&mut first, "generate_summary", json!({})).await;
    say(&mut first, "save_check_in", json!({})).await;

    let mut second = Conversation::new(Domain::CheckIn, log).unwrap();
    let history = say(&mut second, "get_previous_check_ins", json!({"days": 3})).await;
    assert!(history.starts_with("Your last check-in was on "), "{history}");
    assert!(history.ends_with("Mood: calm, Energy: 7, Objectives: write tests."));

    let bad = second
        .respond(&call("get_previous_check_ins", json!({"days": 0})))
        .await;
    assert_eq!(bad.event_type(), "failed");
}

// ── Order ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_order_flow_appends_to_shared_document() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "orders.json");

    for (name, drink) in [("Kai", "latte"), ("Ana", "mocha")] {
        let mut conversation = Conversation::new(Domain::Order, log.clone()).unwrap();
        assert_eq!(
            conversation.opening_context(&ContinuityPolicy::default(), Utc::now()),
            ""
        );

        say(&mut conversation, "update_drink_type", json!({"drink_type": drink})).await;
        say(&mut conversation, "update_size", json!({"size": "Large"})).await;
        say(&mut conversation, "update_milk", json!({"milk": "Oat"})).await;
        say(&mut conversation, "add_extra", json!({"extra": "caramel"})).await;

        let refused = conversation
            .respond(&call("complete_order", json!({})))
            .await;
        assert_eq!(refused.event_type(), "retry");
        assert_eq!(
            refused.text(),
            Some(
                "Cannot complete order. Still missing: name. \
                 Please gather all required information first."
            )
        );

        say(&mut conversation, "update_name", json!({"name": name})).await;
        let status = say(&mut conversation, "check_order_status", json!({})).await;
        assert!(status.starts_with("Order is complete!"), "{status}");

        let saved = say(&mut conversation, "complete_order", json!({})).await;
        assert_eq!(
            saved,
            format!(
                "Perfect! I've saved your order: large {drink} with oat, caramel. \
                 Thanks {name}, your order will be ready soon!"
            )
        );
    }

    let document = read_document(&log);
    assert_eq!(document.len(), 2);
    assert_eq!(document[0][order::NAME], "Kai");
    assert_eq!(document[1][order::NAME], "Ana");
    assert_eq!(document[1][order::SIZE], "large");
    assert_eq!(document[1][order::EXTRAS], json!(["caramel"]));

    let raw = std::fs::read_to_string(log.path()).unwrap();
    assert!(raw.contains("\n  {"), "document is pretty-printed");
}

#[tokio::test]
async fn e2e_repeated_finalize_does_not_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "orders.json");
    let mut conversation = Conversation::new(Domain::Order, log.clone()).unwrap();

    for (tool, arg, value) in [
        ("update_drink_type", "drink_type", "espresso"),
        ("update_size", "size", "small"),
        ("update_milk", "milk", "none"),
        ("update_name", "name", "Ravi"),
    ] {
        say(&mut conversation, tool, json!({ arg: value })).await;
    }
    say(&mut conversation, "complete_order", json!({})).await;
    say(&mut conversation, "complete_order", json!({})).await;

    assert_eq!(log.load().len(), 1);
}

// ── Lead ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_lead_flow_saves_summary_fields() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "leads.json");
    let mut conversation = Conversation::new(Domain::Lead, log.clone()).unwrap();

    for (field, value) in [
        ("name", "Priya"),
        ("company", "Acme"),
        ("email", "priya@acme.test"),
        ("role", "Head of Support"),
        ("use case", "ticket triage"),
        ("team_size", "12"),
        ("timeline", "this quarter"),
    ] {
        say(
            &mut conversation,
            "update_lead_field",
            json!({"field": field, "value": value}),
        )
        .await;
    }
    say(&mut conversation, "add_note", json!({"note": "Prefers email"})).await;

    let saved = say(&mut conversation, "save_lead", json!({})).await;
    assert!(saved.contains("follow up at priya@acme.test"), "{saved}");
    assert!(saved.contains("Budget=unspecified"));

    let entries = log.load();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text(lead::USE_CASE), Some("ticket triage"));
    assert_eq!(entries[0].items(lead::NOTES), vec!["Prefers email"]);
}

// ── Log resilience ───────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_corrupt_log_does_not_block_a_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir, "wellness_log.json");
    std::fs::create_dir_all(log.path().parent().unwrap()).unwrap();
    std::fs::write(log.path(), "{ not json").unwrap();

    let mut conversation = Conversation::new(Domain::CheckIn, log.clone()).unwrap();
    assert_eq!(
        conversation.opening_context(&ContinuityPolicy::default(), Utc::now()),
        ""
    );
    let history = say(&mut conversation, "get_previous_check_ins", json!({})).await;
    assert_eq!(history, "No previous check-ins found.");

    say(&mut conversation, "capture_mood", json!({"mood": "fine"})).await;
    assert_eq!(conversation.record().text_by_name(check_in::MOOD), Some("fine"));
}
