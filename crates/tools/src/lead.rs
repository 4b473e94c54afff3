//! Sales lead capture tools.

use parley_core::domain::lead::{self, SCHEMA};
use parley_core::error::SlotError;
use parley_core::log::SessionLog;
use parley_core::record::SessionRecord;
use parley_core::tool::ToolRegistry;
use std::sync::Arc;

use crate::finalize::FinalizeTool;
use crate::slot::{AddItemTool, SetFieldTool};
use crate::status::{StatusTool, describe_current};

/// Summary line keys, in order, with the text used when a field is unset.
const SUMMARY_PAIRS: [(&str, &str, &str); 8] = [
    ("Name", lead::NAME, "unknown"),
    ("Company", lead::COMPANY, "unknown"),
    ("Email", lead::EMAIL, "unknown"),
    ("Role", lead::ROLE, "unknown"),
    ("UseCase", lead::USE_CASE, "unknown"),
    ("TeamSize", lead::TEAM_SIZE, "unknown"),
    ("Timeline", lead::TIMELINE, "unknown"),
    ("Budget", lead::BUDGET, "unspecified"),
];

pub fn register(registry: &mut ToolRegistry, log: Arc<dyn SessionLog>) -> Result<(), SlotError> {
    registry.register(Box::new(SetFieldTool::named(
        "update_lead_field",
        "Record one detail about the prospect: name, company, email, role, use case, \
         team size, timeline, or budget.",
        &SCHEMA,
        "field",
        "value",
    )));
    registry.register(Box::new(
        AddItemTool::new(
            "add_note",
            "Add a free-form note about the prospect.",
            &SCHEMA,
            lead::NOTES,
            "note",
        )?
        .with_value_description("Anything worth passing on to the sales team")
        .with_acks("Noted: {value}.", "I already have that noted."),
    ));
    registry.register(Box::new(StatusTool::new(
        "check_lead_status",
        "Check which lead details are captured and which are still needed.",
        &SCHEMA,
        describe_complete,
    )));
    registry.register(Box::new(
        FinalizeTool::new(
            "save_lead",
            "Save the captured lead. Only call this when all required details are filled.",
            &SCHEMA,
            log,
            confirm,
        )
        .with_action("save lead"),
    ));
    Ok(())
}

/// "Lead summary: Name=Priya; Company=Acme; ...; Budget=unspecified"
pub fn summary_line(record: &SessionRecord) -> String {
    let pairs: Vec<String> = SUMMARY_PAIRS
        .iter()
        .map(|&(key, field, fallback)| {
            format!("{key}={}", record.text_by_name(field).unwrap_or(fallback))
        })
        .collect();
    format!("Lead summary: {}", pairs.join("; "))
}

fn describe_complete(record: &SessionRecord) -> String {
    format!(
        "All required details are captured. Current lead: {}.",
        describe_current(record)
    )
}

fn confirm(record: &SessionRecord) -> String {
    format!(
        "Thanks {}! I've saved your details and someone from our team will follow up at {}. {}",
        record.text_by_name(lead::NAME).unwrap_or("there"),
        record.text_by_name(lead::EMAIL).unwrap_or("your email"),
        summary_line(record)
    )
}
