//! Shared pieces of tool replies: templates, follow-up prompts, and the
//! record/tool domain check.

use parley_core::completion;
use parley_core::error::ToolError;
use parley_core::record::SessionRecord;
use parley_core::schema::{FieldSpec, SlotSchema};

/// Fill `{name}` placeholders in an acknowledgment template.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |out, (key, value)| {
        out.replace(&format!("{{{key}}}"), value)
    })
}

/// Join an acknowledgment with the question that should come next.
pub fn with_follow_up(ack: &str, follow_up: &str) -> String {
    match (ack.trim(), follow_up.trim()) {
        ("", f) => f.to_string(),
        (a, "") => a.to_string(),
        (a, f) => format!("{a} {f}"),
    }
}

/// Acknowledge and ask for the first missing field, or say we're ready.
pub fn ack_and_prompt(record: &SessionRecord, ack: &str) -> String {
    with_follow_up(ack, completion::next_prompt(record))
}

/// The label without any parenthetical hint ("objectives (at least 1)"
/// reads as "objectives" in status lines).
pub fn short_label(spec: &FieldSpec) -> &'static str {
    match spec.label.split_once(" (") {
        Some((head, _)) => head,
        None => spec.label,
    }
}

/// Tools hold field handles for one schema; a record of another domain
/// must never reach them.
pub fn ensure_domain(
    tool_name: &str,
    schema: &'static SlotSchema,
    record: &SessionRecord,
) -> Result<(), ToolError> {
    if record.schema().domain == schema.domain {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments(format!(
            "{tool_name} works on {} records, got a {} record",
            schema.domain,
            record.schema().domain
        )))
    }
}

/// Plural of a record noun for counts ("check-in" → "check-ins").
pub fn plural(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}
