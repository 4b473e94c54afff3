//! Completion evaluator: "what's missing / are we done", derived from the
//! schema and the record alone. Shared by every domain.

use crate::error::IncompleteState;
use crate::record::SessionRecord;

/// Names of required fields not yet set, in schema declaration order.
pub fn missing_fields(record: &SessionRecord) -> Vec<&'static str> {
    record
        .schema()
        .required()
        .filter(|(id, _)| !record.is_set(*id))
        .map(|(_, spec)| spec.name)
        .collect()
}

/// Human labels of the missing required fields, for prompts and errors.
pub fn missing_labels(record: &SessionRecord) -> Vec<String> {
    record
        .schema()
        .required()
        .filter(|(id, _)| !record.is_set(*id))
        .map(|(_, spec)| spec.label.to_string())
        .collect()
}

pub fn is_complete(record: &SessionRecord) -> bool {
    record
        .schema()
        .required()
        .all(|(id, _)| record.is_set(id))
}

/// The question to ask next: the prompt of the first missing required
/// field, or the schema's ready prompt once nothing is missing.
pub fn next_prompt(record: &SessionRecord) -> &'static str {
    let schema = record.schema();
    schema
        .required()
        .find(|(id, _)| !record.is_set(*id))
        .map(|(_, spec)| spec.prompt)
        .unwrap_or(schema.ready_prompt)
}

/// Whether the derived summary, if the schema has one, has been generated.
pub fn has_summary(record: &SessionRecord) -> bool {
    match record.schema().summary_field_id() {
        Some(id) => record.is_set(id),
        None => true,
    }
}

/// Gate for persistence: every required field set, then the summary.
pub fn check_persistable(record: &SessionRecord) -> Result<(), IncompleteState> {
    let missing = missing_labels(record);
    if !missing.is_empty() {
        return Err(IncompleteState::MissingFields(missing));
    }
    if !has_summary(record) {
        return Err(IncompleteState::SummaryNotGenerated);
    }
    Ok(())
}
