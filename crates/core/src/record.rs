//! Session record: the mutable, in-progress state of one conversation.
//!
//! A record is created empty when the conversation starts and is mutated one
//! field at a time by the tool layer. Every write goes through the schema:
//! names are normalized and validated, values are trimmed, and list fields
//! are de-duplicated case-insensitively.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::completion;
use crate::entry::LogEntry;
use crate::error::{IncompleteState, SlotError};
use crate::schema::{
    Cardinality, DATE_TIME_KEY, FieldId, FieldSpec, IS_COMPLETE_KEY, MISSING_FIELDS_KEY, SlotSchema,
};

/// What a single write did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A scalar field now holds the value.
    Set,
    /// A blank value unset a scalar field.
    Cleared,
    /// The value was appended to a list field.
    Added,
    /// The list already held the value (compared case-insensitively).
    AlreadyPresent,
    /// A blank value was offered to a list field and dropped.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Scalar(Option<String>),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    schema: &'static SlotSchema,
    slots: Vec<Slot>,
    created_at: DateTime<Utc>,
    logged: bool,
}

impl SessionRecord {
    /// Start an empty record now.
    pub fn new(schema: &'static SlotSchema) -> Self {
        Self::started_at(schema, Utc::now())
    }

    /// Start an empty record with a fixed creation time.
    pub fn started_at(schema: &'static SlotSchema, created_at: DateTime<Utc>) -> Self {
        let slots = schema
            .fields
            .iter()
            .map(|f| match f.cardinality {
                Cardinality::Scalar => Slot::Scalar(None),
                Cardinality::List => Slot::List(Vec::new()),
            })
            .collect();
        Self {
            schema,
            slots,
            created_at,
            logged: false,
        }
    }

    /// Tag the record with the conversation's session id. Fails when the
    /// schema declares no session field.
    pub fn with_session_id(mut self, session_id: &str) -> Result<Self, SlotError> {
        let id = self
            .schema
            .session_field_id()
            .ok_or_else(|| SlotError::UnknownField {
                domain: self.schema.domain.to_string(),
                field: "session id".to_string(),
            })?;
        self.set(id, session_id);
        Ok(self)
    }

    pub fn schema(&self) -> &'static SlotSchema {
        self.schema
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Write a value by field name. Scalars are overwritten; list fields
    /// receive the value as an additional item.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<Change, SlotError> {
        let id = self.schema.resolve(name)?;
        Ok(self.set(id, value))
    }

    /// Write a value to an already-resolved field.
    ///
    /// A change to any content field drops a previously generated summary,
    /// which no longer describes the record.
    pub fn set(&mut self, id: FieldId, value: &str) -> Change {
        let spec = self.schema.field(id);
        let value = normalize_value(spec, value);
        self.logged = false;

        let (change, modified) = match &mut self.slots[id.index()] {
            Slot::Scalar(current) => {
                let modified = current.as_deref() != Some(value.as_str()).filter(|v| !v.is_empty());
                if value.is_empty() {
                    *current = None;
                    (Change::Cleared, modified)
                } else {
                    *current = Some(value);
                    (Change::Set, modified)
                }
            }
            Slot::List(items) => {
                let change = push_unique(items, value);
                (change, change == Change::Added)
            }
        };
        tracing::info!(domain = self.schema.domain, field = spec.name, ?change, "Field updated");

        if modified {
            self.invalidate_summary(id);
        }
        change
    }

    fn invalidate_summary(&mut self, changed: FieldId) {
        let Some(summary) = self.schema.summary_field_id() else {
            return;
        };
        if changed == summary || Some(changed) == self.schema.session_field_id() {
            return;
        }
        if let Slot::Scalar(current @ Some(_)) = &mut self.slots[summary.index()] {
            *current = None;
            tracing::debug!(domain = self.schema.domain, "Summary cleared after field change");
        }
    }

    /// Add one item to a list field by name. Returns `true` when the item was
    /// new, `false` when it was already present or blank.
    pub fn add_list_value(&mut self, name: &str, value: &str) -> Result<bool, SlotError> {
        let id = self.schema.resolve(name)?;
        self.add(id, value)
    }

    /// Add one item to an already-resolved list field.
    pub fn add(&mut self, id: FieldId, value: &str) -> Result<bool, SlotError> {
        let spec = self.schema.field(id);
        if !spec.is_list() {
            return Err(SlotError::NotAList {
                field: spec.name.to_string(),
            });
        }
        Ok(self.set(id, value) == Change::Added)
    }

    pub fn is_set(&self, id: FieldId) -> bool {
        match &self.slots[id.index()] {
            Slot::Scalar(value) => value.is_some(),
            Slot::List(items) => !items.is_empty(),
        }
    }

    /// The current value of a scalar field.
    pub fn text(&self, id: FieldId) -> Option<&str> {
        match &self.slots[id.index()] {
            Slot::Scalar(value) => value.as_deref(),
            Slot::List(_) => None,
        }
    }

    /// The current items of a list field (empty for scalars).
    pub fn list(&self, id: FieldId) -> &[String] {
        match &self.slots[id.index()] {
            Slot::List(items) => items,
            Slot::Scalar(_) => &[],
        }
    }

    /// Scalar value by field name; `None` when unset or undeclared.
    pub fn text_by_name(&self, name: &str) -> Option<&str> {
        self.schema.resolve(name).ok().and_then(|id| self.text(id))
    }

    /// List items by field name; empty when unset or undeclared.
    pub fn list_by_name(&self, name: &str) -> &[String] {
        match self.schema.resolve(name) {
            Ok(id) => self.list(id),
            Err(_) => &[],
        }
    }

    /// Set fields with their values rendered for display, in declaration order.
    pub fn current_values(&self) -> Vec<(&'static FieldSpec, String)> {
        self.schema
            .fields
            .iter()
            .zip(&self.slots)
            .filter_map(|(spec, slot)| match slot {
                Slot::Scalar(Some(v)) => Some((spec, v.clone())),
                Slot::List(items) if !items.is_empty() => Some((spec, items.join(", "))),
                _ => None,
            })
            .collect()
    }

    /// Required fields not yet set, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        completion::missing_fields(self)
    }

    pub fn is_complete(&self) -> bool {
        completion::is_complete(self)
    }

    /// Whether this exact state has already been appended to the log.
    pub fn is_logged(&self) -> bool {
        self.logged
    }

    pub fn mark_logged(&mut self) {
        self.logged = true;
    }

    /// Freeze the record into a log entry.
    ///
    /// Fails with [`IncompleteState::MissingFields`] unless every required
    /// field is set: partial records never reach the log.
    pub fn snapshot(&self) -> Result<LogEntry, SlotError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(IncompleteState::MissingFields(
                completion::missing_labels(self),
            )
            .into());
        }

        let mut map = Map::new();
        for (spec, slot) in self.schema.fields.iter().zip(&self.slots) {
            let value = match slot {
                Slot::Scalar(v) => v.clone().map(Value::String).unwrap_or(Value::Null),
                Slot::List(items) => Value::from(items.clone()),
            };
            map.insert(spec.name.to_string(), value);
        }
        map.insert(
            DATE_TIME_KEY.to_string(),
            Value::String(self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        map.insert(MISSING_FIELDS_KEY.to_string(), Value::from(missing));
        map.insert(IS_COMPLETE_KEY.to_string(), Value::Bool(true));
        Ok(LogEntry::from_map(map))
    }
}

fn normalize_value(spec: &FieldSpec, raw: &str) -> String {
    let trimmed = raw.trim();
    if spec.fold_value_case {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

fn push_unique(items: &mut Vec<String>, value: String) -> Change {
    if value.is_empty() {
        return Change::Ignored;
    }
    let folded = value.to_lowercase();
    if items.iter().any(|existing| existing.to_lowercase() == folded) {
        Change::AlreadyPresent
    } else {
        items.push(value);
        Change::Added
    }
}
