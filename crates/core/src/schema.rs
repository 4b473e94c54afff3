//! Slot schemas: the static declaration of what a conversation collects.
//!
//! A schema is plain data: an ordered field list, which of those fields are
//! required, and whether each one holds a single value or a list. Nothing
//! outside a schema declaration hard-codes field names, so a new domain is
//! a new `SlotSchema` constant and nothing else.

use crate::error::SlotError;

/// Snapshot key holding the record's creation timestamp.
pub const DATE_TIME_KEY: &str = "dateTime";

/// Snapshot key holding the computed missing-field list.
pub const MISSING_FIELDS_KEY: &str = "missingFields";

/// Snapshot key holding the computed completeness flag.
pub const IS_COMPLETE_KEY: &str = "isComplete";

/// Keys the snapshot writes itself; a schema may not declare them as fields.
pub const RESERVED_KEYS: [&str; 3] = [DATE_TIME_KEY, MISSING_FIELDS_KEY, IS_COMPLETE_KEY];

/// Whether a field holds one value or an ordered, de-duplicated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    List,
}

/// One declared slot.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical name, also the key used in the persisted document.
    pub name: &'static str,

    pub cardinality: Cardinality,

    /// Required fields gate completeness. A required list must be non-empty.
    pub required: bool,

    /// Lower-case values on write (drink sizes, milk types).
    pub fold_value_case: bool,

    /// Human label used in status and error text.
    pub label: &'static str,

    /// Question asked when this field is the next one missing.
    pub prompt: &'static str,
}

impl FieldSpec {
    pub const fn scalar(name: &'static str, label: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            cardinality: Cardinality::Scalar,
            required: false,
            fold_value_case: false,
            label,
            prompt,
        }
    }

    pub const fn list(name: &'static str, label: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            cardinality: Cardinality::List,
            required: false,
            fold_value_case: false,
            label,
            prompt,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn folded(mut self) -> Self {
        self.fold_value_case = true;
        self
    }

    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::List
    }
}

/// Typed handle to a field of one schema (its declaration index).
///
/// Obtained only through [`SlotSchema::resolve`], so holding one proves the
/// name was validated against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The declared field set for one conversation domain.
#[derive(Debug)]
pub struct SlotSchema {
    /// Domain name used in errors and logs (e.g., "order").
    pub domain: &'static str,

    /// What one completed record is called in conversation ("check-in").
    pub noun: &'static str,

    /// Canonical separator that spaces, underscores and hyphens in
    /// incoming field names collapse to. Empty for camelCase names.
    pub separator: &'static str,

    pub fields: &'static [FieldSpec],

    /// Derived field that must be generated before the record may be logged.
    /// It is cleared whenever another field changes.
    pub summary_field: Option<&'static str>,

    /// Field that carries the conversation id, if the domain records one.
    pub session_field: Option<&'static str>,

    /// Prompt used once every required field is set.
    pub ready_prompt: &'static str,

    /// Whether new conversations open with a reference to the last record.
    pub continuity: bool,
}

impl SlotSchema {
    /// Normalize a raw field name: trim, case-fold, and collapse internal
    /// spaces, underscores and hyphens into the canonical separator.
    pub fn normalize_name(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut pending_separator = false;
        for c in raw.trim().chars() {
            if c.is_whitespace() || c == '_' || c == '-' {
                pending_separator = !out.is_empty();
                continue;
            }
            if pending_separator {
                out.push_str(self.separator);
                pending_separator = false;
            }
            out.extend(c.to_lowercase());
        }
        out
    }

    /// Resolve a raw name to a field of this schema.
    pub fn resolve(&self, raw: &str) -> Result<FieldId, SlotError> {
        let wanted = self.normalize_name(raw);
        self.fields
            .iter()
            .position(|f| self.normalize_name(f.name) == wanted)
            .map(FieldId)
            .ok_or_else(|| SlotError::UnknownField {
                domain: self.domain.to_string(),
                field: raw.to_string(),
            })
    }

    pub fn field(&self, id: FieldId) -> &FieldSpec {
        &self.fields[id.0]
    }

    /// All fields with their handles, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldSpec)> {
        self.fields.iter().enumerate().map(|(i, f)| (FieldId(i), f))
    }

    /// Required fields, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = (FieldId, &FieldSpec)> {
        self.iter().filter(|(_, f)| f.required)
    }

    pub fn summary_field_id(&self) -> Option<FieldId> {
        self.summary_field.and_then(|name| self.resolve(name).ok())
    }

    pub fn session_field_id(&self) -> Option<FieldId> {
        self.session_field.and_then(|name| self.resolve(name).ok())
    }

    /// Check the declaration itself: unique names after normalization, no
    /// reserved snapshot keys, and resolvable summary and session fields.
    pub fn validate(&self) -> Result<(), String> {
        for (i, field) in self.fields.iter().enumerate() {
            let normalized = self.normalize_name(field.name);
            if RESERVED_KEYS.iter().any(|k| self.normalize_name(k) == normalized) {
                return Err(format!("{}: '{}' is a reserved key", self.domain, field.name));
            }
            if self.fields[..i]
                .iter()
                .any(|other| self.normalize_name(other.name) == normalized)
            {
                return Err(format!("{}: duplicate field '{}'", self.domain, field.name));
            }
        }
        if let Some(summary) = self.summary_field {
            if self.resolve(summary).is_err() {
                return Err(format!("{}: summary field '{summary}' not declared", self.domain));
            }
        }
        if let Some(session) = self.session_field {
            if self.resolve(session).is_err() {
                return Err(format!("{}: session field '{session}' not declared", self.domain));
            }
        }
        Ok(())
    }
}
