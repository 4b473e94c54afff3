//! The three conversation domains and their slot schemas.

use crate::schema::{FieldSpec, SlotSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Coffee order ──────────────────────────────────────────────────────────

pub mod order {
    use super::*;

    pub const DRINK_TYPE: &str = "drinkType";
    pub const SIZE: &str = "size";
    pub const MILK: &str = "milk";
    pub const NAME: &str = "name";
    pub const EXTRAS: &str = "extras";

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::scalar(DRINK_TYPE, "drink type", "What would you like to drink?")
            .required()
            .folded(),
        FieldSpec::scalar(SIZE, "size", "What size would you like?")
            .required()
            .folded(),
        FieldSpec::scalar(MILK, "milk", "What kind of milk would you like?")
            .required()
            .folded(),
        FieldSpec::scalar(NAME, "name", "What's your name for the order?").required(),
        FieldSpec::list(
            EXTRAS,
            "extras",
            "Would you like any other extras, or are you all set?",
        ),
    ];

    pub static SCHEMA: SlotSchema = SlotSchema {
        domain: "order",
        noun: "order",
        separator: "",
        fields: FIELDS,
        summary_field: None,
        session_field: None,
        ready_prompt: "Would you like any extras like whipped cream, vanilla syrup, caramel, or chocolate?",
        continuity: false,
    };
}

// ── Wellness check-in ─────────────────────────────────────────────────────

pub mod check_in {
    use super::*;

    pub const MOOD: &str = "mood";
    pub const ENERGY_LEVEL: &str = "energyLevel";
    pub const OBJECTIVES: &str = "objectives";
    pub const SUMMARY: &str = "summary";
    pub const SESSION_ID: &str = "sessionId";

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::scalar(MOOD, "mood", "How are you feeling today?").required(),
        FieldSpec::scalar(
            ENERGY_LEVEL,
            "energy level",
            "How would you describe your energy level today?",
        )
        .required(),
        FieldSpec::list(
            OBJECTIVES,
            "objectives (at least 1)",
            "What are 1 to 3 things you'd like to focus on or accomplish today?",
        )
        .required(),
        FieldSpec::scalar(SUMMARY, "summary", "Shall I put together a quick summary?"),
        FieldSpec::scalar(SESSION_ID, "session id", ""),
    ];

    pub static SCHEMA: SlotSchema = SlotSchema {
        domain: "check-in",
        noun: "check-in",
        separator: "",
        fields: FIELDS,
        summary_field: Some(SUMMARY),
        session_field: Some(SESSION_ID),
        ready_prompt: "Whenever you're ready, I can put together a quick summary of today's check-in.",
        continuity: true,
    };
}

// ── Sales lead ────────────────────────────────────────────────────────────

pub mod lead {
    use super::*;

    pub const NAME: &str = "name";
    pub const COMPANY: &str = "company";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const USE_CASE: &str = "useCase";
    pub const TEAM_SIZE: &str = "teamSize";
    pub const TIMELINE: &str = "timeline";
    pub const BUDGET: &str = "budget";
    pub const NOTES: &str = "notes";

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::scalar(NAME, "name", "May I have your name?").required(),
        FieldSpec::scalar(COMPANY, "company", "Which company are you with?").required(),
        FieldSpec::scalar(EMAIL, "email", "What's the best email to reach you?").required(),
        FieldSpec::scalar(ROLE, "role", "What's your role there?").required(),
        FieldSpec::scalar(USE_CASE, "use case", "What would you like to use the product for?")
            .required(),
        FieldSpec::scalar(TEAM_SIZE, "team size", "How big is the team that would use it?")
            .required(),
        FieldSpec::scalar(TIMELINE, "timeline", "When are you hoping to get started?").required(),
        FieldSpec::scalar(BUDGET, "budget", "Do you have a budget in mind?"),
        FieldSpec::list(NOTES, "notes", "Anything else I should note down?"),
    ];

    pub static SCHEMA: SlotSchema = SlotSchema {
        domain: "lead",
        noun: "lead",
        separator: "",
        fields: FIELDS,
        summary_field: None,
        session_field: None,
        ready_prompt: "Is there anything else you'd like me to note before I save your details?",
        continuity: false,
    };
}

/// A conversation domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Order,
    CheckIn,
    Lead,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Order, Domain::CheckIn, Domain::Lead];

    pub fn schema(self) -> &'static SlotSchema {
        match self {
            Domain::Order => &order::SCHEMA,
            Domain::CheckIn => &check_in::SCHEMA,
            Domain::Lead => &lead::SCHEMA,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.schema().domain
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "order" | "coffee" => Ok(Domain::Order),
            "check-in" | "checkin" | "wellness" => Ok(Domain::CheckIn),
            "lead" | "sdr" => Ok(Domain::Lead),
            other => Err(format!("unknown domain '{other}' (expected order, check-in or lead)")),
        }
    }
}
