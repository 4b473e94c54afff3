//! Continuity context: a one-sentence reference to the previous session,
//! used to open a new conversation.
//!
//! The formatter is total: any gap in the history (no entry, no timestamp,
//! unknown vocabulary) drops to a less specific tier instead of failing.
//! Tiers, most to least specific:
//! 1. a reference to last time's energy level or mood,
//! 2. a generic "we talked N days ago",
//! 3. the empty string (first session ever, or an undatable entry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::check_in;
use crate::entry::LogEntry;

/// Keyword and range policy used to classify last session's energy and mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuityPolicy {
    #[serde(default = "default_low_energy")]
    pub low_energy_keywords: Vec<String>,

    #[serde(default = "default_high_energy")]
    pub high_energy_keywords: Vec<String>,

    #[serde(default = "default_neutral_energy")]
    pub neutral_energy_keywords: Vec<String>,

    /// Inclusive numeric range read as low energy (e.g. "3" or "3/10").
    #[serde(default = "default_low_range")]
    pub low_energy_range: [u32; 2],

    #[serde(default = "default_neutral_range")]
    pub neutral_energy_range: [u32; 2],

    #[serde(default = "default_high_range")]
    pub high_energy_range: [u32; 2],

    #[serde(default = "default_negative_mood")]
    pub negative_mood_keywords: Vec<String>,

    #[serde(default = "default_positive_mood")]
    pub positive_mood_keywords: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
fn default_low_energy() -> Vec<String> {
    words(&["low", "tired", "exhausted", "drained"])
}
fn default_high_energy() -> Vec<String> {
    words(&["high", "energetic", "great", "energized"])
}
fn default_neutral_energy() -> Vec<String> {
    words(&["medium", "moderate", "okay", "ok", "average", "normal"])
}
fn default_low_range() -> [u32; 2] {
    [1, 4]
}
fn default_neutral_range() -> [u32; 2] {
    [5, 6]
}
fn default_high_range() -> [u32; 2] {
    [7, 10]
}
fn default_negative_mood() -> Vec<String> {
    words(&["anxious", "stressed", "worried", "down", "sad"])
}
fn default_positive_mood() -> Vec<String> {
    words(&["good", "great", "happy", "excited", "positive"])
}

impl Default for ContinuityPolicy {
    fn default() -> Self {
        Self {
            low_energy_keywords: default_low_energy(),
            high_energy_keywords: default_high_energy(),
            neutral_energy_keywords: default_neutral_energy(),
            low_energy_range: default_low_range(),
            neutral_energy_range: default_neutral_range(),
            high_energy_range: default_high_range(),
            negative_mood_keywords: default_negative_mood(),
            positive_mood_keywords: default_positive_mood(),
        }
    }
}

/// How last session's energy level reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyClass {
    Low,
    High,
    Neutral,
}

impl ContinuityPolicy {
    /// Classify an energy description. Low wins over high when both match
    /// ("high stress, low energy" reads as low).
    pub fn classify_energy(&self, energy: &str) -> Option<EnergyClass> {
        let text = energy.to_lowercase();
        if let Some(n) = leading_number(&text) {
            let within = |[lo, hi]: [u32; 2]| (lo..=hi).contains(&n);
            if within(self.low_energy_range) {
                return Some(EnergyClass::Low);
            }
            if within(self.high_energy_range) {
                return Some(EnergyClass::High);
            }
            if within(self.neutral_energy_range) {
                return Some(EnergyClass::Neutral);
            }
        }
        if matches_any(&text, &self.low_energy_keywords) {
            Some(EnergyClass::Low)
        } else if matches_any(&text, &self.high_energy_keywords) {
            Some(EnergyClass::High)
        } else if matches_any(&text, &self.neutral_energy_keywords) {
            Some(EnergyClass::Neutral)
        } else {
            None
        }
    }

    /// Whether a mood description carries a recognized affect keyword.
    pub fn has_affect(&self, mood: &str) -> bool {
        let text = mood.to_lowercase();
        matches_any(&text, &self.negative_mood_keywords)
            || matches_any(&text, &self.positive_mood_keywords)
    }
}

/// Build the opening reference to `last`, as seen from `now`.
///
/// `noun` names what a session is called ("check-in"). Returns an empty
/// string when there is no usable history.
pub fn format_context(
    last: Option<&LogEntry>,
    now: DateTime<Utc>,
    noun: &str,
    policy: &ContinuityPolicy,
) -> String {
    let Some(entry) = last else {
        return String::new();
    };
    let Some(then) = entry.timestamp() else {
        tracing::debug!("Last session has no usable timestamp, skipping continuity context");
        return String::new();
    };
    let days_ago = (now - then).num_days().max(0);

    match salient_reference(entry, policy) {
        Some(reference) => {
            let sentence = format!("{}, {reference}.", time_phrase(days_ago));
            format!("{} How does today compare?", capitalize(&sentence))
        }
        None => match days_ago {
            0 => "How does today compare to earlier?".to_string(),
            1 => format!("Last time we talked, you completed a {noun}. How does today compare?"),
            n => format!("We had a {noun} {n} days ago. How does today compare?"),
        },
    }
}

fn time_phrase(days_ago: i64) -> String {
    match days_ago {
        0 => "earlier today".to_string(),
        1 => "last time we talked".to_string(),
        n if n < 7 => format!("{n} days ago"),
        _ => "last time we talked".to_string(),
    }
}

/// Energy first, then mood; `None` when neither says anything specific.
fn salient_reference(entry: &LogEntry, policy: &ContinuityPolicy) -> Option<String> {
    if let Some(energy) = entry.scalar(check_in::ENERGY_LEVEL) {
        match policy.classify_energy(&energy) {
            Some(EnergyClass::Low) => return Some("you mentioned being low on energy".into()),
            Some(EnergyClass::High) => return Some("you mentioned having high energy".into()),
            Some(EnergyClass::Neutral) => return Some(format!("your energy level was {energy}")),
            None => {}
        }
    }
    let mood = entry.text(check_in::MOOD)?;
    policy
        .has_affect(mood)
        .then(|| format!("you mentioned feeling {mood}"))
}

/// Whole-word match for single words, substring match for phrases.
fn matches_any(text: &str, keywords: &[String]) -> bool {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    keywords.iter().any(|keyword| {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            false
        } else if keyword.contains(' ') {
            text.contains(&keyword)
        } else {
            tokens.contains(&keyword.as_str())
        }
    })
}

/// Leading integer token: "3", "3/10", "3 out of 10".
fn leading_number(text: &str) -> Option<u32> {
    text.split(|c: char| c.is_whitespace() || c == '/')
        .find(|t| !t.is_empty())
        .and_then(|t| t.parse().ok())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
