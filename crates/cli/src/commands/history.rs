//! `parley history`: Show recent entries from a domain's log.

use chrono::Utc;
use parley_config::AppConfig;
use parley_core::domain::Domain;
use parley_core::entry::LogEntry;
use parley_core::log::{MAX_WINDOW_DAYS, SessionLog};
use parley_core::schema::SlotSchema;
use parley_log::JsonFileLog;
use parley_tools::reply::short_label;

pub async fn run(domain: Domain, days: Option<i64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let days = days.unwrap_or(config.history.window_days);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(format!("--days must be between 1 and {MAX_WINDOW_DAYS}, got {days}").into());
    }

    let schema = domain.schema();
    let log = JsonFileLog::new(config.log_path(domain));
    let entries = log.recent_entries(days, Utc::now());

    println!("📜 {} history — last {days} days", schema.noun);
    println!("============================");
    println!("  Log: {}\n", log.path().display());

    if entries.is_empty() {
        println!("  No {}s found.", schema.noun);
        return Ok(());
    }

    for entry in &entries {
        let when = entry
            .timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        println!("  {when}");
        for line in describe(schema, entry) {
            println!("    {line}");
        }
    }
    println!("\n  {} {}(s)", entries.len(), schema.noun);

    Ok(())
}

/// One "label: value" line per field the entry carries.
fn describe(schema: &SlotSchema, entry: &LogEntry) -> Vec<String> {
    schema
        .fields
        .iter()
        .filter(|f| !f.prompt.is_empty())
        .filter_map(|f| {
            let value = if f.is_list() {
                Some(entry.items(f.name).join(", ")).filter(|v| !v.is_empty())
            } else {
                entry.scalar(f.name)
            }?;
            Some(format!("{}: {value}", short_label(f)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn describes_present_fields_only() {
        let entry: LogEntry = serde_json::from_value(json!({
            "mood": "calm",
            "energy_level": 6,
            "objectives": [],
            "summary": "Wellness check-in: ...",
            "dateTime": "2026-01-05T09:00:00Z"
        }))
        .unwrap();
        let lines = describe(Domain::CheckIn.schema(), &entry);
        assert!(lines.iter().any(|l| l.ends_with(": calm")));
        assert!(lines.iter().any(|l| l.ends_with(": 6")));
        assert!(!lines.iter().any(|l| l.contains("sess")));
    }
}
