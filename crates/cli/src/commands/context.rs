//! `parley context`: Print the opening a new conversation would start with.

use chrono::Utc;
use parley_config::AppConfig;
use parley_core::continuity::format_context;
use parley_core::domain::Domain;
use parley_core::log::SessionLog;
use parley_log::JsonFileLog;

pub async fn run(domain: Domain) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let schema = domain.schema();

    if !schema.continuity {
        println!("  {domain} conversations do not open with a reference to the last one.");
        return Ok(());
    }

    let log = JsonFileLog::new(config.log_path(domain));
    let last = log.last_entry();
    let context = format_context(last.as_ref(), Utc::now(), schema.noun, &config.continuity);

    if context.is_empty() {
        println!("  (no previous {} to reference)", schema.noun);
    } else {
        println!("{context}");
    }

    Ok(())
}
