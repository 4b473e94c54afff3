//! `parley status`: Show configuration and log locations.

use parley_config::AppConfig;
use parley_core::domain::Domain;
use parley_core::log::SessionLog;
use parley_log::JsonFileLog;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🗣️  Parley Status");
    println!("================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Data dir:     {}", config.data_dir().display());
    println!("  History:      last {} days", config.history.window_days);
    println!();

    for domain in Domain::ALL {
        let log = JsonFileLog::new(config.log_path(domain));
        let state = if log.path().exists() {
            let count = log.load().len();
            format!("{count} entr{}", if count == 1 { "y" } else { "ies" })
        } else {
            "(not created yet)".to_string()
        };
        println!("  {:<10} {}  {}", format!("{domain}:"), log.path().display(), state);
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `parley onboard` first");
    }

    Ok(())
}
