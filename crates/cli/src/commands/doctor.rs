//! `parley doctor`: Diagnose configuration and log health.

use parley_config::AppConfig;
use parley_core::domain::Domain;
use parley_log::JsonFileLog;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Parley Doctor — Diagnostics");
    println!("==============================\n");

    let mut issues = 0;

    println!("  ✅ Binary running");

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — using defaults (run `parley onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    let data_dir = config.data_dir();
    if data_dir.is_dir() {
        println!("  ✅ Data directory exists");
    } else {
        println!("  ⚠️  No data directory at {} — run `parley onboard`", data_dir.display());
        issues += 1;
    }

    for domain in Domain::ALL {
        let log = JsonFileLog::new(config.log_path(domain));
        if !log.path().exists() {
            println!("  ✅ {domain} log not created yet (first session will create it)");
            continue;
        }
        // The session path degrades a broken document to "no history"; surface it here
        match log.read_document() {
            Ok(entries) => {
                let undated = entries.iter().filter(|e| e.timestamp().is_none()).count();
                if undated == 0 {
                    println!("  ✅ {domain} log readable ({} entries)", entries.len());
                } else {
                    println!(
                        "  ⚠️  {domain} log has {undated} of {} entries without a readable dateTime",
                        entries.len()
                    );
                    issues += 1;
                }
            }
            Err(e) => {
                println!("  ❌ {domain} log unreadable: {e}");
                println!("     The next save will move it aside to {}.corrupt-<timestamp>.", log.path().display());
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
