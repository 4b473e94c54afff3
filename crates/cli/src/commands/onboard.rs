//! `parley onboard`: First-time setup.

use parley_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🗣️  Parley — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // Honour an existing config (and PARLEY_DATA_DIR) when placing the data dir
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let data_dir = config.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        println!("✅ Created data directory: {}", data_dir.display());
    } else {
        println!("  Data directory exists: {}", data_dir.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Review {} (keywords, history window)", config_path.display());
    println!("   2. Run: parley tools --domain check-in");
    println!("   3. Run: parley session --domain check-in\n");

    println!("🎉 Setup complete!\n");

    Ok(())
}
