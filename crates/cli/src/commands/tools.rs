//! `parley tools`: List a domain's tool catalogue.

use parley_core::domain::Domain;
use parley_log::NoopLog;
use std::sync::Arc;

pub async fn run(domain: Domain) -> Result<(), Box<dyn std::error::Error>> {
    // Listing never saves, so the catalogue is built over a log that discards writes
    let registry = parley_tools::registry_for(domain, Arc::new(NoopLog))
        .map_err(|e| format!("Failed to build {domain} tools: {e}"))?;

    println!("🔧 {domain} tools ({})", registry.len());
    println!("==================");

    for def in registry.definitions() {
        println!("\n  {}", def.name);
        println!("    {}", def.description);

        let properties = def.parameters["properties"].as_object();
        let required: Vec<&str> = def.parameters["required"]
            .as_array()
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        for (arg, schema) in properties.into_iter().flatten() {
            let kind = schema["type"].as_str().unwrap_or("any");
            let marker = if required.contains(&arg.as_str()) { "" } else { " (optional)" };
            println!("    • {arg}: {kind}{marker}");
        }
    }
    println!();

    Ok(())
}
