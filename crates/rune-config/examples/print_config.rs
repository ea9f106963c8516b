/// Print the configuration the navigator would start with
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // rune.toml in the current directory, then RUNE_* overrides
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Navigation Configuration ===\n");

    println!("Navigation:");
    println!("  Transition: {}", config.navigation.transition.as_str());
    println!(
        "  Transition Duration: {} ms",
        config.navigation.transition_duration_ms
    );
    println!("  Precache: {}", config.navigation.precache);
    println!("  Cache By Default: {}", config.navigation.cache_by_default);
    println!();

    println!("Logging:");
    println!("  Filter: {}", config.logging.filter);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
