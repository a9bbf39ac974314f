//! Show or change the application configuration.

use std::path::PathBuf;

use tilebake_common::config::{config_file_path, AppConfig};

pub fn run(
    mut config: AppConfig,
    output_base_dir: Option<PathBuf>,
    output_subdir: Option<String>,
) -> anyhow::Result<()> {
    let path = config_file_path();

    let changed = config
        .set_output_location(output_base_dir, output_subdir)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    if changed {
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config to {}: {e}", path.display()))?;
        println!("Configuration saved: {}", path.display());
    } else {
        println!("Configuration: {}", path.display());
    }

    match &config.output_base_dir {
        Some(dir) => println!("  Output base dir: {}", dir.display()),
        None => println!("  Output base dir: (next to each tilemap)"),
    }
    println!("  Output subdir: {}", config.output_subdir);
    println!("  Log level: {}", config.logging.level);
    println!("  JSON logs: {}", config.logging.json);

    Ok(())
}
