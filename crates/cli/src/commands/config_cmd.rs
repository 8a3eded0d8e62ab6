//! `simscene config` — Configuration management commands.

use simscene_config::AppConfig;
use std::path::{Path, PathBuf};

fn config_file(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path)
}

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.input.files.is_empty() && !config.input.dir.is_dir() {
                warnings.push(format!(
                    "Input directory {} does not exist",
                    config.input.dir.display()
                ));
            }

            for file in &config.input.files {
                let resolved = if file.is_absolute() {
                    file.clone()
                } else {
                    config.input.dir.join(file)
                };
                if !resolved.is_file() {
                    warnings.push(format!("Listed source {} not found", resolved.display()));
                }
            }

            if config.output.path.is_dir() {
                warnings.push("Output path is a directory".into());
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Input:        {}", config.input.dir.display());
            println!("   Explicit:     {} files", config.input.files.len());
            println!("   Output:       {}", config.output.path.display());
            println!("   Type:         {}", config.schema.accepted_type);
            println!(
                "   Trajectories: {}",
                config
                    .schema
                    .trajectory_table
                    .as_deref()
                    .unwrap_or(config.schema.trajectory_table_pattern.as_str())
            );
            println!("   Concurrency:  {}", config.batch.max_concurrent_files);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_file(config_path).display());
    Ok(())
}

pub async fn init(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_file(config_path);
    if path.exists() && !force {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or re-run with --force.");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Created {}", path.display());
    Ok(())
}
