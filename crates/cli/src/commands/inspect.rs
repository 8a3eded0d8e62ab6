//! `simscene inspect` — Diagnose a single source database.

use simscene_config::AppConfig;
use simscene_core::file_id::FileIdParser;
use simscene_core::source::TrackSource;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🩺 {}", path.display());
    println!("========================================\n");

    let mut issues = 0;

    match FileIdParser::new(&config.input.file_id_pattern)?.parse(path) {
        Ok(id) => println!("  ✅ File id: {id}"),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    let source = super::sqlite_source(&config);
    let summary = source.inspect(path).await?;

    println!("  Tables:           {}", summary.tables.join(", "));
    match &summary.trajectory_table {
        Some(table) => println!("  ✅ Trajectories:  {table}"),
        None => println!("  ⚠️  Trajectories:  (unresolved)"),
    }
    println!(
        "  '{}' tracks:      {}",
        config.schema.accepted_type, summary.accepted_tracks
    );
    println!("  Samples:          {}", summary.accepted_samples);

    for issue in &summary.issues {
        println!("  ❌ {issue}");
        issues += 1;
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 Ready to convert.");
    } else {
        println!("  ⚠️  {issues} issue(s) found. This file would be skipped.");
    }

    Ok(())
}
