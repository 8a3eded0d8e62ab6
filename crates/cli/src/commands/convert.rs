//! `simscene convert` — Convert source databases into one scenario document.

use simscene_config::AppConfig;
use simscene_pipeline::BatchReport;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line overrides for the configured batch.
#[derive(Debug, Default)]
pub struct ConvertArgs {
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub report: Option<PathBuf>,
}

/// Apply command-line overrides on top of file and environment settings.
fn apply_args(config: &mut AppConfig, args: &ConvertArgs) {
    if let Some(dir) = &args.input_dir {
        config.input.dir = dir.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(jobs) = args.jobs {
        config.batch.max_concurrent_files = jobs;
    }
}

pub async fn run(config_path: Option<&Path>, args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    apply_args(&mut config, &args);
    config.validate()?;

    println!("🔄 Converting trajectories");
    println!("   Input:   {}", config.input.dir.display());
    println!("   Output:  {}", config.output.path.display());
    println!("   Type:    {}", config.schema.accepted_type);

    let source = Arc::new(super::sqlite_source(&config));
    let outcome = simscene_pipeline::convert(&config, source).await?;

    print_summary(&outcome.report, outcome.document.len());

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&outcome.report)?;
        std::fs::write(report_path, json)?;
        println!("   📝 Report written to {}", report_path.display());
    }

    Ok(())
}

fn print_summary(report: &BatchReport, agents: usize) {
    println!();
    println!("   Files found:      {}", report.files_discovered);
    println!("   Files converted:  {}", report.converted.len());
    if !report.empty_sources.is_empty() {
        println!("   Without tracks:   {}", report.empty_sources.len());
    }
    if report.collisions > 0 {
        println!("   ⚠️  Replaced ids:  {}", report.collisions);
    }

    if !report.failures.is_empty() {
        println!("   ❌ Failed:         {}", report.failures.len());
        for failure in &report.failures {
            let id = failure
                .file_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".into());
            println!("      [{id}] {}: {}", failure.path.display(), failure.error);
        }
    }

    println!();
    println!("   ✅ {agents} agents written in {} ms", report.elapsed_ms);
}
