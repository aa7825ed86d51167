use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::EnvFilter;

use bank_etl::{EtlConfig, EtlPipeline};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional first argument: JSON config file
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => EtlConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => EtlConfig::default(),
    };

    println!("🏦 Bank ETL v{}", bank_etl::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📥 Source: {}", config.source_url);

    let pipeline = EtlPipeline::from_config(config).context("Failed to build pipeline")?;
    let report = pipeline.run_sqlite().context("ETL run failed")?;

    let config = pipeline.config();
    println!("✓ Extracted {} records ({} rows skipped)", report.records.len(), report.skipped_rows);
    println!("✓ CSV written to {}", config.csv_path.display());
    println!(
        "✓ Table {} loaded in {}",
        config.table_name,
        config.db_path.display()
    );

    for output in &report.queries {
        println!();
        print!("{}", output);
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Process complete (log: {})", config.log_path.display());

    Ok(())
}
