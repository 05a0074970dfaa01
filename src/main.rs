//! dictpress-migrate CLI
//!
//! One-shot migration of dictpress data from PostgreSQL to SQLite.

// CLI tool - relax pedantic lints for ergonomics
#![allow(clippy::pedantic)]

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dictpress_migrate::{preflight, Config, Pipeline, SchemaScript};

#[derive(Parser)]
#[command(name = "dictpress-migrate")]
#[command(version)]
#[command(about = "Migrate dictpress data from PostgreSQL to SQLite", long_about = None)]
struct Cli {
    /// Path to the Go dictpress config.toml (its [db] section holds the
    /// PostgreSQL connection parameters)
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Output SQLite database path (must not exist)
    #[arg(long, value_name = "FILE")]
    sqlite_db: PathBuf,

    /// Path to the SQLite schema script (static/sql/schema.sql from the
    /// Rust dictpress repo)
    #[arg(long, value_name = "FILE")]
    sqlite_schema: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // No destination mutation happens before these pass.
    preflight::check(&cli.config, &cli.sqlite_db, &cli.sqlite_schema)?;

    info!("loading configuration from {:?}", cli.config);
    let config = Config::from_file(&cli.config)?;
    let schema = SchemaScript::from_file(&cli.sqlite_schema)?;

    let mut pipeline = Pipeline::new(config, cli.sqlite_db, schema);
    let stats = pipeline.run().await?;

    println!("\nMigration complete");
    println!("   Entries:   {}", stats.entries);
    println!("   Relations: {}", stats.relations);
    println!("   Batches:   {}", stats.batches);
    println!("   Duration:  {:.2}s", stats.duration_secs);

    Ok(())
}
