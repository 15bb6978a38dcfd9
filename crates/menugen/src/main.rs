//! Menugen CLI.
//!
//! Runs a generation pass against the configured database, or a dry run
//! against in-memory storage to validate a structure file without writing
//! anything.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use menugen::config::{Config, link_attributes_from_env, menu_file_from_env};
use menugen::services::transliterate::AsciiFolding;
use menugen::storage::{
    MemoryMenuLinkStorage, MemoryMenuStorage, PgMenuLinkStorage, PgMenuStorage,
};
use menugen::{GenerationSummary, StructureGenerator, db};

#[derive(Parser)]
#[command(name = "menugen", about = "Generate menus and menu links from a YAML structure file")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a generation pass.
    Generate {
        /// Structure file to read (overrides MENU_FILE).
        #[arg(long)]
        file: Option<PathBuf>,

        /// Walk the structure against in-memory storage; no database writes.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { file, dry_run } => generate(file, dry_run).await,
    }
}

async fn generate(file: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let summary = if dry_run {
        let menu_file = file.unwrap_or_else(menu_file_from_env);
        info!(file = %menu_file.display(), "starting dry run");

        let generator = StructureGenerator::new(
            Arc::new(MemoryMenuStorage::new()),
            Arc::new(MemoryMenuLinkStorage::new()),
            Arc::new(AsciiFolding::new()),
            menu_file,
        )
        .with_link_attributes(link_attributes_from_env());
        generator.generate().await.context("dry run failed")?
    } else {
        let config = Config::from_env().context("failed to load configuration")?;
        let menu_file = file.unwrap_or_else(|| config.menu_file.clone());
        info!(file = %menu_file.display(), "starting menu generation");

        let pool = db::create_pool(&config).await?;
        db::ensure_schema(&pool)
            .await
            .context("failed to prepare menu tables")?;

        let generator = StructureGenerator::new(
            Arc::new(PgMenuStorage::new(pool.clone())),
            Arc::new(PgMenuLinkStorage::new(pool)),
            Arc::new(AsciiFolding::new()),
            menu_file,
        )
        .with_link_attributes(config.link_attributes);
        generator.generate().await.context("generation failed")?
    };

    report(&summary, dry_run);
    Ok(())
}

fn report(summary: &GenerationSummary, dry_run: bool) {
    let mode = if dry_run { "dry run" } else { "generation" };
    println!(
        "{mode} complete: {} menus created, {} reused, {} links created",
        summary.menus_created, summary.menus_reused, summary.links_created
    );
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
