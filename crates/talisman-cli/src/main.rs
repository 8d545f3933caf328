//! Talisman CLI - Command-line interface
//!
//! Usage:
//!   talisman extract --input abstract.txt --title "TP53 review"
//!   cat abstract.txt | talisman extract
//!   talisman halo --seed TP53 --seed p53

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use talisman_core::{resolve_forward_refs, AppConfig, NamedEntity};
use talisman_extractor::{ExtractionPipeline, ProteinGeneLexicon};

#[derive(Parser)]
#[command(name = "talisman")]
#[command(about = "Knowledge extraction over protein/gene interaction text")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (environment variables when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a gene/protein interaction document from text
    Extract {
        /// Input text file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Identifier recorded on the publication
        #[arg(long)]
        id: Option<String>,
        /// Title recorded on the publication
        #[arg(long)]
        title: Option<String>,
    },
    /// Complete seed terms against the built-in vocabulary
    Halo {
        /// Seed term to complete (repeatable)
        #[arg(long, required = true)]
        seed: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    resolve_forward_refs()?;

    match cli.command {
        Commands::Extract { input, id, title } => run_extract(&config, input, id, title),
        Commands::Halo { seed } => run_halo(&seed),
    }
}

fn run_extract(
    config: &AppConfig,
    input: Option<PathBuf>,
    id: Option<String>,
    title: Option<String>,
) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("no input text: pass --input <file> or pipe text on stdin");
    }

    let pipeline = ExtractionPipeline::with_config(&config.extraction);
    let result = pipeline.run(id.as_deref(), title.as_deref(), text)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_halo(seeds: &[String]) -> anyhow::Result<()> {
    let lexicon = ProteinGeneLexicon::new();

    let mut entities: Vec<NamedEntity> = Vec::new();
    for seed in seeds {
        let seed_lower = seed.to_lowercase();
        let mut completions: Vec<_> = lexicon
            .entries()
            .filter(|entry| {
                entry.term.to_lowercase().starts_with(&seed_lower)
                    || entry
                        .aliases
                        .iter()
                        .any(|alias| alias.to_lowercase().starts_with(&seed_lower))
            })
            .collect();
        completions.sort_by(|a, b| a.term.cmp(&b.term));

        for entry in completions {
            if entities.iter().any(|e| e.id() == Some(entry.id.as_str())) {
                continue;
            }
            entities.push(NamedEntity::new(
                entry.kind,
                Some(entry.id.clone()),
                Some(entry.label.clone()),
            )?);
        }
    }

    info!(
        seeds = seeds.len(),
        completions = entities.len(),
        "vocabulary completion finished"
    );
    println!("{}", serde_json::to_string_pretty(&entities)?);
    Ok(())
}
