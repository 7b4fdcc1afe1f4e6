use crate::aggregate::{write_parquet, HttpTableSource};
use crate::call::build_client;
use crate::config::AppConfig;
use crate::github::GithubRepository;
use crate::load_config::load_config;
use crate::pipeline::run_pipeline;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// CLI for nfl-pbp: download seasonal play-by-play files and stack them.
///
/// With no arguments it loads 2010-2020 from `guga31bb/nflfastR-data` on
/// `master` and keeps the result in memory.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "nfl-pbp",
    version,
    about = "Download nflfastR play-by-play parquet files from GitHub and concatenate them"
)]
pub struct Cli {
    /// Path to a YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// First season to load
    #[clap(long)]
    pub start_year: Option<i32>,

    /// Last season to load (inclusive)
    #[clap(long)]
    pub end_year: Option<i32>,

    /// Repository branch to read from
    #[clap(long)]
    pub branch: Option<String>,

    /// Suffix chain files must carry, one flag per suffix (e.g. --extension .csv --extension .gz)
    #[clap(long = "extension")]
    pub extensions: Vec<String>,

    /// Write the aggregated table to this parquet file
    #[clap(long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Config file (or defaults) with command line overrides applied.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };
        if let Some(start_year) = self.start_year {
            config.run.start_year = start_year;
        }
        if let Some(end_year) = self.end_year {
            config.run.end_year = end_year;
        }
        if let Some(branch) = &self.branch {
            config.run.branch = branch.clone();
        }
        if !self.extensions.is_empty() {
            config.run.file_extensions = self.extensions.clone();
        }
        if self.output.is_some() {
            config.output = self.output.clone();
        }
        if config.run.start_year > config.run.end_year {
            anyhow::bail!(
                "start year {} is after end year {}",
                config.run.start_year,
                config.run.end_year
            );
        }
        Ok(config)
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let client = build_client().context("Failed to build HTTP client")?;
    let repository = GithubRepository::new(client.clone(), config.repository.clone());
    let tables = HttpTableSource::new(client);

    let outcome = run_pipeline(&repository, &tables, &config.run)
        .await
        .context("Play-by-play download failed")?;

    if let Some(path) = &config.output {
        write_parquet(&outcome.table, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Download complete.\nReport:");
    println!("{:#?}", outcome.report);
    Ok(())
}
