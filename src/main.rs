use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use neo_page_data::infrastructure::{ConfigManager, init_logging_with_config};
use neo_page_data::{PageDataService, PageDocument, ReadyState};

#[derive(Parser, Debug)]
#[command(
    name = "neo-page-data",
    version,
    about = "Extract the page data model from a rendered neo-data-provider blog page"
)]
struct Cli {
    /// Rendered HTML file, or `-` for stdin
    input: PathBuf,

    /// URL the page was served at
    #[arg(long, env = "NEO_PAGE_DATA_URL")]
    url: String,

    /// TOML configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the document as still loading
    #[arg(long, default_value_t = false)]
    loading: bool,

    /// Pretty-print the JSON result
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read HTML from stdin")?;
        Ok(html)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read HTML from {}", input.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging_with_config(config.logging.clone())?;
    debug!("Configuration path: {:?}", manager.config_path());

    let html = read_input(&cli.input)?;
    let mut document = PageDocument::parse(&html, &cli.url);
    if cli.loading {
        document = document.with_ready_state(ReadyState::Loading);
    }

    let service = PageDataService::new(document, &config.parsing)?;
    let result = service.page_data();

    let json = if cli.pretty {
        serde_json::to_string_pretty(&*result)?
    } else {
        serde_json::to_string(&*result)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
