//! Logging system configuration and initialization
//!
//! - Console output goes to stderr so stdout stays clean for JSON results
//! - Optional file output through a non-blocking `tracing-appender` writer
//! - `RUST_LOG` overrides the configured level and module filters
//! - Local-time timestamps formatted with chrono

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Subscriber, debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::Directive,
    fmt::{self, time::FormatTime},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::ConfigManager;

// Keeps the file writer alive for the lifetime of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Local time with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Human-readable console layer on stderr
fn stderr_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_timer(LocalTimeFormatter)
        .with_target(false)
}

/// Directory the log file is written to
pub fn get_log_directory(config: &LoggingConfig) -> Result<PathBuf> {
    match &config.log_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(ConfigManager::get_app_data_dir()?.join("logs")),
    }
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
/// plus one directive per module filter.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;
    if !config.level.to_lowercase().contains("trace") {
        for (module, level) in &config.module_filters {
            filter = filter.add_directive(
                format!("{module}={level}")
                    .parse::<Directive>()
                    .with_context(|| format!("Invalid module filter {module}={level}"))?,
            );
        }
    }
    Ok(filter)
}

/// Rename the previous log file with its modification timestamp
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<()> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(());
    }

    let modified = std::fs::metadata(&log_file_path)
        .and_then(|m| m.modified())
        .context("Failed to read log file metadata")?;
    let stamp: chrono::DateTime<Local> = modified.into();
    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated = log_dir.join(format!("{}.{}.log", file_stem, stamp.format("%Y%m%dT%H%M%S")));

    std::fs::rename(&log_file_path, &rotated).with_context(|| {
        format!(
            "Failed to rotate log file {} to {}",
            log_file_path.display(),
            rotated.display()
        )
    })?;
    Ok(())
}

/// Delete rotated log files beyond `max_files`, newest kept
fn cleanup_old_logs(log_dir: &Path, config: &LoggingConfig) -> Result<usize> {
    let file_stem = config.log_file_name.trim_end_matches(".log");
    let mut rotated = Vec::new();

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_rotated = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&format!("{file_stem}.")) && n.ends_with(".log"));
        if is_rotated {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                rotated.push((path, modified));
            }
        }
    }

    rotated.sort_by(|a, b| b.1.cmp(&a.1));
    let mut removed = 0;
    for (path, _) in rotated.iter().skip(config.max_files) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove old log file {:?}: {}", path, e);
        } else {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Initialize logging with custom configuration
///
/// ```bash
/// # Show scraper internals as well
/// RUST_LOG="debug,html5ever=debug" neo-page-data page.html --url https://blog.example.com/
/// ```
pub fn init_logging_with_config(config: LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(&config)?;
    let registry = Registry::default().with(env_filter);

    let file_writer = if config.file_output {
        let log_dir = get_log_directory(&config)?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {log_dir:?}"))?;
        rotate_existing_log_file(&log_dir, &config.log_file_name)?;
        cleanup_old_logs(&log_dir, &config)?;

        let (writer, guard) = non_blocking(rolling::never(&log_dir, &config.log_file_name));
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(guard);
        Some(writer)
    } else {
        None
    };

    // Handle different combinations of output types
    let result = match (file_writer, config.console_output) {
        (Some(file_writer), console) => {
            if config.json_format {
                let file_layer = fmt::Layer::new()
                    .json()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false);
                registry
                    .with(file_layer)
                    .with(console.then(stderr_layer))
                    .try_init()
            } else {
                let file_layer = fmt::Layer::new()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(false)
                    .with_ansi(false);
                registry
                    .with(file_layer)
                    .with(console.then(stderr_layer))
                    .try_init()
            }
        }
        (None, true) => {
            if config.json_format {
                let console_layer = fmt::Layer::new()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_timer(LocalTimeFormatter);
                registry.with(console_layer).try_init()
            } else {
                registry.with(stderr_layer()).try_init()
            }
        }
        (None, false) => return Err(anyhow!("No logging output configured")),
    };
    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    info!("Logging system initialized");
    debug!("Log level: {}", config.level);
    debug!("JSON format: {}", config.json_format);
    debug!("Console output: {}", config.console_output);
    debug!("File output: {}", config.file_output);
    Ok(())
}
