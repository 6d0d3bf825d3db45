// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use data_review::{Config, SeverityFilter, StatusFilter};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "export" {
        // Export mode
        init_logging_stderr();
        run_export(&config, &args[2..])?;
    } else {
        // UI mode (default)
        run_ui_mode(&config)?;
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "data_review=info".into())
}

fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The dashboard owns the terminal, so logs go to a file next to the exports
#[cfg(feature = "tui")]
fn init_logging_file(config: &Config) -> Result<()> {
    use std::fs::{self, File};
    use std::sync::Mutex;

    fs::create_dir_all(&config.export_dir)
        .with_context(|| format!("Failed to create {:?}", config.export_dir))?;
    let path = config.export_dir.join("data-review.log");
    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run_export(config: &Config, args: &[String]) -> Result<()> {
    let status: StatusFilter = match args.first() {
        Some(s) => s.parse()?,
        None => StatusFilter::All,
    };
    let severity: SeverityFilter = match args.get(1) {
        Some(s) => s.parse()?,
        None => SeverityFilter::All,
    };
    if args.len() > 2 {
        bail!("usage: data-review export [status] [severity]");
    }

    let store = config
        .source
        .load()
        .with_context(|| format!("Failed to load records from {}", config.source))?;

    let export = data_review::export_csv_today(store.records(), status, severity)?;
    let path = export.save_to(&config.export_dir)?;

    println!("✓ Exported {} of {} records", export.row_count, store.len());
    println!("  {}", path.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    init_logging_file(config)?;
    tracing::info!(source = %config.source, "Starting dashboard");

    let loader = data_review::spawn_load(config.source.clone());

    let mut app = ui::App::new(config.export_dir.clone());
    ui::run_ui(&mut app, loader)?;

    tracing::info!("Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or export directly: data-review export [status] [severity]");
    std::process::exit(1);
}
