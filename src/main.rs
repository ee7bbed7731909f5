//! float-text-loading - segmented loading bar with a floating progress label
//!
//! Runs the widget in a terminal (drag across it or use the arrow keys to
//! scrub), or dumps its geometry for a given surface size.

mod color;
mod config;
mod core;
mod frontend;
mod widgets;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(ClapParser)]
#[command(name = "float-text-loading")]
#[command(about = "Segmented loading bar with a floating progress label", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.float-text-loading)
    /// Can also be set via FTL_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Initial progress (overrides config)
    #[arg(short, long)]
    progress: Option<i32>,

    /// Initial max (overrides config)
    #[arg(short, long)]
    max: Option<i32>,

    /// Log file path
    #[arg(long, value_name = "FILE", default_value = "float-text-loading.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the configuration against a surface size
    ValidateConfig {
        /// Surface width in cells
        #[arg(long, default_value_t = 80)]
        width: u16,
        /// Surface height in cells
        #[arg(long, default_value_t = 6)]
        height: u16,
    },
    /// Print the computed geometry as JSON
    Geometry {
        /// Surface width in cells
        #[arg(long, default_value_t = 80)]
        width: u16,
        /// Surface height in cells
        #[arg(long, default_value_t = 6)]
        height: u16,
        /// Also print the draw calls the renderer issues
        #[arg(long)]
        ops: bool,
    },
}

fn init_logging(path: &Path) -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };
    config.apply_overrides(cli.progress, cli.max);

    match cli.command {
        Some(Commands::ValidateConfig { width, height }) => validate_config(&config, width, height),
        Some(Commands::Geometry { width, height, ops }) => {
            print_geometry(config, width, height, ops)
        }
        None => run_tui(config),
    }
}

fn validate_config(config: &config::Config, width: u16, height: u16) -> Result<()> {
    let mut widget = widgets::FloatTextLoading::new(&config.widget, config.style.clone());
    widget.measure(f32::from(width), f32::from(height));

    let mut errors = 0;
    let mut warnings = 0;

    if let Some(issue) = &widget.surface().issue {
        eprintln!("✗ Error: {}", issue);
        errors += 1;
    }
    if !config.style.text_format.has_placeholder() {
        eprintln!(
            "⚠ Warning: text_format '{}' has no %s placeholder",
            config.style.text_format
        );
        warnings += 1;
    }
    let style = &config.style;
    let needed =
        style.track_height + style.marker.bottom + style.marker.height + style.text_bottom + 1.0;
    if needed > f32::from(height) {
        eprintln!(
            "⚠ Warning: label and marker need {} rows but the surface has {}",
            needed, height
        );
        warnings += 1;
    }

    if errors == 0 && warnings == 0 {
        println!(
            "✓ Config is valid: {} items of width {} (track {}) at {}x{}",
            config.widget.item_count,
            widget.surface().item_width,
            widget
                .surface()
                .track_width(config.widget.item_count, widget.state().item_spacing()),
            width,
            height
        );
    } else if warnings > 0 {
        println!("⚠ Found {} warning(s)", warnings);
    }

    if errors > 0 {
        eprintln!("\n✗ Found {} error(s)", errors);
        std::process::exit(1);
    }
    Ok(())
}

fn print_geometry(config: config::Config, width: u16, height: u16, ops: bool) -> Result<()> {
    use frontend::tui::CellMetrics;
    use widgets::DisplayList;

    let mut widget = widgets::FloatTextLoading::new(&config.widget, config.style);
    widget.measure(f32::from(width), f32::from(height));
    let frame = widget.frame_geometry(&CellMetrics);

    let mut output = serde_json::json!({
        "progress": widget.progress(),
        "max": widget.max(),
        "surface": widget.surface(),
        "filled_width": frame.fill.filled_width(),
        "frame": frame,
    });
    if ops {
        let mut list = DisplayList::new(CellMetrics);
        widget.draw(&mut list);
        output["ops"] =
            serde_json::to_value(list.into_ops()).context("Failed to serialize draw ops")?;
    }

    let text = serde_json::to_string_pretty(&output).context("Failed to serialize geometry")?;
    println!("{}", text);
    Ok(())
}

/// Run TUI frontend
fn run_tui(config: config::Config) -> Result<()> {
    use crate::core::AppCore;
    use frontend::{Frontend, TuiFrontend};

    let poll_timeout = Duration::from_millis(config.ui.poll_timeout_ms);
    let mut app = AppCore::new(config);
    let mut frontend = TuiFrontend::new(poll_timeout)?;

    let (width, height) = frontend.size();
    app.resize(width, height);

    while app.running {
        if app.take_render_request() {
            frontend.render(&mut app)?;
        }
        for event in frontend.poll_events()? {
            app.handle_event(event);
        }
    }

    tracing::info!(progress = app.widget.progress(), "Exiting");
    frontend.cleanup()?;
    Ok(())
}
