//! Native desktop runner for the mission galaxy
//!
//! Reads `starmap.toml` and the JSON data files from disk instead of fetching
//! them over HTTP.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use starmap_core::config::load_config;
    use starmap_core::{LayoutMode, MissionId, NavEvent};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "starmap")]
    #[command(about = "Interactive mission galaxy")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "starmap.toml")]
        config: PathBuf,

        /// Directory the data file paths are relative to
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Override the layout (galaxy or globe)
        #[arg(long)]
        layout: Option<String>,

        /// Open this mission once the data has loaded
        #[arg(short, long)]
        mission: Option<String>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Starmap v{}", env!("CARGO_PKG_VERSION"));

        let mut config = load_config(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?;
        match args.layout.as_deref() {
            Some("globe") => config.layout.mode = LayoutMode::Globe,
            Some("galaxy") => config.layout.mode = LayoutMode::Galaxy,
            Some(other) => anyhow::bail!("unknown layout '{}' (expected galaxy or globe)", other),
            None => {}
        }

        info!(layout = ?config.layout.mode, "Configuration loaded");

        let commands = starmap_web::external_commands();
        if let Some(id) = args.mission {
            commands.push(NavEvent::SelectMission(MissionId::new(id)));
        }

        starmap_web::run(config, commands, args.data_dir.display().to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts through the library's wasm_bindgen entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
