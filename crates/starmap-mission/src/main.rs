//! starmap-mission - add, check and list entries in the mission data files

mod store;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use store::{add_mission, group_by_type, validate, DataFiles, NewMission};

#[derive(Parser, Debug)]
#[command(name = "starmap-mission")]
#[command(about = "Manage Starmap mission data files")]
#[command(version)]
struct Args {
    /// Directory holding missions.json and mission_types.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a new mission
    Add {
        /// Unique mission id (e.g. project-omega)
        #[arg(long)]
        id: String,
        /// Mission type id
        #[arg(long = "type")]
        mission_type: String,
        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
        /// Briefing title (defaults to the name)
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// URL or path opened by the action button
        #[arg(long)]
        link: Option<String>,
        /// Action button label
        #[arg(long)]
        link_text: Option<String>,
        /// Latitude in degrees; omit both coordinates for random placement
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Print the entry without writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Check both files for duplicate ids, unknown types and bad coordinates
    Validate,
    /// Print missions grouped by type
    List,
}

fn main() -> Result<()> {
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
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let files = DataFiles::in_dir(&args.data_dir);

    match args.command {
        Command::Add {
            id,
            mission_type,
            name,
            title,
            description,
            link,
            link_text,
            lat,
            lon,
            dry_run,
        } => {
            let new = NewMission {
                id,
                mission_type,
                name,
                title,
                description,
                link,
                link_text,
                lat,
                lon,
            };
            let mut rng = rand::thread_rng();
            if dry_run {
                let mission = new.build(&mut rng)?;
                println!("{}", serde_json::to_string_pretty(&mission)?);
                return Ok(());
            }
            let mission = add_mission(&files, new, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&mission)?);
            println!();
            println!(
                "[SUCCESS] Mission '{}' deployed to {}",
                mission.name,
                files.missions.display()
            );
        }
        Command::Validate => {
            let types = files.load_types()?;
            let missions = files.load_missions()?;
            let problems = validate(&missions, &types);
            if !problems.is_empty() {
                for problem in &problems {
                    eprintln!("  {}", problem);
                }
                bail!("{} problem(s) found", problems.len());
            }
            println!(
                "OK: {} missions across {} types",
                missions.len(),
                types.len()
            );
        }
        Command::List => {
            let types = files.load_types()?;
            let missions = files.load_missions()?;
            for (group, members) in group_by_type(&missions, &types) {
                println!("{} ({})", group.to_uppercase(), members.len());
                for mission in members {
                    println!(
                        "  {:<24} {:<32} {:>8.2} {:>9.2}",
                        mission.id.as_str(),
                        mission.name,
                        mission.lat,
                        mission.lon
                    );
                }
            }
        }
    }

    Ok(())
}
