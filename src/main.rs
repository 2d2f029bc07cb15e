use anyhow::Context;
use clap::{Parser, Subcommand};
use grantbot::config::{default_data_dir, load_config_file};
use grantbot::prelude::*;
use grantbot::present::display_rows;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Recommend government support announcements for a company
#[derive(Parser, Debug)]
#[command(name = "grantbot")]
#[command(about = "Classify and query recommended support announcements")]
#[command(version)]
struct Args {
    /// Directory holding the exported tables (default: $HOME/.grantbot/data, or GRANTBOT_DIR env var)
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<String>,

    /// YAML configuration file (grantbot.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference day as YYYY-MM-DD (default: today)
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List normalized company profiles
    Companies,

    /// Show recommended announcements for a company, best score first
    Recommend {
        /// Company name exactly as stored
        #[arg(long)]
        company: String,

        /// Which announcements to show
        #[arg(long, default_value = "all", value_parser = ["all", "active", "new"])]
        mode: String,

        /// Drop announcements scoring below this
        #[arg(long = "min-score")]
        min_score: Option<f64>,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Emit display rows (renamed columns, rank, placeholders)
        #[arg(long)]
        display: bool,
    },

    /// Monthly announcement counts, or the announcements of one month
    Monthly {
        /// Restrict to one company's recommendations
        #[arg(long)]
        company: Option<String>,

        /// Month to list (1-12); without it, counts for every month are printed
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Notification counts: new, closing soon, high score, this month
    Notify {
        /// Restrict to one company's recommendations
        #[arg(long)]
        company: Option<String>,
    },
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  companies  List normalized company profiles");
    println!("  recommend  Show recommended announcements for a company");
    println!("  monthly    Monthly announcement counts or one month's announcements");
    println!("  notify     Notification counts");
}

/// Log to stderr so stdout stays machine readable; RUST_LOG overrides the level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Flag first, then environment variable, then config file, then default
fn resolve_data_dir(
    flag: Option<String>,
    env: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    match flag.or(env).map(PathBuf::from).or(file) {
        Some(dir) => Ok(dir),
        None => Ok(default_data_dir()?),
    }
}

fn build_config(args: &Args) -> anyhow::Result<ConfigBuilder> {
    let mut file = match &args.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Default::default(),
    };

    // Taken out so apply_file cannot override the resolved directory
    let file_dir = file.data_dir.take();
    let data_dir = resolve_data_dir(
        args.data_dir.clone(),
        std::env::var("GRANTBOT_DIR").ok(),
        file_dir,
    )?;

    let mut builder = ConfigBuilder::new(data_dir).apply_file(file);
    if let Some(today) = &args.today {
        builder = builder.today_str(today)?;
    }
    Ok(builder)
}

fn print_json_lines<T: Serialize>(items: &[T]) -> anyhow::Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

fn run(args: Args, command: Command) -> anyhow::Result<()> {
    let mut builder = build_config(&args)?;
    if let Command::Recommend {
        min_score, limit, ..
    } = &command
    {
        if let Some(min_score) = min_score {
            builder = builder.min_score(*min_score);
        }
        if let Some(limit) = limit {
            builder = builder.limit(*limit);
        }
    }
    let config = builder.build()?;

    let store = JsonStore::open(&config.data_dir)
        .with_context(|| format!("Cannot open data directory {}", config.data_dir.display()))?;
    tracing::debug!(dir = %store.dir().display(), today = %config.today(), "opened store");
    let service = RecommendationService::new(store, config);

    match command {
        Command::Companies => {
            print_json_lines(&service.companies()?)?;
        }
        Command::Recommend {
            company,
            mode,
            display,
            ..
        } => {
            let records = service.ranked_recommendations(&company, QueryMode::from(mode.as_str()))?;
            if records.is_empty() {
                eprintln!("No recommended announcements for '{}'", company);
            }
            if display {
                print_json_lines(&display_rows(&records))?;
            } else {
                print_json_lines(&records)?;
            }
        }
        Command::Monthly { company, month } => match month {
            Some(month) => {
                let records = service.monthly_details(company.as_deref(), month)?;
                print_json_lines(&display_rows(&records))?;
            }
            None => {
                let counts = service.monthly_counts(company.as_deref())?;
                println!("{}", serde_json::to_string(&counts)?);
            }
        },
        Command::Notify { company } => {
            let summary = service.notification_summary(company.as_deref())?;
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = Args::parse();

    match args.command.take() {
        Some(command) => run(args, command),
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
