use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use urnik_cli::commands::{resolve, timetable};
use urnik_cli::{Cli, Commands, Config, TimetableArgs};
use urnik_core::{ResolvePath, Slug, Timetables};
use urnik_http::HttpFetcher;

/// Load config and build the HTTP fetcher.
fn open_fetcher(config_path: Option<&Path>) -> Result<(HttpFetcher, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let fetcher = HttpFetcher::new(&config.base_url, Duration::from_secs(config.timeout_secs))
        .context("failed to create HTTP client")?;
    Ok((fetcher, config))
}

/// Resolve the school and set up cached timetable access.
fn open_timetables(
    config_path: Option<&Path>,
    args: &TimetableArgs,
) -> Result<Timetables<HttpFetcher>> {
    let (fetcher, config) = open_fetcher(config_path)?;
    let school = args
        .school
        .as_deref()
        .or(config.school.as_deref())
        .context("no school given; pass --school or set `school` in the config file")?;
    let school: ResolvePath = school
        .parse()
        .with_context(|| format!("invalid school {school:?}"))?;
    let school = school.school().clone();

    Timetables::new(fetcher, school.clone(), config.cache_seconds)
        .with_context(|| format!("failed to open timetables for school {school}"))
}

fn run_timetable(
    config_path: Option<&Path>,
    args: &TimetableArgs,
    target: &timetable::Target,
) -> Result<()> {
    let timetables = open_timetables(config_path, args)?;
    let mut stdout = std::io::stdout().lock();
    timetable::run(&mut stdout, &timetables, target, args.week, args.json)?;
    stdout.flush()?;
    Ok(())
}

fn slug(value: &str) -> Result<Slug> {
    Slug::new(value).with_context(|| format!("invalid slug {value:?}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config_path = cli.config.as_deref();
    match &cli.command {
        Some(Commands::School { args }) => {
            run_timetable(config_path, args, &timetable::Target::School)?;
        }
        Some(Commands::Class { slug: class, args }) => {
            run_timetable(config_path, args, &timetable::Target::Class(slug(class)?))?;
        }
        Some(Commands::Classroom {
            slug: classroom,
            args,
        }) => {
            let target = timetable::Target::Classroom(slug(classroom)?);
            run_timetable(config_path, args, &target)?;
        }
        Some(Commands::Resolve { path }) => {
            let (fetcher, _config) = open_fetcher(config_path)?;
            resolve::run(&mut std::io::stdout().lock(), &fetcher, path)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
