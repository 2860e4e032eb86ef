use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use spider_log::app::{App, EncounterFilter, SpeciesFilter};
use spider_log::backend::ActiveBackend;
use spider_log::config::ConfigLoader;
use spider_log::domain::{Coordinates, DangerLevel, EncounterId, SpeciesId};
use spider_log::encounter::EncounterDraft;
use spider_log::enrichment::EnrichmentGateway;
use spider_log::error::SpiderLogError;
use spider_log::output::{JsonOutput, OutputMode, TextOutput};
use spider_log::session::EnvSessionProvider;

#[derive(Parser)]
#[command(name = "spider-log")]
#[command(about = "Spider species reference and personal encounter log")]
#[command(version, author)]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Path to a spider-log.json config file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Try to replace the built-in species catalog with live data first.
    #[arg(long, global = true)]
    enrich: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Browse the species catalog")]
    Species(SpeciesArgs),
    #[command(about = "List, log and delete encounters")]
    Encounters(EncountersArgs),
    #[command(about = "Show totals and the most recent encounters")]
    Summary,
}

#[derive(Args)]
struct SpeciesArgs {
    #[command(subcommand)]
    command: SpeciesCommand,
}

#[derive(Subcommand)]
enum SpeciesCommand {
    #[command(about = "List every species")]
    List {
        #[arg(long, value_enum)]
        danger: Option<DangerLevel>,
    },
    #[command(about = "Search names, family, description and habitat")]
    Search {
        query: String,
        #[arg(long, value_enum)]
        danger: Option<DangerLevel>,
    },
    #[command(about = "Show one species and its encounters")]
    Show { id: SpeciesId },
}

#[derive(Args)]
struct EncountersArgs {
    #[command(subcommand)]
    command: EncounterCommand,
}

#[derive(Subcommand)]
enum EncounterCommand {
    #[command(about = "List encounters, newest first")]
    List {
        #[arg(long)]
        species: Option<SpeciesId>,
        #[arg(long)]
        search: Option<String>,
    },
    #[command(about = "Show one encounter")]
    Show { id: String },
    #[command(about = "Log a new encounter")]
    Log(LogArgs),
    #[command(about = "Delete an encounter")]
    Delete { id: String },
}

#[derive(Args)]
struct LogArgs {
    /// Species id from `species list`.
    #[arg(long)]
    spider: SpeciesId,

    #[arg(long)]
    location: String,

    /// Sighting date (YYYY-MM-DD or RFC 3339); defaults to now.
    #[arg(long)]
    date: Option<String>,

    /// Comma separated names.
    #[arg(long, default_value = "")]
    companions: String,

    #[arg(long, default_value = "")]
    notes: String,

    /// "<latitude>,<longitude>"
    #[arg(long)]
    coords: Option<Coordinates>,

    #[arg(long = "photo")]
    photos: Vec<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<SpiderLogError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SpiderLogError) -> u8 {
    match error {
        SpiderLogError::SpeciesNotFound(_)
        | SpiderLogError::EncounterNotFound(_)
        | SpiderLogError::Validation(_)
        | SpiderLogError::InvalidEncounterId(_)
        | SpiderLogError::InvalidCoordinates(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let mut app = App::bootstrap(&config, &EnvSessionProvider);
    if cli.enrich {
        let gateway = EnrichmentGateway::from_config(&config.enrichment);
        app.enrich(&gateway);
    }

    match cli.command {
        Commands::Species(args) => run_species(&app, args.command, mode),
        Commands::Encounters(args) => run_encounters(&app, args.command, mode),
        Commands::Summary => {
            let summary = app.summary();
            emit(mode, &summary, TextOutput::summary)
        }
    }
}

fn run_species(
    app: &App<ActiveBackend>,
    command: SpeciesCommand,
    mode: OutputMode,
) -> miette::Result<()> {
    match command {
        SpeciesCommand::List { danger } => {
            let result = app.list_species(&SpeciesFilter {
                query: None,
                danger,
            });
            emit(mode, &result, TextOutput::species_list)
        }
        SpeciesCommand::Search { query, danger } => {
            let result = app.list_species(&SpeciesFilter {
                query: Some(query),
                danger,
            });
            emit(mode, &result, TextOutput::species_list)
        }
        SpeciesCommand::Show { id } => {
            let detail = app
                .species_detail(id)
                .ok_or(SpiderLogError::SpeciesNotFound(id))?;
            emit(mode, &detail, TextOutput::species_detail)
        }
    }
}

fn run_encounters(
    app: &App<ActiveBackend>,
    command: EncounterCommand,
    mode: OutputMode,
) -> miette::Result<()> {
    match command {
        EncounterCommand::List { species, search } => {
            let result = app.list_encounters(&EncounterFilter {
                species,
                query: search,
            });
            emit(mode, &result, TextOutput::encounter_list)
        }
        EncounterCommand::Show { id } => {
            let id: EncounterId = id.parse()?;
            let detail = app
                .encounter_detail(&id)
                .ok_or_else(|| SpiderLogError::EncounterNotFound(id.to_string()))?;
            emit(mode, &detail, TextOutput::encounter_detail)
        }
        EncounterCommand::Log(args) => {
            let draft = EncounterDraft {
                id: None,
                spider_id: Some(args.spider),
                date: args.date.as_deref().map(parse_date).transpose()?,
                location: args.location,
                coordinates: args.coords,
                companions: args.companions,
                notes: args.notes,
                photos: (!args.photos.is_empty()).then_some(args.photos),
            };
            let result = app.log_encounter(draft)?;
            emit(mode, &result, TextOutput::logged)
        }
        EncounterCommand::Delete { id } => {
            let id: EncounterId = id.parse()?;
            let result = app.delete_encounter(&id);
            emit(mode, &result, TextOutput::deleted)
        }
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, SpiderLogError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SpiderLogError::Validation(format!("invalid date: {value}")))
}

fn emit<T: serde::Serialize>(
    mode: OutputMode,
    value: &T,
    render: fn(&T) -> String,
) -> miette::Result<()> {
    match mode {
        OutputMode::Json => JsonOutput::print(value).into_diagnostic(),
        OutputMode::Human => {
            print!("{}", render(value));
            Ok(())
        }
    }
}
