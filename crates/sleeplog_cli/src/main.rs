//! `sleeplog` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto the respondent and sleep record services.
//! - Print results as JSON on stdout, errors on stderr.
//!
//! # Invariants
//! - Configuration comes from `SLEEPLOG_*` variables; `--db` overrides the
//!   database path only.
//! - File logging starts only when a log directory is configured.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::error;
use serde::Serialize;
use sleeplog_core::{
    export_respondents, export_sleep_records, init_logging, AppConfig, AppContext,
    NewRespondent, RangeFilter, RespondentId, RespondentPatch, SleepMeasurements,
    SleepRecordId, SleepRecordPatch, SleepRecordQuery,
};
use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(
    name = "sleeplog",
    about = "Manage survey respondents and their sleep records",
    version
)]
struct Cli {
    /// SQLite database file. Falls back to `SLEEPLOG_DB_PATH`.
    #[arg(long, global = true, value_name = "path")]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Survey participants.
    #[command(subcommand)]
    Respondents(RespondentCommand),
    /// Nightly sleep records.
    #[command(subcommand)]
    Records(RecordCommand),
    /// Write query results to a CSV file.
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Debug, Subcommand)]
enum RespondentCommand {
    List,
    /// Case-insensitive last-name prefix search.
    Find { prefix: String },
    Get { id: RespondentId },
    Add(RespondentArgs),
    Update {
        id: RespondentId,
        #[command(flatten)]
        fields: RespondentPatchArgs,
    },
    Delete { id: RespondentId },
}

#[derive(Debug, Args)]
struct RespondentArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    gender: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long)]
    age: i32,
}

#[derive(Debug, Args)]
struct RespondentPatchArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    age: Option<i32>,
}

#[derive(Debug, Subcommand)]
enum RecordCommand {
    List,
    Get {
        id: SleepRecordId,
    },
    Add {
        #[arg(long)]
        person_id: RespondentId,
        /// Record date; defaults to today.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        #[command(flatten)]
        measurements: MeasurementArgs,
    },
    Update {
        id: SleepRecordId,
        #[command(flatten)]
        fields: RecordPatchArgs,
    },
    Delete {
        id: SleepRecordId,
    },
    /// Range search; every bound is `MIN..MAX`, `MIN..` or `..MAX`.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
struct MeasurementArgs {
    #[arg(long)]
    sleep_start_time: f64,
    #[arg(long)]
    sleep_end_time: f64,
    #[arg(long)]
    total_sleep_hours: f64,
    #[arg(long)]
    sleep_quality: i32,
    #[arg(long)]
    exercise_minutes: i32,
    #[arg(long)]
    caffeine_intake_mg: i32,
    #[arg(long)]
    screen_time: i32,
    #[arg(long)]
    work_hours: f64,
    #[arg(long)]
    productivity_score: i32,
    #[arg(long)]
    mood_score: i32,
    #[arg(long)]
    stress_level: i32,
}

#[derive(Debug, Args)]
struct RecordPatchArgs {
    #[arg(long)]
    person_id: Option<RespondentId>,
    #[arg(long)]
    sleep_start_time: Option<f64>,
    #[arg(long)]
    sleep_end_time: Option<f64>,
    #[arg(long)]
    total_sleep_hours: Option<f64>,
    #[arg(long)]
    sleep_quality: Option<i32>,
    #[arg(long)]
    exercise_minutes: Option<i32>,
    #[arg(long)]
    caffeine_intake_mg: Option<i32>,
    #[arg(long)]
    screen_time: Option<i32>,
    #[arg(long)]
    work_hours: Option<f64>,
    #[arg(long)]
    productivity_score: Option<i32>,
    #[arg(long)]
    mood_score: Option<i32>,
    #[arg(long)]
    stress_level: Option<i32>,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long)]
    person_id: Option<RespondentId>,
    #[arg(long, value_name = "range", value_parser = parse_range::<f64>)]
    sleep_start_time: Option<RangeFilter<f64>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<f64>)]
    sleep_end_time: Option<RangeFilter<f64>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<f64>)]
    total_sleep_hours: Option<RangeFilter<f64>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    sleep_quality: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    exercise_minutes: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    caffeine_intake_mg: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    screen_time: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<f64>)]
    work_hours: Option<RangeFilter<f64>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    productivity_score: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    mood_score: Option<RangeFilter<i32>>,
    #[arg(long, value_name = "range", value_parser = parse_range::<i32>)]
    stress_level: Option<RangeFilter<i32>>,
}

#[derive(Debug, Subcommand)]
enum ExportCommand {
    /// Export sleep records matching the given bounds.
    Records {
        #[arg(long, value_name = "path")]
        out: PathBuf,
        #[command(flatten)]
        filter: SearchArgs,
    },
    /// Export respondents, optionally narrowed by last-name prefix.
    Respondents {
        #[arg(long, value_name = "path")]
        out: PathBuf,
        #[arg(long)]
        last_name: Option<String>,
    },
}

impl From<RespondentArgs> for NewRespondent {
    fn from(args: RespondentArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            gender: args.gender,
            country: args.country,
            age: args.age,
        }
    }
}

impl From<RespondentPatchArgs> for RespondentPatch {
    fn from(args: RespondentPatchArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            gender: args.gender,
            country: args.country,
            age: args.age,
        }
    }
}

impl From<MeasurementArgs> for SleepMeasurements {
    fn from(args: MeasurementArgs) -> Self {
        Self {
            sleep_start_time: args.sleep_start_time,
            sleep_end_time: args.sleep_end_time,
            total_sleep_hours: args.total_sleep_hours,
            sleep_quality: args.sleep_quality,
            exercise_minutes: args.exercise_minutes,
            caffeine_intake_mg: args.caffeine_intake_mg,
            screen_time: args.screen_time,
            work_hours: args.work_hours,
            productivity_score: args.productivity_score,
            mood_score: args.mood_score,
            stress_level: args.stress_level,
        }
    }
}

impl From<RecordPatchArgs> for SleepRecordPatch {
    fn from(args: RecordPatchArgs) -> Self {
        Self {
            person_id: args.person_id,
            sleep_start_time: args.sleep_start_time,
            sleep_end_time: args.sleep_end_time,
            total_sleep_hours: args.total_sleep_hours,
            sleep_quality: args.sleep_quality,
            exercise_minutes: args.exercise_minutes,
            caffeine_intake_mg: args.caffeine_intake_mg,
            screen_time: args.screen_time,
            work_hours: args.work_hours,
            productivity_score: args.productivity_score,
            mood_score: args.mood_score,
            stress_level: args.stress_level,
        }
    }
}

impl From<SearchArgs> for SleepRecordQuery {
    fn from(args: SearchArgs) -> Self {
        Self {
            respondent_id: args.person_id,
            sleep_start_time: args.sleep_start_time.unwrap_or_default(),
            sleep_end_time: args.sleep_end_time.unwrap_or_default(),
            total_sleep_hours: args.total_sleep_hours.unwrap_or_default(),
            sleep_quality: args.sleep_quality.unwrap_or_default(),
            exercise_minutes: args.exercise_minutes.unwrap_or_default(),
            caffeine_intake_mg: args.caffeine_intake_mg.unwrap_or_default(),
            screen_time: args.screen_time.unwrap_or_default(),
            work_hours: args.work_hours.unwrap_or_default(),
            productivity_score: args.productivity_score.unwrap_or_default(),
            mood_score: args.mood_score.unwrap_or_default(),
            stress_level: args.stress_level.unwrap_or_default(),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let app = AppContext::open(&config)?;
    match cli.command {
        Command::Respondents(command) => run_respondents(&app, command),
        Command::Records(command) => run_records(&app, command),
        Command::Export(command) => run_export(&app, command),
    }
}

fn run_respondents(app: &AppContext, command: RespondentCommand) -> CliResult<()> {
    let service = app.respondent_service();
    match command {
        RespondentCommand::List => print_json(&service.list()?),
        RespondentCommand::Find { prefix } => print_json(&service.search_by_last_name(&prefix)?),
        RespondentCommand::Get { id } => print_json(&service.get_by_id(id)?),
        RespondentCommand::Add(args) => print_json(&service.add(&args.into())?),
        RespondentCommand::Update { id, fields } => {
            let patch = RespondentPatch::from(fields);
            if patch.is_empty() {
                return Err("update needs at least one field flag".into());
            }
            print_json(&service.update(id, &patch)?)
        }
        RespondentCommand::Delete { id } => {
            service.delete_by_id(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

fn run_records(app: &AppContext, command: RecordCommand) -> CliResult<()> {
    let service = app.sleep_record_service();
    match command {
        RecordCommand::List => print_json(&service.list()?),
        RecordCommand::Get { id } => print_json(&service.get_by_id(id)?),
        RecordCommand::Add {
            person_id,
            date,
            measurements,
        } => {
            let record = match date {
                Some(date) => service.add_on(person_id, date, measurements.into())?,
                None => service.add(person_id, measurements.into())?,
            };
            print_json(&record)
        }
        RecordCommand::Update { id, fields } => {
            let patch = SleepRecordPatch::from(fields);
            if patch.is_empty() {
                return Err("update needs at least one field flag".into());
            }
            print_json(&service.update(id, &patch)?)
        }
        RecordCommand::Delete { id } => {
            service.remove_by_id(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        RecordCommand::Search(args) => print_json(&service.search(&args.into())?),
    }
}

fn run_export(app: &AppContext, command: ExportCommand) -> CliResult<()> {
    let (table, rows, out) = match command {
        ExportCommand::Records { out, filter } => {
            let records = app.sleep_record_service().search(&filter.into())?;
            ("sleep_data", export_sleep_records(&out, &records)?, out)
        }
        ExportCommand::Respondents { out, last_name } => {
            let service = app.respondent_service();
            let respondents = match last_name {
                Some(prefix) => service.search_by_last_name(&prefix)?,
                None => service.list()?,
            };
            ("respondents", export_respondents(&out, &respondents)?, out)
        }
    };
    print_json(&serde_json::json!({
        "table": table,
        "rows": rows,
        "path": out.display().to_string(),
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses `MIN..MAX`, `MIN..` or `..MAX` into an inclusive range bound.
fn parse_range<T>(raw: &str) -> Result<RangeFilter<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    let (min, max) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, MIN.. or ..MAX, got `{raw}`"))?;
    let parse_side = |side: &str| -> Result<Option<T>, String> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(None);
        }
        side.parse()
            .map(Some)
            .map_err(|err| format!("invalid bound `{side}`: {err}"))
    };
    Ok(RangeFilter {
        min: parse_side(min)?,
        max: parse_side(max)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_range, Cli};
    use clap::CommandFactory;
    use sleeplog_core::RangeFilter;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_range_accepts_open_and_closed_bounds() {
        assert_eq!(parse_range::<i32>("3..9").unwrap(), RangeFilter::between(3, 9));
        assert_eq!(parse_range::<f64>("6.5..").unwrap(), RangeFilter::at_least(6.5));
        assert_eq!(parse_range::<i32>("..0").unwrap(), RangeFilter::at_most(0));
        assert_eq!(parse_range::<i32>("..").unwrap(), RangeFilter::any());
    }

    #[test]
    fn parse_range_rejects_malformed_input() {
        assert!(parse_range::<i32>("5").is_err());
        assert!(parse_range::<i32>("a..3").is_err());
        assert!(parse_range::<i32>("1..2.5").is_err());
    }
}
