use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use temporal_amount::{
    DateTimeProvider, DurationParser, Elapsed, PeriodParser, TemporalAmount,
    TemporalAmountParser, TimeUnit, UnitTable,
};
use tracing_subscriber::EnvFilter;

/// Parse, normalize and format compact duration expressions like "1d2h30m".
#[derive(Debug, Parser)]
#[command(name = "tamount", author, version, about, long_about = None, rename_all = "kebab-case")]
struct Opts {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
#[command(rename_all = "kebab-case")]
struct GlobalOpts {
    /// Treat amounts as calendar periods (days, weeks, months, years).
    #[arg(long, global = true)]
    calendar: bool,

    /// Built-in unit table, ignored when --config is given.
    #[arg(long, global = true, value_enum)]
    preset: Option<Preset>,

    /// JSON unit table to use instead of a preset.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reference date-time for calendar periods (e.g. 2026-01-31 or
    /// 2026-01-31T12:00:00). Defaults to the local clock.
    #[arg(long, global = true, value_parser = parse_reference)]
    reference: Option<NaiveDateTime>,

    /// Leave a unit out of formatted output (repeatable).
    #[arg(long = "round-off", global = true, value_name = "UNIT")]
    round_off: Vec<TimeUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// ns us ms s m h d w mo y dec
    DateTime,
    /// ns us ms s m h d
    Time,
    /// d w mo y dec
    Date,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an expression and print it in canonical form.
    Normalize {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// Parse an expression and print its length in nanoseconds.
    Nanos {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// Format a signed nanosecond count.
    Format {
        #[arg(allow_hyphen_values = true)]
        nanos: i128,
    },
    /// Print the active unit table as JSON.
    Units,
}

fn parse_reference(s: &str) -> Result<NaiveDateTime, String> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| {
            s.parse::<NaiveDate>()
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| format!("'{s}' is not a date or date-time: {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match try_main() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<String> {
    let opts = Opts::parse();
    let global = &opts.global;

    if global.calendar {
        let parser = configure(global, |preset| match preset {
            None | Some(Preset::Date) => Ok(PeriodParser::date_units()),
            Some(other) => {
                bail!("preset {other:?} has sub-day units; calendar periods cannot use it")
            }
        })?;
        if let Command::Format { .. } = opts.command {
            bail!(
                "`format` takes a fixed nanosecond count and cannot be combined with --calendar"
            );
        }
        run(&parser, &opts.command)
    } else {
        let parser = configure(global, |preset| {
            Ok(match preset {
                None | Some(Preset::DateTime) => DurationParser::date_time_units(),
                Some(Preset::Time) => DurationParser::time_units(),
                Some(Preset::Date) => {
                    let table = UnitTable::from_parser(&PeriodParser::date_units());
                    table.build::<Elapsed>()?
                }
            })
        })?;
        if let Command::Format { nanos } = opts.command {
            return parser
                .format(&Elapsed::from_nanos(nanos))
                .context("cannot format amount");
        }
        run(&parser, &opts.command)
    }
}

fn configure<T, F>(global: &GlobalOpts, preset: F) -> Result<TemporalAmountParser<T>>
where
    T: TemporalAmount,
    F: FnOnce(Option<Preset>) -> Result<TemporalAmountParser<T>>,
{
    let mut parser = match &global.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read unit table {}", path.display()))?;
            UnitTable::from_json(&json)?
                .build()
                .with_context(|| format!("invalid unit table {}", path.display()))?
        }
        None => preset(global.preset)?,
    };

    for &unit in &global.round_off {
        parser = parser.round_off(unit);
    }
    if let Some(reference) = global.reference {
        parser = parser.with_local_date_time_provider(DateTimeProvider::fixed(reference));
    }

    tracing::debug!(
        units = parser.units().count(),
        rounded = parser.rounded_units().count(),
        "configured parser"
    );
    Ok(parser)
}

fn run<T: TemporalAmount>(parser: &TemporalAmountParser<T>, command: &Command) -> Result<String> {
    match command {
        Command::Normalize { expression } => parser
            .normalize(expression)
            .with_context(|| format!("cannot parse '{expression}'")),
        Command::Nanos { expression } => {
            let amount = parser
                .parse(expression)
                .with_context(|| format!("cannot parse '{expression}'"))?;
            Ok(amount.to_nanos(parser.provider())?.to_string())
        }
        Command::Units => Ok(UnitTable::from_parser(parser).to_json()?),
        Command::Format { .. } => bail!("`format` is only available for elapsed durations"),
    }
}
