//! Timetable CLI.
//!
//! Enumerates every distinct weekly timetable for a directory of subject
//! definitions, or generates a random subject directory to try it on.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_timetable::config::RunConfig;
use u_timetable::generator::{SubjectGenerator, SubjectGeneratorConfig};
use u_timetable::io::{
    format_subject, load_subjects, prepare_output_dir, CalendarTextWriter, JsonWriter,
    PlainTextWriter, PngCalendarWriter,
};
use u_timetable::search::{DedupRegistry, SearchDriver, SearchStrategy};

#[derive(Parser)]
#[command(name = "u-timetable")]
#[command(about = "Enumerate every distinct weekly timetable for a set of subjects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate and write all distinct schedules.
    Run {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of subject definitions
        #[arg(short, long)]
        subjects: Option<PathBuf>,
        /// Directory for rendered schedules
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Search strategy: odometer, walk
        #[arg(long)]
        strategy: Option<SearchStrategy>,
        /// Stop after this many accepted schedules
        #[arg(long)]
        limit: Option<usize>,
        /// Also write one-line-per-cell text files
        #[arg(long)]
        plain: bool,
        /// Also write fixed-width text calendars
        #[arg(long)]
        calendar: bool,
        /// Skip the JSON reports
        #[arg(long)]
        no_json: bool,
        /// Skip the PNG calendars
        #[arg(long)]
        no_png: bool,
        /// Keep old files in the output directory
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Generate a random subject directory.
    Generate {
        /// Number of subjects (overrides the preset)
        #[arg(short, long)]
        count: Option<usize>,
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Preset: small, medium
        #[arg(short, long, default_value = "small")]
        preset: String,
        /// Target directory
        #[arg(short, long, default_value = "subjects")]
        output: PathBuf,
    },
}

fn parse_preset(s: &str) -> SubjectGeneratorConfig {
    match s.to_lowercase().as_str() {
        "small" => SubjectGeneratorConfig::small(),
        "medium" => SubjectGeneratorConfig::medium(),
        _ => {
            eprintln!("Unknown preset: {}. Using 'small'.", s);
            SubjectGeneratorConfig::small()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            config,
            subjects,
            output,
            strategy,
            limit,
            plain,
            calendar,
            no_json,
            no_png,
            no_cleanup,
        } => {
            let mut run = match config {
                Some(path) => RunConfig::from_json_file(&path)?,
                None => RunConfig::default(),
            };
            if let Some(dir) = subjects {
                run.input_dir = dir;
            }
            if let Some(dir) = output {
                run.output_dir = dir;
            }
            if let Some(strategy) = strategy {
                run.strategy = strategy;
            }
            if limit.is_some() {
                run.limit = limit;
            }
            run.outputs.plain_text |= plain;
            run.outputs.text_calendar |= calendar;
            run.outputs.json &= !no_json;
            run.outputs.png_calendar &= !no_png;
            run.cleanup_at_start &= !no_cleanup;

            run_search(&run)
        }

        Commands::Generate {
            count,
            seed,
            preset,
            output,
        } => {
            let mut config = parse_preset(&preset);
            if let Some(count) = count {
                config.subjects = count;
            }

            let subjects = SubjectGenerator::new(config, seed).generate();
            fs::create_dir_all(&output)
                .with_context(|| format!("cannot create {}", output.display()))?;
            for subject in &subjects {
                let path = output.join(format!("{}.txt", subject.name));
                fs::write(&path, format_subject(subject))
                    .with_context(|| format!("cannot write {}", path.display()))?;
            }
            info!(count = subjects.len(), dir = %output.display(), seed, "generated subjects");
            Ok(())
        }
    }
}

fn run_search(run: &RunConfig) -> Result<()> {
    run.validate()?;

    let subjects = load_subjects(&run.input_dir)?;
    info!(count = subjects.len(), dir = %run.input_dir.display(), "loaded subjects");

    let mut driver = match SearchDriver::new(&subjects, run.week) {
        Ok(driver) => driver.with_strategy(run.strategy),
        Err(errors) => {
            for e in &errors {
                eprintln!("  {}", e);
            }
            bail!("{} invalid subject definition(s)", errors.len());
        }
    };
    if let Some(limit) = run.limit {
        driver = driver.with_limit(limit);
    }

    prepare_output_dir(&run.output_dir, run.cleanup_at_start)
        .with_context(|| format!("cannot prepare {}", run.output_dir.display()))?;

    let mut registry = DedupRegistry::new(&subjects);
    if run.outputs.plain_text {
        registry = registry.with_writer(PlainTextWriter::new(&run.output_dir));
    }
    if run.outputs.text_calendar {
        registry = registry.with_writer(CalendarTextWriter::new(&run.output_dir));
    }
    if run.outputs.json {
        registry = registry.with_writer(JsonWriter::new(&run.output_dir));
    }
    if run.outputs.png_calendar {
        let (width, height) = run.outputs.calendar_resolution;
        registry = registry
            .with_writer(PngCalendarWriter::new(&run.output_dir).with_resolution(width, height));
    }

    driver.run(&mut registry);
    let summary = registry.summary();
    println!("{}", summary.describe());

    if summary.write_failures > 0 {
        bail!("{} schedule file(s) could not be written", summary.write_failures);
    }
    Ok(())
}
