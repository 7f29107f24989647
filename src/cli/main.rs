#![warn(clippy::all, clippy::pedantic)]
mod ingest;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use csv::Writer;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};
use teaching_load::{
    allocate, AllocationConfig, AllocationReport, Assignment, Classes, CostTiers, Role, Roster,
};

/// Allocate teaching load across teachers and subjects at minimum preference cost
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Teachers roster, rows of `name;offered classes;subject codes by preference...`
    teachers: PathBuf,
    /// Subjects roster, rows of `code;name;classes` with an optional trailing total row
    subjects: PathBuf,
    /// Field delimiter of both rosters
    #[arg(long, default_value_t = ';')]
    delimiter: char,
    /// Cost weight per preference rank, most preferred first
    #[arg(long, value_delimiter = ',', default_values_t = [0, 3, 5, 8, 10])]
    tiers: Vec<Classes>,
    /// Classes a teacher may take of a single subject
    #[arg(long, default_value_t = 2)]
    class_capacity: Classes,
    /// Per subject capacity, e.g. `CSI000=1` (repeatable)
    #[arg(long = "capacity", value_parser = parse_capacity)]
    capacities: Vec<(String, Classes)>,
    /// Abort after this many augmenting paths
    #[arg(long)]
    max_augmentations: Option<usize>,
    /// Write the assignments as CSV to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_capacity(s: &str) -> Result<(String, Classes), String> {
    let (code, capacity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=N, got {s:?}"))?;
    let capacity = capacity
        .trim()
        .parse()
        .map_err(|e| format!("invalid capacity in {s:?}: {e}"))?;
    Ok((code.trim().to_string(), capacity))
}

fn init_logger(verbose: u8) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .or_else(|_| SimpleLogger::init(level, Config::default()))?;
    Ok(())
}

// Function to write the assignments
fn write_csv(assignments: &[Assignment], filepath: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filepath)?;
    for assignment in assignments {
        wtr.serialize(assignment)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_report(roster: &Roster, report: &AllocationReport) {
    for a in &report.assignments {
        println!();
        println!("Teacher: {}", a.teacher);
        println!("    Subject: {}", a.subject_code);
        println!("    Name:    {}", a.subject_name);
        println!("    Classes: {}", a.classes);
        println!("    Cost:    {}", a.cost);
    }
    println!();
    println!("The total cost was {}", report.total_cost);
    println!("Total classes allocated: {}", report.total_classes);
    if !report.is_complete() {
        println!(
            "{} classes could not be allocated ({:?})",
            report.remaining_supply, report.termination
        );
    }

    let layout = roster.layout();
    let away: Vec<&str> = report
        .teachers_without_subjects
        .iter()
        .filter_map(|v| match layout.role(*v) {
            Some(Role::Teacher(idx)) => Some(roster.teachers()[idx].name.as_str()),
            _ => None,
        })
        .collect();
    if away.is_empty() {
        println!("All teachers offer at least one subject");
    } else {
        println!("These teachers don't offer any subject: {}", away.join(", "));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.verbose)?;

    let delimiter = u8::try_from(args.delimiter)?;
    let roster = ingest::read_roster(&args.teachers, &args.subjects, delimiter)?;

    let config = AllocationConfig {
        tiers: CostTiers::new(args.tiers),
        class_capacity: args.class_capacity,
        capacity_overrides: args.capacities.into_iter().collect(),
        max_augmentations: args.max_augmentations,
    };

    let report = allocate(&roster, config).map_err(|e| e.to_string())?;
    print_report(&roster, &report);

    if let Some(output) = &args.output {
        write_csv(&report.assignments, output)?;
        log::info!("assignments written to {}", output.display());
    }

    Ok(())
}
