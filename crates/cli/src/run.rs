//! `roster run` and `roster validate`: load, reconcile, write, report.

use std::path::{Path, PathBuf};

use roster_io::{read_table, stage_table, StagedTable, TableError};
use roster_recon::analytics::summarize;
use roster_recon::{CleanOptions, CleanedRecord, RosterConfig, SourceTables};

use crate::exit_codes::{recon_exit_code, table_exit_code, EXIT_USAGE};
use crate::report;
use crate::CliError;

/// Input path overrides from the command line. `None` falls back to config.
#[derive(Debug, Default)]
pub struct InputOverrides {
    pub inventory: Option<PathBuf>,
    pub majors: Option<PathBuf>,
    pub occupancy: Option<PathBuf>,
    pub persons: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub inputs: InputOverrides,
    pub out_dir: Option<PathBuf>,
    pub dob: Option<roster_recon::DobPolicy>,
    pub address2: Option<roster_recon::Address2Policy>,
    pub json: bool,
    pub quiet: bool,
}

/// Resolved file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunPaths {
    inventory: PathBuf,
    majors: PathBuf,
    occupancy: PathBuf,
    persons: PathBuf,
    with_bookings: PathBuf,
    without_bookings: PathBuf,
}

fn table_err(err: TableError) -> CliError {
    CliError { code: table_exit_code(&err), message: err.to_string(), hint: None }
}

fn recon_err(err: roster_recon::ReconError) -> CliError {
    let hint = match &err {
        roster_recon::ReconError::MissingColumn { .. } => {
            Some("check the header row of the named input file".to_string())
        }
        _ => None,
    };
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
}

/// Load config from `path`, or the defaults when no path is given.
fn load_config(path: Option<&Path>) -> Result<RosterConfig, CliError> {
    let Some(path) = path else {
        return Ok(RosterConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    RosterConfig::from_toml(&text).map_err(recon_err)
}

/// Config-relative paths resolve against the config file's directory;
/// command-line paths are used as given.
fn resolve_paths(config: &RosterConfig, config_path: Option<&Path>, opts: &RunOptions) -> RunPaths {
    let base_dir = config_path
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let pick = |flag: &Option<PathBuf>, configured: &str| {
        flag.clone().unwrap_or_else(|| base_dir.join(configured))
    };

    let out_dir = pick(&opts.out_dir, &config.outputs.dir);

    RunPaths {
        inventory: pick(&opts.inputs.inventory, &config.inputs.inventory),
        majors: pick(&opts.inputs.majors, &config.inputs.majors),
        occupancy: pick(&opts.inputs.occupancy, &config.inputs.occupancy),
        persons: pick(&opts.inputs.persons, &config.inputs.persons),
        with_bookings: out_dir.join(&config.outputs.with_bookings),
        without_bookings: out_dir.join(&config.outputs.without_bookings),
    }
}

fn load_sources(paths: &RunPaths) -> Result<SourceTables, CliError> {
    Ok(SourceTables {
        inventory: read_table(&paths.inventory).map_err(table_err)?,
        majors: read_table(&paths.majors).map_err(table_err)?,
        occupancy: read_table(&paths.occupancy).map_err(table_err)?,
        persons: read_table(&paths.persons).map_err(table_err)?,
    })
}

fn stage_records(path: &Path, records: &[CleanedRecord]) -> Result<StagedTable, CliError> {
    let rows: Vec<Vec<String>> = records.iter().map(CleanedRecord::to_row).collect();
    stage_table(path, &CleanedRecord::COLUMNS, &rows).map_err(table_err)
}

/// Remove an output left by an earlier run; a missing file is fine.
fn remove_stale(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::info!("removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(table_err(TableError::Write {
            path: path.to_path_buf(),
            message: format!("cannot remove stale output: {e}"),
        })),
    }
}

pub fn cmd_run(opts: RunOptions) -> Result<(), CliError> {
    let config = load_config(opts.config.as_deref())?;
    let paths = resolve_paths(&config, opts.config.as_deref(), &opts);
    let options = CleanOptions {
        dob: opts.dob.unwrap_or(config.cleaning.dob),
        address2: opts.address2.unwrap_or(config.cleaning.address2),
    };
    log::debug!("run paths: {paths:?}, options: {options:?}");

    let human = !opts.json && !opts.quiet;
    if human {
        report::print_assumptions();
        report::print_cleaning_strategy();
    }

    // Loading and the engine run both finish before anything is written.
    let sources = load_sources(&paths)?;
    let result = roster_recon::run(&sources, &options).map_err(recon_err)?;

    // Both outputs are staged before either is renamed into place.
    let with_bookings = stage_records(&paths.with_bookings, &result.with_bookings.records)?;
    let without_bookings = if result.without_bookings.records.is_empty() {
        log::info!("no persons without bookings; {} is omitted", paths.without_bookings.display());
        None
    } else {
        Some(stage_records(&paths.without_bookings, &result.without_bookings.records)?)
    };

    with_bookings.commit().map_err(table_err)?;
    match without_bookings {
        Some(staged) => staged.commit().map_err(table_err)?,
        None => remove_stale(&paths.without_bookings)?,
    }

    let summary = summarize(&result, chrono::Local::now().date_naive());

    if opts.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json}");
    } else if human {
        report::print_excluded(&result.without_bookings.records);
        report::print_analytics(&summary);
    }

    if !opts.quiet {
        eprintln!(
            "roster: {} with bookings -> {}, {} without bookings{}",
            summary.persons_with_bookings,
            paths.with_bookings.display(),
            summary.persons_without_bookings,
            if result.without_bookings.records.is_empty() {
                String::new()
            } else {
                format!(" -> {}", paths.without_bookings.display())
            },
        );
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "{}: ok (dob={}, address2={})",
        config_path.display(),
        config.cleaning.dob,
        config.cleaning.address2
    );
    Ok(())
}
