// roster CLI - reconcile housing occupancy with person records

mod exit_codes;
mod report;
mod run;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::EXIT_SUCCESS;
use roster_recon::{Address2Policy, DobPolicy};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Join bed bookings with person records and write cleaned rosters")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join, clean and reconcile the four source tables
    #[command(after_help = "\
Examples:
  roster run
  roster run --config data/roster.toml
  roster run --persons people.csv --out-dir out/
  roster run --dob-policy strict --json")]
    Run {
        /// TOML config; input/output names resolve against its directory
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Inventory CSV (buildingName, roomName, bedName, bedId)
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Majors CSV (name, id)
        #[arg(long)]
        majors: Option<PathBuf>,

        /// Occupancy CSV (buildingName, roomName, bedName, personId)
        #[arg(long)]
        occupancy: Option<PathBuf>,

        /// Persons CSV (personId, firstName, lastName, email, dob, address, majors)
        #[arg(long)]
        persons: Option<PathBuf>,

        /// Directory for the output tables
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Unparseable dob: blank it (lenient) or drop the row (strict)
        #[arg(long, value_enum)]
        dob_policy: Option<DobArg>,

        /// address2 with missing city/state: literal template (legacy) or blank (strict)
        #[arg(long, value_enum)]
        address2_policy: Option<Address2Arg>,

        /// Print the run summary as JSON instead of the console report
        #[arg(long)]
        json: bool,

        /// Suppress the console report
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a roster config without running
    #[command(after_help = "\
Examples:
  roster validate --config roster.toml")]
    Validate {
        /// Path to the roster.toml config file
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DobArg {
    Lenient,
    Strict,
}

impl From<DobArg> for DobPolicy {
    fn from(arg: DobArg) -> Self {
        match arg {
            DobArg::Lenient => DobPolicy::Lenient,
            DobArg::Strict => DobPolicy::Strict,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Address2Arg {
    Legacy,
    Strict,
}

impl From<Address2Arg> for Address2Policy {
    fn from(arg: Address2Arg) -> Self {
        match arg {
            Address2Arg::Legacy => Address2Policy::Legacy,
            Address2Arg::Strict => Address2Policy::Strict,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  roster-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            inventory,
            majors,
            occupancy,
            persons,
            out_dir,
            dob_policy,
            address2_policy,
            json,
            quiet,
        } => run::cmd_run(run::RunOptions {
            config,
            inputs: run::InputOverrides { inventory, majors, occupancy, persons },
            out_dir,
            dob: dob_policy.map(DobPolicy::from),
            address2: address2_policy.map(Address2Policy::from),
            json,
            quiet,
        }),
        Commands::Validate { config } => run::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
