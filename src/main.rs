/*!
 * mpkg CLI - Command Line Interface
 */

use clap::{Parser, Subcommand, ValueEnum};
use mpkg::{
    cli_style::{
        check_table, element_table, merge_report_table, print_error, print_info, print_success,
        print_warning, section_header, summary_table,
    },
    config::{LogLevel, MpkgConfig},
    error::{MpkgError, Result, EXIT_SUCCESS},
    logging,
    manifest::MergeMode,
    ops,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mpkg")]
#[command(version, about = "Merge, filter and check media package manifests", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long = "log", value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long = "json", global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the elements of SRC into DEST
    Merge {
        /// Target package, overwritten unless --output is given
        dest: PathBuf,

        /// Package whose elements are added
        src: PathBuf,

        /// What to do when both packages hold an element with the same id
        #[arg(short = 'm', long = "mode", value_enum)]
        mode: Option<MergeModeArg>,

        /// Write the merged package here
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the sanity check on a package
    Check {
        file: PathBuf,
    },

    /// List the elements matching every --where expression
    ///
    /// Expressions: any, checksum, no-checksum, video, audio, type:KIND,
    /// flavor:TYPE/SUBTYPE, tag:TAG, tags:A,B, channel:ID, each optionally
    /// prefixed with '!'
    Filter {
        file: PathBuf,

        #[arg(short = 'w', long = "where", value_name = "EXPR")]
        expressions: Vec<String>,
    },

    /// Summarize a package
    Show {
        file: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum MergeModeArg {
    Merge,
    Replace,
    Skip,
    Fail,
}

impl From<MergeModeArg> for MergeMode {
    fn from(arg: MergeModeArg) -> Self {
        match arg {
            MergeModeArg::Merge => MergeMode::Merge,
            MergeModeArg::Replace => MergeMode::Replace,
            MergeModeArg::Skip => MergeMode::Skip,
            MergeModeArg::Fail => MergeMode::Fail,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!(category = %e.category(), "Command failed");
            let hint = e
                .is_conflict()
                .then_some("Retry with --mode merge, replace or skip");
            print_error(&e.to_string(), hint);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref config_path) = cli.config {
        MpkgConfig::from_file(config_path).unwrap_or_else(|e| {
            print_warning(&format!("Failed to load config file: {}", e));
            MpkgConfig::default()
        })
    } else {
        MpkgConfig::default()
    };

    // CLI flags override the config file
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Merge {
            dest,
            src,
            mode,
            output,
        } => {
            let mode = mode.map(MergeMode::from).unwrap_or(config.merge_mode);
            let report = ops::run_merge(&dest, &src, output.as_deref(), mode, &config)?;
            if cli.json {
                print_json(&report)?;
            } else {
                section_header("Merge");
                println!("{}", merge_report_table(&report));
                print_success(&report.to_string());
            }
        }
        Commands::Check { file } => {
            let report = ops::run_check(&file, &config)?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("{}", check_table(&report));
                if !report.publishable {
                    print_warning("Package needs a title and at least one track to publish");
                }
            }
        }
        Commands::Filter { file, expressions } => {
            let selected = ops::run_filter(&file, &expressions, &config)?;
            if cli.json {
                print_json(&selected)?;
            } else if selected.is_empty() {
                print_info("No matching elements");
            } else {
                println!("{}", element_table(&selected));
            }
        }
        Commands::Show { file } => {
            let mp = ops::load_package(&file, &config)?;
            let summary = ops::describe(&mp);
            if cli.json {
                println!("{}", ops::render_package(&mp, &config)?);
            } else {
                section_header(&format!("Package {}", summary.package));
                println!("{}", summary_table(&summary));
                if !mp.is_empty() {
                    println!("{}", element_table(&mp));
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| MpkgError::Other(format!("Failed to render JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}
