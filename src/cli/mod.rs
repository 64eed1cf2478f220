use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stepclamp::analysis::{AnalysisConfig, ControlBranch};
use stepclamp::recording::ExperimentKind;

mod analyze;
mod config;
mod demo;
mod inspect;
mod measure;

pub use config::Config;

/// stepclamp - Step response extraction for voltage-clamp hold recordings
#[derive(Parser)]
#[command(name = "stepclamp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Response windowing policy.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BranchArg {
    /// Negative control: window around the step offset
    #[value(alias = "negative-control")]
    Neg,
    /// Experiment or positive control: window around the current minimum
    #[value(alias = "experimental")]
    Exp,
}

/// Stimulus used for the hold recordings.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExperimentArg {
    /// UV LED pulse (holds_UV)
    #[value(alias = "UV")]
    Uv,
    /// Drug addition step (holds_drug)
    Drug,
}

impl From<BranchArg> for ControlBranch {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::Neg => ControlBranch::NegativeControl,
            BranchArg::Exp => ControlBranch::Experimental,
        }
    }
}

impl From<ExperimentArg> for ExperimentKind {
    fn from(arg: ExperimentArg) -> Self {
        match arg {
            ExperimentArg::Uv => ExperimentKind::Uv,
            ExperimentArg::Drug => ExperimentKind::Drug,
        }
    }
}

/// Analysis parameters shared by `analyze` and `measure`
#[derive(Args, Debug, Default)]
pub struct AnalysisArgs {
    /// Windowing policy (neg or exp)
    #[arg(short = 'b', long, value_enum)]
    branch: Option<BranchArg>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Control-channel threshold in volts (default: 0.1)
    #[arg(long)]
    threshold: Option<f64>,

    /// Baseline prefix length in samples (default: 30000)
    #[arg(long)]
    baseline_samples: Option<usize>,

    /// Reject recordings shorter than the baseline prefix
    #[arg(long)]
    strict_baseline: bool,

    /// Seconds of response window before the anchor (default: 10)
    #[arg(long)]
    pre_seconds: Option<f64>,

    /// Seconds of response window after the anchor (default: 20)
    #[arg(long)]
    post_seconds: Option<f64>,

    /// Use an explicit response window [START, END) instead of automatic placement
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    manual_window: Option<Vec<usize>>,

    /// Sample rate in Hz, overriding the rate stored in or inferred from files
    #[arg(long)]
    sample_rate: Option<u32>,
}

/// Fully resolved analysis settings: CLI flags over config file over defaults
#[derive(Debug)]
pub struct ResolvedSettings {
    pub branch: ControlBranch,
    pub experiment: ExperimentKind,
    pub config: AnalysisConfig,
    pub sample_rate: Option<u32>,
}

impl AnalysisArgs {
    /// Merge flags with the optional config file.
    ///
    /// The branch must come from one of the two; an unrecognised branch in
    /// the file is rejected here, before any recording is read.
    pub fn resolve(&self, experiment: Option<ExperimentArg>) -> Result<ResolvedSettings> {
        let file = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let mut config = file.analysis_config();
        if let Some(threshold) = self.threshold {
            config.baseline_threshold = threshold;
        }
        if let Some(samples) = self.baseline_samples {
            config.baseline_window_samples = samples;
        }
        if self.strict_baseline {
            config.require_full_baseline = true;
        }
        if let Some(seconds) = self.pre_seconds {
            config.pre_window_seconds = seconds;
        }
        if let Some(seconds) = self.post_seconds {
            config.post_window_seconds = seconds;
        }
        if let Some(window) = &self.manual_window {
            config.manual_window = Some((window[0], window[1]));
        }

        let branch = match self.branch {
            Some(arg) => ControlBranch::from(arg),
            None => file.branch()?.ok_or_else(|| {
                anyhow::anyhow!(
                    "no control branch given: pass --branch neg|exp or set analysis.branch in the config file"
                )
            })?,
        };

        let experiment = match experiment {
            Some(arg) => ExperimentKind::from(arg),
            None => file.experiment()?.unwrap_or_default(),
        };

        Ok(ResolvedSettings {
            branch,
            experiment,
            config,
            sample_rate: self.sample_rate.or(file.input.sample_rate),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Measure every hold recording in a cell folder and write the results table
    Analyze {
        /// Cell folder containing holds_UV/ or holds_drug/
        #[arg(value_name = "CELL_FOLDER")]
        folder: PathBuf,

        /// Which hold folder to analyze (default: uv)
        #[arg(short = 'e', long, value_enum)]
        experiment: Option<ExperimentArg>,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output CSV (defaults to analysedData/holding_current_values_{kind}_pA.csv)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Append rows to an existing table instead of overwriting it
        #[arg(long)]
        append: bool,

        /// Render diagnostic plots into figures/ (requires the plots feature)
        #[arg(long)]
        plots: bool,
    },

    /// Measure a single recording and print the result as JSON
    Measure {
        /// Recording file (.parquet, .csv, .tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Show a recording summary and the located step
    Inspect {
        /// Recording file (.parquet, .csv, .tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Control-channel threshold in volts
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// Sample rate in Hz, overriding the rate stored in or inferred from the file
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Generate a synthetic cell folder for trying out `analyze`
    Demo {
        /// Output cell folder
        #[arg(value_name = "OUTPUT", default_value = "demo_cs1_cell1")]
        output: PathBuf,

        /// Sample rate of the generated recordings in Hz
        #[arg(long, default_value = "1000")]
        sample_rate: u32,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            folder,
            experiment,
            analysis,
            output,
            append,
            plots,
        } => {
            let settings = analysis.resolve(experiment)?;
            analyze::run(folder, settings, output, append, plots)
        }
        Commands::Measure { file, analysis } => {
            let settings = analysis.resolve(None)?;
            measure::run(file, settings)
        }
        Commands::Inspect {
            file,
            threshold,
            sample_rate,
        } => inspect::run(file, threshold, sample_rate),
        Commands::Demo {
            output,
            sample_rate,
        } => demo::run(output, sample_rate),
    }
}
