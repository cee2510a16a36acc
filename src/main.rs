//! fuzzy-duration
//!
//! Command-line interface for the green-duration fuzzy advisor.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use fuzzy_duration::config::LOCAL_CONFIG_FILE;
use fuzzy_duration::{
    Degrees, FisConfig, FisError, FisResult, Inference, InferenceSystem, LogLevel,
    MembershipCurves, OutputFormat, Term,
};

#[derive(Parser)]
#[command(name = "fuzzy-duration")]
#[command(
    version,
    long_version = concat!(
        env!("FUZZY_DURATION_VERSION"),
        " (",
        env!("FUZZY_DURATION_TARGET"),
        ")"
    )
)]
#[command(about = "Mamdani fuzzy advisor for recommended green durations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (overrides the configured default)
    #[arg(short, long, global = true, value_enum)]
    format: Option<Format>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Run(RunCommand),
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands that need a validated inference system
#[derive(Subcommand)]
enum RunCommand {
    /// Infer the recommended duration for one pair of inputs
    Infer {
        /// First input (queue length)
        #[arg(allow_negative_numbers = true)]
        input1: f64,
        /// Second input (arrival flow)
        #[arg(allow_negative_numbers = true)]
        input2: f64,
        /// Include the aggregated surface in text output
        #[arg(long)]
        surface: bool,
    },
    /// Print the sampled membership curves of every variable
    Curves,
    /// Evaluate a grid over both input domains
    Sweep {
        /// Intervals per input axis
        #[arg(long, default_value = "10")]
        steps: usize,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination (defaults to ./fuzzy-duration.toml)
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Validate the effective configuration
    Validate,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;

    if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    } else if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    }
    if let Some(format) = cli.format {
        config.general.format = format.into();
    }

    tracing_subscriber::fmt()
        .with_max_level(config.general.log_level.tracing_level())
        .with_writer(io::stderr)
        .init();

    let format = config.general.format;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Config { action } => run_config(action, &config, format, &mut out)?,
        Command::Run(command) => {
            let system = config.build_system().context("Invalid configuration")?;
            run_inference(command, &system, format, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> FisResult<FisConfig> {
    let config = match path {
        Some(path) => {
            let mut config = FisConfig::load_from_file(path)?;
            config.apply_env_overrides()?;
            config
        }
        None => FisConfig::load()?,
    };
    Ok(config)
}

fn run_inference(
    command: RunCommand,
    system: &InferenceSystem,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        RunCommand::Infer {
            input1,
            input2,
            surface,
        } => {
            if !(input1.is_finite() && input2.is_finite()) {
                bail!("inputs must be finite numbers");
            }
            let result = system.infer(input1, input2);
            info!(input1, input2, output = result.output, "inference complete");
            match format {
                OutputFormat::Json => write_json(out, &result)?,
                OutputFormat::Text => write_inference(out, system, &result, surface)?,
            }
        }
        RunCommand::Curves => {
            let curves = system.curves();
            match format {
                OutputFormat::Json => write_json(out, &curves)?,
                OutputFormat::Text => write_curves(out, &curves)?,
            }
        }
        RunCommand::Sweep { steps } => {
            let grid = system.sweep(steps);
            debug!(points = grid.len(), "sweep complete");
            match format {
                OutputFormat::Json => {
                    let rows: Vec<serde_json::Value> = grid
                        .iter()
                        .map(|&(x, y, o)| {
                            serde_json::json!({ "input1": x, "input2": y, "output": o })
                        })
                        .collect();
                    write_json(out, &rows)?;
                }
                OutputFormat::Text => {
                    writeln!(
                        out,
                        "{:>10} {:>10} {:>10}",
                        system.input1().name,
                        system.input2().name,
                        system.output().name
                    )?;
                    for (x, y, o) in grid {
                        writeln!(out, "{:>10.2} {:>10.2} {:>10.3}", x, y, o)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_config(
    action: ConfigAction,
    config: &FisConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            FisConfig::write_default_file(&path).map_err(FisError::from)?;
            info!(path = %path.display(), "wrote default configuration");
        }
        ConfigAction::Show => match format {
            OutputFormat::Json => write_json(out, config)?,
            OutputFormat::Text => write!(out, "{}", config.to_toml()?)?,
        },
        ConfigAction::Validate => match config.build_system() {
            Ok(system) => writeln!(
                out,
                "ok: {} rules, {} samples, fallback {}",
                system.rules().len(),
                system.samples(),
                system.fallback()
            )?,
            Err(e) => {
                match format {
                    OutputFormat::Json => writeln!(out, "{}", e.to_json())?,
                    OutputFormat::Text => writeln!(out, "{}", e)?,
                }
                bail!("configuration is invalid");
            }
        },
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn write_degrees<T: Term>(
    out: &mut impl Write,
    label: &str,
    value: f64,
    degrees: &Degrees<T>,
) -> Result<()> {
    let terms: Vec<String> = degrees
        .iter()
        .map(|(t, d)| format!("{} {:.3}", t.name(), d))
        .collect();
    writeln!(out, "{:<10} = {:<8} ({})", label, value, terms.join(", "))?;
    Ok(())
}

fn write_inference(
    out: &mut impl Write,
    system: &InferenceSystem,
    result: &Inference,
    surface: bool,
) -> Result<()> {
    write_degrees(out, &system.input1().name, result.input1, &result.input1_degrees)?;
    write_degrees(out, &system.input2().name, result.input2, &result.input2_degrees)?;

    let active: Vec<String> = result
        .activations
        .iter()
        .filter(|(_, &v)| v > 0.0)
        .map(|(t, v)| format!("{} {:.3}", t.name(), v))
        .collect();
    if active.is_empty() {
        writeln!(out, "{:<10} : none", "rules")?;
    } else {
        writeln!(out, "{:<10} : {}", "rules", active.join(", "))?;
    }

    if surface {
        for (t, m) in result.surface.iter() {
            writeln!(out, "  {:>8.2} {:.4}", t, m)?;
        }
    }

    let note = if result.fallback_used { " (fallback)" } else { "" };
    writeln!(out, "{:<10} = {:.3}{}", system.output().name, result.output, note)?;
    Ok(())
}

fn write_curves(out: &mut impl Write, curves: &MembershipCurves) -> Result<()> {
    fn section<T: Term>(
        out: &mut impl Write,
        name: &str,
        domain: (f64, f64),
        terms: &indexmap::IndexMap<T, Vec<(f64, f64)>>,
    ) -> Result<()> {
        writeln!(out, "# {} [{}, {}]", name, domain.0, domain.1)?;
        for (term, points) in terms {
            let peak = points
                .iter()
                .copied()
                .fold((domain.0, 0.0), |best, p| if p.1 > best.1 { p } else { best });
            writeln!(
                out,
                "{:<12} {} points, peak {:.3} at {}",
                term.name(),
                points.len(),
                peak.1,
                peak.0
            )?;
        }
        Ok(())
    }

    section(out, &curves.input1.name, curves.input1.domain, &curves.input1.terms)?;
    section(out, &curves.input2.name, curves.input2.domain, &curves.input2.terms)?;
    section(out, &curves.output.name, curves.output.domain, &curves.output.terms)?;
    Ok(())
}
