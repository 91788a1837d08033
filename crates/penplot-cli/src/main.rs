//! penplot CLI - run JSON plot jobs against an HP-GL pen plotter
//!
//! Writes HP-GL to stdout, a file, or an already configured serial device.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use penplot_hpgl::{Plotter, PlotterConfig};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod job;

use job::PlotJob;

#[derive(Parser)]
#[command(name = "penplot")]
#[command(about = "Send plot jobs to an HP-GL pen plotter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON plot job to HP-GL
    Render {
        /// Path to the job file
        job: PathBuf,
        /// Output file or device node (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Plotter profile (TOML), overrides the job's settings
        #[arg(long, conflicts_with = "preset")]
        profile: Option<PathBuf>,
        /// Built-in plotter profile, e.g. hp7475a-a4
        #[arg(long)]
        preset: Option<String>,
        /// Override the profile's scale (device units per drawing unit)
        #[arg(long)]
        scale: Option<f64>,
        /// Log every statement before it is sent
        #[arg(short, long)]
        debug: bool,
    },
    /// Print a built-in plotter profile as TOML, or list them
    Preset {
        /// Profile name
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let debug = matches!(cli.command, Commands::Render { debug: true, .. });
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if debug { "debug" } else { "warn" }),
    )
    .init();

    match cli.command {
        Commands::Render {
            job,
            output,
            profile,
            preset,
            scale,
            debug,
        } => {
            render(
                &job,
                output.as_deref(),
                profile.as_deref(),
                preset.as_deref(),
                scale,
                debug,
            )?;
        }
        Commands::Preset { name } => {
            show_preset(name.as_deref())?;
        }
    }

    Ok(())
}

fn render(
    job_path: &Path,
    output: Option<&Path>,
    profile: Option<&Path>,
    preset: Option<&str>,
    scale: Option<f64>,
    debug: bool,
) -> Result<()> {
    let json = fs::read_to_string(job_path)
        .with_context(|| format!("reading job {}", job_path.display()))?;
    let job = PlotJob::from_json(&json)
        .with_context(|| format!("parsing job {}", job_path.display()))?;

    let mut config = resolve_config(&job, profile, preset)?;
    if let Some(scale) = scale {
        if !scale.is_finite() || scale <= 0.0 {
            bail!("scale must be a positive number, got {}", scale);
        }
        config = config.with_scale(scale);
    }
    if debug {
        config = config.with_debug(true);
    }

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    info!(
        "plotting {} operations, scale {}, origin ({}, {}), device area {}x{}",
        job.operations.len(),
        config.scale,
        config.bounds.x_min,
        config.bounds.y_min,
        config.bounds.width(),
        config.bounds.height()
    );

    let mut plotter = Plotter::new(sink, config).context("initializing plotter")?;
    job::run(&job, &mut plotter).context("sending plot job")?;

    if let Some(path) = output {
        info!("wrote HP-GL to {}", path.display());
    }
    Ok(())
}

/// Profile file, then preset, then the job's own settings, then the default.
fn resolve_config(
    job: &PlotJob,
    profile: Option<&Path>,
    preset: Option<&str>,
) -> Result<PlotterConfig> {
    if let Some(path) = profile {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        return toml::from_str(&text)
            .with_context(|| format!("parsing profile {}", path.display()));
    }
    if let Some(name) = preset {
        return lookup_preset(name);
    }
    Ok(job.plotter.clone().unwrap_or_default())
}

fn lookup_preset(name: &str) -> Result<PlotterConfig> {
    match PlotterConfig::preset(name) {
        Some(config) => Ok(config),
        None => bail!(
            "Unknown preset: {} (available: {})",
            name,
            PlotterConfig::preset_names().join(", ")
        ),
    }
}

fn show_preset(name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        for name in PlotterConfig::preset_names() {
            println!("{}", name);
        }
        return Ok(());
    };
    let config = lookup_preset(name)?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(json: &str) -> PlotJob {
        PlotJob::from_json(json).unwrap()
    }

    #[test]
    fn test_config_precedence() {
        let with_plotter = job(
            r#"{ "plotter": { "bounds": { "x_min": 5, "y_min": 5, "x_max": 50, "y_max": 50 }, "scale": 3 },
                 "operations": [] }"#,
        );
        let config = resolve_config(&with_plotter, None, None).unwrap();
        assert_eq!(config.bounds.x_min, 5);
        assert_eq!(config.scale, 3.0);

        let config = resolve_config(&with_plotter, None, Some("hp7475a-a4")).unwrap();
        assert_eq!(config, PlotterConfig::hp7475a_a4());

        let bare = job(r#"{ "operations": [] }"#);
        assert_eq!(
            resolve_config(&bare, None, None).unwrap(),
            PlotterConfig::default()
        );
    }

    #[test]
    fn test_unknown_preset() {
        let err = lookup_preset("hp9999").unwrap_err().to_string();
        assert!(err.contains("hp7475a-a4"));
    }

    #[test]
    fn test_non_finite_profile_scale_is_refused() {
        let text = "scale = nan\n\n[bounds]\nx_min = 0\ny_min = 0\nx_max = 10365\ny_max = 7962\n";
        let config: PlotterConfig = toml::from_str(text).unwrap();
        assert!(config.scale.is_nan());
        let mut out = Vec::new();
        assert!(Plotter::new(&mut out, config).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_preset_toml_round_trips() {
        let text = toml::to_string(&PlotterConfig::hp7475a_a3()).unwrap();
        let parsed: PlotterConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, PlotterConfig::hp7475a_a3());
    }
}
