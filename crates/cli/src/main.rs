#![deny(unsafe_code)]
//! Headless CLI for the portfolio-fx particle field.
//!
//! Subcommands:
//! - `simulate`: run the field N frames, print a summary
//! - `snapshot`: step the field and write one frame as SVG or PNG
//! - `config`: print the effective configuration

mod error;
mod render;
mod simulate;

use clap::{ArgAction, Parser, Subcommand};
use error::CliError;
use portfolio_fx_core::{FxConfig, Rgba};
use simulate::SimulationSpec;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "portfolio-fx", about = "Headless driver for the portfolio site effects")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config override: inline JSON, or a path to a JSON file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the particle field for N frames and summarize what was drawn.
    Simulate {
        /// Viewport width in pixels; also picks the particle count.
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 720.0)]
        height: f64,

        /// Number of animation frames.
        #[arg(short, long, default_value_t = 600)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Particle count (default: from the config's viewport rule).
        #[arg(short, long)]
        count: Option<usize>,

        /// Include every particle and connection in JSON output.
        #[arg(long)]
        particles: bool,
    },
    /// Step the field and write the resulting frame to an .svg or .png file.
    Snapshot {
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        #[arg(short = 'H', long, default_value_t = 720.0)]
        height: f64,

        /// Simulation steps before the frame is drawn.
        #[arg(short, long, default_value_t = 120)]
        steps: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(short, long)]
        count: Option<usize>,

        /// Background color (#rrggbb, rgb() or rgba()); transparent if unset.
        #[arg(short, long)]
        background: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "frame.svg")]
        output: PathBuf,
    },
    /// Print the effective configuration as JSON.
    Config,
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose > 0 {
        builder.filter_level(match verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    builder.init();
}

fn load_config(arg: Option<&str>) -> Result<FxConfig, CliError> {
    let Some(arg) = arg else {
        return Ok(FxConfig::default());
    };
    let text = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        std::fs::read_to_string(arg).map_err(|source| CliError::ConfigRead {
            path: PathBuf::from(arg),
            source,
        })?
    };
    FxConfig::from_json_str(&text).map_err(CliError::Config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Simulate {
            width,
            height,
            frames,
            seed,
            count,
            particles,
        } => {
            let spec = SimulationSpec {
                width,
                height,
                frames,
                seed,
                count,
            };
            let report = simulate::run(&config, &spec)?;
            if cli.json {
                let info = report.to_json(&spec, particles);
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let stats = report.stats;
                println!(
                    "simulated {} particles for {} frames on {width}x{height} (seed {seed})",
                    report.snapshot.particles.len(),
                    stats.frames
                );
                println!(
                    "  connections now: {}  lines drawn: {}  busiest frame: {}",
                    report.snapshot.connections.len(),
                    stats.lines_drawn,
                    stats.max_lines_in_frame
                );
            }
        }
        Command::Snapshot {
            width,
            height,
            steps,
            seed,
            count,
            background,
            output,
        } => {
            let background = background
                .as_deref()
                .map(Rgba::parse)
                .transpose()
                .map_err(CliError::Background)?;
            let spec = SimulationSpec {
                width,
                height,
                frames: steps,
                seed,
                count,
            };
            let mut field = simulate::build_field(&config, &spec)?;
            (0..steps).for_each(|_| field.step());
            let format = render::write_snapshot(&field, &output, background)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "steps": steps,
                    "seed": seed,
                    "particles": field.len(),
                    "connections": field.connections().len(),
                    "format": format!("{format:?}").to_lowercase(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles ({width}x{height}, {steps} steps, seed {seed}) -> {}",
                    field.len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
