use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use orbit_simulation::{scenario::PRESETS, ScenarioConfig, Telemetry, TracingSink};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Run a planets-and-rockets scenario headless and print a flight summary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Gravity and guidance simulator")]
struct Cli {
    /// Scenario manifest (TOML)
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Built-in scenario: vertical_hop, low_orbit or moon_transfer
    #[arg(long, default_value = "vertical_hop")]
    preset: String,

    /// Simulated seconds to run (overrides the scenario)
    #[arg(long)]
    duration: Option<f64>,

    /// Simulated seconds per wall-clock second (overrides the scenario)
    #[arg(long)]
    time_scale: Option<f64>,

    /// Physics ticks per frame (overrides the scenario)
    #[arg(long)]
    ticks_per_frame: Option<usize>,

    /// Log phase transitions and other debug output
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "orbit_simulation=debug"
    } else {
        "orbit_simulation=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut config = match &cli.scenario {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioConfig::preset(&cli.preset)
            .with_context(|| format!("available presets: {}", PRESETS.join(", ")))?,
    };
    if let Some(duration) = cli.duration {
        config.simulation.duration = duration;
    }
    if let Some(time_scale) = cli.time_scale {
        config.simulation.time_scale = time_scale;
    }
    if let Some(ticks_per_frame) = cli.ticks_per_frame {
        config.simulation.ticks_per_frame = ticks_per_frame;
    }

    let scenario = config.build().context("invalid scenario")?;
    let settings = scenario.settings.clone();
    let mut runner = scenario.into_runner()?;
    runner.subscribe(Box::new(TracingSink));

    tracing::info!(
        planets = runner.world().planets().len(),
        rockets = runner.world().rockets().len(),
        duration = settings.duration,
        "starting simulation"
    );

    let mut telemetry = Telemetry::new();
    telemetry.collect_data(runner.world());
    while runner.world().time() < settings.duration {
        for entry in runner.advance(settings.time_step)? {
            telemetry.record(&entry);
        }
        telemetry.collect_data(runner.world());

        if runner.world().rockets().is_empty() {
            tracing::info!("no rocket left in flight, ending simulation");
            break;
        }
    }

    println!("--- Event Log ---");
    for line in &telemetry.log {
        println!("{line}");
    }
    println!();
    print!("{}", telemetry.summary());

    Ok(())
}
