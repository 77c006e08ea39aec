use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use morphe::prelude::*;
use morphe::viewer;
use tracing_subscriber::EnvFilter;

/// Morphing particle cloud viewer.
#[derive(Parser, Debug)]
#[command(name = "morphe", version, about)]
struct Cli {
    /// Initial shape (e.g. heart, galaxy, solar_system).
    #[arg(short, long, default_value = "sphere")]
    shape: String,

    /// Number of particles; overrides the config file.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in audio mode.
    #[arg(long)]
    audio: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match MorphConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => MorphConfig::default(),
    };
    if let Some(count) = cli.count {
        config.particle_count = count;
    }

    let shape = cli.shape.parse::<Shape>().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to sphere");
        Shape::Sphere
    });

    let mut scene = match Scene::with_shape(config, shape) {
        Ok(scene) => scene,
        Err(e) => {
            tracing::error!(error = %e, "invalid config");
            return ExitCode::FAILURE;
        }
    };
    if cli.audio {
        scene.set_mode(ControlMode::Audio);
    }

    match viewer::run(scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "viewer error");
            ExitCode::FAILURE
        }
    }
}
