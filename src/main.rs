//! Command-line entry point for the instancing demos.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use instancing::options::Options;
use instancing::{DemoError, DemoKind, Viewer};

/// GPU instancing demos: a forest of trees or a swarm of cubes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Which demo to run (`forest` or `cubes`).
    #[arg(short, long, default_value_t = DemoKind::Forest)]
    demo: DemoKind,

    /// TOML options file. Missing sections use defaults.
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Initial instance count for the chosen demo.
    #[arg(short, long)]
    instances: Option<u32>,

    /// RNG seed for reproducible layouts.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the effective options to this file and exit.
    #[arg(long)]
    dump_options: Option<PathBuf>,
}

fn load_options(cli: &Cli) -> Result<Options, DemoError> {
    let mut options = match &cli.options {
        Some(path) => {
            log::info!("loading options from {}", path.display());
            Options::load(path)?
        }
        None => Options::default(),
    };

    match cli.demo {
        DemoKind::Forest => {
            if let Some(n) = cli.instances {
                options.forest.instances = n;
            }
            if cli.seed.is_some() {
                options.forest.seed = cli.seed;
            }
        }
        DemoKind::Cubes => {
            if let Some(n) = cli.instances {
                options.cubes.instances = n;
            }
            if cli.seed.is_some() {
                options.cubes.seed = cli.seed;
            }
        }
    }
    Ok(options)
}

fn run(cli: &Cli) -> Result<(), DemoError> {
    let options = load_options(cli)?;
    if let Some(path) = &cli.dump_options {
        options.save(path)?;
        log::info!("options written to {}", path.display());
        return Ok(());
    }
    Viewer::builder()
        .with_demo(cli.demo)
        .with_options(options)
        .build()
        .run()
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
