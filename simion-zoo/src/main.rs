use anyhow::Result;
use clap::Parser;
use log::info;
use simion_core::{
    record::{CsvRecorder, NullRecorder, Recorder},
    Runner, SimionZooConfig, EPISODE_RECORD_COLUMNS,
};
use std::path::PathBuf;

/// Run a SimionZoo experiment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Experiment configuration (YAML)
    config: PathBuf,

    /// Write one row per episode to this CSV file
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Seed of the random number generators, overrides Experiment/Random-Seed
    #[arg(short, long)]
    seed: Option<u64>,
}

fn run(args: &Args) -> Result<()> {
    let config = SimionZooConfig::load(&args.config)?;
    let mut recorder: Box<dyn Recorder> = match &args.log {
        Some(path) => {
            info!("Writing episode log to {:?}", path);
            Box::new(CsvRecorder::new(path, &EPISODE_RECORD_COLUMNS)?)
        }
        None => Box::new(NullRecorder::new()),
    };
    let mut runner = Runner::build(&config, args.seed)?;
    runner.run(recorder.as_mut())?;
    info!(
        "Finished after {} steps",
        runner.experiment().experiment_step()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args)
}
