use std::path::PathBuf;

use bentris_engine::GameConfig;
use clap::{Parser, Subcommand};

use crate::util;

use self::{play::PlayArg, print_config::PrintConfigArg, simulate::SimulateArg};

mod play;
mod print_config;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Game configuration file (JSON); built-in timings are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with a scripted player and print a summary
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the effective game configuration as JSON
    PrintConfig(#[clap(flatten)] PrintConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let config = load_config(args.config.as_ref())?;
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(config, &arg)?,
        Mode::Simulate(arg) => simulate::run(config, &arg)?,
        Mode::PrintConfig(arg) => print_config::run(&config, &arg)?,
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    util::read_json_file("config", path)
}
