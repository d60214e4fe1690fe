use std::path::PathBuf;

use bentris_engine::GameConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PrintConfigArg {
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(config: &GameConfig, arg: &PrintConfigArg) -> anyhow::Result<()> {
    Output::save_json(config, arg.output.as_deref())
}
