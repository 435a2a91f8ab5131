use clap::Args;
use std::path::PathBuf;

use crate::cli::common::load_config;
use crate::cli::run_cli;

#[derive(Args, Debug, Clone)]
pub struct TypeMapArgs {
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Config file. Defaults to sertypes.toml when present"
    )]
    pub config: Option<PathBuf>,
}

pub fn run(args: TypeMapArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: TypeMapArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    for (source, target) in config.type_map().iter() {
        println!("{source} -> {target}");
    }
    Ok(())
}
