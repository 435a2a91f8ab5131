use clap::Args;
use std::path::PathBuf;

use sertypes_core::{Manifest, generate};

use crate::cli::common::load_config;
use crate::cli::run_cli;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        long = "manifest",
        value_name = "FILE",
        help = "Serializer definitions (.json, .yaml, .yml or .toml)"
    )]
    pub manifest: PathBuf,
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Config file. Defaults to sertypes.toml when present"
    )]
    pub config: Option<PathBuf>,
    #[arg(long = "output-dir", value_name = "DIR", help = "Override the output directory")]
    pub output_dir: Option<PathBuf>,
    #[arg(
        long = "namespace",
        value_name = "NAMESPACE",
        help = "Wrap declarations in a namespace; no index file is written"
    )]
    pub namespace: Option<String>,
    #[arg(long = "strict", help = "Fail on source types missing from the type map")]
    pub strict: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(output_dir) = args.output_dir {
        config = config.with_output_dir(output_dir);
    }
    if args.namespace.is_some() {
        config = config.with_namespace(args.namespace);
    }
    if args.strict {
        config = config.with_strict(true);
    }

    let manifest = Manifest::load(&args.manifest).map_err(|err| err.to_string())?;
    let result = generate(&config, &manifest).map_err(|err| err.to_string())?;

    for diagnostic in &result.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let index = if result.index.is_some() { " and index" } else { "" };
    println!(
        "Generated {} declaration file(s){index} in {}",
        result.units.len(),
        config.output_dir.display()
    );
    Ok(())
}
