#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cli;

#[derive(Parser)]
#[command(
    name = "sertypes",
    version,
    about = "Generate TypeScript declarations from serializer definitions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one declaration file per exported serializer
    Generate(cli::generate::GenerateArgs),
    /// Print the effective source -> TypeScript type table
    TypeMap(cli::type_map::TypeMapArgs),
}

fn main() {
    init_tracing();
    std::process::exit(run_cli(std::env::args_os()));
}

fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::generate::run(args),
            Some(Commands::TypeMap(args)) => cli::type_map::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // SERTYPES_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full filter directive like "sertypes_core=debug"
    let filter = match std::env::var("SERTYPES_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("sertypes={level},sertypes_core={level}")
        }
        Ok(directive) => directive,
        Err(_) => "sertypes=info,sertypes_core=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain_level() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("sertypes_core=debug"));
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "sertypes",
            "generate",
            "--manifest",
            "serializers.yaml",
            "--namespace",
            "Schema",
            "--strict",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Some(Commands::Generate(ref args))) if args.strict && args.namespace.as_deref() == Some("Schema")
        ));
    }

    #[test]
    fn test_missing_manifest_is_usage_error() {
        assert_eq!(run_cli(["sertypes", "generate"]), 2);
    }
}
