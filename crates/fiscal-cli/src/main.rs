//! Fiscal Extract CLI - Batch extraction of fiscal indicators into CSV.

use anyhow::Context;
use clap::Parser;
use fiscal_cli::commands;
use fiscal_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let formatter = Formatter::new(cli.format, !cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&format!("Error: {:#}", e)));
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, formatter: &Formatter) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    // --init must work before any configuration file exists
    if let Command::Config(args) = &cli.command {
        if args.init {
            return commands::execute_init(config_path, args.force, formatter)
                .context("failed to write configuration");
        }
    }

    let mut config = Config::load(config_path).context("failed to load configuration")?;
    cli.overrides.apply_to(&mut config);

    match cli.command {
        Command::Run(args) => {
            let root = args.root.display().to_string();
            commands::execute_run(args, config, formatter)
                .await
                .with_context(|| format!("batch over {} failed", root))?;
        }
        Command::Scan(args) => {
            commands::execute_scan(args, formatter)?;
        }
        Command::Preview(args) => {
            let file = args.file.display().to_string();
            commands::execute_preview(args, &config, formatter)
                .with_context(|| format!("failed to preview {}", file))?;
        }
        Command::Config(_) => {
            commands::execute_show(&config)?;
        }
    }

    Ok(())
}
