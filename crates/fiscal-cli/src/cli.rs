//! CLI command definitions and argument parsing.

use crate::config::{Config, API_KEY_ENV};
use clap::{Args, Parser, Subcommand};
use fiscal_domain::DomainScope;
use std::path::PathBuf;

/// Fiscal Extract - Pull fiscal indicators out of budget reports.
#[derive(Debug, Parser)]
#[command(name = "fiscal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.fiscal/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format for summaries
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Settings that take precedence over the configuration file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API key for the completion service
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum table text per prompt (characters)
    #[arg(long, global = true)]
    pub max_text_length: Option<usize>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract every leaf directory under ROOT into one CSV file
    Run(RunArgs),

    /// List leaf directories and their documents without reading them
    Scan(ScanArgs),

    /// Show the filtered text and prompts for one document, without calling the model
    Preview(PreviewArgs),

    /// Print the effective configuration, or write a default file
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Root of the directory tree to process
    pub root: PathBuf,

    /// CSV file to write (default: next to ROOT, named 财政数据汇总<ROOT>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directories processed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Encoding of the CSV file (e.g. gbk, utf-8)
    #[arg(long)]
    pub encoding: Option<String>,
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Root of the directory tree to list
    pub root: PathBuf,
}

/// Arguments for the preview command.
#[derive(Debug, Parser)]
pub struct PreviewArgs {
    /// PDF or spreadsheet to preview
    pub file: PathBuf,

    /// Only preview one scope
    #[arg(short, long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// Print the filtered text only, not the full prompt
    #[arg(long)]
    pub text_only: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Write the default configuration to the config path
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

/// Scope argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScopeArg {
    /// General public budget
    General,
    /// Government funds and debt
    Fund,
}

impl From<ScopeArg> for DomainScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::General => DomainScope::General,
            ScopeArg::Fund => DomainScope::Fund,
        }
    }
}

impl Overrides {
    /// Apply the flags that were given.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.llm.endpoint = endpoint.clone();
        }
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            config.llm.api_key = Some(key.clone());
        }
        if let Some(max) = self.max_text_length {
            config.extractor.max_text_length = max;
        }
    }
}

impl RunArgs {
    /// Apply run-only flags.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(concurrency) = self.concurrency {
            config.batch.concurrency = concurrency;
        }
        if let Some(encoding) = &self.encoding {
            config.output.encoding = encoding.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["fiscal", "run", "data/北京", "-o", "out.csv", "--concurrency", "4"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.root, PathBuf::from("data/北京"));
                assert_eq!(args.output, Some(PathBuf::from("out.csv")));
                assert_eq!(args.concurrency, Some(4));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fiscal", "scan", "data", "--verbose", "--no-color", "--format", "json"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.format, CliFormat::Json);
        assert!(matches!(cli.command, Command::Scan(_)));
    }

    #[test]
    fn test_preview_scope() {
        let cli = Cli::parse_from(["fiscal", "preview", "决算.pdf", "--scope", "fund"]);
        match cli.command {
            Command::Preview(args) => {
                assert_eq!(args.scope, Some(ScopeArg::Fund));
                assert!(!args.text_only);
            }
            _ => panic!("Expected Preview command"),
        }
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["fiscal", "config", "--force"]).is_err());
        assert!(Cli::try_parse_from(["fiscal", "config", "--init", "--force"]).is_ok());
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "fiscal",
            "--model",
            "qwen-plus",
            "--max-text-length",
            "5000",
            "--api-key",
            "sk-test",
            "run",
            "data",
            "--encoding",
            "utf-8",
        ]);

        let mut config = Config::default();
        cli.overrides.apply_to(&mut config);
        if let Command::Run(args) = &cli.command {
            args.apply_to(&mut config);
        }

        assert_eq!(config.llm.model, "qwen-plus");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.extractor.max_text_length, 5000);
        assert_eq!(config.output.encoding, "utf-8");
        assert_eq!(config.batch.concurrency, 1);
    }

    #[test]
    fn test_scope_conversion() {
        let scope: DomainScope = ScopeArg::General.into();
        assert_eq!(scope, DomainScope::General);
    }
}
