//! Config command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Write the default configuration to `path` (or the default path).
pub fn execute_init(path: Option<&Path>, force: bool, formatter: &Formatter) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    Config::default().save(&path)?;
    println!("{}", formatter.success(&format!("Wrote default configuration to {}", path.display())));
    Ok(())
}

/// Print the effective configuration with the API key masked.
pub fn execute_show(config: &Config) -> Result<()> {
    print!("{}", masked(config).to_toml()?);
    Ok(())
}

fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("********".to_string());
    }
    shown
}
