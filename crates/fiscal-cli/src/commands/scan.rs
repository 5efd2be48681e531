//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::error::Result;
use crate::output::Formatter;
use fiscal_sources::DirectoryScanner;

/// Execute the scan command.
pub fn execute_scan(args: ScanArgs, formatter: &Formatter) -> Result<()> {
    let leaves = DirectoryScanner::new().scan(&args.root)?;
    let documents: usize = leaves.iter().map(|l| l.documents.len()).sum();

    println!("{}", formatter.format_leaves(&leaves)?);
    eprintln!(
        "{}",
        formatter.info(&format!("{} leaf directories, {} documents", leaves.len(), documents))
    );

    Ok(())
}
