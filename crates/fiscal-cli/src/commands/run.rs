//! Run command implementation.

use crate::batch::{build_extractor, BatchRunner};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::sink::{default_output_path, CsvSink};
use fiscal_llm::OpenAiProvider;
use fiscal_sources::{DirectoryScanner, FileReader};
use std::fs;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, mut config: Config, formatter: &Formatter) -> Result<()> {
    args.apply_to(&mut config);
    config.validate()?;

    // Fail on a bad encoding or root before any completion call is made
    let sink = CsvSink::new(&config.output.encoding, config.output.label_header.clone())?;
    let leaves = DirectoryScanner::new().scan(&args.root)?;
    let root = fs::canonicalize(&args.root)?;
    let output = args.output.unwrap_or_else(|| default_output_path(&root));

    info!(root = %root.display(), leaves = leaves.len(), output = %output.display(), "Scan complete, starting extraction");

    let provider = OpenAiProvider::new(config.llm.clone())?;
    let runner = BatchRunner::new(build_extractor(provider, &config)?, FileReader::new())
        .with_concurrency(config.batch.concurrency);

    let report = runner.run(&leaves).await;
    sink.write(&output, runner.extractor().catalog(), &report.rows)?;

    println!("{}", formatter.format_summaries(&report.summaries)?);
    println!("{}", formatter.success(&format!("Wrote {}", output.display())));

    Ok(())
}
