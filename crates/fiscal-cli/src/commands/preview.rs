//! Preview command implementation.

use crate::cli::PreviewArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fiscal_domain::traits::DocumentReader;
use fiscal_domain::{DocumentKind, DomainScope, KeywordSet, RawFragment, SourceDocument};
use fiscal_extractor::{fragment_text, PromptBuilder, TableFilter, Verdict};
use fiscal_sources::FileReader;

/// Execute the preview command.
pub fn execute_preview(args: PreviewArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    config.validate()?;

    let kind = DocumentKind::from_path(&args.file)
        .ok_or_else(|| CliError::InvalidInput(format!("{} is not a PDF or spreadsheet", args.file.display())))?;
    let document = SourceDocument { path: args.file.clone(), kind };
    let fragments = FileReader::new().read(&document)?;

    let scopes: Vec<DomainScope> = match args.scope {
        Some(scope) => vec![scope.into()],
        None => DomainScope::ALL.to_vec(),
    };
    let prompts = PromptBuilder::new(&config.catalog(), config.extractor.max_text_length);

    for scope in scopes {
        let keywords = config.keywords(scope).unwrap_or_else(|| KeywordSet::reference(scope));
        let filter = TableFilter::from_config(keywords, &config.extractor);

        println!("{}", formatter.heading(&format!("## {}", scope.label())));
        for line in verdict_lines(&filter, &fragments) {
            println!("{}", line);
        }

        let filtered = filter.filter(&fragments);
        if filtered.is_empty() {
            println!("{}", formatter.warning("No relevant fragments, no completion call would be made"));
            println!();
            continue;
        }

        if args.text_only {
            println!("{}", filtered.render());
        } else {
            let prompt = prompts.build(&filtered.render(), scope);
            println!("{}", prompt.as_str());
            if let Some(cut) = prompt.truncation() {
                println!(
                    "{}",
                    formatter.warning(&format!(
                        "Table text truncated from {} to {} characters",
                        cut.original_chars, cut.kept_chars
                    ))
                );
            }
        }
        println!();
    }

    Ok(())
}

/// One line per fragment: its source and the filter's decision
fn verdict_lines(filter: &TableFilter, fragments: &[RawFragment]) -> Vec<String> {
    fragments
        .iter()
        .map(|fragment| {
            let decision = match filter.verdict(fragment, &fragment_text(fragment)) {
                Verdict::Keep => "kept".to_string(),
                Verdict::NoTable => "skipped: no table".to_string(),
                Verdict::Excluded(marker) => format!("skipped: contains {}", marker),
                Verdict::NoKeyword => "skipped: no keyword".to_string(),
            };
            format!("  {:<12} {}", fragment.source().to_string(), decision)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_extractor::ExtractorConfig;

    #[test]
    fn test_verdict_lines() {
        let filter = TableFilter::from_config(KeywordSet::reference(DomainScope::General), &ExtractorConfig::default());
        let fragments = vec![
            RawFragment::page("r.pdf", 1, vec![vec!["税收收入".into(), "100".into()]], true),
            RawFragment::page("r.pdf", 2, vec![vec!["说明".into()]], false),
            RawFragment::page("r.pdf", 3, vec![vec!["支出功能分类".into(), "税收收入".into()]], true),
        ];

        let lines = verdict_lines(&filter, &fragments);
        assert!(lines[0].contains("第1页") && lines[0].ends_with("kept"));
        assert!(lines[1].ends_with("no table"));
        assert!(lines[2].ends_with("contains 功能分类"));
    }
}
