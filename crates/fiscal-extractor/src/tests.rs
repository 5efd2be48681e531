//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{DirectoryAggregator, Extractor, ExtractorConfig, ExtractorError};
    use fiscal_domain::{IndicatorCatalog, RawFragment};
    use fiscal_llm::{MockFailure, MockProvider};
    use std::path::Path;

    fn table(document: &str, sheet: &str, rows: &[&[&str]]) -> RawFragment {
        RawFragment::sheet(
            document,
            sheet,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            retry_base_delay_ms: 1,
            ..ExtractorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_full_directory_flow() {
        let llm = MockProvider::default();
        llm.add_response_containing("=== 收入A ===", "全市-税收收入: 100.00\n说明：单位万元");
        llm.add_response_containing("=== 收入B ===", "全市-税收收入: 250\n全市-印花税: 5");

        let catalog = IndicatorCatalog::reference();
        let extractor = Extractor::new(llm.clone(), catalog.clone(), config()).unwrap();

        let doc_a = table("2019/a.xlsx", "收入A", &[&["项目", "决算数"], &["税收收入", "100"]]);
        let doc_b = table("2019/b.xlsx", "收入B", &[&["税收收入", "250"], &["印花税", "5"]]);

        let mut aggregator = DirectoryAggregator::new("2019");
        for fragment in [doc_a, doc_b] {
            let path = fragment.document().to_path_buf();
            let extraction = extractor.extract(&path, std::slice::from_ref(&fragment)).await;
            aggregator.fold(&path, Ok(extraction));
        }

        let (row, summary) = aggregator.finish(&catalog);
        let position = |name: &str| catalog.iter().position(|n| n == name).unwrap() + 1;

        assert_eq!(row.fields()[0], "2019");
        assert_eq!(row.fields()[position("税收收入")], "250.00");
        assert_eq!(row.fields()[position("印花税")], "5.00");
        assert_eq!(row.filled(), 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_scopes_combine_with_max_wins() {
        // Both scopes report the same indicator; the larger value survives
        let llm = MockProvider::default();
        llm.add_response_containing("重点关注一般公共预算", "全市-一般公共预算收入: 900");
        llm.add_response_containing("重点关注政府性基金", "全市-一般公共预算收入: 1,200\n全市-政府债务余额: 75");

        let catalog = IndicatorCatalog::reference();
        let extractor = Extractor::new(llm.clone(), catalog, config()).unwrap();

        let fragments = [
            table("r.xlsx", "表一", &[&["一般公共预算收入决算表"], &["税收收入", "1"]]),
            table("r.xlsx", "表十", &[&["政府债务余额", "75"]]),
        ];
        let result = extractor.extract(Path::new("r.xlsx"), &fragments).await;

        assert_eq!(result.record.value("一般公共预算收入"), Some("1200.00"));
        assert_eq!(result.record.value("政府债务余额"), Some("75.00"));
    }

    #[tokio::test]
    async fn test_failed_scope_keeps_other_scope() {
        let llm = MockProvider::default();
        llm.add_response_containing("重点关注政府性基金", "全市-专项债务余额: 42");
        llm.queue_failure(MockFailure::InvalidResponse);

        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), config()).unwrap();
        let fragments = [
            table("r.xlsx", "表一", &[&["增值税", "1"]]),
            table("r.xlsx", "表二", &[&["专项债务余额", "42"]]),
        ];
        let result = extractor.extract(Path::new("r.xlsx"), &fragments).await;

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.record.len(), 1);
        assert_eq!(result.record.value("专项债务余额"), Some("42.00"));

        let mut aggregator = DirectoryAggregator::new("r");
        aggregator.fold(Path::new("r.xlsx"), Ok(result));
        let (_, summary) = aggregator.finish(&IndicatorCatalog::reference());
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.scope_failures, 1);
    }

    #[tokio::test]
    async fn test_truncation_is_reported() {
        let llm = MockProvider::new("全市-契税: 1");
        let small = ExtractorConfig {
            max_text_length: 19,
            ..config()
        };
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), small).unwrap();

        let fragment = table("r.xlsx", "很长的表", &[&["契税", "1"], &["说明", "这是一段很长的说明文字"]]);
        let result = extractor.extract(Path::new("r.xlsx"), &[fragment]).await;

        assert!(result.metadata.truncated);
        let prompt = &llm.prompts()[0];
        assert!(prompt.ends_with("=== 很长的表 ===\n契税 | 1"));
    }

    #[tokio::test]
    async fn test_unreadable_document_leaves_row_complete() {
        let catalog = IndicatorCatalog::new(["税收收入", "契税"]);
        let mut aggregator = DirectoryAggregator::new("坏目录");
        aggregator.fold(Path::new("x.pdf"), Err(ExtractorError::Read("not a PDF".into())));

        let (row, _) = aggregator.finish(&catalog);
        assert_eq!(row.fields(), vec!["坏目录", "", ""]);
    }
}
