//! Extraction prompt assembly

use fiscal_domain::{DomainScope, IndicatorCatalog, SECTION_SEPARATOR};
use tracing::warn;

/// Builds bounded extraction prompts for one indicator catalog
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    indicators: String,
    max_length: usize,
}

/// A built prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    table_start: usize,
    truncation: Option<Truncation>,
}

/// Character counts of a cut table text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Characters before the cut
    pub original_chars: usize,
    /// Characters kept
    pub kept_chars: usize,
}

impl Prompt {
    /// Full prompt text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The table text embedded at the end of the prompt
    pub fn table_text(&self) -> &str {
        &self.text[self.table_start..]
    }

    /// Present when the table text was cut at the length limit
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    /// Prompt length in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl PromptBuilder {
    /// Create a builder for `catalog` embedding at most `max_length` table characters
    pub fn new(catalog: &IndicatorCatalog, max_length: usize) -> Self {
        Self {
            indicators: catalog.names().join("; "),
            max_length,
        }
    }

    /// Table-text limit in characters
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Build the complete extraction prompt for one scope
    ///
    /// The table text is cut at `max_length` characters without regard for
    /// row or section boundaries.
    pub fn build(&self, filtered_text: &str, scope: DomainScope) -> Prompt {
        let (table, truncation) = truncate_chars(filtered_text, self.max_length);
        if let Some(t) = truncation {
            warn!(
                scope = %scope,
                original_chars = t.original_chars,
                kept_chars = t.kept_chars,
                "Table text truncated for prompt"
            );
        }

        let mut text = String::with_capacity(filtered_text.len().min(self.max_length.saturating_mul(4)) + 2048);

        // 1. Reading instructions and output grammar
        text.push_str(&format!(
            "输入的文本数据，请你按照表格样式来理解，如果遇到\"{}\"，说明到下一个表格了；注意指标与列对应的关系！！！\n",
            SECTION_SEPARATOR
        ));
        text.push_str(EXTRACTION_RULES);
        text.push_str("\n\n");

        // 2. Scope emphasis
        text.push_str(scope.emphasis());
        text.push_str("\n\n");

        // 3. Catalog
        text.push_str("目标指标：\n");
        text.push_str(&self.indicators);
        text.push_str("\n\n");

        // 4. Table text, always last
        text.push_str("表格内容：\n");
        let table_start = text.len();
        text.push_str(table);

        Prompt {
            text,
            table_start,
            truncation,
        }
    }
}

/// Keep at most `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, Option<Truncation>) {
    match text.char_indices().nth(max_chars) {
        None => (text, None),
        Some((cut, _)) => {
            let truncation = Truncation {
                original_chars: text.chars().count(),
                kept_chars: max_chars,
            };
            (&text[..cut], Some(truncation))
        }
    }
}

const EXTRACTION_RULES: &str = "其他要求：
1. 不区分市级和市本级，统一当作市级处理
2. 必须确保输出格式是：
   全市-指标名称: 数值
3. 数值可以是负数，如\"专项转移支付收入\"对应的数字是负数，请提取！
4. 如果找不到某个指标的数据，请跳过该指标，不要猜测";


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the embedded table text never exceeds the limit
        #[test]
        fn test_truncation_boundary(text in "\\PC{0,300}", max in 1usize..200) {
            let prompt = builder_for(max).build(&text, DomainScope::General);
            let embedded = prompt.table_text();

            prop_assert!(embedded.chars().count() <= max);
            prop_assert!(text.starts_with(embedded));
            prop_assert_eq!(prompt.truncation().is_some(), text.chars().count() > max);
        }
    }

    fn builder_for(max: usize) -> PromptBuilder {
        PromptBuilder::new(&IndicatorCatalog::reference(), max)
    }
}
