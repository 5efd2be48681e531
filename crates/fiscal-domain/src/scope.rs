//! Domain scopes and their keyword vocabularies

use std::fmt;

/// General-budget vocabulary (一般公共预算)
const GENERAL_KEYWORDS: &[&str] = &[
    "一般公共预算收入决算",
    "税收收入",
    "增值税",
    "营业税",
    "企业所得税",
    "个人所得税",
    "资源税",
    "城市维护建设税",
    "房产税",
    "印花税",
    "城镇土地使用税",
    "土地增值税",
    "车船税",
    "耕地占用税",
    "契税",
    "烟叶税",
    "环境保护税",
    "非税收入",
    "专项收入",
    "行政事业性收费收入",
    "罚没收入",
    "国有资本经营收入",
    "国有资源(资产)有偿使用收入",
    "一般公共预算支出决算",
    "一般公共服务支出",
    "上级补助收入",
    "返还性收入",
    "一般性转移支付收入",
    "专项转移支付收入",
    "公共预算上年结余资金",
    "公共预算调入资金",
    "公共预算债务转贷收入",
    "一般公共预算总收入",
    "公共预算债务还本支出",
    "一般公共预算总支出",
];

/// Government-fund and debt vocabulary (政府性基金)
const FUND_KEYWORDS: &[&str] = &[
    "政府性基金收入决算",
    "政府性基金支出决算",
    "政府性基金预算收入决算",
    "政府性基金预算支出决算",
    "政府性基金预算收支决算",
    "政府性基金收支",
    "政府债务限额",
    "一般债务限额",
    "专项债务限额",
    "政府债务余额",
    "一般债务余额",
    "专项债务余额",
];

/// Which keyword set and extraction emphasis is active for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainScope {
    /// General public budget revenue, expenditure and transfers
    General,
    /// Government funds and government debt
    Fund,
}

impl DomainScope {
    /// Every scope, in the order a document is processed
    pub const ALL: [DomainScope; 2] = [DomainScope::General, DomainScope::Fund];

    /// Human-readable label used in prompts and logs
    pub fn label(&self) -> &'static str {
        match self {
            DomainScope::General => "一般公共预算",
            DomainScope::Fund => "政府性基金",
        }
    }

    /// Extraction emphasis handed to the completion service for this scope
    pub fn emphasis(&self) -> &'static str {
        match self {
            DomainScope::General => GENERAL_EMPHASIS,
            DomainScope::Fund => FUND_EMPHASIS,
        }
    }
}

const GENERAL_EMPHASIS: &str = "重点关注一般公共预算相关数据，包括：
- 一般公共预算收入（总收入、税收收入、非税收入等）
- 一般公共预算支出（总支出、一般公共服务支出等）
- 转移支付收入（返还性收入、一般性转移支付收入、专项转移支付收入）";

const FUND_EMPHASIS: &str = "重点关注政府性基金和债务相关数据，包括：
- 政府性基金收入和支出
- 政府债务限额（一般债务限额、专项债务限额）
- 政府债务余额（一般债务余额、专项债务余额）
- 政府性基金表中的\"上级补助收入\"即指标\"上级补助收入（政府性基金中出现的）\"，该数值可以是负数，请提取！
- 政府性基金表中的项目X即指标\"政府性基金X\"，如\"债务转贷收入\"对应\"政府性基金债务转贷收入\"，\"调出资金\"对应\"政府性基金调出资金\"";

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keywords whose presence marks a fragment as relevant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a keyword set; empty entries are ignored
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// The reference vocabulary for a scope
    pub fn reference(scope: DomainScope) -> Self {
        match scope {
            DomainScope::General => Self::new(GENERAL_KEYWORDS),
            DomainScope::Fund => Self::new(FUND_KEYWORDS),
        }
    }

    /// Does any keyword occur as a substring of `text`?
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Keywords in the set
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// True for a set that can never match
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
