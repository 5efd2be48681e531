//! The ordered catalog of target indicators

use std::collections::HashSet;

/// Reference catalog: the figures reported in a municipal final-accounts
/// (决算) package, in output column order.
const REFERENCE_INDICATORS: &[&str] = &[
    "一般公共预算收入",
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
    "一般公共预算支出",
    "一般公共服务支出",
    "外交支出",
    "国防支出",
    "公共安全支出",
    "教育支出",
    "科学技术支出",
    "文化体育与传媒支出",
    "社会保障和就业支出",
    "医疗卫生与计划生育支出",
    "节能环保支出",
    "城乡社区支出",
    "农林水支出",
    "交通运输支出",
    "资源勘探信息等支出",
    "商业服务业等支出",
    "金融支出",
    "援助其他地区支出",
    "国土海洋气象等支出",
    "住房保障支出",
    "粮油物资储备支出",
    "债务付息支出",
    "上级补助收入",
    "返还性收入",
    "一般性转移支付收入",
    "专项转移支付收入",
    "上年结余资金",
    "调入资金",
    "债务转贷收入",
    "一般公共预算总收入",
    "债务还本支出",
    "一般公共预算总支出",
    "政府性基金收入",
    "政府性基金预算收入",
    "国有土地使用权出让收入",
    "上级补助收入（政府性基金中出现的）",
    "政府性基金债务转贷收入",
    "政府性基金总收入",
    "政府性基金支出",
    "政府性基金债务付息支出",
    "政府性基金债务还本支出",
    "政府性基金调出资金",
    "政府性基金总支出",
    "政府债务限额",
    "一般债务限额",
    "专项债务限额",
    "政府债务余额",
    "一般债务余额",
    "专项债务余额",
];

/// Fixed, ordered list of indicator names
///
/// Order determines output column order. Membership is exact (case- and
/// whitespace-sensitive) after trimming the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorCatalog {
    names: Vec<String>,
    members: HashSet<String>,
}

impl IndicatorCatalog {
    /// Build a catalog from names
    ///
    /// Entries are trimmed; empty entries and repeats are dropped (the first
    /// occurrence keeps its position).
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscal_domain::IndicatorCatalog;
    ///
    /// let catalog = IndicatorCatalog::new([" 税收收入", "印花税", "税收收入", ""]);
    /// assert_eq!(catalog.names(), &["税收收入".to_string(), "印花税".to_string()]);
    /// ```
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || members.contains(name) {
                continue;
            }
            members.insert(name.to_string());
            ordered.push(name.to_string());
        }
        Self {
            names: ordered,
            members,
        }
    }

    /// The reference catalog of municipal fiscal indicators
    pub fn reference() -> Self {
        Self::new(REFERENCE_INDICATORS)
    }

    /// Catalog membership of a (trimmed) label
    pub fn contains(&self, label: &str) -> bool {
        self.members.contains(label.trim())
    }

    /// Names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate names in column order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of indicators
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True for a catalog without indicators
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
