use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Suggestion rules from tagdelta.toml. Every section is optional; an
/// absent section falls back to the built-in investment-note vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Upper bound on returned suggestions
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Keyword (matched case-insensitively as a substring) → tags it suggests.
    /// Document order is preserved and decides suggestion order.
    #[serde(default = "default_keywords")]
    pub keywords: IndexMap<String, Vec<String>>,
    /// Exact `status` field value → tag
    #[serde(default = "default_status")]
    pub status: IndexMap<String, String>,
    #[serde(default)]
    pub fields: FieldNames,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            max_suggestions: default_max_suggestions(),
            keywords: default_keywords(),
            status: default_status(),
            fields: FieldNames::default(),
        }
    }
}

/// Which snapshot keys feed the status and stock-code rules. Each entry is a
/// list of aliases; the first non-blank one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_status_fields")]
    pub status: Vec<String>,
    #[serde(default = "default_stock_code_fields")]
    pub stock_code: Vec<String>,
    #[serde(default = "default_company_name_fields")]
    pub company_name: Vec<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            status: default_status_fields(),
            stock_code: default_stock_code_fields(),
            company_name: default_company_name_fields(),
        }
    }
}

fn default_max_suggestions() -> usize {
    6
}

fn default_keywords() -> IndexMap<String, Vec<String>> {
    const TABLE: &[(&str, &[&str])] = &[
        ("配当", &["#高配当", "#配当株", "#株主還元"]),
        ("成長", &["#成長株", "#長期投資"]),
        ("割安", &["#割安株", "#バリュー投資"]),
        ("テクノロジー", &["#テクノロジー", "#IT"]),
        ("自動車", &["#自動車", "#製造業"]),
        ("トヨタ", &["#7203トヨタ", "#自動車", "#高配当"]),
        ("ソニー", &["#6758ソニー", "#エンタメ", "#半導体"]),
        ("ソフトバンク", &["#9984ソフトバンク", "#通信", "#投資事業"]),
        ("決算", &["#決算分析", "#業績好調"]),
        ("リスク", &["#要注意", "#リスク要因"]),
        ("目標", &["#投資目標", "#戦略"]),
        ("長期", &["#長期投資", "#長期保有"]),
        ("短期", &["#短期取引", "#スイング"]),
        ("優待", &["#株主優待", "#優待株"]),
        ("新規", &["#新規投資", "#初回購入"]),
        ("追加", &["#追加投資", "#買い増し"]),
        ("ニュース", &["#ニュース", "#市場動向"]),
        ("業績", &["#業績分析", "#決算"]),
        ("競合", &["#競合分析", "#業界動向"]),
    ];
    TABLE
        .iter()
        .map(|(keyword, tags)| {
            (
                keyword.to_string(),
                tags.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

fn default_status() -> IndexMap<String, String> {
    [
        ("ACTIVE", "#アクティブ投資"),
        ("MONITORING", "#要監視"),
        ("ATTENTION", "#要注意"),
        ("ARCHIVED", "#アーカイブ"),
    ]
    .into_iter()
    .map(|(status, tag)| (status.to_string(), tag.to_string()))
    .collect()
}

fn default_status_fields() -> Vec<String> {
    vec!["status".into()]
}

fn default_stock_code_fields() -> Vec<String> {
    vec!["stock_code".into(), "stockCode".into()]
}

fn default_company_name_fields() -> Vec<String> {
    vec!["company_name".into(), "companyName".into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SuggestConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_suggestions, 6);
        assert_eq!(config.keywords.len(), 19);
        assert_eq!(config.status.get("MONITORING").unwrap(), "#要監視");
        assert_eq!(config.fields.stock_code, vec!["stock_code", "stockCode"]);
    }

    #[test]
    fn test_keywords_keep_document_order() {
        let config: SuggestConfig = toml::from_str(
            r##"
max_suggestions = 3

[keywords]
zeta = ["#z"]
alpha = ["#a", "#aa"]
"##,
        )
        .unwrap();
        assert_eq!(config.max_suggestions, 3);
        let keys: Vec<&str> = config.keywords.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        // status was not given, so it keeps the defaults
        assert_eq!(config.status.len(), 4);
    }

    #[test]
    fn test_partial_fields_section() {
        let config: SuggestConfig = toml::from_str(
            r#"
[fields]
stock_code = ["ticker"]
"#,
        )
        .unwrap();
        assert_eq!(config.fields.stock_code, vec!["ticker"]);
        assert_eq!(config.fields.status, vec!["status"]);
        assert_eq!(config.fields.company_name, vec!["company_name", "companyName"]);
    }
}
