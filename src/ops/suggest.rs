use crate::model::config::{FieldNames, SuggestConfig};
use crate::model::session::FieldSnapshot;
use crate::model::tag::TagLabel;

/// Suggest tags for the given form fields.
///
/// Pure: the same snapshot, selection and config always give the same list.
/// Candidates come from, in order:
/// 1. every keyword found (case-insensitive substring) in the joined field values
/// 2. the rule for an exact `status` value
/// 3. a 4-character alphanumeric stock code, combined with the company name
///
/// The list is deduplicated (first occurrence wins), anything already in
/// `selected` is dropped, and it is cut to `config.max_suggestions`.
pub fn suggest_tags(
    fields: &FieldSnapshot,
    selected: &[TagLabel],
    config: &SuggestConfig,
) -> Vec<TagLabel> {
    let text = fields
        .values()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut candidates: Vec<String> = Vec::new();

    for (keyword, tags) in &config.keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && text.contains(&keyword) {
            candidates.extend(tags.iter().cloned());
        }
    }

    if let Some(status) = first_field(fields, &config.fields.status)
        && let Some(tag) = config.status.get(status)
    {
        candidates.push(tag.clone());
    }

    if let Some(tag) = stock_code_tag(fields, &config.fields) {
        candidates.push(tag);
    }

    let mut suggestions: Vec<TagLabel> = Vec::new();
    for candidate in candidates {
        if suggestions.len() >= config.max_suggestions {
            break;
        }
        let Some(label) = TagLabel::parse(&candidate) else {
            continue;
        };
        if !selected.contains(&label) && !suggestions.contains(&label) {
            suggestions.push(label);
        }
    }
    suggestions
}

/// `#<code><company>` (or `#<code>`) for a 4-character alphanumeric code
fn stock_code_tag(fields: &FieldSnapshot, names: &FieldNames) -> Option<String> {
    let code = first_field(fields, &names.stock_code)?;
    if !is_stock_code(code) {
        return None;
    }
    match first_field(fields, &names.company_name) {
        Some(company) => Some(format!("#{}{}", code, company)),
        None => Some(format!("#{}", code)),
    }
}

pub fn is_stock_code(code: &str) -> bool {
    code.chars().count() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// First alias with a non-blank value, trimmed
fn first_field<'a>(fields: &'a FieldSnapshot, aliases: &[String]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|name| fields.get(name))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}
