use serde_json::Value;

use crate::data::models::{PromptRecord, UNCATEGORIZED, UNTITLED_PROMPT};
use crate::utils::{contains_han, first_str, non_empty_str, scalar_to_string};

const TITLE_FIELDS: &[&str] = &["title", "name"];
const CONTENT_FIELDS: &[&str] = &["content", "text", "prompt"];
const CHINESE_FIELDS: &[&str] = &["content_zh", "zh_content"];
const ENGLISH_FIELDS: &[&str] = &["content_en", "en_content"];

/// Builds a canonical record from one raw JSON value. Never fails: anything
/// missing or malformed falls back to its default.
pub fn normalize(raw: &Value, positional_index: usize) -> PromptRecord {
    let id = raw
        .get("id")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| (positional_index + 1).to_string());

    let title = first_str(raw, TITLE_FIELDS)
        .unwrap_or(UNTITLED_PROMPT)
        .to_string();

    let primary_content = first_str(raw, CONTENT_FIELDS).unwrap_or_default().to_string();
    let chinese_content = first_str(raw, CHINESE_FIELDS).map(str::to_string);
    let english_content = first_str(raw, ENGLISH_FIELDS).map(str::to_string);

    let is_chinese = match raw.get("is_zh").and_then(Value::as_bool) {
        Some(flag) => flag,
        None => chinese_content.is_some() || contains_han(&primary_content),
    };

    PromptRecord {
        id,
        title,
        categories: categories_of(raw),
        primary_content,
        chinese_content,
        english_content,
        is_chinese,
    }
}

fn categories_of(raw: &Value) -> Vec<String> {
    let listed: Vec<String> = raw
        .get("categories")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if !listed.is_empty() {
        return listed;
    }

    match non_empty_str(raw, "category") {
        Some(category) => vec![category.to_string()],
        None => vec![UNCATEGORIZED.to_string()],
    }
}
