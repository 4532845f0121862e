use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::data::models::{PromptRecord, ResolvedContent};
use crate::utils::{char_prefix, first_str, non_empty_str};

pub const AUTO_TRANSLATED_MARKER: &str = "[Auto-translated from Chinese]\n\n";

const PREFIX_MATCH_CHARS: usize = 30;
const SAMPLE_CHARS: usize = 50;
const ENGLISH_LETTER_RATIO: f64 = 0.6;

/// Chinese variant aliases; `translation_zh` holds the Chinese translation of English content.
const CHINESE_FIELDS: &[&str] = &["content_zh", "zh_content", "content_cn", "chinese", "translation_zh"];
const ENGLISH_FIELDS: &[&str] = &["content_en", "en_content", "english"];
const GENERIC_FIELD: &str = "content";

lazy_static! {
    static ref ENGLISH_KEY_RE: Regex = Regex::new(r"(?i)(^|[_\-\s])(en|eng|english)($|[_\-\s])").unwrap();
    static ref CHINESE_KEY_RE: Regex = Regex::new(r"(?i)(^|[_\-\s])(zh|cn|chinese)($|[_\-\s])").unwrap();
}

/// Cheap classifier: more than 60% ASCII letters over the first 50 characters.
pub fn looks_english(text: &str) -> bool {
    let sample = char_prefix(text, SAMPLE_CHARS);
    let total = sample.chars().count();
    if total == 0 {
        return false;
    }
    let letters = sample.chars().filter(char::is_ascii_alphabetic).count();
    letters as f64 / total as f64 > ENGLISH_LETTER_RATIO
}

/// Placeholder English pane echoing the Chinese text behind a fixed marker.
pub fn auto_translated(chinese: &str) -> String {
    format!("{}{}", AUTO_TRANSLATED_MARKER, chinese)
}

/// Resolves the Chinese and English content of `record` against the
/// bilingual dataset. Never fails; every dead end lands on the
/// auto-translated fallback.
pub fn resolve(record: &PromptRecord, source: &Value) -> ResolvedContent {
    let Some(entries) = source.as_array() else {
        let own = Some(record.primary_content.clone()).filter(|c| !c.is_empty());
        return fallback(own);
    };

    let own_chinese = record.own_chinese();
    let entry = positional_match(record, entries)
        .or_else(|| own_chinese.and_then(|zh| prefix_match(zh, entries)));

    let chinese = entry
        .and_then(|e| first_str(e, CHINESE_FIELDS))
        .or(own_chinese)
        .map(str::to_string);

    let own_english = record.english_content.as_deref().into_iter().chain(
        Some(record.primary_content.as_str()).filter(|c| !record.is_chinese && !c.is_empty()),
    );

    let english = entry
        .map(english_candidates)
        .unwrap_or_default()
        .into_iter()
        .chain(own_english)
        .find(|candidate| looks_english(candidate));

    match english {
        Some(english) => ResolvedContent {
            chinese,
            english: Some(english.to_string()),
            english_is_auto_translated: false,
        },
        None => fallback(chinese),
    }
}

fn fallback(chinese: Option<String>) -> ResolvedContent {
    let english = auto_translated(chinese.as_deref().unwrap_or_default());
    ResolvedContent {
        chinese,
        english: Some(english),
        english_is_auto_translated: true,
    }
}

fn positional_match<'a>(record: &PromptRecord, entries: &'a [Value]) -> Option<&'a Value> {
    let n = record.id.parse::<usize>().ok()?;
    if n == 0 || n > entries.len() {
        return None;
    }
    Some(&entries[n - 1]).filter(|e| e.is_object())
}

fn prefix_match<'a>(chinese: &str, entries: &'a [Value]) -> Option<&'a Value> {
    let wanted = char_prefix(chinese, PREFIX_MATCH_CHARS);
    entries.iter().find(|entry| {
        first_str(entry, CHINESE_FIELDS)
            .is_some_and(|zh| char_prefix(zh, PREFIX_MATCH_CHARS) == wanted)
    })
}

/// English candidates of one entry, in preference order. Each still has to
/// pass `looks_english`.
fn english_candidates(entry: &Value) -> Vec<&str> {
    let mut candidates: Vec<&str> = ENGLISH_FIELDS
        .iter()
        .filter_map(|key| non_empty_str(entry, key))
        .collect();

    if let Some(content) = non_empty_str(entry, GENERIC_FIELD) {
        candidates.push(content);
    }

    if let Some(fields) = entry.as_object() {
        let others = fields.iter().filter_map(|(key, value)| {
            let named_english = ENGLISH_KEY_RE.is_match(key) && !CHINESE_KEY_RE.is_match(key);
            let already_tried = key == GENERIC_FIELD || ENGLISH_FIELDS.contains(&key.as_str());
            if named_english && !already_tried {
                value.as_str().filter(|s| !s.is_empty())
            } else {
                None
            }
        });
        candidates.extend(others);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::normalizer::normalize;
    use serde_json::json;

    const ZH: &str = "你好世界这是一个很长的中文句子用于测试";
    const EN: &str = "Hello world this is a long test sentence";

    fn record(raw: Value) -> PromptRecord {
        normalize(&raw, 0)
    }

    #[test]
    fn heuristic_threshold_is_strict() {
        let at_threshold = format!("{}{}", "a".repeat(30), " ".repeat(20));
        let above = format!("{}{}", "a".repeat(31), " ".repeat(19));
        assert!(!looks_english(&at_threshold));
        assert!(looks_english(&above));
        assert!(!looks_english(""));
        assert!(!looks_english("这是中文"));
    }

    #[test]
    fn heuristic_only_samples_first_fifty_chars() {
        let text = format!("{}{}", "a".repeat(50), "中".repeat(200));
        assert!(looks_english(&text));
        let text = format!("{}{}", "中".repeat(50), "a".repeat(200));
        assert!(!looks_english(&text));
    }

    #[test]
    fn positional_match_returns_english_verbatim() {
        let source = json!([{"content_zh": ZH, "content_en": EN}]);
        let resolved = resolve(&record(json!({"id": "1", "content": ZH})), &source);
        assert_eq!(resolved.english.as_deref(), Some(EN));
        assert_eq!(resolved.chinese.as_deref(), Some(ZH));
        assert!(!resolved.english_is_auto_translated);
    }

    #[test]
    fn chinese_text_in_english_field_falls_back() {
        let source = json!([{"content_zh": ZH, "content_en": "这个字段其实是中文内容而不是英文"}]);
        let resolved = resolve(&record(json!({"id": "1", "content": ZH})), &source);
        let english = resolved.english.unwrap();
        assert!(english.starts_with(AUTO_TRANSLATED_MARKER));
        assert_eq!(english, auto_translated(ZH));
        assert!(resolved.english_is_auto_translated);
    }

    #[test]
    fn passing_candidate_is_preferred_over_failing_one() {
        let long_zh = "为".repeat(60);
        let source = json!([{
            "content_zh": long_zh,
            "content_en": "这不是英文这不是英文这不是英文",
            "content": "Act as a senior editor and tighten this paragraph",
        }]);
        let resolved = resolve(&record(json!({"id": 1, "content": long_zh})), &source);
        assert_eq!(
            resolved.english.as_deref(),
            Some("Act as a senior editor and tighten this paragraph")
        );
        assert!(!resolved.english_is_auto_translated);
    }

    #[test]
    fn english_named_fields_are_last_resort() {
        let source = json!([{
            "content_zh": ZH,
            "content": ZH,
            "title_zh_en": "Mixed Label Should Be Ignored",
            "prompt_en": "Summarize the following article in three bullets",
        }]);
        let resolved = resolve(&record(json!({"id": 1, "content": ZH})), &source);
        assert_eq!(
            resolved.english.as_deref(),
            Some("Summarize the following article in three bullets")
        );
    }

    #[test]
    fn prefix_match_when_id_is_not_positional() {
        let shared = "请扮演一位经验丰富的产品经理帮助我梳理需求并输出一份完整的文档";
        let source = json!([
            {"content_zh": "无关的内容", "content_en": "Unrelated entry text here"},
            {"content_zh": format!("{}（第二版）", shared), "content_en": "Act as a seasoned product manager"},
        ]);
        let target = record(json!({"id": "pm", "content": format!("{}。", shared)}));
        let resolved = resolve(&target, &source);
        assert_eq!(resolved.english.as_deref(), Some("Act as a seasoned product manager"));
        assert_eq!(resolved.chinese, Some(format!("{}（第二版）", shared)));
    }

    #[test]
    fn id_beyond_source_length_tries_prefix() {
        let source = json!([{"content_zh": ZH, "content_en": EN}]);
        let resolved = resolve(&record(json!({"id": 7, "content": ZH})), &source);
        assert_eq!(resolved.english.as_deref(), Some(EN));
    }

    #[test]
    fn unmatched_chinese_record_gets_marker() {
        let source = json!([{"content_zh": "完全不同", "content_en": EN}]);
        let resolved = resolve(&record(json!({"id": "z", "content": ZH})), &source);
        assert_eq!(resolved.chinese.as_deref(), Some(ZH));
        assert_eq!(resolved.english, Some(auto_translated(ZH)));
        assert!(resolved.english_is_auto_translated);
    }

    #[test]
    fn record_own_english_is_used_when_nothing_matches() {
        let source = json!([]);
        let resolved = resolve(
            &record(json!({"id": "z", "content_zh": ZH, "content_en": EN})),
            &source,
        );
        assert_eq!(resolved.english.as_deref(), Some(EN));
        assert_eq!(resolved.chinese.as_deref(), Some(ZH));

        let resolved = resolve(&record(json!({"id": "z", "content": EN})), &source);
        assert_eq!(resolved.english.as_deref(), Some(EN));
        assert_eq!(resolved.chinese, None);
    }

    #[test]
    fn malformed_source_uses_record_content() {
        for source in [json!(null), json!({"prompts": []}), json!("oops")] {
            let resolved = resolve(&record(json!({"id": 1, "content": ZH})), &source);
            assert_eq!(resolved.chinese.as_deref(), Some(ZH));
            assert_eq!(resolved.english, Some(auto_translated(ZH)));
            assert!(resolved.english_is_auto_translated);
        }
    }

    #[test]
    fn non_object_positional_entry_is_skipped() {
        let source = json!(["junk", {"content_zh": ZH, "content_en": EN}]);
        let resolved = resolve(&record(json!({"id": 1, "content": ZH})), &source);
        assert_eq!(resolved.english.as_deref(), Some(EN));
    }
}
