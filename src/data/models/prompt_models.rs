use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::utils::scalar_to_string;

pub const UNTITLED_PROMPT: &str = "Untitled Prompt";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Canonical prompt record produced by the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub id: String,
    pub title: String,
    pub categories: Vec<String>,   // Never empty
    pub primary_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chinese_content: Option<String>, // Record's own Chinese variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_content: Option<String>, // Record's own English variant
    pub is_chinese: bool,
}

impl PromptRecord {
    /// Chinese text carried by the record itself, if any.
    pub fn own_chinese(&self) -> Option<&str> {
        match self.chinese_content.as_deref() {
            Some(zh) => Some(zh),
            None if self.is_chinese && !self.primary_content.is_empty() => {
                Some(self.primary_content.as_str())
            }
            None => None,
        }
    }
}

/// Chinese and English content resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContent {
    pub chinese: Option<String>,
    pub english: Option<String>,
    pub english_is_auto_translated: bool,
}

/// Denormalized favorite snapshot, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Older snapshots store numeric ids as JSON numbers.
fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid favorite id: {}", value)))
}

impl From<&PromptRecord> for FavoriteEntry {
    fn from(record: &PromptRecord) -> Self {
        FavoriteEntry {
            id: record.id.clone(),
            title: record.title.clone(),
            content: record.primary_content.clone(),
            categories: record.categories.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Snapshot of the catalog loader state
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingStatus {
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub prompt_count: usize,
    pub category_count: usize,
    pub using_fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_ids_accept_numbers_and_strings() {
        let entries: Vec<FavoriteEntry> = serde_json::from_str(
            r#"[{"id": 3, "title": "Old"}, {"id": "4", "title": "New", "content": "x"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].id, "3");
        assert!(entries[0].categories.is_empty());
        assert_eq!(entries[1].id, "4");
    }

    #[test]
    fn favorite_ids_reject_containers() {
        let parsed = serde_json::from_str::<Vec<FavoriteEntry>>(r#"[{"id": [1], "title": "x"}]"#);
        assert!(parsed.is_err());
    }
}
