use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::data::models::{CategoryCount, PromptRecord};
use crate::features::catalog::normalizer::normalize;

pub const ALL_CATEGORIES: &str = "all";

/// In-memory catalog of normalized prompt records.
#[derive(Debug, Default, Clone)]
pub struct CatalogIndex {
    records: Vec<PromptRecord>,
    categories: Vec<String>,
    by_id: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(raw_records: &[Value]) -> Self {
        let mut index = Self::new();
        index.load(raw_records);
        index
    }

    /// Replaces the whole record set.
    pub fn load(&mut self, raw_records: &[Value]) {
        self.records = raw_records
            .iter()
            .enumerate()
            .map(|(i, raw)| normalize(raw, i))
            .collect();

        self.categories = self
            .records
            .iter()
            .flat_map(|r| r.categories.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.by_id.clear();
        for (i, record) in self.records.iter().enumerate() {
            // Duplicate ids: first in load order wins
            self.by_id.entry(record.id.clone()).or_insert(i);
        }
    }

    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_category(&self, category: Option<&str>) -> Vec<PromptRecord> {
        match category {
            None | Some(ALL_CATEGORIES) => self.records.clone(),
            Some(category) => self
                .records
                .iter()
                .filter(|r| r.categories.iter().any(|c| c == category))
                .cloned()
                .collect(),
        }
    }

    pub fn search(&self, query: &str) -> Vec<PromptRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.records.clone();
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.primary_content.to_lowercase().contains(&needle)
                    || r.categories.join(" ").to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn latest(&self, limit: usize) -> Vec<PromptRecord> {
        let mut sorted: Vec<&PromptRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| std::cmp::Reverse(numeric_id(&r.id)));
        sorted.into_iter().take(limit).cloned().collect()
    }

    /// Every category with its record count, in category-list order.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        self.categories
            .iter()
            .map(|name| CategoryCount {
                name: name.clone(),
                count: self
                    .records
                    .iter()
                    .filter(|r| r.categories.contains(name))
                    .count(),
            })
            .collect()
    }

    pub fn popular_categories(&self, limit: usize) -> Vec<CategoryCount> {
        let mut counts = self.category_counts();
        // Stable sort keeps category-list order among ties
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(limit);
        counts
    }

    pub fn by_id(&self, id: &str) -> Option<&PromptRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }
}

fn numeric_id(id: &str) -> i64 {
    id.trim().parse().unwrap_or(0)
}
