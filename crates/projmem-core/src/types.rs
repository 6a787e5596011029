//! Domain types for project memory entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A stored memory entry, as returned by read operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub git_repo: String,
    pub git_branch: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub related_files: Option<Vec<String>>,
    pub created_by: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Aggregated from the tag table; None when the entry has no tags.
    pub tags: Option<Vec<String>>,
}

/// A full-text search match: the entry plus its relevance rank.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchHit {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: Entry,
    pub rank: f32,
}

/// Input for creating an entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_type: String,
    pub title: String,
    pub content: String,
    /// Comma-delimited tag list as typed by the caller; split on insert.
    pub tags: Option<String>,
    pub priority: String,
    pub related_files: Option<Vec<String>>,
    pub created_by: String,
}

/// A sparse update: only the fields that are present are written.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub status: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl EntryPatch {
    /// True when the patch carries nothing to persist.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.title.is_none() && self.content.is_none()
    }
}

/// Filters for the list operation.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub entry_type: Option<String>,
    pub tag: Option<String>,
    pub status: String,
    pub limit: i64,
    /// When set, match the repo across all of its branches.
    pub cross_branch: bool,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            entry_type: None,
            tag: None,
            status: "active".to_string(),
            limit: 50,
            cross_branch: false,
        }
    }
}

/// Options for the search operation.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: i64,
    pub cross_branch: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            cross_branch: false,
        }
    }
}

/// Outcome of `add`: the new id and the scope it landed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResult {
    pub id: i64,
    pub repo: String,
    pub branch: String,
}

/// Outcome of `list` and its shorthands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult {
    pub count: usize,
    pub entries: Vec<Entry>,
    pub repo: String,
    pub branch: String,
}

/// Outcome of `search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub count: usize,
    pub entries: Vec<SearchHit>,
    pub repo: String,
    pub branch: String,
}

/// Outcome of `update`. Echoes the requested id whether or not a row matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub updated_id: i64,
}

/// The most recent active decision, shown in the summary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LastDecision {
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Session-start overview of one scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub repo: String,
    pub branch: String,
    /// Active entry counts by type.
    pub counts: BTreeMap<String, i64>,
    /// Active todo counts by priority.
    pub todo_priorities: BTreeMap<String, i64>,
    pub last_decision: Option<LastDecision>,
    pub total_decisions: i64,
    pub total_todos: i64,
    pub high_priority_todos: i64,
}

/// Split a comma-delimited tag string into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_entry() -> Entry {
        Entry {
            id: 7,
            git_repo: "github.com/acme/widgets".to_string(),
            git_branch: "main".to_string(),
            entry_type: "todo".to_string(),
            title: "Fix pagination".to_string(),
            content: "Cursor resets on page 3".to_string(),
            priority: "high".to_string(),
            related_files: Some(vec!["src/api/list.rs".to_string()]),
            created_by: "claude".to_string(),
            status: "active".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            tags: None,
        }
    }

    #[test]
    fn test_split_tags_trims_and_drops_empties() {
        assert_eq!(
            split_tags(" db , auth,,  cache "),
            vec!["db".to_string(), "auth".to_string(), "cache".to_string()]
        );
    }

    #[test]
    fn test_split_tags_empty_input() {
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ,").is_empty());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(EntryPatch::default().is_empty());

        let patch = EntryPatch {
            status: Some("resolved".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_list_filter_defaults() {
        let filter = ListFilter::default();
        assert_eq!(filter.status, "active");
        assert_eq!(filter.limit, 50);
        assert!(!filter.cross_branch);
        assert!(filter.entry_type.is_none());
    }

    #[test]
    fn test_entry_serializes_type_key_and_null_tags() {
        let value = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(value["type"], "todo");
        assert!(value.get("entry_type").is_none());
        assert!(value["tags"].is_null());
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_search_hit_flattens_entry_fields() {
        let hit = SearchHit {
            entry: sample_entry(),
            rank: 0.5,
        };
        let value = serde_json::to_value(hit).unwrap();
        assert_eq!(value["title"], "Fix pagination");
        assert_eq!(value["rank"], 0.5);
        assert!(value.get("entry").is_none());
    }
}
