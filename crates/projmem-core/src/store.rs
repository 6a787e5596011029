//! Scoped entry storage.
//!
//! Implements the memory operations over the single open connection:
//! - Add an entry with its tags (one transaction)
//! - Full-text search, ranked
//! - Filtered listing, plus todo/decision/context shorthands
//! - Per-scope summary
//! - Sparse updates by id
//!
//! Every scoped operation takes the resolved [`ProjectScope`] explicitly;
//! nothing here consults git or any other ambient state.

use std::collections::BTreeMap;

use sqlx::{Connection, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::scope::ProjectScope;
use crate::types::{
    AddResult, Entry, EntryPatch, LastDecision, ListFilter, ListResult, NewEntry, ProjectSummary,
    SearchHit, SearchOptions, SearchResult, UpdateResult, split_tags,
};

/// Columns selected for entry payloads. `search_vector` stays internal.
const ENTRY_COLUMNS: &str = "e.id, e.git_repo, e.git_branch, e.type AS entry_type, e.title, \
     e.content, e.priority, e.related_files, e.created_by, e.status, e.created_at";

/// Tags aggregated per entry; NULL (not an empty array) for untagged entries.
const TAGS_COLUMN: &str = "array_agg(t.tag) FILTER (WHERE t.tag IS NOT NULL) AS tags";

/// Priority ranking: critical > high > medium > low > anything else.
const PRIORITY_RANK: &str = "CASE e.priority WHEN 'critical' THEN 4 WHEN 'high' THEN 3 \
     WHEN 'medium' THEN 2 WHEN 'low' THEN 1 ELSE 0 END";

/// Entry operations bound to one database connection.
pub struct EntryStore {
    db: Database,
    /// Text search configuration (regconfig name, e.g. "english").
    language: String,
}

impl EntryStore {
    pub fn new(db: Database, language: &str) -> Self {
        Self {
            db,
            language: language.to_string(),
        }
    }

    /// Release the underlying connection.
    pub async fn close(self) -> Result<()> {
        self.db.close().await
    }

    /// Insert an entry and its tags in one transaction.
    pub async fn add(&mut self, scope: &ProjectScope, entry: &NewEntry) -> Result<AddResult> {
        let mut tx = self.db.conn.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO entries (git_repo, git_branch, type, title, content, priority, related_files, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(scope.repo.as_str())
        .bind(scope.branch.as_str())
        .bind(entry.entry_type.as_str())
        .bind(entry.title.as_str())
        .bind(entry.content.as_str())
        .bind(entry.priority.as_str())
        .bind(entry.related_files.as_deref())
        .bind(entry.created_by.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let tags = split_tags(entry.tags.as_deref().unwrap_or(""));
        for tag in &tags {
            // Duplicate tags on the same entry are silently dropped.
            sqlx::query("INSERT INTO entry_tags (entry_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(id)
                .bind(tag.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!("Stored entry {} in {}/{}", id, scope.repo, scope.branch);

        Ok(AddResult {
            id,
            repo: scope.repo.clone(),
            branch: scope.branch.clone(),
        })
    }

    /// Rank active entries in scope against a free-text query.
    pub async fn search(
        &mut self,
        scope: &ProjectScope,
        query: &str,
        opts: &SearchOptions,
    ) -> Result<SearchResult> {
        let mut qb = search_query(scope, &self.language, query, opts);
        let entries: Vec<SearchHit> = qb.build_query_as().fetch_all(&mut self.db.conn).await?;
        debug!("Search for {:?} matched {} entries", query, entries.len());

        Ok(SearchResult {
            count: entries.len(),
            entries,
            repo: scope.repo.clone(),
            branch: scope.branch.clone(),
        })
    }

    /// List entries in scope, filtered and ordered by priority then recency.
    pub async fn list(&mut self, scope: &ProjectScope, filter: &ListFilter) -> Result<ListResult> {
        let mut qb = list_query(scope, filter);
        let entries: Vec<Entry> = qb.build_query_as().fetch_all(&mut self.db.conn).await?;

        Ok(ListResult {
            count: entries.len(),
            entries,
            repo: scope.repo.clone(),
            branch: scope.branch.clone(),
        })
    }

    /// Active todos in scope.
    pub async fn todos(&mut self, scope: &ProjectScope) -> Result<ListResult> {
        self.list_of_type(scope, "todo").await
    }

    /// Active decisions in scope.
    pub async fn decisions(&mut self, scope: &ProjectScope) -> Result<ListResult> {
        self.list_of_type(scope, "decision").await
    }

    /// Active context notes in scope.
    pub async fn context(&mut self, scope: &ProjectScope) -> Result<ListResult> {
        self.list_of_type(scope, "context").await
    }

    async fn list_of_type(&mut self, scope: &ProjectScope, entry_type: &str) -> Result<ListResult> {
        let filter = ListFilter {
            entry_type: Some(entry_type.to_string()),
            ..ListFilter::default()
        };
        self.list(scope, &filter).await
    }

    /// Aggregate counts and the latest decision for one scope.
    pub async fn summary(&mut self, scope: &ProjectScope) -> Result<ProjectSummary> {
        let counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT type, COUNT(*) FROM entries \
             WHERE git_repo = $1 AND git_branch = $2 AND status = 'active' \
             GROUP BY type",
        )
        .bind(scope.repo.as_str())
        .bind(scope.branch.as_str())
        .fetch_all(&mut self.db.conn)
        .await?;

        let todo_priorities: Vec<(String, i64)> = sqlx::query_as(
            "SELECT priority, COUNT(*) FROM entries \
             WHERE git_repo = $1 AND git_branch = $2 AND status = 'active' AND type = 'todo' \
             GROUP BY priority",
        )
        .bind(scope.repo.as_str())
        .bind(scope.branch.as_str())
        .fetch_all(&mut self.db.conn)
        .await?;

        let last_decision: Option<LastDecision> = sqlx::query_as(
            "SELECT title, created_at FROM entries \
             WHERE git_repo = $1 AND git_branch = $2 AND status = 'active' AND type = 'decision' \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1",
        )
        .bind(scope.repo.as_str())
        .bind(scope.branch.as_str())
        .fetch_optional(&mut self.db.conn)
        .await?;

        Ok(fold_summary(scope, counts, todo_priorities, last_decision))
    }

    /// Apply a sparse patch to an entry by id.
    ///
    /// An unknown id is not an error: the statement matches zero rows and
    /// the result still echoes the id. An empty patch is rejected.
    pub async fn update(&mut self, id: i64, patch: &EntryPatch) -> Result<UpdateResult> {
        if patch.is_empty() {
            return Err(Error::NoUpdateFields);
        }

        let mut qb = update_query(id, patch);
        qb.build().execute(&mut self.db.conn).await?;
        debug!("Updated entry {}", id);

        Ok(UpdateResult { updated_id: id })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query assembly
// ─────────────────────────────────────────────────────────────────────────────

fn search_query<'a>(
    scope: &'a ProjectScope,
    language: &'a str,
    query: &'a str,
    opts: &SearchOptions,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {ENTRY_COLUMNS}, {TAGS_COLUMN}, ts_rank(e.search_vector, plainto_tsquery("
    ));
    qb.push_bind(language);
    qb.push("::regconfig, ");
    qb.push_bind(query);
    qb.push(
        ")) AS rank \
         FROM entries e \
         LEFT JOIN entry_tags t ON t.entry_id = e.id \
         WHERE e.git_repo = ",
    );
    qb.push_bind(scope.repo.as_str());
    if !opts.cross_branch {
        qb.push(" AND e.git_branch = ");
        qb.push_bind(scope.branch.as_str());
    }
    qb.push(" AND e.search_vector @@ plainto_tsquery(");
    qb.push_bind(language);
    qb.push("::regconfig, ");
    qb.push_bind(query);
    qb.push(
        ") AND e.status = 'active' \
         GROUP BY e.id \
         ORDER BY rank DESC, e.created_at DESC, e.id DESC \
         LIMIT ",
    );
    qb.push_bind(opts.limit);
    qb
}

fn list_query<'a>(scope: &'a ProjectScope, filter: &'a ListFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {ENTRY_COLUMNS}, {TAGS_COLUMN} \
         FROM entries e \
         LEFT JOIN entry_tags t ON t.entry_id = e.id \
         WHERE e.git_repo = "
    ));
    qb.push_bind(scope.repo.as_str());
    if !filter.cross_branch {
        qb.push(" AND e.git_branch = ");
        qb.push_bind(scope.branch.as_str());
    }
    qb.push(" AND e.status = ");
    qb.push_bind(filter.status.as_str());
    if let Some(entry_type) = &filter.entry_type {
        qb.push(" AND e.type = ");
        qb.push_bind(entry_type.as_str());
    }
    if let Some(tag) = &filter.tag {
        qb.push(" AND e.id IN (SELECT entry_id FROM entry_tags WHERE tag = ");
        qb.push_bind(tag.as_str());
        qb.push(")");
    }
    qb.push(format!(
        " GROUP BY e.id ORDER BY {PRIORITY_RANK} DESC, e.created_at DESC, e.id DESC LIMIT "
    ));
    qb.push_bind(filter.limit);
    qb
}

fn update_query<'a>(id: i64, patch: &'a EntryPatch) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE entries SET ");
    let mut set = qb.separated(", ");
    if let Some(status) = &patch.status {
        set.push("status = ");
        set.push_bind_unseparated(status.as_str());
    }
    if let Some(title) = &patch.title {
        set.push("title = ");
        set.push_bind_unseparated(title.as_str());
    }
    if let Some(content) = &patch.content {
        set.push("content = ");
        set.push_bind_unseparated(content.as_str());
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}

/// Derive the summary payload from the three scope queries.
fn fold_summary(
    scope: &ProjectScope,
    counts: Vec<(String, i64)>,
    todo_priorities: Vec<(String, i64)>,
    last_decision: Option<LastDecision>,
) -> ProjectSummary {
    let counts: BTreeMap<String, i64> = counts.into_iter().collect();
    let todo_priorities: BTreeMap<String, i64> = todo_priorities.into_iter().collect();

    let total_decisions = counts.get("decision").copied().unwrap_or(0);
    let total_todos = counts.get("todo").copied().unwrap_or(0);
    let high_priority_todos = todo_priorities.get("high").copied().unwrap_or(0)
        + todo_priorities.get("critical").copied().unwrap_or(0);

    ProjectSummary {
        repo: scope.repo.clone(),
        branch: scope.branch.clone(),
        counts,
        todo_priorities,
        last_decision,
        total_decisions,
        total_todos,
        high_priority_todos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_scope() -> ProjectScope {
        ProjectScope {
            repo: "github.com/acme/widgets".to_string(),
            branch: "main".to_string(),
        }
    }

    #[test]
    fn test_list_query_scopes_to_repo_branch_status() {
        let scope = test_scope();
        let filter = ListFilter::default();
        let qb = list_query(&scope, &filter);
        let sql = qb.sql();

        assert!(sql.contains("WHERE e.git_repo = $1"));
        assert!(sql.contains("AND e.git_branch = $2"));
        assert!(sql.contains("AND e.status = $3"));
        assert!(sql.ends_with("LIMIT $4"));
    }

    #[test]
    fn test_list_query_cross_branch_drops_branch_clause() {
        let scope = test_scope();
        let filter = ListFilter {
            cross_branch: true,
            ..ListFilter::default()
        };
        let qb = list_query(&scope, &filter);
        let sql = qb.sql();

        assert!(!sql.contains("git_branch ="));
        assert!(sql.contains("AND e.status = $2"));
        assert!(sql.ends_with("LIMIT $3"));
    }

    #[test]
    fn test_list_query_type_and_tag_filters() {
        let scope = test_scope();
        let filter = ListFilter {
            entry_type: Some("todo".to_string()),
            tag: Some("db".to_string()),
            ..ListFilter::default()
        };
        let qb = list_query(&scope, &filter);
        let sql = qb.sql();

        assert!(sql.contains("AND e.type = $4"));
        assert!(sql.contains("AND e.id IN (SELECT entry_id FROM entry_tags WHERE tag = $5)"));
        assert!(sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn test_list_query_orders_by_priority_then_recency() {
        let scope = test_scope();
        let filter = ListFilter::default();
        let qb = list_query(&scope, &filter);
        let sql = qb.sql();

        assert!(sql.contains("WHEN 'critical' THEN 4"));
        assert!(sql.contains("WHEN 'low' THEN 1"));
        assert!(sql.contains("ELSE 0 END DESC, e.created_at DESC, e.id DESC"));
        assert!(sql.contains("GROUP BY e.id"));
    }

    #[test]
    fn test_search_query_ranks_and_scopes() {
        let scope = test_scope();
        let opts = SearchOptions::default();
        let qb = search_query(&scope, "english", "pagination", &opts);
        let sql = qb.sql();

        assert!(sql.contains("ts_rank(e.search_vector, plainto_tsquery($1::regconfig, $2))"));
        assert!(sql.contains("WHERE e.git_repo = $3"));
        assert!(sql.contains("AND e.git_branch = $4"));
        assert!(sql.contains("e.search_vector @@ plainto_tsquery($5::regconfig, $6)"));
        assert!(sql.contains("AND e.status = 'active'"));
        assert!(sql.contains("ORDER BY rank DESC, e.created_at DESC, e.id DESC"));
        assert!(sql.ends_with("LIMIT $7"));
    }

    #[test]
    fn test_search_query_cross_branch() {
        let scope = test_scope();
        let opts = SearchOptions {
            cross_branch: true,
            ..SearchOptions::default()
        };
        let qb = search_query(&scope, "english", "pagination", &opts);
        let sql = qb.sql();

        assert!(!sql.contains("git_branch ="));
        assert!(sql.contains("e.search_vector @@ plainto_tsquery($4::regconfig, $5)"));
        assert!(sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn test_update_query_full_patch() {
        let patch = EntryPatch {
            status: Some("resolved".to_string()),
            title: Some("t".to_string()),
            content: Some("c".to_string()),
        };
        let qb = update_query(42, &patch);

        assert_eq!(
            qb.sql(),
            "UPDATE entries SET status = $1, title = $2, content = $3 WHERE id = $4"
        );
    }

    #[test]
    fn test_update_query_sparse_patch() {
        let patch = EntryPatch {
            content: Some("only this".to_string()),
            ..Default::default()
        };
        let qb = update_query(7, &patch);

        assert_eq!(qb.sql(), "UPDATE entries SET content = $1 WHERE id = $2");
    }

    #[test]
    fn test_fold_summary_totals() {
        let counts = vec![("decision".to_string(), 3), ("todo".to_string(), 5)];
        let prios = vec![
            ("high".to_string(), 2),
            ("critical".to_string(), 1),
            ("low".to_string(), 2),
        ];
        let last = Some(LastDecision {
            title: "Use sqlx".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        });

        let summary = fold_summary(&test_scope(), counts, prios, last);

        assert_eq!(summary.total_decisions, 3);
        assert_eq!(summary.total_todos, 5);
        assert_eq!(summary.high_priority_todos, 3);
        assert_eq!(summary.counts.get("todo"), Some(&5));
        assert_eq!(summary.last_decision.unwrap().title, "Use sqlx");
    }

    #[test]
    fn test_fold_summary_missing_buckets_are_zero() {
        let summary = fold_summary(&test_scope(), vec![("note".to_string(), 2)], vec![], None);

        assert_eq!(summary.total_decisions, 0);
        assert_eq!(summary.total_todos, 0);
        assert_eq!(summary.high_priority_todos, 0);
        assert!(summary.last_decision.is_none());
        assert_eq!(summary.repo, "github.com/acme/widgets");
        assert_eq!(summary.branch, "main");
    }
}
