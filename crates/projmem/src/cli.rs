//! CLI argument definitions using clap derive macros.
//!
//! One subcommand per memory operation; every invocation prints a single
//! JSON document on stdout.

use clap::{Args, Parser, Subcommand};

/// Project Memory CLI
///
/// Persistent, git-scoped memory for coding agents and their humans.
#[derive(Parser, Debug)]
#[command(name = "projmem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a new entry in the current scope
    Add(AddArgs),

    /// Full-text search over entries in the current scope
    Search {
        /// Free-text query
        query: String,

        /// Maximum entries returned
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Search across all branches of this repo
        #[arg(long)]
        all_branches: bool,
    },

    /// List entries with filters
    List(ListArgs),

    /// List active todos (shorthand for list --type todo)
    Todos,

    /// List active decisions (shorthand for list --type decision)
    Decisions,

    /// List active context notes (shorthand for list --type context)
    Context,

    /// Show a summary of the current scope (session-start overview)
    Summary,

    /// Update fields of an existing entry by id
    Update(UpdateArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Add
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Entry type
    #[arg(short = 't', long = "type")]
    pub entry_type: EntryKind,

    /// Short title
    #[arg(long)]
    pub title: String,

    /// Full content
    #[arg(short, long)]
    pub content: String,

    /// Comma-separated tags (e.g. "db,auth,cache")
    #[arg(long)]
    pub tags: Option<String>,

    /// Priority level
    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    /// Related file paths
    #[arg(long = "files", num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Author recorded for the entry
    #[arg(long, default_value = "claude")]
    pub by: String,
}

/// Entry types
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum EntryKind {
    /// Decision made (and why)
    Decision,
    /// Action item to pick up later
    Todo,
    /// Background context about the project
    Context,
    /// Recurring code pattern
    Pattern,
    /// Anything else worth keeping
    Note,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Decision => "decision",
            EntryKind::Todo => "todo",
            EntryKind::Context => "context",
            EntryKind::Pattern => "pattern",
            EntryKind::Note => "note",
        }
    }
}

/// Priority levels, lowest to highest
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// List
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by entry type
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Lifecycle status to show
    #[arg(short, long, default_value = "active")]
    pub status: String,

    /// Maximum entries returned
    #[arg(short, long, default_value = "50")]
    pub limit: i64,

    /// List across all branches of this repo
    #[arg(long)]
    pub all_branches: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Update
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Entry id to update
    #[arg(long)]
    pub id: i64,

    /// New lifecycle status (active, resolved, archived)
    #[arg(long)]
    pub status: Option<String>,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New content
    #[arg(long)]
    pub content: Option<String>,
}
