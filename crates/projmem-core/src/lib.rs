//! Core library for projmem: git-scoped project memory over PostgreSQL.
//!
//! This crate provides:
//! - **Scope detection**: derive the (repo, branch) pair from the working
//!   directory's git checkout, with a safe fallback
//! - **Database**: a single-connection PostgreSQL gateway
//! - **Entry store**: add, search, list, summarize, and update memory
//!   entries within a scope
//! - **Error handling**: the error taxonomy shared with the CLI

pub mod db;
pub mod error;
pub mod scope;
pub mod store;
pub mod types;

pub use db::Database;
pub use error::{Error, Result};
pub use scope::ProjectScope;
pub use store::EntryStore;
