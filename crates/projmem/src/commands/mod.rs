//! Command implementations for the projmem CLI.
//!
//! Each module maps one subcommand onto one store operation and returns
//! the JSON body for the success report.

pub mod add;
pub mod list;
pub mod search;
pub mod summary;
pub mod update;
