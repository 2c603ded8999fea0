//! shelf - Library catalog and lending tracker
//!
//! Books and members live in one JSON snapshot file that is rewritten after
//! every change. Two front ends share the same catalog operations:
//!
//! - a numbered text menu (`shelf menu`, the default)
//! - a web form served locally (`shelf serve`)
//!
//! # Modules
//!
//! - `core`: The catalog store and its operations
//! - `domain`: Books, members, loans, IDs, timestamps
//! - `config`: Path and server address resolution
//! - `cli`: Command-line interface and the text menu
//! - `web`: HTML form front end
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu
//! shelf
//!
//! # Web form on the configured address
//! shelf serve
//!
//! # Use a specific snapshot file
//! shelf --data ./library/data.json stats
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod web;

// Re-export main types at crate root for convenience
pub use crate::core::{CatalogError, CatalogStats, CatalogStore, ErrorKind, Receipt};
pub use crate::domain::{Book, BookId, BorrowRecord, Member, MemberId, Timestamp};
