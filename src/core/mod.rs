//! Core catalog logic.
//!
//! This module contains:
//! - CatalogStore: the owned catalog and every operation on it
//! - CatalogError: what those operations can report

pub mod error;
pub mod store;

// Re-export commonly used types
pub use error::{CatalogError, ErrorKind};
pub use store::{
    parse_copies, CatalogData, CatalogStats, CatalogStore, LoanAction, Receipt, RECENT_BOOKS,
};
