//! Books held by the catalog.

use serde::{Deserialize, Serialize};

use super::ids::BookId;
use super::timestamp::Timestamp;

/// A catalog entry with a fixed number of copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,

    pub title: String,

    pub author: String,

    /// Copies currently on the shelf (0..=total_copies)
    pub available_copies: u32,

    /// Copies owned, fixed at creation
    pub total_copies: u32,

    pub added_on: Timestamp,
}

impl Book {
    /// Create a book with every copy available
    pub fn new(title: impl Into<String>, author: impl Into<String>, copies: u32) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            author: author.into(),
            available_copies: copies,
            total_copies: copies,
            added_on: Timestamp::now(),
        }
    }

    /// Whether at least one copy can be lent out
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Number of copies currently lent out
    pub fn on_loan(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    /// Case-insensitive substring match on title or author
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.author.to_lowercase().contains(&query)
    }
}
