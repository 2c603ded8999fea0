//! Members and their outstanding loans.

use serde::{Deserialize, Serialize};

use super::ids::{BookId, MemberId};
use super::timestamp::Timestamp;

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    pub name: String,

    pub email: String,

    /// Outstanding loans, oldest first
    #[serde(default)]
    pub borrowed: Vec<BorrowRecord>,
}

impl Member {
    /// Create a member with no loans
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            email: email.into(),
            borrowed: Vec::new(),
        }
    }

    pub fn has_loans(&self) -> bool {
        !self.borrowed.is_empty()
    }
}

/// One copy of a book lent to a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub book_id: BookId,

    /// Title as it was when the book was borrowed
    pub title: String,

    pub borrowed_on: Timestamp,
}

impl BorrowRecord {
    pub fn new(book_id: BookId, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            borrowed_on: Timestamp::now(),
        }
    }
}
