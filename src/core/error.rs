//! Errors reported by catalog operations.

use thiserror::Error;

use crate::domain::{BookId, MemberId};

/// Errors that can occur while operating on the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    #[error("No copies of '{title}' available")]
    Unavailable { book_id: BookId, title: String },

    #[error("{}", selection_message(.selector, .loans))]
    InvalidSelection { selector: usize, loans: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn selection_message(selector: &usize, loans: &usize) -> String {
    if *loans == 0 {
        "No borrowed books to return".to_string()
    } else {
        format!(
            "Invalid selection: {} (member has {} borrowed book(s))",
            selector.saturating_add(1),
            loans
        )
    }
}

/// Coarse classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Unavailable,
    InvalidSelection,
    Storage,
}

impl CatalogError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::MemberNotFound(_) | Self::BookNotFound(_) => ErrorKind::NotFound,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// Whether the snapshot file, rather than the request, is at fault
    pub fn is_storage(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}
