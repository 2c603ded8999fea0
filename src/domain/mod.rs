//! Domain types for the shelf catalog.
//!
//! This module contains the records persisted in the snapshot file:
//! - Book: a title with a fixed number of copies
//! - Member: a borrower with an ordered list of loans
//! - BorrowRecord: one outstanding loan, embedded in a member

pub mod book;
pub mod ids;
pub mod member;
pub mod timestamp;

// Re-export commonly used types
pub use book::Book;
pub use ids::{BookId, MemberId};
pub use member::{BorrowRecord, Member};
pub use timestamp::Timestamp;
