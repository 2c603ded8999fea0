//! Catalog store with whole-file JSON snapshot persistence.
//!
//! The store owns both collections and is the only writer of the snapshot.
//! Every successful mutation rewrites the whole file; a mutation whose
//! snapshot cannot be written is rolled back in memory.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::error::CatalogError;
use crate::domain::{Book, BookId, BorrowRecord, Member, MemberId};

/// Number of books shown as "recently added" by default
pub const RECENT_BOOKS: usize = 5;

/// The persisted catalog: every book and every member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub books: Vec<Book>,

    #[serde(default)]
    pub members: Vec<Member>,
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_books: usize,
    pub total_copies: u64,
    pub available_copies: u64,
    pub total_members: usize,
    pub active_loans: usize,
}

/// What a successful borrow or return did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    Borrowed,
    Returned,
}

/// Confirmation of a completed borrow or return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub action: LoanAction,
    pub member_id: MemberId,
    pub book_id: BookId,
    pub title: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            LoanAction::Borrowed => "borrowed",
            LoanAction::Returned => "returned",
        };
        write!(f, "Book '{}' {} successfully!", self.title, verb)
    }
}

/// Parse a raw copy count as typed by a user
pub fn parse_copies(raw: &str) -> Result<u32, CatalogError> {
    let raw = raw.trim();
    let copies: i64 = raw
        .parse()
        .map_err(|_| CatalogError::invalid_input(format!("Invalid number of copies: '{}'", raw)))?;

    if copies <= 0 {
        return Err(CatalogError::invalid_input(
            "Number of copies must be a positive integer",
        ));
    }

    u32::try_from(copies)
        .map_err(|_| CatalogError::invalid_input(format!("Too many copies: {}", copies)))
}

fn require(field: &str, value: &str) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::invalid_input(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// File-backed catalog of books and members
#[derive(Debug)]
pub struct CatalogStore {
    /// Path to the JSON snapshot
    path: PathBuf,

    /// In-memory state, written out wholesale after each mutation
    data: CatalogData,
}

impl CatalogStore {
    /// Open the snapshot at `path`, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let data = if content.trim().is_empty() {
                CatalogData::default()
            } else {
                serde_json::from_str(&content)?
            };
            Self { path, data }
        } else {
            let store = Self {
                path,
                data: CatalogData::default(),
            };
            store.save()?;
            store
        };

        info!(
            path = %store.path.display(),
            books = store.data.books.len(),
            members = store.data.members.len(),
            "Opened catalog"
        );

        Ok(store)
    }

    /// Get the snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the full in-memory catalog
    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    /// Write the snapshot: temp file in the same directory, then rename over
    fn save(&self) -> Result<(), CatalogError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(&self.data)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Apply `op` to the catalog and persist, undoing it if either step fails
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut CatalogData) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        let before = self.data.clone();

        let result = op(&mut self.data).and_then(|value| {
            self.save()?;
            Ok(value)
        });

        if let Err(ref e) = result {
            if e.is_storage() {
                warn!(path = %self.path.display(), error = %e, "Failed to write catalog");
            } else {
                debug!(error = %e, "Catalog operation rejected");
            }
            self.data = before;
        }

        result
    }

    /// Add a book with `copies` copies, all available
    pub fn add_book(&mut self, title: &str, author: &str, copies: u32) -> Result<BookId, CatalogError> {
        let title = require("Title", title)?;
        let author = require("Author", author)?;
        if copies == 0 {
            return Err(CatalogError::invalid_input(
                "Number of copies must be a positive integer",
            ));
        }

        let book = Book::new(title, author, copies);
        let id = book.id.clone();

        self.commit(|data| {
            data.books.push(book);
            Ok(())
        })?;

        info!(book_id = %id, copies, "Added book");
        Ok(id)
    }

    /// Register a member with no loans
    pub fn add_member(&mut self, name: &str, email: &str) -> Result<MemberId, CatalogError> {
        let name = require("Name", name)?;
        let email = require("Email", email)?;

        let member = Member::new(name, email);
        let id = member.id.clone();

        self.commit(|data| {
            data.members.push(member);
            Ok(())
        })?;

        info!(member_id = %id, "Added member");
        Ok(id)
    }

    /// All books, in the order they were added
    pub fn list_books(&self) -> &[Book] {
        &self.data.books
    }

    /// All members, in the order they registered
    pub fn list_members(&self) -> &[Member] {
        &self.data.members
    }

    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.data.books.iter().find(|b| &b.id == id)
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.data.members.iter().find(|m| &m.id == id)
    }

    /// Lend one copy of `book_id` to `member_id`
    pub fn borrow(&mut self, member_id: &MemberId, book_id: &BookId) -> Result<Receipt, CatalogError> {
        let receipt = self.commit(|data| {
            let member = data
                .members
                .iter_mut()
                .find(|m| &m.id == member_id)
                .ok_or_else(|| CatalogError::MemberNotFound(member_id.clone()))?;

            let book = data
                .books
                .iter_mut()
                .find(|b| &b.id == book_id)
                .ok_or_else(|| CatalogError::BookNotFound(book_id.clone()))?;

            if !book.is_available() {
                return Err(CatalogError::Unavailable {
                    book_id: book.id.clone(),
                    title: book.title.clone(),
                });
            }

            member
                .borrowed
                .push(BorrowRecord::new(book.id.clone(), book.title.clone()));
            book.available_copies -= 1;

            Ok(Receipt {
                action: LoanAction::Borrowed,
                member_id: member.id.clone(),
                book_id: book.id.clone(),
                title: book.title.clone(),
            })
        })?;

        info!(member_id = %receipt.member_id, book_id = %receipt.book_id, "Borrowed book");
        Ok(receipt)
    }

    /// Return the loan at 0-based position `selector` in the member's current loans.
    ///
    /// If the referenced book is no longer in the catalog the loan is still
    /// removed and no copy count changes.
    pub fn return_book(&mut self, member_id: &MemberId, selector: usize) -> Result<Receipt, CatalogError> {
        let receipt = self.commit(|data| {
            let member = data
                .members
                .iter_mut()
                .find(|m| &m.id == member_id)
                .ok_or_else(|| CatalogError::MemberNotFound(member_id.clone()))?;

            if selector >= member.borrowed.len() {
                return Err(CatalogError::InvalidSelection {
                    selector,
                    loans: member.borrowed.len(),
                });
            }

            let record = member.borrowed.remove(selector);

            match data.books.iter_mut().find(|b| b.id == record.book_id) {
                Some(book) => {
                    book.available_copies = (book.available_copies + 1).min(book.total_copies);
                }
                None => {
                    warn!(book_id = %record.book_id, "Returned book is no longer in the catalog");
                }
            }

            Ok(Receipt {
                action: LoanAction::Returned,
                member_id: member.id.clone(),
                book_id: record.book_id,
                title: record.title,
            })
        })?;

        info!(member_id = %receipt.member_id, book_id = %receipt.book_id, "Returned book");
        Ok(receipt)
    }

    /// Books with at least one copy on the shelf
    pub fn available_books(&self) -> Vec<&Book> {
        self.data.books.iter().filter(|b| b.is_available()).collect()
    }

    /// Members holding at least one loan
    pub fn members_with_loans(&self) -> Vec<&Member> {
        self.data.members.iter().filter(|m| m.has_loans()).collect()
    }

    /// Books whose title or author contains `query` (case-insensitive)
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let query = query.trim();
        self.data.books.iter().filter(|b| b.matches(query)).collect()
    }

    /// The `limit` most recently added books, newest first
    pub fn recent_books(&self, limit: usize) -> Vec<&Book> {
        // Reversed first so same-second additions still come out newest first
        let mut books: Vec<_> = self.data.books.iter().rev().collect();
        books.sort_by(|a, b| b.added_on.cmp(&a.added_on));
        books.truncate(limit);
        books
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_books: self.data.books.len(),
            total_copies: self.data.books.iter().map(|b| u64::from(b.total_copies)).sum(),
            available_copies: self
                .data
                .books
                .iter()
                .map(|b| u64::from(b.available_copies))
                .sum(),
            total_members: self.data.members.len(),
            active_loans: self.data.members.iter().map(|m| m.borrowed.len()).sum(),
        }
    }
}
