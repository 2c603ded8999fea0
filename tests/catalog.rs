//! Catalog Store Integration Tests
//!
//! Tests for borrow/return bookkeeping, its invariants, and snapshot persistence.

use shelf::core::{CatalogData, CatalogStore, ErrorKind, LoanAction};
use shelf::domain::{Book, BookId, MemberId};
use tempfile::TempDir;

fn open_temp() -> (TempDir, CatalogStore) {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::open(temp.path().join("data.json")).unwrap();
    (temp, store)
}

/// Copy bounds and loan-count consistency over the whole catalog
fn assert_invariants(store: &CatalogStore) {
    for book in store.list_books() {
        assert!(
            book.available_copies <= book.total_copies,
            "{} has {} of {} available",
            book.id,
            book.available_copies,
            book.total_copies
        );

        let loans = store
            .list_members()
            .iter()
            .flat_map(|m| &m.borrowed)
            .filter(|r| r.book_id == book.id)
            .count() as u32;
        assert_eq!(loans, book.total_copies - book.available_copies, "{}", book.id);
    }
}

fn book(store: &CatalogStore, id: &BookId) -> Book {
    store.book(id).cloned().unwrap()
}

#[test]
fn test_example_flow() {
    let (_temp, mut store) = open_temp();

    let dune = store.add_book("Dune", "Herbert", 2).unwrap();
    assert_eq!(book(&store, &dune).available_copies, 2);
    assert_eq!(book(&store, &dune).total_copies, 2);

    let ada = store.add_member("Ada", "ada@x.io").unwrap();
    assert!(store.member(&ada).unwrap().borrowed.is_empty());

    let receipt = store.borrow(&ada, &dune).unwrap();
    assert_eq!(receipt.action, LoanAction::Borrowed);
    assert!(receipt.to_string().contains("Dune"));
    assert_eq!(book(&store, &dune).available_copies, 1);
    assert_eq!(store.member(&ada).unwrap().borrowed.len(), 1);
    assert_invariants(&store);

    let receipt = store.return_book(&ada, 0).unwrap();
    assert_eq!(receipt.action, LoanAction::Returned);
    assert!(receipt.to_string().contains("Dune"));
    assert_eq!(book(&store, &dune).available_copies, 2);
    assert!(store.member(&ada).unwrap().borrowed.is_empty());
    assert_invariants(&store);
}

#[test]
fn test_borrow_with_no_copies_is_unavailable() {
    let (_temp, mut store) = open_temp();
    let dune = store.add_book("Dune", "Herbert", 1).unwrap();
    let ada = store.add_member("Ada", "ada@x.io").unwrap();
    let bob = store.add_member("Bob", "bob@x.io").unwrap();

    store.borrow(&ada, &dune).unwrap();
    let before = store.data().clone();

    let err = store.borrow(&bob, &dune).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(store.data(), &before);
    assert_invariants(&store);
}

#[test]
fn test_borrow_unknown_member_does_not_touch_book() {
    let (_temp, mut store) = open_temp();
    let dune = store.add_book("Dune", "Herbert", 1).unwrap();

    let err = store.borrow(&MemberId::from("M-GHOST"), &dune).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(book(&store, &dune).available_copies, 1);
}

#[test]
fn test_return_with_no_loans_is_invalid_selection() {
    let (_temp, mut store) = open_temp();
    let dune = store.add_book("Dune", "Herbert", 1).unwrap();
    let ada = store.add_member("Ada", "ada@x.io").unwrap();
    let before = store.data().clone();

    let err = store.return_book(&ada, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSelection);
    assert_eq!(store.data(), &before);
    assert_eq!(book(&store, &dune).available_copies, 1);
}

#[test]
fn test_return_unknown_member_is_not_found() {
    let (_temp, mut store) = open_temp();
    let err = store.return_book(&MemberId::from("M-GHOST"), 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_return_selects_by_current_position() {
    let (_temp, mut store) = open_temp();
    let dune = store.add_book("Dune", "Herbert", 1).unwrap();
    let emma = store.add_book("Emma", "Austen", 1).unwrap();
    let ada = store.add_member("Ada", "ada@x.io").unwrap();

    store.borrow(&ada, &dune).unwrap();
    store.borrow(&ada, &emma).unwrap();

    // Position 1 is the second loan (Emma)
    let receipt = store.return_book(&ada, 1).unwrap();
    assert_eq!(receipt.book_id, emma);

    let remaining = &store.member(&ada).unwrap().borrowed;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].book_id, dune);
    assert_invariants(&store);
}

#[test]
fn test_invariants_hold_through_mixed_operations() {
    let (_temp, mut store) = open_temp();
    let books: Vec<_> = (1..=3)
        .map(|n| store.add_book(&format!("Book {}", n), "Anon", n).unwrap())
        .collect();
    let members: Vec<_> = ["Ada", "Bob", "Cy"]
        .iter()
        .map(|name| store.add_member(name, &format!("{}@x.io", name)).unwrap())
        .collect();

    for round in 0..4 {
        for (i, member) in members.iter().enumerate() {
            let _ = store.borrow(member, &books[(i + round) % books.len()]);
            assert_invariants(&store);
        }
        if round % 2 == 1 {
            for member in &members {
                let _ = store.return_book(member, 0);
                assert_invariants(&store);
            }
        }
    }
}

#[test]
fn test_add_book_rejects_zero_copies() {
    let (_temp, mut store) = open_temp();
    let err = store.add_book("Dune", "Herbert", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(store.list_books().is_empty());
}

#[test]
fn test_ids_are_well_formed() {
    let (_temp, mut store) = open_temp();
    for n in 0..20 {
        let book = store.add_book("T", "A", 1).unwrap();
        let member = store.add_member(&format!("M{}", n), "m@x.io").unwrap();
        assert!(book.is_well_formed(), "{}", book);
        assert!(member.is_well_formed(), "{}", member);
    }
}

#[test]
fn test_listing_preserves_insertion_order() {
    let (_temp, mut store) = open_temp();
    for title in ["C", "A", "B"] {
        store.add_book(title, "Anon", 1).unwrap();
    }
    let titles: Vec<_> = store.list_books().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}

#[test]
fn test_snapshot_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.json");

    let (dune, ada) = {
        let mut store = CatalogStore::open(&path).unwrap();
        let dune = store.add_book("Dune", "Herbert", 2).unwrap();
        let ada = store.add_member("Ada", "ada@x.io").unwrap();
        store.borrow(&ada, &dune).unwrap();
        (dune, ada)
    };

    let store = CatalogStore::open(&path).unwrap();
    assert_eq!(book(&store, &dune).available_copies, 1);
    let loans = &store.member(&ada).unwrap().borrowed;
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].title, "Dune");
    assert_invariants(&store);
}

#[test]
fn test_snapshot_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.json");
    let mut store = CatalogStore::open(&path).unwrap();
    let dune = store.add_book("Dune", "Herbert", 1).unwrap();
    let ada = store.add_member("Ada", "ada@x.io").unwrap();
    store.borrow(&ada, &dune).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    let book = &raw["books"][0];
    assert_eq!(book["id"], dune.as_str());
    assert_eq!(book["available_copies"], 0);
    assert_eq!(book["total_copies"], 1);
    assert_eq!(book["added_on"].as_str().unwrap().len(), "YYYY-MM-DD HH:MM:SS".len());

    let member = &raw["members"][0];
    assert_eq!(member["id"], ada.as_str());
    assert_eq!(member["borrowed"][0]["book_id"], dune.as_str());
    assert_eq!(member["borrowed"][0]["title"], "Dune");
}

#[test]
fn test_loads_hand_written_snapshot() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.json");
    std::fs::write(
        &path,
        r#"{
    "books": [
        {"id": "B-AB12C", "title": "Dune", "author": "Herbert",
         "available_copies": 0, "total_copies": 1, "added_on": "2025-01-02 03:04:05"}
    ],
    "members": [
        {"id": "M-XY34Z", "name": "Ada", "email": "ada@x.io",
         "borrowed": [{"book_id": "B-AB12C", "title": "Dune", "borrowed_on": "2025-01-03 09:00:00"}]}
    ]
}"#,
    )
    .unwrap();

    let mut store = CatalogStore::open(&path).unwrap();
    assert_invariants(&store);

    store.return_book(&MemberId::from("M-XY34Z"), 0).unwrap();
    assert_eq!(book(&store, &BookId::from("B-AB12C")).available_copies, 1);

    let reloaded: CatalogData =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(reloaded.members[0].borrowed.is_empty());
}
