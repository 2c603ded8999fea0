//! HTML pages for the web form, rendered with maud.

use maud::{html, Markup, DOCTYPE};

use crate::core::{CatalogStats, CatalogStore};
use crate::domain::{Book, Member, MemberId};

/// Status line shown above a page's content after a form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 0 1rem; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .4rem; text-align: left; }
.flash { padding: .6rem; margin: 1rem 0; border-radius: 4px; }
.success { background: #e3f6e5; }
.error { background: #fbe4e4; }
.info { color: #555; font-style: italic; }
.stats span { display: inline-block; margin-right: 2rem; font-size: 1.2rem; }
label { display: block; margin: .5rem 0; }
";

fn layout(title: &str, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) " - Library" }
                style { (STYLE) }
            }
            body {
                h1 { "Library Management System" }
                nav {
                    a href="/" { "Home" }
                    a href="/books" { "Books" }
                    a href="/members" { "Members" }
                    a href="/borrow" { "Borrow Book" }
                    a href="/return" { "Return Book" }
                }
                hr;
                @match flash {
                    Some(Flash::Success(msg)) => { div class="flash success" { "✓ " (msg) } }
                    Some(Flash::Error(msg)) => { div class="flash error" { "✗ " (msg) } }
                    None => {}
                }
                h2 { (title) }
                (content)
            }
        }
    }
}

fn info(message: &str) -> Markup {
    html! { p class="info" { (message) } }
}

pub fn home(stats: &CatalogStats, recent: &[&Book]) -> Markup {
    let content = html! {
        div class="stats" {
            span { "Total Books: " strong { (stats.total_books) } }
            span { "Total Copies: " strong { (stats.total_copies) } }
            span { "Total Members: " strong { (stats.total_members) } }
            span { "Active Loans: " strong { (stats.active_loans) } }
        }
        h3 { "Recently Added Books" }
        @if recent.is_empty() {
            (info("No books in the library yet."))
        } @else {
            ul {
                @for book in recent {
                    li { (book.title) " by " (book.author) " (Added: " (book.added_on) ")" }
                }
            }
        }
    };
    layout("Welcome", None, content)
}

pub fn books(store: &CatalogStore, query: &str, flash: Option<&Flash>) -> Markup {
    let matches = store.search_books(query);

    let content = html! {
        @if store.list_books().is_empty() {
            (info("No books in the library yet."))
        } @else {
            p { "Total Books: " (store.list_books().len()) }
            form method="get" action="/books" {
                input type="search" name="q" value=(query) placeholder="Search by title or author";
                button { "Search" }
            }
            @if matches.is_empty() {
                (info("No books match your search."))
            } @else {
                table {
                    thead { tr {
                        th { "ID" } th { "Title" } th { "Author" }
                        th { "Available" } th { "Total" } th { "Added On" }
                    } }
                    tbody {
                        @for book in &matches {
                            tr {
                                td { (book.id) }
                                td { (book.title) }
                                td { (book.author) }
                                td { (book.available_copies) }
                                td { (book.total_copies) }
                                td { (book.added_on) }
                            }
                        }
                    }
                }
            }
        }
        h3 { "Add New Book" }
        form method="post" action="/books" {
            label { "Book Title* " input type="text" name="title"; }
            label { "Author* " input type="text" name="author"; }
            label { "Number of Copies* " input type="number" name="copies" min="1" value="1"; }
            button { "Add Book" }
        }
    };
    layout("Books", flash, content)
}

fn loans(member: &Member) -> Markup {
    html! {
        @if member.has_loans() {
            ul {
                @for record in &member.borrowed {
                    li { (record.title) " (Borrowed on: " (record.borrowed_on) ")" }
                }
            }
        } @else {
            "None"
        }
    }
}

pub fn members(store: &CatalogStore, flash: Option<&Flash>) -> Markup {
    let members = store.list_members();

    let content = html! {
        @if members.is_empty() {
            (info("No members registered yet."))
        } @else {
            p { "Total Members: " (members.len()) }
            table {
                thead { tr {
                    th { "ID" } th { "Name" } th { "Email" } th { "Currently Borrowed" }
                } }
                tbody {
                    @for member in members {
                        tr {
                            td { (member.id) }
                            td { (member.name) }
                            td { (member.email) }
                            td { (loans(member)) }
                        }
                    }
                }
            }
        }
        h3 { "Register New Member" }
        form method="post" action="/members" {
            label { "Name* " input type="text" name="name"; }
            label { "Email* " input type="email" name="email"; }
            button { "Add Member" }
        }
    };
    layout("Members", flash, content)
}

pub fn borrow(store: &CatalogStore, flash: Option<&Flash>) -> Markup {
    let available = store.available_books();

    let content = html! {
        @if store.list_members().is_empty() {
            (info("No members registered. Please add members first."))
        } @else if store.list_books().is_empty() {
            (info("No books available. Please add books first."))
        } @else if available.is_empty() {
            (info("No books available for borrowing."))
        } @else {
            form method="post" action="/borrow" {
                label { "Select Member* "
                    select name="member_id" {
                        @for member in store.list_members() {
                            option value=(member.id) { (member.name) " (" (member.id) ")" }
                        }
                    }
                }
                label { "Select Book* "
                    select name="book_id" {
                        @for book in &available {
                            option value=(book.id) {
                                (book.title) " by " (book.author) " (" (book.id) ") - Available: " (book.available_copies)
                            }
                        }
                    }
                }
                button { "Borrow Book" }
            }
        }
    };
    layout("Borrow Book", flash, content)
}

pub fn return_book(store: &CatalogStore, selected: Option<&MemberId>, flash: Option<&Flash>) -> Markup {
    let with_loans = store.members_with_loans();
    let current = selected
        .and_then(|id| with_loans.iter().find(|m| &m.id == id).copied())
        .or_else(|| with_loans.first().copied());

    let content = html! {
        @if let Some(member) = current {
            form method="get" action="/return" {
                label { "Select Member* "
                    select name="member" {
                        @for m in &with_loans {
                            option value=(m.id) selected[m.id == member.id] {
                                (m.name) " (" (m.id) ") - " (m.borrowed.len()) " book(s)"
                            }
                        }
                    }
                }
                button { "Show Borrowed Books" }
            }
            form method="post" action="/return" {
                input type="hidden" name="member_id" value=(member.id);
                label { "Select Book to Return* "
                    select name="index" {
                        @for (i, record) in member.borrowed.iter().enumerate() {
                            option value=(i) { (i + 1) ". " (record.title) " (Borrowed: " (record.borrowed_on) ")" }
                        }
                    }
                }
                button { "Return Book" }
            }
        } @else {
            (info("No borrowed books to return."))
        }
    };
    layout("Return Book", flash, content)
}
