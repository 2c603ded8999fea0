//! Web form front end.
//!
//! Every page is server-rendered HTML. POST handlers call one catalog
//! operation and re-render their page with the outcome as a flash message.
//! The store sits behind a single mutex, so requests are applied one at a time.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    routing::get,
    Form, Router,
};
use maud::Markup;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::{parse_copies, CatalogError, CatalogStore, RECENT_BOOKS};
use crate::domain::{BookId, MemberId};

pub mod pages;

pub use pages::Flash;

/// Store handle shared by every request
pub type SharedStore = Arc<Mutex<CatalogStore>>;

fn flash<T: ToString>(result: Result<T, CatalogError>) -> Flash {
    match result {
        Ok(message) => Flash::Success(message.to_string()),
        Err(e) => Flash::Error(e.to_string()),
    }
}

/// Build the router over a shared store
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/books", get(books).post(add_book))
        .route("/members", get(members).post(add_member))
        .route("/borrow", get(borrow_page).post(borrow))
        .route("/return", get(return_page).post(return_book))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Bind `address` and serve until the process is stopped
pub async fn serve(store: CatalogStore, address: &str) -> Result<()> {
    let app = router(Arc::new(Mutex::new(store)));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Serving library web form on http://{}", listener.local_addr()?);
    eprintln!("Library web form listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Web server failed")
}

async fn home(State(store): State<SharedStore>) -> Markup {
    let store = store.lock().await;
    pages::home(&store.stats(), &store.recent_books(RECENT_BOOKS))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}

async fn books(State(store): State<SharedStore>, Query(search): Query<SearchQuery>) -> Markup {
    let store = store.lock().await;
    pages::books(&store, &search.q, None)
}

/// Fields arrive as raw strings so bad input becomes a flash, not a 422
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddBookForm {
    pub title: String,
    pub author: String,
    pub copies: String,
}

async fn add_book(State(store): State<SharedStore>, Form(form): Form<AddBookForm>) -> Markup {
    let mut store = store.lock().await;
    let result = parse_copies(&form.copies)
        .and_then(|copies| store.add_book(&form.title, &form.author, copies))
        .map(|id| format!("Book added successfully! ID: {}", id));
    pages::books(&store, "", Some(&flash(result)))
}

async fn members(State(store): State<SharedStore>) -> Markup {
    let store = store.lock().await;
    pages::members(&store, None)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddMemberForm {
    pub name: String,
    pub email: String,
}

async fn add_member(State(store): State<SharedStore>, Form(form): Form<AddMemberForm>) -> Markup {
    let mut store = store.lock().await;
    let result = store
        .add_member(&form.name, &form.email)
        .map(|id| format!("Member added successfully! ID: {}", id));
    pages::members(&store, Some(&flash(result)))
}

async fn borrow_page(State(store): State<SharedStore>) -> Markup {
    let store = store.lock().await;
    pages::borrow(&store, None)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BorrowForm {
    pub member_id: String,
    pub book_id: String,
}

async fn borrow(State(store): State<SharedStore>, Form(form): Form<BorrowForm>) -> Markup {
    let mut store = store.lock().await;
    let result = store.borrow(
        &MemberId::from(form.member_id),
        &BookId::from(form.book_id),
    );
    pages::borrow(&store, Some(&flash(result)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReturnQuery {
    pub member: Option<String>,
}

async fn return_page(State(store): State<SharedStore>, Query(query): Query<ReturnQuery>) -> Markup {
    let store = store.lock().await;
    let selected = query.member.map(MemberId::from);
    pages::return_book(&store, selected.as_ref(), None)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReturnForm {
    pub member_id: String,
    pub index: String,
}

async fn return_book(State(store): State<SharedStore>, Form(form): Form<ReturnForm>) -> Markup {
    let mut store = store.lock().await;
    let member_id = MemberId::from(form.member_id);

    // Index is 0-based, straight from the select's option values
    let result = match form.index.trim().parse::<usize>() {
        Ok(index) => store.return_book(&member_id, index),
        Err(_) => Err(CatalogError::invalid_input(format!(
            "Invalid selection: '{}'",
            form.index.trim()
        ))),
    };
    pages::return_book(&store, Some(&member_id), Some(&flash(result)))
}
