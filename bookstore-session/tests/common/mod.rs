//! Shared test helpers for session tests.

#![allow(dead_code)]

use bookstore_model::{AnyEntity, Author, Book, Identified, Publisher, RecordId};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Identifiers of a collection, `None` for unsaved entries.
pub fn ids(items: &[AnyEntity]) -> Vec<Option<i64>> {
    items.iter().map(|e| e.record_id().map(RecordId::get)).collect()
}

pub fn author(id: i64) -> AnyEntity {
    Author::with_id(id).into()
}

pub fn publisher(id: i64) -> AnyEntity {
    Publisher::with_id(id).into()
}

pub fn book(id: i64) -> AnyEntity {
    Book::with_id(id).into()
}

pub fn named_author(id: i64, name: &str) -> Author {
    Author {
        name: Some(name.to_string()),
        ..Author::with_id(id)
    }
}
