use bookstore_model::{AnyEntity, Book, Store};
use bookstore_reconcile::resolve_selected;
use std::ptr;

fn titled(id: i64, title: &str) -> Book {
    Book {
        title: Some(title.to_string()),
        ..Book::with_id(id)
    }
}

#[test]
fn absent_selection_returns_option() {
    let option = Book::with_id(1);
    assert!(ptr::eq(resolve_selected(&option, None), &option));
}

#[test]
fn empty_selection_returns_option() {
    let option = Book::with_id(1);
    let selected: Vec<Book> = Vec::new();
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &option));
}

#[test]
fn matching_selected_value_is_returned() {
    let option = titled(20128, "option copy");
    let selected = vec![titled(20128, "selected copy")];

    let resolved = resolve_selected(&option, Some(selected.as_slice()));
    assert!(ptr::eq(resolved, &selected[0]));
    assert_eq!(resolved.title.as_deref(), Some("selected copy"));
}

#[test]
fn match_is_found_among_other_values() {
    let option = Book::with_id(2);
    let selected = vec![Book::with_id(1), Book::with_id(2), Book::with_id(3)];
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &selected[1]));
}

#[test]
fn first_match_wins() {
    let option = Book::with_id(2);
    let selected = vec![titled(2, "first"), titled(2, "second")];
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &selected[0]));
}

#[test]
fn no_match_returns_option() {
    let option = Book::with_id(41299);
    let selected = vec![Book::with_id(20128)];
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &option));
}

#[test]
fn unsaved_option_never_matches() {
    let option = Book::default();
    let selected = vec![Book::default()];
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &option));
}

#[test]
fn works_over_any_entity() {
    let option = AnyEntity::from(Store::with_id(5));
    let selected = vec![AnyEntity::from(Store::with_id(5))];
    assert!(ptr::eq(resolve_selected(&option, Some(selected.as_slice())), &selected[0]));
}
