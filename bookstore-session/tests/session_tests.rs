mod common;

use bookstore_model::{AnyEntity, Author, Book, EntityKind, Identified, Publisher, RecordId, Store};
use bookstore_session::{
    EditSession, RelationshipQuery, RelationshipUpdate, SaveOutcome, SaveRequest, SessionConfig,
    SessionError, SessionPhase,
};
use common::{author, book, ids, init_tracing, named_author, publisher};
use pretty_assertions::assert_eq;
use std::ptr;

fn book_session() -> EditSession<Book> {
    init_tracing();
    EditSession::new(SessionConfig::default())
}

fn store_session() -> EditSession<Store> {
    init_tracing();
    EditSession::new(SessionConfig::default())
}

fn loaded_book(id: i64) -> EditSession<Book> {
    let mut session = book_session();
    session.on_entity_loaded(Book::with_id(id)).unwrap();
    session
}

fn backend_failure() -> SessionError {
    SessionError::Backend("This is an error!".into())
}

// ── Configuration ────────────────────────────────────────────────

#[test]
fn default_config() {
    let config = SessionConfig::default();
    assert_eq!(config.request_timeout_ms, 30_000);
    assert!(config.reject_overlapping_saves);
    assert_eq!(config.request_timeout().as_secs(), 30);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: SessionConfig = serde_json::from_str(r#"{"request_timeout_ms": 500}"#).unwrap();
    assert_eq!(config.request_timeout_ms, 500);
    assert!(config.reject_overlapping_saves);
}

// ── Loading ──────────────────────────────────────────────────────

#[test]
fn new_session_is_loading() {
    let session = book_session();
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert!(!session.is_saving());
    assert!(session.collection("author").is_empty());
}

#[test]
fn loading_populates_form_and_seeds_collections() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(5685)),
        publisher: Some(Publisher::with_id(56473)),
        ..Book::with_id(456)
    };

    let queries = session.on_entity_loaded(book).unwrap();

    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.form().one("author"), Some(&author(5685)));
    assert_eq!(session.collection("author"), &[author(5685)]);
    assert_eq!(session.collection("publisher"), &[publisher(56473)]);
    assert_eq!(
        queries,
        vec![
            RelationshipQuery {
                field: "author",
                target: EntityKind::Author
            },
            RelationshipQuery {
                field: "publisher",
                target: EntityKind::Publisher
            },
        ]
    );
}

#[test]
fn loading_without_relations_seeds_empty_collections() {
    let mut session = book_session();
    session.on_entity_loaded(Book::default()).unwrap();
    assert!(session.collection("author").is_empty());
    assert!(session.collection("publisher").is_empty());
}

#[test]
fn kinds_without_relationships_issue_no_queries() {
    let mut session = EditSession::<Publisher>::new(SessionConfig::default());
    let queries = session.on_entity_loaded(Publisher::with_id(1)).unwrap();
    assert!(queries.is_empty());
    assert_eq!(session.phase(), SessionPhase::Ready);
}

#[test]
fn loading_twice_is_rejected() {
    let mut session = loaded_book(1);
    let err = session.on_entity_loaded(Book::with_id(2)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidPhase {
            phase: SessionPhase::Ready,
            ..
        }
    ));
    assert_eq!(session.form().scalar("id"), Some(&serde_json::json!(1)));
}

#[test]
fn load_failure_is_surfaced() {
    let mut session = book_session();
    session.on_entity_load_failed(&SessionError::NotFound {
        kind: EntityKind::Book,
        id: RecordId::new(9),
    });
    assert_eq!(session.phase(), SessionPhase::LoadFailed);
    assert_eq!(session.load_error(), Some("book 9 not found"));
    assert!(matches!(session.submit(), Err(SessionError::InvalidPhase { .. })));
}

#[test]
fn entity_after_close_is_ignored() {
    let mut session = book_session();
    session.close();
    let queries = session.on_entity_loaded(Book::with_id(1)).unwrap();
    assert!(queries.is_empty());
    assert_eq!(session.phase(), SessionPhase::Closed);
}

// ── Relationship responses ───────────────────────────────────────

#[test]
fn book_author_scenario() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(47336)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();

    let update = session
        .on_relationship_loaded("author", Ok(vec![author(29185)]))
        .unwrap();

    assert_eq!(update, RelationshipUpdate::Replaced { len: 2 });
    assert_eq!(ids(session.collection("author")), vec![Some(47336), Some(29185)]);
}

#[test]
fn book_publisher_scenario() {
    let mut session = book_session();
    let book = Book {
        publisher: Some(Publisher::with_id(65411)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();
    session
        .on_relationship_loaded("publisher", Ok(vec![publisher(41410)]))
        .unwrap();
    assert_eq!(ids(session.collection("publisher")), vec![Some(65411), Some(41410)]);
}

#[test]
fn store_books_scenario() {
    let mut session = store_session();
    let store = Store {
        books: Some(vec![Book::with_id(20128)]),
        ..Store::with_id(456)
    };
    session.on_entity_loaded(store).unwrap();
    session
        .on_relationship_loaded("books", Ok(vec![book(41299)]))
        .unwrap();
    assert_eq!(ids(session.collection("books")), vec![Some(20128), Some(41299)]);
}

#[test]
fn fetched_page_containing_current_value_is_used_as_is() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(2)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();
    session
        .on_relationship_loaded("author", Ok(vec![author(1), author(2), author(3)]))
        .unwrap();
    assert_eq!(ids(session.collection("author")), vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn responses_use_the_form_value_at_arrival() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(1)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();

    // The user picks another author before the query resolves.
    session
        .form_mut()
        .unwrap()
        .set_one("author", Some(author(77)))
        .unwrap();

    session
        .on_relationship_loaded("author", Ok(vec![author(5)]))
        .unwrap();
    assert_eq!(ids(session.collection("author")), vec![Some(77), Some(5)]);
}

#[test]
fn responses_only_touch_their_own_relationship() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(1)),
        publisher: Some(Publisher::with_id(2)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();

    // Publisher answers first.
    session
        .on_relationship_loaded("publisher", Ok(vec![publisher(20)]))
        .unwrap();
    assert_eq!(ids(session.collection("author")), vec![Some(1)]);
    assert_eq!(ids(session.collection("publisher")), vec![Some(2), Some(20)]);

    session
        .on_relationship_loaded("author", Ok(vec![author(10)]))
        .unwrap();
    assert_eq!(ids(session.collection("author")), vec![Some(1), Some(10)]);
    assert_eq!(ids(session.collection("publisher")), vec![Some(2), Some(20)]);
}

#[test]
fn multi_select_keeps_all_current_values() {
    let mut session = store_session();
    let store = Store {
        books: Some(vec![Book::with_id(1), Book::with_id(2), Book::with_id(3)]),
        ..Store::with_id(8)
    };
    session.on_entity_loaded(store).unwrap();
    session
        .on_relationship_loaded("books", Ok(vec![book(2), book(4)]))
        .unwrap();
    assert_eq!(
        ids(session.collection("books")),
        vec![Some(1), Some(3), Some(2), Some(4)]
    );
}

#[test]
fn query_failure_keeps_seeded_collection() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(47336)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();

    let update = session
        .on_relationship_loaded("author", Err(backend_failure()))
        .unwrap();

    assert_eq!(update, RelationshipUpdate::Failed);
    assert_eq!(ids(session.collection("author")), vec![Some(47336)]);
    assert_eq!(
        session.relationship_error("author"),
        Some("backend error: This is an error!")
    );
    assert_eq!(session.relationship_error("publisher"), None);
    assert_eq!(session.phase(), SessionPhase::Ready);
}

#[test]
fn later_success_clears_relationship_error() {
    let mut session = loaded_book(1);
    session
        .on_relationship_loaded("author", Err(backend_failure()))
        .unwrap();
    session
        .on_relationship_loaded("author", Ok(vec![author(3)]))
        .unwrap();
    assert_eq!(session.relationship_error("author"), None);
}

#[test]
fn unknown_relationship_is_rejected() {
    let mut session = loaded_book(1);
    let err = session
        .on_relationship_loaded("title", Ok(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, SessionError::UnknownField { .. }));
}

#[test]
fn response_of_wrong_kind_fails_only_that_relationship() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(1)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();

    let update = session
        .on_relationship_loaded("author", Ok(vec![publisher(77)]))
        .unwrap();

    assert_eq!(update, RelationshipUpdate::Failed);
    assert_eq!(ids(session.collection("author")), vec![Some(1)]);
    assert_eq!(
        session.relationship_error("author"),
        Some("model error: expected a author but got a publisher")
    );

    let update = session
        .on_relationship_loaded("publisher", Ok(vec![publisher(77)]))
        .unwrap();
    assert_eq!(update, RelationshipUpdate::Replaced { len: 1 });
    assert_eq!(session.relationship_error("publisher"), None);
}

#[test]
fn response_before_load_is_rejected() {
    let mut session = book_session();
    let err = session
        .on_relationship_loaded("author", Ok(Vec::new()))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidPhase {
            phase: SessionPhase::Loading,
            ..
        }
    ));
}

#[test]
fn response_after_close_is_a_noop() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(1)),
        ..Book::with_id(456)
    };
    session.on_entity_loaded(book).unwrap();
    session.close();

    let update = session
        .on_relationship_loaded("author", Ok(vec![author(2)]))
        .unwrap();
    assert_eq!(update, RelationshipUpdate::Ignored);
    assert_eq!(ids(session.collection("author")), vec![Some(1)]);
    assert_eq!(session.phase(), SessionPhase::Closed);
}

#[test]
fn response_while_saving_is_applied() {
    let mut session = loaded_book(1);
    session.submit().unwrap();
    let update = session
        .on_relationship_loaded("author", Ok(vec![author(4)]))
        .unwrap();
    assert_eq!(update, RelationshipUpdate::Replaced { len: 1 });
}

// ── Saving ───────────────────────────────────────────────────────

#[test]
fn existing_entity_submits_update() {
    let mut session = loaded_book(123);
    let request = session.submit().unwrap();
    assert_eq!(request, SaveRequest::Update(Book::with_id(123)));
    assert!(session.is_saving());
}

#[test]
fn new_entity_submits_create() {
    let mut session = book_session();
    session.on_entity_loaded(Book::default()).unwrap();
    let request = session.submit().unwrap();
    assert!(request.is_create());
    assert_eq!(request.into_entity(), Book::default());
}

#[test]
fn submit_builds_from_current_form() {
    let mut session = book_session();
    session.on_entity_loaded(Book::default()).unwrap();
    let form = session.form_mut().unwrap();
    form.set_scalar("title", "Dune").unwrap();
    form.set_one("author", Some(named_author(9, "Frank Herbert").into()))
        .unwrap();

    let request = session.submit().unwrap();
    let built = request.entity();
    assert_eq!(built.title.as_deref(), Some("Dune"));
    assert_eq!(built.author.as_ref().and_then(|a| a.record_id()), Some(RecordId::new(9)));
    assert!(built.is_new());
}

#[test]
fn save_failure_clears_saving_without_navigation() {
    let mut session = loaded_book(123);
    session.submit().unwrap();
    assert!(session.is_saving());

    let outcome = session.on_save_result(Err(backend_failure()));

    assert_eq!(outcome, SaveOutcome::Retry);
    assert!(!session.is_saving());
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.last_save_error(), Some("backend error: This is an error!"));
}

#[test]
fn save_failure_keeps_user_edits() {
    let mut session = loaded_book(123);
    session.form_mut().unwrap().set_scalar("title", "Draft").unwrap();
    session.submit().unwrap();
    session.on_save_result(Err(backend_failure()));

    assert_eq!(session.form().scalar("title"), Some(&serde_json::json!("Draft")));
    let retry = session.submit().unwrap();
    assert_eq!(retry.entity().title.as_deref(), Some("Draft"));
}

#[test]
fn save_success_navigates() {
    let mut session = loaded_book(123);
    session.submit().unwrap();
    let outcome = session.on_save_result(Ok(Book::with_id(123)));

    assert_eq!(outcome, SaveOutcome::NavigateBack);
    assert!(!session.is_saving());
    assert_eq!(session.phase(), SessionPhase::Navigated);
    assert_eq!(session.saved(), Some(&Book::with_id(123)));
}

#[test]
fn save_signal_without_submit_is_ignored() {
    let mut session = loaded_book(1);
    assert_eq!(session.on_save_result(Ok(Book::with_id(1))), SaveOutcome::Ignored);
    assert_eq!(session.phase(), SessionPhase::Ready);
}

#[test]
fn overlapping_submit_is_rejected_by_default() {
    let mut session = loaded_book(1);
    session.submit().unwrap();
    assert!(matches!(session.submit(), Err(SessionError::SaveInFlight)));
    assert!(session.is_saving());
}

#[test]
fn overlapping_submits_when_allowed() {
    init_tracing();
    let mut session = EditSession::<Book>::new(SessionConfig {
        reject_overlapping_saves: false,
        ..SessionConfig::default()
    });
    session.on_entity_loaded(Book::with_id(1)).unwrap();
    session.submit().unwrap();
    session.submit().unwrap();

    assert_eq!(session.on_save_result(Err(backend_failure())), SaveOutcome::Retry);
    assert!(session.is_saving(), "second save still in flight");

    assert_eq!(session.on_save_result(Ok(Book::with_id(1))), SaveOutcome::NavigateBack);
    assert_eq!(session.phase(), SessionPhase::Navigated);
}

#[test]
fn only_first_overlapping_success_navigates() {
    let mut session = EditSession::<Book>::new(SessionConfig {
        reject_overlapping_saves: false,
        ..SessionConfig::default()
    });
    session.on_entity_loaded(Book::with_id(1)).unwrap();
    session.submit().unwrap();
    session.submit().unwrap();

    assert_eq!(session.on_save_result(Ok(Book::with_id(1))), SaveOutcome::NavigateBack);
    assert_eq!(session.on_save_result(Ok(Book::with_id(1))), SaveOutcome::Ignored);
}

#[test]
fn save_result_after_close_is_ignored() {
    let mut session = loaded_book(1);
    session.submit().unwrap();
    session.close();
    assert_eq!(session.on_save_result(Ok(Book::with_id(1))), SaveOutcome::Ignored);
    assert_eq!(session.phase(), SessionPhase::Closed);
}

#[test]
fn form_is_read_only_outside_ready_and_saving() {
    let mut session = book_session();
    assert!(session.form_mut().is_err());
    session.on_entity_loaded(Book::with_id(1)).unwrap();
    assert!(session.form_mut().is_ok());
    session.close();
    assert!(matches!(
        session.form_mut(),
        Err(SessionError::InvalidPhase {
            phase: SessionPhase::Closed,
            ..
        })
    ));
}

// ── Selection ────────────────────────────────────────────────────

#[test]
fn reloaded_option_resolves_to_selected_value() {
    let mut session = store_session();
    let store = Store {
        books: Some(vec![Book::with_id(20128)]),
        ..Store::with_id(1)
    };
    session.on_entity_loaded(store).unwrap();

    let option = AnyEntity::from(Book {
        title: Some("reloaded".into()),
        ..Book::with_id(20128)
    });
    let resolved = session.resolve_selected("books", &option);
    assert!(ptr::eq(resolved, &session.form().many("books")[0]));
}

#[test]
fn unselected_option_resolves_to_itself() {
    let mut session = store_session();
    session.on_entity_loaded(Store::with_id(1)).unwrap();
    let option = book(41299);
    assert!(ptr::eq(session.resolve_selected("books", &option), &option));
    assert!(ptr::eq(session.resolve_selected("unknown", &option), &option));
}

#[test]
fn single_relation_resolves_too() {
    let mut session = book_session();
    let book = Book {
        author: Some(Author::with_id(3)),
        ..Book::with_id(1)
    };
    session.on_entity_loaded(book).unwrap();
    let option = author(3);
    let resolved = session.resolve_selected("author", &option);
    assert!(ptr::eq(resolved, session.form().one("author").unwrap()));
}
