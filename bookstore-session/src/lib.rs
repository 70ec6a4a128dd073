//! Edit sessions for the bookstore admin screens.
//!
//! One generic session drives the update screen of every entity kind. The
//! kind only contributes its [`EditableEntity`] capabilities (identity,
//! schema, serde mapping); the session contributes the lifecycle.
//!
//! # Architecture
//!
//! - **Form**: [`EditForm`] holds the user-editable field values
//! - **Session**: [`EditSession`] is a pure state machine over
//!   `Loading → Ready → Saving → Ready | Navigated`. It performs no I/O;
//!   it consumes load/query/save signals and returns what to do next
//! - **Backend**: [`EntityBackend`] and [`Navigator`] abstract the
//!   collaborators (fetch, collection query, create/update, navigation)
//! - **Driver**: [`EditSessionDriver`] runs a session against a backend,
//!   applying relationship query responses in completion order
//!
//! Relationship dropdowns are kept consistent with
//! [`bookstore_reconcile::reconcile`]: every response is reconciled against
//! the form's value for that relationship at the time it arrives.
//!
//! # Example
//!
//! ```
//! use bookstore_model::{AnyEntity, Author, Book};
//! use bookstore_session::{EditSession, SaveRequest, SessionConfig};
//!
//! let mut session = EditSession::<Book>::new(SessionConfig::default());
//! let book = Book { author: Some(Author::with_id(47336)), ..Book::with_id(456) };
//!
//! let queries = session.on_entity_loaded(book).unwrap();
//! assert_eq!(queries.len(), 2);
//!
//! let page = vec![AnyEntity::from(Author::with_id(29185))];
//! session.on_relationship_loaded("author", Ok(page)).unwrap();
//! assert_eq!(session.collection("author").len(), 2);
//!
//! assert!(matches!(session.submit().unwrap(), SaveRequest::Update(_)));
//! ```

pub mod backend;
mod driver;
mod error;
mod form;
mod session;
mod state;

pub use backend::{EntityBackend, Navigator};
pub use driver::EditSessionDriver;
pub use error::{SessionError, SessionResult};
pub use form::{EditForm, FormValue};
pub use session::{EditSession, SessionConfig};
pub use state::{RelationshipQuery, RelationshipUpdate, SaveOutcome, SaveRequest, SessionPhase};

pub use bookstore_model::EditableEntity;
