//! Relationship collection reconciliation.
//!
//! Edit screens show related entities in dropdowns whose options come from a
//! backend collection query. That query may return a partial page, so the
//! values the edited record already points at can be missing from it. This
//! crate keeps the option list consistent:
//!
//! - [`reconcile`]: merges the values that must be selectable into a fetched
//!   collection without introducing duplicate records
//! - [`resolve_selected`]: maps a freshly loaded option back onto the value
//!   already bound as selected, so identity-based bindings keep working after
//!   the option list is reloaded
//!
//! Both are pure functions over [`Identified`] values and never fail.
//!
//! # Example
//!
//! ```
//! use bookstore_model::Author;
//! use bookstore_reconcile::reconcile;
//!
//! let fetched = vec![Author::with_id(29185)];
//! let current = Some(Author::with_id(47336));
//!
//! let options = reconcile(fetched, current);
//! assert_eq!(options, vec![Author::with_id(47336), Author::with_id(29185)]);
//! ```

mod reconcile;
mod selection;

pub use reconcile::reconcile;
pub use selection::resolve_selected;

pub use bookstore_model::Identified;
