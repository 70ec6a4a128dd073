//! Entity model for the bookstore admin.
//!
//! Defines the types every edit screen depends on:
//! - [`Author`], [`Book`], [`Publisher`], [`Store`]: the plain entity values
//! - [`Identified`]: record identity, the only equality the screens rely on
//! - [`AnyEntity`]: a value of any kind, used wherever the kind is only known at runtime
//! - [`EntitySchema`]: the form fields and relationship descriptors of an edit screen
//! - [`EditableEntity`]: the capability set a kind needs to get a generic edit screen

mod any;
mod editable;
mod entity;
mod error;
mod schema;

pub use any::AnyEntity;
pub use editable::EditableEntity;
pub use entity::{Author, Book, Identified, Publisher, Store};
pub use error::{ModelError, ModelResult};
pub use schema::{Cardinality, EntitySchema, FieldType, FormField, RelationshipDescriptor};

pub use bookstore_types::{EntityKind, RecordId};
