use crate::any::AnyEntity;
use crate::entity::{Author, Book, Identified, Publisher, Store};
use crate::error::ModelError;
use crate::schema::{EntitySchema, FormField};
use bookstore_types::EntityKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// The capabilities an entity kind needs to get a generic edit screen:
/// identity extraction, form-field mapping (through serde and the schema)
/// and relationship descriptors.
///
/// Inverse relationship sides (`Author::books`, `Book::stores`) are left out
/// of the schema; they are never edited from the owning screen.
pub trait EditableEntity:
    Identified
    + Default
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Into<AnyEntity>
    + TryFrom<AnyEntity, Error = ModelError>
    + Send
    + Sync
    + 'static
{
    const KIND: EntityKind;

    fn schema() -> EntitySchema;
}

impl EditableEntity for Author {
    const KIND: EntityKind = EntityKind::Author;

    fn schema() -> EntitySchema {
        EntitySchema {
            kind: Self::KIND,
            fields: vec![
                FormField::id(),
                FormField::text("name"),
                FormField::number("age"),
                FormField::text("gender"),
            ],
        }
    }
}

impl EditableEntity for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn schema() -> EntitySchema {
        EntitySchema {
            kind: Self::KIND,
            fields: vec![
                FormField::id(),
                FormField::text("title"),
                FormField::number("pageNo"),
                FormField::one("author", EntityKind::Author),
                FormField::one("publisher", EntityKind::Publisher),
            ],
        }
    }
}

impl EditableEntity for Publisher {
    const KIND: EntityKind = EntityKind::Publisher;

    fn schema() -> EntitySchema {
        EntitySchema {
            kind: Self::KIND,
            fields: vec![
                FormField::id(),
                FormField::text("name"),
                FormField::text("location"),
            ],
        }
    }
}

impl EditableEntity for Store {
    const KIND: EntityKind = EntityKind::Store;

    fn schema() -> EntitySchema {
        EntitySchema {
            kind: Self::KIND,
            fields: vec![
                FormField::id(),
                FormField::text("name"),
                FormField::text("adress"),
                FormField::many("books", EntityKind::Book),
            ],
        }
    }
}
