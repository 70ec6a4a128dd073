use bookstore_types::RecordId;
use serde::{Deserialize, Serialize};

/// Record identity.
///
/// Two values are the same record iff both carry an identifier and the
/// identifiers are equal. A value without an identifier is a prospective new
/// record and is never the same record as anything, itself included.
pub trait Identified {
    /// The identifier assigned by the backing store, if any.
    fn record_id(&self) -> Option<RecordId>;

    /// True when the value has never been saved.
    fn is_new(&self) -> bool {
        self.record_id().is_none()
    }

    fn is_same_record<O: Identified + ?Sized>(&self, other: &O) -> bool {
        match (self.record_id(), other.record_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn record_id(&self) -> Option<RecordId> {
        (**self).record_id()
    }
}

/// An author. `books` is the inverse side of `Book::author`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub books: Option<Vec<Book>>,
}

/// A book, owning side of its author and publisher links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub page_no: Option<i64>,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
    pub stores: Option<Vec<Store>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Publisher {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// A store, owning side of the store/book many-to-many link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    #[serde(rename = "adress")]
    pub address: Option<String>,
    pub books: Option<Vec<Book>>,
}

macro_rules! impl_identified {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// A value carrying only an identifier, as returned for
                /// relationship references.
                #[must_use]
                pub fn with_id(id: i64) -> Self {
                    Self {
                        id: Some(RecordId::new(id)),
                        ..Self::default()
                    }
                }
            }

            impl Identified for $ty {
                fn record_id(&self) -> Option<RecordId> {
                    self.id
                }
            }
        )*
    };
}

impl_identified!(Author, Book, Publisher, Store);
