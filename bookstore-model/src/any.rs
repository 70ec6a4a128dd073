use crate::entity::{Author, Book, Identified, Publisher, Store};
use crate::error::{ModelError, ModelResult};
use bookstore_types::{EntityKind, RecordId};
use serde::{Serialize, Serializer};

/// An entity value whose kind is only known at runtime.
///
/// Relationship collections and backend calls are kind-agnostic, so they
/// carry `AnyEntity`. It serializes as the wrapped entity, without a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyEntity {
    Author(Author),
    Book(Book),
    Publisher(Publisher),
    Store(Store),
}

impl AnyEntity {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Author(_) => EntityKind::Author,
            Self::Book(_) => EntityKind::Book,
            Self::Publisher(_) => EntityKind::Publisher,
            Self::Store(_) => EntityKind::Store,
        }
    }

    /// Decodes entity JSON as the given kind.
    pub fn from_value(kind: EntityKind, value: serde_json::Value) -> ModelResult<Self> {
        if !value.is_object() {
            return Err(ModelError::NotAnObject { kind });
        }
        Ok(match kind {
            EntityKind::Author => Self::Author(serde_json::from_value(value)?),
            EntityKind::Book => Self::Book(serde_json::from_value(value)?),
            EntityKind::Publisher => Self::Publisher(serde_json::from_value(value)?),
            EntityKind::Store => Self::Store(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> ModelResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns the value with its identifier replaced.
    #[must_use]
    pub fn with_record_id(mut self, id: RecordId) -> Self {
        match &mut self {
            Self::Author(e) => e.id = Some(id),
            Self::Book(e) => e.id = Some(id),
            Self::Publisher(e) => e.id = Some(id),
            Self::Store(e) => e.id = Some(id),
        }
        self
    }

    /// Human-readable label for dropdown options.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Author(e) => e.name.as_deref(),
            Self::Book(e) => e.title.as_deref(),
            Self::Publisher(e) => e.name.as_deref(),
            Self::Store(e) => e.name.as_deref(),
        }
    }
}

impl Identified for AnyEntity {
    fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Author(e) => e.record_id(),
            Self::Book(e) => e.record_id(),
            Self::Publisher(e) => e.record_id(),
            Self::Store(e) => e.record_id(),
        }
    }
}

impl Serialize for AnyEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Author(e) => e.serialize(serializer),
            Self::Book(e) => e.serialize(serializer),
            Self::Publisher(e) => e.serialize(serializer),
            Self::Store(e) => e.serialize(serializer),
        }
    }
}

macro_rules! impl_any_conversions {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AnyEntity {
                fn from(entity: $variant) -> Self {
                    Self::$variant(entity)
                }
            }

            impl TryFrom<AnyEntity> for $variant {
                type Error = ModelError;

                fn try_from(value: AnyEntity) -> Result<Self, Self::Error> {
                    match value {
                        AnyEntity::$variant(entity) => Ok(entity),
                        other => Err(ModelError::KindMismatch {
                            expected: EntityKind::$variant,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_any_conversions!(Author, Book, Publisher, Store);
