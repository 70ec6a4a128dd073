use bookstore_types::EntityKind;
use serde::Serialize;

/// Describes the fields an edit screen exposes for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: Vec<FormField>,
}

impl EntitySchema {
    /// Looks up a field by its form/JSON name.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The relationship fields, in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = RelationshipDescriptor> + '_ {
        self.fields.iter().filter_map(FormField::relationship)
    }

    pub fn relationship(&self, name: &str) -> Option<RelationshipDescriptor> {
        self.field(name).and_then(FormField::relationship)
    }
}

/// One form control. `name` doubles as the entity's JSON key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FormField {
    /// The identifier field, present on every edit screen.
    pub const fn id() -> Self {
        Self {
            name: "id",
            field_type: FieldType::Id,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
        }
    }

    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Number,
        }
    }

    /// Shorthand for a single-valued relationship (dropdown).
    pub const fn one(name: &'static str, target: EntityKind) -> Self {
        Self {
            name,
            field_type: FieldType::One(target),
        }
    }

    /// Shorthand for a multi-valued relationship (multi-select).
    pub const fn many(name: &'static str, target: EntityKind) -> Self {
        Self {
            name,
            field_type: FieldType::Many(target),
        }
    }

    /// The relationship this field edits, if it is a relationship field.
    pub fn relationship(&self) -> Option<RelationshipDescriptor> {
        let (target, cardinality) = match self.field_type {
            FieldType::One(target) => (target, Cardinality::One),
            FieldType::Many(target) => (target, Cardinality::Many),
            FieldType::Id | FieldType::Text | FieldType::Number => return None,
        };
        Some(RelationshipDescriptor {
            field: self.name,
            target,
            cardinality,
        })
    }
}

/// The data type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Id,
    Text,
    /// Whole number stored as `i64`.
    Number,
    One(EntityKind),
    Many(EntityKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// A relationship field together with the kind of entity it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RelationshipDescriptor {
    pub field: &'static str,
    pub target: EntityKind,
    pub cardinality: Cardinality,
}
