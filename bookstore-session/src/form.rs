//! Form state of an edit screen.
//!
//! Every schema field has exactly one [`FormValue`]. User input reaches the
//! session only through the setters here, which check the field exists and
//! the value fits it.

use crate::error::{SessionError, SessionResult};
use bookstore_model::{
    AnyEntity, EditableEntity, EntityKind, EntitySchema, FieldType, FormField, ModelError,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The current value of one form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Identifier, text or number field; `Value::Null` when unset.
    Scalar(Value),
    /// Single-valued relationship (dropdown).
    One(Option<AnyEntity>),
    /// Multi-valued relationship (multi-select).
    Many(Vec<AnyEntity>),
}

impl FormValue {
    fn blank(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Id | FieldType::Text | FieldType::Number => Self::Scalar(Value::Null),
            FieldType::One(_) => Self::One(None),
            FieldType::Many(_) => Self::Many(Vec::new()),
        }
    }

    fn to_json(&self) -> SessionResult<Value> {
        Ok(match self {
            Self::Scalar(value) => value.clone(),
            Self::One(None) => Value::Null,
            Self::One(Some(entity)) => entity.to_value()?,
            Self::Many(entities) => Value::Array(
                entities
                    .iter()
                    .map(AnyEntity::to_value)
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

/// Field values of one edit screen, keyed by form/JSON field name.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    schema: EntitySchema,
    values: BTreeMap<&'static str, FormValue>,
}

impl EditForm {
    /// A form with every field unset.
    pub fn empty(schema: EntitySchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| (f.name, FormValue::blank(f.field_type)))
            .collect();
        Self { schema, values }
    }

    /// A form populated from an entity's scalar and relationship attributes.
    pub fn from_entity<E: EditableEntity>(entity: &E) -> SessionResult<Self> {
        let Value::Object(mut object) = serde_json::to_value(entity)? else {
            return Err(ModelError::NotAnObject { kind: E::KIND }.into());
        };

        let schema = E::schema();
        let mut values = BTreeMap::new();
        for field in &schema.fields {
            let raw = object.remove(field.name).unwrap_or(Value::Null);
            values.insert(field.name, decode_field(field, raw)?);
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&FormValue> {
        self.values.get(field)
    }

    /// Value of a scalar field; `None` for unknown or relationship fields.
    pub fn scalar(&self, field: &str) -> Option<&Value> {
        match self.values.get(field) {
            Some(FormValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Currently selected entity of a single-valued relationship.
    pub fn one(&self, field: &str) -> Option<&AnyEntity> {
        match self.values.get(field) {
            Some(FormValue::One(value)) => value.as_ref(),
            _ => None,
        }
    }

    /// Currently selected entities of a multi-valued relationship.
    pub fn many(&self, field: &str) -> &[AnyEntity] {
        match self.values.get(field) {
            Some(FormValue::Many(values)) => values,
            _ => &[],
        }
    }

    pub fn set_scalar(&mut self, field: &str, value: impl Into<Value>) -> SessionResult<()> {
        let value = value.into();
        let control = self.field(field)?;
        let (fits, expected) = match control.field_type {
            FieldType::Id => (value.is_null() || value.is_i64(), "an integer identifier"),
            FieldType::Text => (value.is_null() || value.is_string(), "text"),
            FieldType::Number => (value.is_null() || value.is_i64(), "a whole number"),
            FieldType::One(_) | FieldType::Many(_) => (false, "related entities"),
        };
        if !fits {
            return Err(SessionError::FieldTypeMismatch {
                field: field.to_string(),
                expected,
            });
        }
        self.values.insert(control.name, FormValue::Scalar(value));
        Ok(())
    }

    pub fn set_one(&mut self, field: &str, value: Option<AnyEntity>) -> SessionResult<()> {
        let control = self.field(field)?;
        let FieldType::One(target) = control.field_type else {
            return Err(SessionError::FieldTypeMismatch {
                field: field.to_string(),
                expected: "a single related entity",
            });
        };
        if let Some(entity) = &value {
            check_kind(target, entity)?;
        }
        self.values.insert(control.name, FormValue::One(value));
        Ok(())
    }

    pub fn set_many(&mut self, field: &str, values: Vec<AnyEntity>) -> SessionResult<()> {
        let control = self.field(field)?;
        let FieldType::Many(target) = control.field_type else {
            return Err(SessionError::FieldTypeMismatch {
                field: field.to_string(),
                expected: "a list of related entities",
            });
        };
        for entity in &values {
            check_kind(target, entity)?;
        }
        self.values.insert(control.name, FormValue::Many(values));
        Ok(())
    }

    /// Copies the related values currently held by a relationship field.
    pub fn relation_snapshot(&self, field: &str) -> Vec<AnyEntity> {
        match self.values.get(field) {
            Some(FormValue::One(value)) => value.iter().cloned().collect(),
            Some(FormValue::Many(values)) => values.clone(),
            _ => Vec::new(),
        }
    }

    /// Builds an entity from a default-constructed one overlaid with every
    /// form value, so unset fields take the default entity's values.
    pub fn build<E: EditableEntity>(&self) -> SessionResult<E> {
        if self.schema.kind != E::KIND {
            return Err(ModelError::KindMismatch {
                expected: E::KIND,
                found: self.schema.kind,
            }
            .into());
        }
        let Value::Object(mut object) = serde_json::to_value(E::default())? else {
            return Err(ModelError::NotAnObject { kind: E::KIND }.into());
        };
        for (name, value) in &self.values {
            object.insert((*name).to_string(), value.to_json()?);
        }
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Form values as the JSON object a built entity would be decoded from.
    pub fn to_json(&self) -> SessionResult<Map<String, Value>> {
        self.values
            .iter()
            .map(|(name, value)| Ok(((*name).to_string(), value.to_json()?)))
            .collect()
    }

    fn field(&self, name: &str) -> SessionResult<FormField> {
        self.schema
            .field(name)
            .copied()
            .ok_or_else(|| SessionError::UnknownField {
                kind: self.schema.kind,
                field: name.to_string(),
            })
    }
}

fn decode_field(field: &FormField, raw: Value) -> SessionResult<FormValue> {
    Ok(match (field.field_type, raw) {
        (FieldType::Id | FieldType::Text | FieldType::Number, raw) => FormValue::Scalar(raw),
        (FieldType::One(_), Value::Null) => FormValue::One(None),
        (FieldType::One(target), raw) => FormValue::One(Some(AnyEntity::from_value(target, raw)?)),
        (FieldType::Many(_), Value::Null) => FormValue::Many(Vec::new()),
        (FieldType::Many(target), Value::Array(items)) => FormValue::Many(
            items
                .into_iter()
                .map(|item| AnyEntity::from_value(target, item))
                .collect::<Result<_, _>>()?,
        ),
        (FieldType::Many(_), _) => {
            return Err(SessionError::FieldTypeMismatch {
                field: field.name.to_string(),
                expected: "a list of related entities",
            });
        }
    })
}

fn check_kind(target: EntityKind, entity: &AnyEntity) -> SessionResult<()> {
    if entity.kind() == target {
        Ok(())
    } else {
        Err(ModelError::KindMismatch {
            expected: target,
            found: entity.kind(),
        }
        .into())
    }
}
