//! Session phases and the signals exchanged with the driver.

use bookstore_model::EditableEntity;
use bookstore_types::EntityKind;
use std::fmt;

/// Lifecycle phase of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting for the entity to edit.
    Loading,
    /// Form populated; relationship collections may still be arriving.
    Ready,
    /// At least one save is in flight.
    Saving,
    /// A save succeeded and the screen navigated back.
    Navigated,
    /// The entity to edit could not be loaded.
    LoadFailed,
    /// The screen was dismissed.
    Closed,
}

impl SessionPhase {
    /// Phases after which no signal changes the session any more.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Navigated | Self::LoadFailed | Self::Closed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::Navigated => "navigated",
            Self::LoadFailed => "load failed",
            Self::Closed => "closed",
        })
    }
}

/// A collection query to issue for one relationship dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationshipQuery {
    pub field: &'static str,
    pub target: EntityKind,
}

/// What a relationship query response did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipUpdate {
    /// The relationship's collection was replaced; `len` is its new size.
    Replaced { len: usize },
    /// The query failed; the previous collection was kept.
    Failed,
    /// The session no longer accepts updates.
    Ignored,
}

/// The persist operation a submit resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest<E> {
    Create(E),
    Update(E),
}

impl<E: EditableEntity> SaveRequest<E> {
    pub fn entity(&self) -> &E {
        match self {
            Self::Create(e) | Self::Update(e) => e,
        }
    }

    pub fn into_entity(self) -> E {
        match self {
            Self::Create(e) | Self::Update(e) => e,
        }
    }

    #[must_use]
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }
}

/// What the caller should do after a save signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Saved; navigate back to the previous view.
    NavigateBack,
    /// Failed; the form is kept as it was so the user can resubmit.
    Retry,
    /// The session no longer reacts to save signals.
    Ignored,
}
