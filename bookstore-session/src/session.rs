//! Edit session: stateful screen logic without I/O.
//!
//! The session is a pure state machine. It consumes the loaded entity,
//! relationship query responses and save results, and tells the caller which
//! queries and save request to issue. The driver handles all I/O.

use crate::error::{SessionError, SessionResult};
use crate::form::{EditForm, FormValue};
use crate::state::{
    RelationshipQuery, RelationshipUpdate, SaveOutcome, SaveRequest, SessionPhase,
};
use bookstore_model::{AnyEntity, EditableEntity, EntitySchema, ModelError};
use bookstore_reconcile::{reconcile, resolve_selected};
use bookstore_types::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for edit sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound for every backend call made by the driver (ms).
    pub request_timeout_ms: u64,
    /// Reject a submit while a previous save is still in flight.
    pub reject_overlapping_saves: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            reject_overlapping_saves: true,
        }
    }
}

impl SessionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Update-screen state for one entity of kind `E`.
#[derive(Debug)]
pub struct EditSession<E: EditableEntity> {
    id: SessionId,
    config: SessionConfig,
    phase: SessionPhase,
    form: EditForm,
    /// Candidate options per relationship field.
    collections: BTreeMap<&'static str, Vec<AnyEntity>>,
    /// Last query failure per relationship field, for display.
    relationship_errors: BTreeMap<&'static str, String>,
    load_error: Option<String>,
    last_save_error: Option<String>,
    saves_in_flight: usize,
    saved: Option<E>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: EditableEntity> EditSession<E> {
    pub fn new(config: SessionConfig) -> Self {
        let form = EditForm::empty(E::schema());
        let collections = form
            .schema()
            .relationships()
            .map(|rel| (rel.field, Vec::new()))
            .collect();
        Self {
            id: SessionId::new(),
            config,
            phase: SessionPhase::Loading,
            form,
            collections,
            relationship_errors: BTreeMap::new(),
            load_error: None,
            last_save_error: None,
            saves_in_flight: 0,
            saved: None,
            _entity: PhantomData,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn schema(&self) -> &EntitySchema {
        self.form.schema()
    }

    pub fn is_saving(&self) -> bool {
        self.phase == SessionPhase::Saving
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    /// Mutable access for user input; only while the form is on screen.
    pub fn form_mut(&mut self) -> SessionResult<&mut EditForm> {
        match self.phase {
            SessionPhase::Ready | SessionPhase::Saving => Ok(&mut self.form),
            phase => Err(SessionError::InvalidPhase {
                operation: "edit the form",
                phase,
            }),
        }
    }

    /// Candidate options of a relationship field; empty for unknown fields.
    pub fn collection(&self, field: &str) -> &[AnyEntity] {
        self.collections.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn relationship_error(&self, field: &str) -> Option<&str> {
        self.relationship_errors.get(field).map(String::as_str)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// The entity returned by the successful save, once navigated.
    pub fn saved(&self) -> Option<&E> {
        self.saved.as_ref()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Populates the form from the entity to edit, seeds every relationship
    /// collection with its current values and returns the collection
    /// queries to issue, one per relationship.
    pub fn on_entity_loaded(&mut self, entity: E) -> SessionResult<Vec<RelationshipQuery>> {
        match self.phase {
            SessionPhase::Loading => {}
            SessionPhase::Closed => {
                debug!(session = %self.id, kind = %E::KIND, "entity arrived after close, ignoring");
                return Ok(Vec::new());
            }
            phase => {
                return Err(SessionError::InvalidPhase {
                    operation: "load the entity",
                    phase,
                });
            }
        }

        let form = match EditForm::from_entity(&entity) {
            Ok(form) => form,
            Err(err) => {
                self.on_entity_load_failed(&err);
                return Err(err);
            }
        };
        self.form = form;

        let relationships: Vec<_> = self.form.schema().relationships().collect();
        let mut queries = Vec::with_capacity(relationships.len());
        for rel in relationships {
            let current = self.collections.remove(rel.field).unwrap_or_default();
            let seeded = reconcile(current, self.form.relation_snapshot(rel.field));
            self.collections.insert(rel.field, seeded);
            queries.push(RelationshipQuery {
                field: rel.field,
                target: rel.target,
            });
        }

        self.phase = SessionPhase::Ready;
        info!(
            session = %self.id,
            kind = %E::KIND,
            id = ?entity.record_id(),
            queries = queries.len(),
            "edit session ready"
        );
        Ok(queries)
    }

    /// Records that the entity to edit could not be loaded. The session
    /// stays in `LoadFailed` and keeps the message for display.
    pub fn on_entity_load_failed(&mut self, error: &SessionError) {
        if self.phase != SessionPhase::Loading {
            debug!(session = %self.id, phase = %self.phase, "late load failure ignored");
            return;
        }
        warn!(session = %self.id, kind = %E::KIND, %error, "failed to load entity");
        self.load_error = Some(error.to_string());
        self.phase = SessionPhase::LoadFailed;
    }

    /// Applies one relationship query response.
    ///
    /// The form's value for that relationship is read now, not when the query
    /// was issued, so selections made while the query was outstanding stay
    /// selectable. Only that relationship's collection is written. On failure,
    /// including a page holding entities of the wrong kind, the previous
    /// collection is kept and the error is recorded for that field.
    pub fn on_relationship_loaded(
        &mut self,
        field: &str,
        result: SessionResult<Vec<AnyEntity>>,
    ) -> SessionResult<RelationshipUpdate> {
        match self.phase {
            SessionPhase::Ready | SessionPhase::Saving => {}
            SessionPhase::Loading => {
                return Err(SessionError::InvalidPhase {
                    operation: "apply a relationship query",
                    phase: self.phase,
                });
            }
            phase => {
                debug!(session = %self.id, field, %phase, "relationship response ignored");
                return Ok(RelationshipUpdate::Ignored);
            }
        }

        let rel = self
            .form
            .schema()
            .relationship(field)
            .ok_or_else(|| SessionError::UnknownField {
                kind: E::KIND,
                field: field.to_string(),
            })?;

        let checked = result.and_then(|fetched| {
            let stray = fetched.iter().map(AnyEntity::kind).find(|&k| k != rel.target);
            match stray {
                Some(found) => Err(ModelError::KindMismatch {
                    expected: rel.target,
                    found,
                }
                .into()),
                None => Ok(fetched),
            }
        });
        let fetched = match checked {
            Ok(fetched) => fetched,
            Err(error) => {
                warn!(session = %self.id, field, %error, "relationship query failed, keeping current options");
                self.relationship_errors.insert(rel.field, error.to_string());
                return Ok(RelationshipUpdate::Failed);
            }
        };

        let must_include = self.form.relation_snapshot(rel.field);
        let options = reconcile(fetched, must_include);
        let len = options.len();
        self.collections.insert(rel.field, options);
        self.relationship_errors.remove(rel.field);
        debug!(session = %self.id, field, len, "relationship options replaced");
        Ok(RelationshipUpdate::Replaced { len })
    }

    // ── Saving ───────────────────────────────────────────────────

    /// Builds the entity from the form and resolves it to a create (no
    /// identifier) or update request.
    pub fn submit(&mut self) -> SessionResult<SaveRequest<E>> {
        match self.phase {
            SessionPhase::Ready => {}
            SessionPhase::Saving if self.config.reject_overlapping_saves => {
                return Err(SessionError::SaveInFlight);
            }
            SessionPhase::Saving => {}
            phase => {
                return Err(SessionError::InvalidPhase {
                    operation: "submit",
                    phase,
                });
            }
        }

        let entity: E = self.form.build()?;
        self.saves_in_flight += 1;
        self.phase = SessionPhase::Saving;

        let request = if entity.record_id().is_some() {
            SaveRequest::Update(entity)
        } else {
            SaveRequest::Create(entity)
        };
        debug!(
            session = %self.id,
            kind = %E::KIND,
            create = request.is_create(),
            in_flight = self.saves_in_flight,
            "save submitted"
        );
        Ok(request)
    }

    /// Applies the single terminal signal of a save. The saving state is
    /// finalized on both paths; only success navigates.
    pub fn on_save_result(&mut self, result: SessionResult<E>) -> SaveOutcome {
        if self.saves_in_flight == 0 {
            debug!(session = %self.id, "save signal without a pending save ignored");
            return SaveOutcome::Ignored;
        }
        self.saves_in_flight -= 1;

        if self.phase.is_terminal() {
            debug!(session = %self.id, phase = %self.phase, "save signal ignored");
            return SaveOutcome::Ignored;
        }

        match result {
            Ok(saved) => {
                info!(session = %self.id, kind = %E::KIND, id = ?saved.record_id(), "saved");
                self.saved = Some(saved);
                self.last_save_error = None;
                self.phase = SessionPhase::Navigated;
                SaveOutcome::NavigateBack
            }
            Err(error) => {
                warn!(session = %self.id, kind = %E::KIND, %error, "save failed");
                self.last_save_error = Some(error.to_string());
                self.phase = if self.saves_in_flight > 0 {
                    SessionPhase::Saving
                } else {
                    SessionPhase::Ready
                };
                SaveOutcome::Retry
            }
        }
    }

    /// Dismisses the screen. Signals arriving afterwards are ignored.
    pub fn close(&mut self) {
        if self.phase != SessionPhase::Closed {
            debug!(session = %self.id, phase = %self.phase, "edit session closed");
            self.phase = SessionPhase::Closed;
        }
    }

    /// Maps a rendered option onto the value currently bound to `field`, so
    /// the multi-select keeps highlighting it after the options reload.
    pub fn resolve_selected<'a>(&'a self, field: &str, option: &'a AnyEntity) -> &'a AnyEntity {
        let selected = match self.form.get(field) {
            Some(FormValue::Many(values)) => Some(values.as_slice()),
            Some(FormValue::One(Some(value))) => Some(std::slice::from_ref(value)),
            _ => None,
        };
        resolve_selected(option, selected)
    }
}
