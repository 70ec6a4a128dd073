//! Async driver: runs an [`EditSession`] against its collaborators.

use crate::backend::{EntityBackend, Navigator};
use crate::error::{SessionError, SessionResult};
use crate::session::{EditSession, SessionConfig};
use crate::state::{RelationshipQuery, SaveOutcome, SaveRequest};
use bookstore_model::EditableEntity;
use bookstore_types::RecordId;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Performs the I/O an edit session asks for and feeds the results back.
pub struct EditSessionDriver<E: EditableEntity> {
    session: EditSession<E>,
    backend: Arc<dyn EntityBackend>,
    navigator: Arc<dyn Navigator>,
}

impl<E: EditableEntity> EditSessionDriver<E> {
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn EntityBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session: EditSession::new(config),
            backend,
            navigator,
        }
    }

    pub fn session(&self) -> &EditSession<E> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession<E> {
        &mut self.session
    }

    pub fn into_session(self) -> EditSession<E> {
        self.session
    }

    /// Opens the update screen of an existing record. A missing record or a
    /// failed fetch leaves the session in `LoadFailed`.
    pub async fn open_existing(&mut self, id: RecordId) -> SessionResult<()> {
        let fetched = self
            .bounded(self.backend.fetch_by_id(E::KIND, id))
            .await
            .and_then(|found| found.ok_or(SessionError::NotFound { kind: E::KIND, id }))
            .and_then(|any| E::try_from(any).map_err(SessionError::from));

        match fetched {
            Ok(entity) => self.open(entity).await,
            Err(err) => {
                self.session.on_entity_load_failed(&err);
                Err(err)
            }
        }
    }

    /// Opens the create screen with a default-constructed entity.
    pub async fn open_new(&mut self) -> SessionResult<()> {
        self.open(E::default()).await
    }

    async fn open(&mut self, entity: E) -> SessionResult<()> {
        let queries = self.session.on_entity_loaded(entity)?;
        self.load_relationships(queries).await;
        Ok(())
    }

    /// Issues every relationship query at once and applies each response as
    /// it completes, in whatever order that is. A response the session
    /// rejects is logged and the remaining ones are still applied.
    async fn load_relationships(&mut self, queries: Vec<RelationshipQuery>) {
        let timeout = self.session.config().request_timeout();
        let mut pending: FuturesUnordered<_> = queries
            .into_iter()
            .map(|query| {
                let backend = Arc::clone(&self.backend);
                async move {
                    let result = with_timeout(timeout, backend.query_collection(query.target)).await;
                    (query, result)
                }
            })
            .collect();

        while let Some((query, result)) = pending.next().await {
            debug!(session = %self.session.id(), field = query.field, ok = result.is_ok(), "relationship query completed");
            if let Err(error) = self.session.on_relationship_loaded(query.field, result) {
                warn!(session = %self.session.id(), field = query.field, %error, "relationship response not applied");
            }
        }
    }

    /// Submits the form, routes it to create or update and applies the
    /// result. Navigates back exactly once, on success.
    pub async fn save(&mut self) -> SessionResult<SaveOutcome> {
        let request = self.session.submit()?;
        let result = match request {
            SaveRequest::Create(entity) => self.bounded(self.backend.create(entity.into())).await,
            SaveRequest::Update(entity) => self.bounded(self.backend.update(entity.into())).await,
        }
        .and_then(|saved| E::try_from(saved).map_err(SessionError::from));

        let outcome = self.session.on_save_result(result);
        if outcome == SaveOutcome::NavigateBack {
            self.navigator.navigate_back();
        }
        Ok(outcome)
    }

    /// Dismisses the screen.
    pub fn close(&mut self) {
        self.session.close();
    }

    async fn bounded<T>(&self, call: impl Future<Output = SessionResult<T>>) -> SessionResult<T> {
        with_timeout(self.session.config().request_timeout(), call).await
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = SessionResult<T>>,
) -> SessionResult<T> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| SessionError::Timeout)?
}
