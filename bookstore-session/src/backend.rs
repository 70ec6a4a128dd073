//! Collaborator abstractions.
//!
//! Defines the traits an edit session needs from its surroundings (entity
//! fetch, collection query, persistence and navigation) so the session can
//! run against any backend.

use crate::error::SessionResult;
use async_trait::async_trait;
use bookstore_model::AnyEntity;
use bookstore_types::{EntityKind, RecordId};

/// Source of entities and sink of saves.
///
/// Every call signals exactly once, with either a value or an error.
#[async_trait]
pub trait EntityBackend: Send + Sync {
    /// Loads one entity for editing. `Ok(None)` means not found.
    async fn fetch_by_id(&self, kind: EntityKind, id: RecordId) -> SessionResult<Option<AnyEntity>>;

    /// Fetches candidate entities for a relationship dropdown. May return a
    /// partial page.
    async fn query_collection(&self, kind: EntityKind) -> SessionResult<Vec<AnyEntity>>;

    /// Persists a new entity and returns it with its assigned identifier.
    async fn create(&self, entity: AnyEntity) -> SessionResult<AnyEntity>;

    /// Persists changes to an existing entity.
    async fn update(&self, entity: AnyEntity) -> SessionResult<AnyEntity>;
}

/// UI navigation performed after a successful save.
pub trait Navigator: Send + Sync {
    /// Returns to the previous view.
    fn navigate_back(&self);
}

/// In-memory collaborators for testing.
pub mod mock {
    use super::*;
    use crate::error::SessionError;
    use bookstore_model::Identified;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// A backend call, recorded for assertions.
    #[derive(Debug, Clone, PartialEq)]
    pub enum BackendCall {
        FetchById(EntityKind, RecordId),
        Query(EntityKind),
        Create(AnyEntity),
        Update(AnyEntity),
    }

    /// A backend holding records in memory.
    ///
    /// Creates and updates are validated the way the REST resources do it:
    /// a new entity must not carry an identifier, an update must carry one
    /// that exists.
    #[derive(Debug)]
    pub struct InMemoryBackend {
        records: Mutex<BTreeMap<(EntityKind, RecordId), AnyEntity>>,
        next_id: AtomicI64,
        page_size: Option<usize>,
        fail_saves: AtomicBool,
        failing_queries: Mutex<HashSet<EntityKind>>,
        calls: Mutex<Vec<BackendCall>>,
    }

    impl Default for InMemoryBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl InMemoryBackend {
        /// Identifiers handed out by `create` start here.
        pub const FIRST_ID: i64 = 1001;

        pub fn new() -> Self {
            Self {
                records: Mutex::new(BTreeMap::new()),
                next_id: AtomicI64::new(Self::FIRST_ID),
                page_size: None,
                fail_saves: AtomicBool::new(false),
                failing_queries: Mutex::new(HashSet::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Limits collection queries to the first `size` records by id.
        #[must_use]
        pub fn with_page_size(mut self, size: usize) -> Self {
            self.page_size = Some(size);
            self
        }

        /// Stores a record as-is, assigning an identifier if it has none.
        pub fn seed(&self, entity: impl Into<AnyEntity>) -> RecordId {
            let entity = entity.into();
            let id = entity.record_id().unwrap_or_else(|| self.allocate_id());
            lock(&self.records).insert((entity.kind(), id), entity.with_record_id(id));
            id
        }

        /// Makes every following create/update fail.
        pub fn fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        /// Makes collection queries of `kind` fail.
        pub fn fail_queries(&self, kind: EntityKind) {
            lock(&self.failing_queries).insert(kind);
        }

        pub fn get(&self, kind: EntityKind, id: RecordId) -> Option<AnyEntity> {
            lock(&self.records).get(&(kind, id)).cloned()
        }

        pub fn count(&self, kind: EntityKind) -> usize {
            lock(&self.records).keys().filter(|(k, _)| *k == kind).count()
        }

        pub fn calls(&self) -> Vec<BackendCall> {
            lock(&self.calls).clone()
        }

        fn record(&self, call: BackendCall) {
            lock(&self.calls).push(call);
        }

        fn allocate_id(&self) -> RecordId {
            RecordId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        fn check_saves(&self, kind: EntityKind) -> SessionResult<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(SessionError::Backend(format!("{kind} save rejected")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EntityBackend for InMemoryBackend {
        async fn fetch_by_id(
            &self,
            kind: EntityKind,
            id: RecordId,
        ) -> SessionResult<Option<AnyEntity>> {
            self.record(BackendCall::FetchById(kind, id));
            Ok(self.get(kind, id))
        }

        async fn query_collection(&self, kind: EntityKind) -> SessionResult<Vec<AnyEntity>> {
            self.record(BackendCall::Query(kind));
            if lock(&self.failing_queries).contains(&kind) {
                return Err(SessionError::Backend(format!("{} query failed", kind.api_path())));
            }
            let records = lock(&self.records);
            let page = records
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|(_, entity)| entity.clone())
                .take(self.page_size.unwrap_or(usize::MAX))
                .collect();
            Ok(page)
        }

        async fn create(&self, entity: AnyEntity) -> SessionResult<AnyEntity> {
            self.record(BackendCall::Create(entity.clone()));
            let kind = entity.kind();
            if entity.record_id().is_some() {
                return Err(SessionError::BadRequest {
                    kind,
                    key: "idexists",
                    message: format!("A new {kind} cannot already have an ID"),
                });
            }
            self.check_saves(kind)?;
            let id = self.allocate_id();
            let saved = entity.with_record_id(id);
            lock(&self.records).insert((kind, id), saved.clone());
            Ok(saved)
        }

        async fn update(&self, entity: AnyEntity) -> SessionResult<AnyEntity> {
            self.record(BackendCall::Update(entity.clone()));
            let kind = entity.kind();
            let Some(id) = entity.record_id() else {
                return Err(SessionError::BadRequest {
                    kind,
                    key: "idnull",
                    message: "Invalid id".to_string(),
                });
            };
            self.check_saves(kind)?;
            let mut records = lock(&self.records);
            if !records.contains_key(&(kind, id)) {
                return Err(SessionError::BadRequest {
                    kind,
                    key: "idnotfound",
                    message: "Entity not found".to_string(),
                });
            }
            records.insert((kind, id), entity.clone());
            Ok(entity)
        }
    }

    /// A navigator that counts how often it was asked to go back.
    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        back: AtomicUsize,
    }

    impl RecordingNavigator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn back_count(&self) -> usize {
            self.back.load(Ordering::SeqCst)
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate_back(&self) {
            self.back.fetch_add(1, Ordering::SeqCst);
        }
    }
}
