//! In-memory catalog implementation.
//!
//! Keeps every provider's current entity set, a FIFO queue of entities
//! waiting to be processed, and the processed output per origin entity.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::errors::CatalogError;
use crate::interfaces::{MutationChannel, ProcessingStore};
use crate::memory::connection::ProviderConnection;
use crate::types::{PendingEntity, ProcessingResult, StoredEntity};
use catalog_shared::{DeferredEntity, Entity, EntityRef, EntityRelation, Mutation};

/// `(provider_name, origin ref)`.
type OriginKey = (String, String);

struct OriginRecord {
    entities: Vec<StoredEntity>,
    relations: Vec<EntityRelation>,
}

#[derive(Default)]
struct CatalogState {
    providers: HashMap<String, BTreeMap<String, DeferredEntity>>,
    pending: VecDeque<PendingEntity>,
    origins: BTreeMap<OriginKey, OriginRecord>,
}

impl CatalogState {
    fn replace_all(&mut self, provider_name: &str, entities: Vec<DeferredEntity>) -> usize {
        let mut next = BTreeMap::new();
        for deferred in entities {
            next.insert(deferred.entity.entity_ref().to_string(), deferred);
        }

        let previous = self
            .providers
            .insert(provider_name.to_string(), next.clone())
            .unwrap_or_default();

        let mut removed = 0;
        for key in previous.keys().filter(|k| !next.contains_key(*k)) {
            self.forget(provider_name, key);
            removed += 1;
        }

        for (key, deferred) in next {
            self.enqueue(provider_name, &key, deferred);
        }

        removed
    }

    fn apply_delta(
        &mut self,
        provider_name: &str,
        added: Vec<DeferredEntity>,
        removed: Vec<DeferredEntity>,
    ) {
        for deferred in removed {
            let key = deferred.entity.entity_ref().to_string();
            if let Some(current) = self.providers.get_mut(provider_name) {
                current.remove(&key);
            }
            self.forget(provider_name, &key);
        }

        for deferred in added {
            let key = deferred.entity.entity_ref().to_string();
            self.providers
                .entry(provider_name.to_string())
                .or_default()
                .insert(key.clone(), deferred.clone());
            self.enqueue(provider_name, &key, deferred);
        }
    }

    /// Queue an entity, replacing an older queued copy of it.
    fn enqueue(&mut self, provider_name: &str, key: &str, deferred: DeferredEntity) {
        self.drop_pending(provider_name, key);
        self.pending.push_back(PendingEntity {
            provider_name: provider_name.to_string(),
            deferred,
        });
    }

    /// Drop queued work and processed output for an entity.
    fn forget(&mut self, provider_name: &str, key: &str) {
        self.drop_pending(provider_name, key);
        self.origins
            .remove(&(provider_name.to_string(), key.to_string()));
    }

    fn drop_pending(&mut self, provider_name: &str, key: &str) {
        self.pending.retain(|p| {
            p.provider_name != provider_name || p.deferred.entity.entity_ref().to_string() != key
        });
    }

    fn owns(&self, provider_name: &str, key: &str) -> bool {
        self.providers
            .get(provider_name)
            .is_some_and(|entities| entities.contains_key(key))
    }

    fn stored_uid(&self, entity_ref: &EntityRef) -> Option<Uuid> {
        self.origins
            .values()
            .flat_map(|record| record.entities.iter())
            .find(|stored| stored.entity.entity_ref().same_entity(entity_ref))
            .map(|stored| stored.uid)
    }
}

/// A catalog held entirely in memory.
///
/// Mutations from the same provider are applied one at a time; mutations
/// from different providers only contend on the shared state lock.
pub struct InMemoryCatalog {
    config: CatalogConfig,
    state: RwLock<CatalogState>,
    provider_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryCatalog {
    /// Create a new catalog with default configuration.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a new catalog with custom configuration.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CatalogState::default()),
            provider_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Hand out a connection bound to `provider_name`.
    pub fn connection(self: &Arc<Self>, provider_name: impl Into<String>) -> ProviderConnection {
        ProviderConnection::new(provider_name, self.clone())
    }

    fn validate_mutation(&self, mutation: &Mutation) -> Result<(), CatalogError> {
        if let Some(max) = self.config.max_mutation_size {
            if mutation.len() > max {
                return Err(CatalogError::mutation_too_large(mutation.len(), max));
            }
        }

        let entities: Box<dyn Iterator<Item = &DeferredEntity>> = match mutation {
            Mutation::Full { entities } => Box::new(entities.iter()),
            Mutation::Delta { added, removed } => Box::new(added.iter().chain(removed.iter())),
        };

        for deferred in entities {
            let entity = &deferred.entity;
            if entity.kind.trim().is_empty() {
                return Err(CatalogError::invalid_entity(format!(
                    "entity '{}' has no kind",
                    entity.metadata.name
                )));
            }
            if entity.metadata.name.trim().is_empty() {
                return Err(CatalogError::invalid_entity(format!(
                    "entity of kind '{}' has no name",
                    entity.kind
                )));
            }
        }

        Ok(())
    }

    async fn provider_lock(&self, provider_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.provider_locks.lock().await;
        locks
            .entry(provider_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Look up a processed entity.
    pub async fn entity(&self, entity_ref: &EntityRef) -> Option<StoredEntity> {
        let state = self.state.read().await;
        state
            .origins
            .values()
            .flat_map(|record| record.entities.iter())
            .find(|stored| stored.entity.entity_ref().same_entity(entity_ref))
            .cloned()
    }

    /// All processed entities, ordered by ref.
    pub async fn entities(&self) -> Vec<Entity> {
        let state = self.state.read().await;
        let mut by_ref = BTreeMap::new();
        for stored in state.origins.values().flat_map(|r| r.entities.iter()) {
            by_ref
                .entry(stored.entity.entity_ref().to_string())
                .or_insert_with(|| stored.entity.clone());
        }
        by_ref.into_values().collect()
    }

    /// All relations, deduplicated and ordered.
    pub async fn relations(&self) -> Vec<EntityRelation> {
        let state = self.state.read().await;
        state
            .origins
            .values()
            .flat_map(|record| record.relations.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Relations whose source is the given entity.
    pub async fn relations_of(&self, entity_ref: &EntityRef) -> Vec<EntityRelation> {
        self.relations()
            .await
            .into_iter()
            .filter(|relation| relation.source.same_entity(entity_ref))
            .collect()
    }

    /// The entity set a provider currently supplies, ordered by ref.
    pub async fn provider_entities(&self, provider_name: &str) -> Vec<DeferredEntity> {
        let state = self.state.read().await;
        state
            .providers
            .get(provider_name)
            .map(|entities| entities.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of entities waiting to be processed.
    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MutationChannel for InMemoryCatalog {
    #[instrument(skip(self, mutation), fields(kind = mutation.kind(), count = mutation.len()))]
    async fn apply_mutation(
        &self,
        provider_name: &str,
        mutation: Mutation,
    ) -> Result<(), CatalogError> {
        self.validate_mutation(&mutation)?;

        let lock = self.provider_lock(provider_name).await;
        let _guard = lock.lock().await;

        let mut state = self.state.write().await;
        match mutation {
            Mutation::Full { entities } => {
                let count = entities.len();
                let removed = state.replace_all(provider_name, entities);
                info!(
                    provider = %provider_name,
                    count = count,
                    removed = removed,
                    "Applied full mutation"
                );
            }
            Mutation::Delta { added, removed } => {
                let (added_count, removed_count) = (added.len(), removed.len());
                state.apply_delta(provider_name, added, removed);
                info!(
                    provider = %provider_name,
                    added = added_count,
                    removed = removed_count,
                    "Applied delta mutation"
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ProcessingStore for InMemoryCatalog {
    async fn take_pending(&self, limit: usize) -> Vec<PendingEntity> {
        let mut state = self.state.write().await;
        let count = limit.min(state.pending.len());
        state.pending.drain(..count).collect()
    }

    async fn commit_processed(&self, result: ProcessingResult) -> Result<bool, CatalogError> {
        if result.entities.is_empty() {
            return Err(CatalogError::processing(&result.origin, "no entities produced"));
        }
        if let Some(entity) = result
            .entities
            .iter()
            .find(|e| e.kind.trim().is_empty() || e.metadata.name.trim().is_empty())
        {
            return Err(CatalogError::processing(
                &result.origin,
                format!("emitted entity '{}' has no kind or name", entity.entity_ref()),
            ));
        }

        let mut state = self.state.write().await;
        let origin_key = result.origin.to_string();

        if !state.owns(&result.provider_name, &origin_key) {
            debug!(
                provider = %result.provider_name,
                origin = %origin_key,
                "Dropping result for entity no longer supplied by its provider"
            );
            return Ok(false);
        }

        let processed_at = Utc::now();
        let entities: Vec<StoredEntity> = result
            .entities
            .into_iter()
            .map(|entity| StoredEntity {
                uid: state
                    .stored_uid(&entity.entity_ref())
                    .unwrap_or_else(Uuid::new_v4),
                entity,
                origin: result.origin.clone(),
                processed_at,
            })
            .collect();

        state.origins.insert(
            (result.provider_name, origin_key),
            OriginRecord {
                entities,
                relations: result.relations,
            },
        );

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_shared::relation_types;

    fn component(name: &str) -> DeferredEntity {
        DeferredEntity::new(
            Entity::new("backstage.io/v1alpha1", "Component", name),
            "http://fake.com",
        )
    }

    fn full(names: &[&str]) -> Mutation {
        Mutation::Full {
            entities: names.iter().map(|n| component(n)).collect(),
        }
    }

    async fn process_all(catalog: &InMemoryCatalog) {
        for pending in catalog.take_pending(usize::MAX).await {
            let origin = pending.origin();
            catalog
                .commit_processed(ProcessingResult {
                    provider_name: pending.provider_name,
                    origin: origin.clone(),
                    entities: vec![pending.deferred.entity],
                    relations: vec![EntityRelation::new(
                        relation_types::OWNED_BY,
                        origin,
                        EntityRef::in_default("Group", "g"),
                    )],
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_full_mutation_replaces_provider_set() {
        let catalog = InMemoryCatalog::new();

        catalog.apply_mutation("p", full(&["a", "b"])).await.unwrap();
        process_all(&catalog).await;
        assert_eq!(catalog.entities().await.len(), 2);

        catalog.apply_mutation("p", full(&["b", "c"])).await.unwrap();
        assert_eq!(catalog.pending_count().await, 2);
        process_all(&catalog).await;

        let names: Vec<String> = catalog
            .entities()
            .await
            .into_iter()
            .map(|e| e.metadata.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(catalog
            .entity(&EntityRef::in_default("Component", "a"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_delta_mutation_adds_and_removes() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p", full(&["a", "b"])).await.unwrap();

        catalog
            .apply_mutation(
                "p",
                Mutation::Delta {
                    added: vec![component("c")],
                    removed: vec![component("a")],
                },
            )
            .await
            .unwrap();

        let names: Vec<String> = catalog
            .provider_entities("p")
            .await
            .into_iter()
            .map(|d| d.entity.metadata.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
        // "a" was dropped from the queue along with the provider set
        assert_eq!(catalog.pending_count().await, 2);
    }

    #[tokio::test]
    async fn test_providers_are_isolated() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p1", full(&["a"])).await.unwrap();
        catalog.apply_mutation("p2", full(&["b"])).await.unwrap();
        catalog.apply_mutation("p1", full(&[])).await.unwrap();

        assert!(catalog.provider_entities("p1").await.is_empty());
        assert_eq!(catalog.provider_entities("p2").await.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_mutation_is_rejected_without_writes() {
        let catalog = InMemoryCatalog::with_config(CatalogConfig::with_max_mutation_size(1));

        let result = catalog.apply_mutation("p", full(&["a", "b"])).await;

        assert_eq!(result, Err(CatalogError::mutation_too_large(2, 1)));
        assert!(catalog.provider_entities("p").await.is_empty());
        assert_eq!(catalog.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_nameless_entity_is_rejected() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.apply_mutation("p", full(&["a", " "])).await;
        assert!(matches!(result, Err(CatalogError::InvalidEntity(_))));
        assert!(catalog.provider_entities("p").await.is_empty());
    }

    #[tokio::test]
    async fn test_requeue_keeps_single_pending_copy() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        assert_eq!(catalog.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_reprocessing_does_not_accumulate() {
        let catalog = InMemoryCatalog::new();
        let a = EntityRef::in_default("Component", "a");

        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        process_all(&catalog).await;
        let first_uid = catalog.entity(&a).await.unwrap().uid;

        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        process_all(&catalog).await;

        assert_eq!(catalog.relations_of(&a).await.len(), 1);
        assert_eq!(catalog.entity(&a).await.unwrap().uid, first_uid);
    }

    #[tokio::test]
    async fn test_commit_for_removed_origin_is_dropped() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        let pending = catalog.take_pending(10).await;

        catalog.apply_mutation("p", full(&[])).await.unwrap();

        let stored = catalog
            .commit_processed(ProcessingResult {
                provider_name: "p".to_string(),
                origin: pending[0].origin(),
                entities: vec![pending[0].deferred.entity.clone()],
                relations: vec![],
            })
            .await
            .unwrap();

        assert!(!stored);
        assert!(catalog.entities().await.is_empty());
    }

    #[tokio::test]
    async fn test_commit_without_entities_is_rejected() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p", full(&["a"])).await.unwrap();
        let pending = catalog.take_pending(10).await;

        let result = catalog
            .commit_processed(ProcessingResult {
                provider_name: "p".to_string(),
                origin: pending[0].origin(),
                entities: vec![],
                relations: vec![],
            })
            .await;

        assert_eq!(
            result,
            Err(CatalogError::processing(
                "component:default/a",
                "no entities produced"
            ))
        );
        assert!(catalog.entities().await.is_empty());
    }

    #[tokio::test]
    async fn test_relations_dedup_across_kind_case() {
        let catalog = InMemoryCatalog::new();
        catalog.apply_mutation("p", full(&["a", "b"])).await.unwrap();

        for (pending, owner_kind) in catalog.take_pending(10).await.into_iter().zip(["Group", "group"]) {
            catalog
                .commit_processed(ProcessingResult {
                    provider_name: pending.provider_name.clone(),
                    origin: pending.origin(),
                    entities: vec![pending.deferred.entity.clone()],
                    relations: vec![EntityRelation::new(
                        relation_types::OWNER_OF,
                        EntityRef::in_default(owner_kind, "g"),
                        EntityRef::in_default("Component", "shared"),
                    )],
                })
                .await
                .unwrap();
        }

        assert_eq!(catalog.relations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_all_apply() {
        let catalog = Arc::new(InMemoryCatalog::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                let name = format!("c{}", i);
                catalog
                    .apply_mutation(
                        "p",
                        Mutation::Delta {
                            added: vec![component(&name)],
                            removed: vec![],
                        },
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(catalog.provider_entities("p").await.len(), 8);
    }
}
