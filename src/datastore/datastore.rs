//! Datastore composition root
//!
//! Wires the document store, the document cache and the index facade behind
//! one async surface. Writes update the indexes only after the store has
//! acknowledged, in acknowledgement order; queries resolve against the
//! indexes and materialize through the cache.
//!
//! A `tokio::sync::RwLock` scopes exclusivity: queries share a read guard,
//! writes and reindex take the write guard, so a reindex is atomic from the
//! caller's perspective and no query observes a half-updated index.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::category::CategoryRegistry;
use crate::index::IndexFacade;
use crate::model::Document;
use crate::observability::{Event, Logger};
use crate::query::{Query, QueryResolver, QueryResult};

use super::cache::DocumentCache;
use super::errors::StoreResult;
use super::store::{Change, ChangeType, DocumentStore};

/// Result of a `find` call
#[derive(Debug, Clone)]
pub struct FindResult {
    /// Matching documents in result order; empty when `skip_documents`
    pub documents: Vec<Arc<Document>>,
    /// Matching ids in result order, always present
    pub ids: Vec<String>,
    /// Match count before pagination
    pub total_count: usize,
}

struct Inner {
    store: DocumentStore,
    cache: DocumentCache,
    index: IndexFacade,
}

/// The async entry point over store, cache and indexes
pub struct Datastore {
    registry: CategoryRegistry,
    inner: RwLock<Inner>,
}

impl Datastore {
    /// Creates a datastore with indexes registered from the registry
    pub fn new(registry: CategoryRegistry) -> Self {
        let index = IndexFacade::new(&registry);
        Self {
            registry,
            inner: RwLock::new(Inner {
                store: DocumentStore::new(),
                cache: DocumentCache::new(),
                index,
            }),
        }
    }

    /// Returns the category registry
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Writes a document: store first, then cache and indexes.
    ///
    /// Index preconditions are checked before the store write, so a
    /// rejected write leaves store and indexes untouched.
    pub async fn put(&self, document: Document) -> StoreResult<Document> {
        let mut inner = self.inner.write().await;
        inner.index.check_put(&document)?;

        let stored = inner.store.put(document)?;
        inner.cache.set(stored.clone());
        inner.index.put(&stored)?;

        Logger::info(Event::StorePut, &[("id", stored.id())]);
        Ok(stored)
    }

    /// Removes a document from store, cache and indexes
    pub async fn remove(&self, id: &str) -> StoreResult<Document> {
        let mut inner = self.inner.write().await;
        let removed = inner.store.remove(id)?;
        inner.cache.remove(id);
        inner.index.remove_id(id);

        Logger::info(Event::StoreRemove, &[("id", id)]);
        Ok(removed)
    }

    /// Returns the shared handle for a document
    pub async fn get(&self, id: &str) -> StoreResult<Arc<Document>> {
        let inner = self.inner.read().await;
        if let Some(cached) = inner.cache.get(id) {
            return Ok(cached);
        }
        inner.store.get(id).map(|document| Arc::new(document.clone()))
    }

    /// Resolves a structured query to documents and a total count
    pub async fn find(&self, query: &Query) -> QueryResult<FindResult> {
        let inner = self.inner.read().await;
        let resolved = QueryResolver::new(&inner.index, &self.registry).resolve(query)?;

        let ids: Vec<String> = resolved.items.iter().map(|item| item.id.clone()).collect();
        let documents = if query.skip_documents {
            Vec::new()
        } else {
            ids.iter().filter_map(|id| inner.cache.get(id)).collect()
        };

        let matched = resolved.total_count.to_string();
        let returned = ids.len().to_string();
        Logger::info(
            Event::QueryExecuted,
            &[("matched", matched.as_str()), ("returned", returned.as_str())],
        );
        Ok(FindResult {
            documents,
            ids,
            total_count: resolved.total_count,
        })
    }

    /// Rebuilds every index and the cache from the store.
    ///
    /// Exclusive: concurrent finds wait until the rebuild finished. A
    /// failed rebuild keeps the previous index state.
    pub async fn reindex(&self) -> StoreResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.store.len().to_string();
        Logger::info(Event::ReindexStart, &[("documents", before.as_str())]);

        let documents: Vec<Document> = inner.store.all().cloned().collect();
        let count = match inner.index.reindex(documents.iter()) {
            Ok(count) => count,
            Err(e) => {
                Logger::error(Event::ReindexFailed, &[("reason", e.message())]);
                return Err(e.into());
            }
        };

        inner.cache.clear();
        for document in documents {
            inner.cache.set(document);
        }

        let rebuilt = count.to_string();
        Logger::info(Event::ReindexComplete, &[("documents", rebuilt.as_str())]);
        Ok(count)
    }

    /// Applies an externally observed change (e.g. from a replicated
    /// store's feed) to cache and indexes, without writing the store.
    pub async fn apply_change(&self, change: Change) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match change.change_type {
            ChangeType::Created | ChangeType::Updated => {
                inner.index.check_put(&change.document)?;
                inner.cache.set(change.document.clone());
                inner.index.put(&change.document)?;
            }
            ChangeType::Deleted => {
                let id = change.document.resource.id;
                inner.cache.remove(&id);
                inner.index.remove_id(&id);
            }
        }
        Ok(())
    }

    /// Subscribes to the store's change feed.
    ///
    /// A lagged subscriber should resynchronize via `reindex`.
    pub async fn changes(&self) -> broadcast::Receiver<Change> {
        self.inner.read().await.store.changes()
    }

    /// Returns the number of live documents
    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    /// Returns true if the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.store.is_empty()
    }
}
