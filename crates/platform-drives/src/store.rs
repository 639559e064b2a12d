//! Resource store
//!
//! Holds drive metadata and ACLs. Every stored resource is an immutable
//! snapshot behind an `Arc`; writers build a new snapshot and swap it in, so
//! readers never observe a partially applied delta.
//!
//! ```text
//! resources: RwLock<BTreeMap<id, Arc<StoredResource>>>   readers clone the Arc
//! writers:   Mutex<HashMap<id, Arc<Mutex<()>>>>          one lock per resource
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use platform_acl::{Acl, AclUpdate, DuplicateKeyPolicy, Owner};
use platform_listing::{Metadata, ProductReference, ResourceId};

use crate::error::{DriveError, DriveResult};

/// Snapshot of a stored resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResource {
    /// Stored metadata; `permissions` is always empty here
    pub metadata: Metadata,
    /// Current ACL
    pub acl: Acl,
}

/// Check run against the current snapshot under the writer lock.
pub type Authorize<'a> = &'a (dyn Fn(&StoredResource) -> DriveResult<()> + Send + Sync);

/// Storage for drives and their ACLs.
///
/// Mutations of one resource are serialized; `authorize` runs against the
/// snapshot the mutation will be applied to.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Store a new resource with an empty ACL and assign its id.
    async fn insert(&self, owner: Owner, product: ProductReference) -> DriveResult<Arc<StoredResource>>;

    /// Current snapshot of a resource.
    async fn get(&self, id: ResourceId) -> Option<Arc<StoredResource>>;

    /// Snapshots in ascending id order, starting after `after`.
    async fn list(&self, after: Option<ResourceId>) -> Vec<Arc<StoredResource>>;

    /// Apply an ACL delta atomically and return the new snapshot.
    async fn update_acl(
        &self,
        id: ResourceId,
        update: &AclUpdate,
        policy: DuplicateKeyPolicy,
        authorize: Authorize<'_>,
    ) -> DriveResult<Arc<StoredResource>>;

    /// Remove a resource and return its last snapshot.
    async fn remove(&self, id: ResourceId, authorize: Authorize<'_>) -> DriveResult<Arc<StoredResource>>;
}

/// In-memory resource store.
pub struct MemoryResourceStore {
    resources: Arc<RwLock<BTreeMap<ResourceId, Arc<StoredResource>>>>,
    writers: Arc<Mutex<HashMap<ResourceId, Arc<Mutex<()>>>>>,
    next_id: AtomicI64,
}

impl std::fmt::Debug for MemoryResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryResourceStore")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryResourceStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            resources: Arc::new(RwLock::new(BTreeMap::new())),
            writers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored resources.
    pub async fn len(&self) -> usize {
        self.resources.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.resources.read().await.is_empty()
    }

    /// Writer lock for an existing resource; unknown ids get no entry.
    async fn writer(&self, id: ResourceId) -> DriveResult<Arc<Mutex<()>>> {
        let mut writers = self.writers.lock().await;
        if let Some(writer) = writers.get(&id) {
            return Ok(writer.clone());
        }
        if !self.resources.read().await.contains_key(&id) {
            return Err(DriveError::NotFound(id));
        }
        Ok(writers.entry(id).or_insert_with(|| Arc::new(Mutex::new(()))).clone())
    }
}

impl Default for MemoryResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn insert(&self, owner: Owner, product: ProductReference) -> DriveResult<Arc<StoredResource>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Arc::new(StoredResource {
            metadata: Metadata::new(id, Utc::now(), owner, product),
            acl: Acl::new(),
        });

        self.resources.write().await.insert(id, stored.clone());
        debug!(resource_id = id, "Resource stored");

        Ok(stored)
    }

    async fn get(&self, id: ResourceId) -> Option<Arc<StoredResource>> {
        self.resources.read().await.get(&id).cloned()
    }

    async fn list(&self, after: Option<ResourceId>) -> Vec<Arc<StoredResource>> {
        let resources = self.resources.read().await;
        match after {
            Some(last) => resources
                .range((std::ops::Bound::Excluded(last), std::ops::Bound::Unbounded))
                .map(|(_, r)| r.clone())
                .collect(),
            None => resources.values().cloned().collect(),
        }
    }

    async fn update_acl(
        &self,
        id: ResourceId,
        update: &AclUpdate,
        policy: DuplicateKeyPolicy,
        authorize: Authorize<'_>,
    ) -> DriveResult<Arc<StoredResource>> {
        let writer = self.writer(id).await?;
        let _guard = writer.lock().await;

        let current = self.get(id).await.ok_or(DriveError::NotFound(id))?;
        authorize(&current)?;

        let acl = current.acl.apply_with_policy(update, policy)?;
        let next = Arc::new(StoredResource {
            metadata: current.metadata.clone(),
            acl,
        });

        self.resources.write().await.insert(id, next.clone());
        debug!(
            resource_id = id,
            added = update.new_entries.len(),
            removed = update.deleted_entries.len(),
            "ACL snapshot swapped"
        );

        Ok(next)
    }

    async fn remove(&self, id: ResourceId, authorize: Authorize<'_>) -> DriveResult<Arc<StoredResource>> {
        let writer = self.writer(id).await?;
        let _guard = writer.lock().await;

        let current = self.get(id).await.ok_or(DriveError::NotFound(id))?;
        authorize(&current)?;

        self.resources.write().await.remove(&id);
        self.writers.lock().await.remove(&id);
        debug!(resource_id = id, "Resource removed");

        Ok(current)
    }
}
