//! # Drive Service
//!
//! Request boundary for drives. Every call resolves the caller through the
//! identity provider, computes their effective permissions on each resource
//! and enforces the level the operation needs.
//!
//! | Operation | Requires |
//! |---|---|
//! | `create` | a known actor |
//! | `retrieve`, `browse` | any permission on the resource |
//! | `update_acl`, `delete` | `Admin` |
//!
//! Callers with no permission at all get `NotFound` rather than
//! `PermissionDenied`.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use platform_acl::{effective_permissions, AclUpdate, Owner, PermissionLevel, PermissionSet};
use platform_events::{DriveEvent, EventBus, MemoryEventBus};
use platform_listing::{project_view, ListingFlags, Metadata, Permissions, ResourceId};
use platform_org::{Actor, IdentityProvider};

use crate::config::DriveServiceConfig;
use crate::error::{DriveError, DriveResult};
use crate::store::{MemoryResourceStore, ResourceStore, StoredResource};
use crate::types::{BrowseRequest, CreateDriveRequest, Page};

/// The drive service.
pub struct DriveService {
    config: DriveServiceConfig,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ResourceStore>,
    events: Arc<dyn EventBus>,
}

impl std::fmt::Debug for DriveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveService")
            .field("config", &self.config)
            .finish()
    }
}

impl DriveService {
    /// Create a service over the given collaborators.
    pub fn new(
        config: DriveServiceConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ResourceStore>,
        events: Arc<dyn EventBus>,
    ) -> DriveResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            identity,
            store,
            events,
        })
    }

    /// Create a service backed by an in-memory store and event bus.
    pub fn in_memory(
        config: DriveServiceConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> DriveResult<Self> {
        let events = Arc::new(MemoryEventBus::with_capacity(config.event_channel_capacity));
        Self::new(config, identity, Arc::new(MemoryResourceStore::new()), events)
    }

    /// Active configuration.
    pub fn config(&self) -> &DriveServiceConfig {
        &self.config
    }

    /// Bus the service publishes audit events on.
    pub fn events(&self) -> Arc<dyn EventBus> {
        self.events.clone()
    }

    /// Create a drive owned by the caller and their active project.
    #[instrument(skip(self, request), fields(product = %request.product.id))]
    pub async fn create(&self, actor_id: &str, request: CreateDriveRequest) -> DriveResult<Metadata> {
        let actor = self.actor(actor_id).await?;

        let product = &request.product;
        if product.id.is_empty() || product.category.is_empty() || product.provider.is_empty() {
            return Err(DriveError::Validation(
                "product id, category and provider are required".to_string(),
            ));
        }

        let owner = Owner::for_actor(&actor);
        let stored = self.store.insert(owner, request.product).await?;
        info!(resource_id = stored.metadata.id, "Drive created");

        self.publish(actor_id, DriveEvent::created(stored.metadata.clone()))
            .await;

        let permissions = caller_permissions(&actor, &stored);
        Ok(view_or_bare(&stored, &ListingFlags::new(), permissions))
    }

    /// Fetch one drive the caller can read.
    ///
    /// Flags apply as in `browse`; a drive they exclude is reported as not
    /// found.
    #[instrument(skip(self, flags))]
    pub async fn retrieve(
        &self,
        actor_id: &str,
        id: ResourceId,
        flags: &ListingFlags,
    ) -> DriveResult<Metadata> {
        let actor = self.actor(actor_id).await?;
        let stored = self.store.get(id).await.ok_or(DriveError::NotFound(id))?;

        let permissions = caller_permissions(&actor, &stored);
        project_view(&stored.metadata, &stored.acl, flags, &permissions)
            .ok_or(DriveError::NotFound(id))
    }

    /// List the drives the caller can read, one page at a time, in id order.
    #[instrument(skip(self, request), fields(cursor = ?request.next))]
    pub async fn browse(&self, actor_id: &str, request: BrowseRequest) -> DriveResult<Page<Metadata>> {
        let actor = self.actor(actor_id).await?;
        let after = request.after().map_err(DriveError::Validation)?;
        let items_per_page = self.config.page_size(request.items_per_page);

        let mut items = Vec::with_capacity(items_per_page);
        let mut next = None;

        for stored in self.store.list(after).await {
            let permissions = caller_permissions(&actor, &stored);
            let Some(view) = project_view(&stored.metadata, &stored.acl, &request.flags, &permissions)
            else {
                continue;
            };

            if items.len() == items_per_page {
                next = items.last().map(|last: &Metadata| last.id.to_string());
                break;
            }
            items.push(view);
        }

        debug!(returned = items.len(), has_more = next.is_some(), "Browse page built");

        Ok(Page {
            items_per_page,
            items,
            next,
        })
    }

    /// Apply an ACL delta. Requires `Admin`.
    ///
    /// The check and the delta run under the drive's writer lock, so a
    /// concurrent revocation of the caller's own grant is honored.
    #[instrument(
        skip(self, update),
        fields(added = update.new_entries.len(), removed = update.deleted_entries.len())
    )]
    pub async fn update_acl(
        &self,
        actor_id: &str,
        id: ResourceId,
        update: AclUpdate,
    ) -> DriveResult<Metadata> {
        let actor = self.actor(actor_id).await?;

        let authorize = |current: &StoredResource| require(&actor, current, PermissionLevel::Admin);
        let stored = self
            .store
            .update_acl(id, &update, self.config.duplicate_keys, &authorize)
            .await
            .map_err(|e| {
                warn!(resource_id = id, error = %e, "ACL update rejected");
                e
            })?;

        info!(resource_id = id, entries = stored.acl.len(), "ACL updated");
        self.publish(actor_id, DriveEvent::acl_updated(id, &update)).await;

        let permissions = caller_permissions(&actor, &stored);
        Ok(view_or_bare(
            &stored,
            &ListingFlags::new().include_others(true),
            permissions,
        ))
    }

    /// Delete a drive. Requires `Admin`.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor_id: &str, id: ResourceId) -> DriveResult<()> {
        let actor = self.actor(actor_id).await?;

        let authorize = |current: &StoredResource| require(&actor, current, PermissionLevel::Admin);
        self.store.remove(id, &authorize).await?;

        info!(resource_id = id, "Drive deleted");
        self.publish(actor_id, DriveEvent::deleted(id)).await;

        Ok(())
    }

    async fn actor(&self, actor_id: &str) -> DriveResult<Actor> {
        self.identity
            .resolve(actor_id)
            .await
            .ok_or_else(|| DriveError::UnknownActor(actor_id.to_string()))
    }

    /// Audit events are published after the change is committed; a failure
    /// here does not undo it.
    async fn publish(&self, actor_id: &str, event: DriveEvent) {
        let topic = event.topic();
        let result = match event.into_event(actor_id) {
            Ok(event) => self.events.publish(event).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!(topic = %topic, error = %e, "Failed to publish drive event");
        }
    }
}

/// Effective permissions plus the platform-granted `Provider` level.
fn caller_permissions(actor: &Actor, stored: &StoredResource) -> PermissionSet {
    let mut permissions = effective_permissions(actor, &stored.metadata.owner, &stored.acl);
    if actor.is_provider_for(&stored.metadata.product.provider) {
        permissions.insert(PermissionLevel::Provider);
    }
    permissions
}

fn require(actor: &Actor, stored: &StoredResource, level: PermissionLevel) -> DriveResult<()> {
    let permissions = caller_permissions(actor, stored);
    if permissions.is_empty() {
        return Err(DriveError::NotFound(stored.metadata.id));
    }
    if !permissions.has_at_least(level) {
        return Err(DriveError::PermissionDenied(format!(
            "{} requires {} on drive {}",
            actor.id,
            level.as_str(),
            stored.metadata.id
        )));
    }
    Ok(())
}

/// Caller view of a drive they just changed, even if they no longer pass
/// the listing rules.
fn view_or_bare(stored: &StoredResource, flags: &ListingFlags, permissions: PermissionSet) -> Metadata {
    project_view(&stored.metadata, &stored.acl, flags, &permissions).unwrap_or_else(|| Metadata {
        permissions: Permissions {
            myself: permissions,
            others: Vec::new(),
        },
        ..stored.metadata.clone()
    })
}
