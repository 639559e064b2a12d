//! Integration tests for the drive service.
//!
//! These tests drive the service end to end over the in-memory store,
//! identity provider and event bus:
//! 1. Sharing: owner grants, readers list, strangers see nothing
//! 2. ACL updates: admin checks, atomic deltas, duplicate-key policy
//! 3. Browse: filters, hides, pagination
//! 4. Audit events for every committed change

use platform_acl::{AclEntry, AclError, AclUpdate, DuplicateKeyPolicy, EntityKey, PermissionLevel};
use platform_drives::{BrowseRequest, CreateDriveRequest, DriveError, DriveService, DriveServiceConfig};
use platform_events::{DriveEvent, EventBus};
use platform_listing::{ListingFlags, Metadata, ProductReference};
use platform_org::{Actor, StaticIdentityProvider};
use std::sync::Arc;
use std::time::Duration;

use PermissionLevel::*;

/// Test fixture with a service and a few registered actors.
struct TestFixture {
    service: DriveService,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_config(DriveServiceConfig::default()).await
    }

    async fn with_config(config: DriveServiceConfig) -> Self {
        let identity = StaticIdentityProvider::new();
        identity.register(Actor::new("bob").with_project("proj-1")).await;
        identity.register(Actor::new("alice")).await;
        identity.register(Actor::new("carol")).await;
        identity
            .register(Actor::new("dave").with_group("proj-1", "researchers"))
            .await;
        identity
            .register(Actor::new("ucloud-bot").acting_as_provider("ucloud"))
            .await;

        let service = DriveService::in_memory(config, Arc::new(identity)).unwrap();
        Self { service }
    }

    async fn create(&self, actor: &str, category: &str) -> Metadata {
        let product = ProductReference::new("u1-cephfs", category, "ucloud");
        self.service
            .create(actor, CreateDriveRequest::new(product))
            .await
            .unwrap()
    }

    async fn grant(&self, id: i64, entry: AclEntry) {
        self.service
            .update_acl("bob", id, AclUpdate::new().grant(entry))
            .await
            .unwrap();
    }

    async fn browse_ids(&self, actor: &str, flags: ListingFlags) -> Vec<i64> {
        self.service
            .browse(actor, BrowseRequest::new(flags))
            .await
            .unwrap()
            .items
            .iter()
            .map(|m| m.id)
            .collect()
    }
}

// ============================================================================
// Sharing
// ============================================================================

#[tokio::test]
async fn test_owner_holds_admin_on_create() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;

    assert_eq!(drive.owner.created_by, "bob");
    assert_eq!(drive.owner.project.as_deref(), Some("proj-1"));
    assert!(drive.permissions.myself.has_at_least(Admin));
    assert!(drive.permissions.myself.contains(Edit));
    assert!(drive.permissions.myself.contains(Read));
}

#[tokio::test]
async fn test_bob_alice_carol_scenario() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    let seen = fx
        .service
        .retrieve("alice", drive.id, &ListingFlags::new())
        .await
        .unwrap();
    assert_eq!(seen.permissions.myself.to_vec(), vec![Read]);

    assert_eq!(fx.browse_ids("alice", ListingFlags::new()).await, vec![drive.id]);
    assert!(fx.browse_ids("carol", ListingFlags::new()).await.is_empty());

    let err = fx
        .service
        .retrieve("carol", drive.id, &ListingFlags::new())
        .await
        .unwrap_err();
    assert_eq!(err, DriveError::NotFound(drive.id));
}

#[tokio::test]
async fn test_project_group_grant() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "shared").await;
    fx.grant(drive.id, AclEntry::project_group("proj-1", "researchers", [Edit]))
        .await;

    let seen = fx
        .service
        .retrieve("dave", drive.id, &ListingFlags::new())
        .await
        .unwrap();
    assert!(seen.permissions.myself.has_at_least(Read));
    assert!(!seen.permissions.myself.has_at_least(Admin));
}

#[tokio::test]
async fn test_provider_sees_drives_without_acl_entry() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;

    let seen = fx
        .service
        .retrieve("ucloud-bot", drive.id, &ListingFlags::new())
        .await
        .unwrap();
    assert_eq!(seen.permissions.myself.to_vec(), vec![Provider]);

    // Provider never implies Admin
    let err = fx
        .service
        .update_acl("ucloud-bot", drive.id, AclUpdate::new().grant(AclEntry::user("carol", [Read])))
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_unknown_actor_rejected() {
    let fx = TestFixture::new().await;

    let err = fx
        .service
        .browse("mallory", BrowseRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

// ============================================================================
// ACL updates
// ============================================================================

#[tokio::test]
async fn test_reader_cannot_update_acl() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read, Edit])).await;

    let err = fx
        .service
        .update_acl("alice", drive.id, AclUpdate::new().grant(AclEntry::user("carol", [Read])))
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::PermissionDenied(_)));
    assert_eq!(err.error_code(), "PERMISSION_DENIED");

    // Strangers get not-found instead
    let err = fx
        .service
        .update_acl("carol", drive.id, AclUpdate::new().grant(AclEntry::user("carol", [Admin])))
        .await
        .unwrap_err();
    assert_eq!(err, DriveError::NotFound(drive.id));
}

#[tokio::test]
async fn test_granted_admin_can_share() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Admin])).await;

    let updated = fx
        .service
        .update_acl("alice", drive.id, AclUpdate::new().grant(AclEntry::user("carol", [Read])))
        .await
        .unwrap();

    assert_eq!(updated.permissions.others.len(), 2);
    assert_eq!(fx.browse_ids("carol", ListingFlags::new()).await, vec![drive.id]);
}

#[tokio::test]
async fn test_missing_delete_key_leaves_acl_unchanged() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    let update = AclUpdate::new()
        .grant(AclEntry::user("carol", [Edit]))
        .revoke(EntityKey::user("nobody"));
    let err = fx.service.update_acl("bob", drive.id, update).await.unwrap_err();
    assert_eq!(
        err,
        DriveError::Acl(AclError::EntryNotFound(EntityKey::user("nobody")))
    );

    let flags = ListingFlags::new().include_others(true);
    let seen = fx.service.retrieve("bob", drive.id, &flags).await.unwrap();
    assert_eq!(seen.permissions.others, vec![AclEntry::user("alice", [Read])]);
}

#[tokio::test]
async fn test_repeated_delta_with_deletion_fails_second_time() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    let update = AclUpdate::new().revoke(EntityKey::user("alice"));
    fx.service.update_acl("bob", drive.id, update.clone()).await.unwrap();

    let err = fx.service.update_acl("bob", drive.id, update).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_provider_grant_rejected() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;

    let err = fx
        .service
        .update_acl("bob", drive.id, AclUpdate::new().grant(AclEntry::user("alice", [Provider])))
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Acl(AclError::InvalidPermission(_))));
}

#[tokio::test]
async fn test_same_key_twice_yields_one_entry() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;

    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    let flags = ListingFlags::new().include_others(true);
    let seen = fx.service.retrieve("bob", drive.id, &flags).await.unwrap();
    assert_eq!(seen.permissions.others, vec![AclEntry::user("alice", [Read])]);
}

#[tokio::test]
async fn test_duplicate_keys_in_batch_follow_policy() {
    let batch = AclUpdate::new()
        .grant(AclEntry::user("alice", [Read]))
        .grant(AclEntry::user("alice", [Edit]));

    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    let updated = fx.service.update_acl("bob", drive.id, batch.clone()).await.unwrap();
    assert_eq!(updated.permissions.others, vec![AclEntry::user("alice", [Edit])]);

    let strict = DriveServiceConfig {
        duplicate_keys: DuplicateKeyPolicy::Reject,
        ..Default::default()
    };
    let fx = TestFixture::with_config(strict).await;
    let drive = fx.create("bob", "home").await;
    let err = fx.service.update_acl("bob", drive.id, batch).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Edit])).await;

    let err = fx.service.delete("alice", drive.id).await.unwrap_err();
    assert!(matches!(err, DriveError::PermissionDenied(_)));

    fx.service.delete("bob", drive.id).await.unwrap();
    let err = fx
        .service
        .retrieve("bob", drive.id, &ListingFlags::new())
        .await
        .unwrap_err();
    assert_eq!(err, DriveError::NotFound(drive.id));
}

// ============================================================================
// Browse
// ============================================================================

#[tokio::test]
async fn test_browse_filters_and_hides() {
    let fx = TestFixture::new().await;
    let home = fx.create("bob", "home").await;
    let scratch = fx.create("bob", "scratch").await;

    let all = fx.browse_ids("bob", ListingFlags::new().filter_created_by("bob")).await;
    assert_eq!(all, vec![home.id, scratch.id]);

    let hidden = fx
        .browse_ids(
            "bob",
            ListingFlags::new()
                .filter_created_by("bob")
                .hide_product_category("scratch"),
        )
        .await;
    assert_eq!(hidden, vec![home.id]);

    let by_id = fx.browse_ids("bob", ListingFlags::new().filter_ids([scratch.id])).await;
    assert_eq!(by_id, vec![scratch.id]);
}

#[tokio::test]
async fn test_browse_others_only_for_admins() {
    let fx = TestFixture::new().await;
    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    let flags = ListingFlags::new().include_others(true);
    let request = BrowseRequest::new(flags);

    let as_owner = fx.service.browse("bob", request.clone()).await.unwrap();
    assert_eq!(as_owner.items[0].permissions.others.len(), 1);

    let as_reader = fx.service.browse("alice", request).await.unwrap();
    assert!(as_reader.items[0].permissions.others.is_empty());
}

#[tokio::test]
async fn test_browse_pagination() {
    let fx = TestFixture::new().await;
    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(fx.create("bob", "home").await.id);
    }

    let first = fx
        .service
        .browse("bob", BrowseRequest::default().items_per_page(2))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(first.has_more());

    let mut seen: Vec<i64> = first.items.iter().map(|m| m.id).collect();
    let mut cursor = first.next;
    while cursor.is_some() {
        let page = fx
            .service
            .browse("bob", BrowseRequest::default().items_per_page(2).next(cursor))
            .await
            .unwrap();
        seen.extend(page.items.iter().map(|m| m.id));
        cursor = page.next;
    }

    assert_eq!(seen, created);
}

#[tokio::test]
async fn test_browse_rejects_bad_cursor() {
    let fx = TestFixture::new().await;

    let err = fx
        .service
        .browse("bob", BrowseRequest::default().next(Some("page-two".into())))
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Validation(_)));
}

// ============================================================================
// Audit events
// ============================================================================

#[tokio::test]
async fn test_events_published_for_committed_changes() {
    let fx = TestFixture::new().await;
    let bus = fx.service.events();
    let mut sub = bus.subscribe("drives.#").await.unwrap();

    let drive = fx.create("bob", "home").await;
    fx.grant(drive.id, AclEntry::user("alice", [Read])).await;

    // Rejected updates publish nothing
    let _ = fx
        .service
        .update_acl("alice", drive.id, AclUpdate::new().grant(AclEntry::user("carol", [Read])))
        .await;

    fx.service.delete("bob", drive.id).await.unwrap();

    let mut topics = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_millis(100), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.actor_id, "bob");
        assert_eq!(event.resource_id, drive.id);
        topics.push(event.topic.clone());

        if event.topic == "drives.acl.updated" {
            let payload: DriveEvent = event.parse_payload().unwrap();
            assert_eq!(
                payload,
                DriveEvent::AclUpdated {
                    resource_id: drive.id,
                    added: vec![AclEntry::user("alice", [Read])],
                    removed: Vec::new(),
                }
            );
        }
    }

    assert_eq!(
        topics,
        vec!["drives.drive.created", "drives.acl.updated", "drives.drive.deleted"]
    );
    assert!(sub.try_recv().is_none());

    let stats = bus.stats().await;
    assert_eq!(stats.events_published, 3);
    assert_eq!(stats.events_delivered, 3);
}
