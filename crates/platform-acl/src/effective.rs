//! # Effective Permissions
//!
//! Combines owner status and ACL grants into the permission set an actor
//! actually holds on a resource. Pure function of its inputs.

use platform_org::Actor;

use crate::ledger::Acl;
use crate::owner::Owner;
use crate::permission::PermissionSet;

/// Compute the literal permission set `actor` holds on a resource.
///
/// - The owner holds `{Read, Edit, Admin}` regardless of ACL content.
/// - Everyone else holds the union of all entries that apply to them, either
///   directly as a user or through a project-group membership.
/// - An actor with no matching grants gets the empty set.
///
/// `Provider` never appears in the result; it is granted by the platform.
///
/// # Example
///
/// ```
/// use platform_acl::{effective_permissions, Acl, AclEntry, AclUpdate, Owner, PermissionLevel};
/// use platform_org::Actor;
///
/// let acl = Acl::new()
///     .apply(&AclUpdate::new().grant(AclEntry::user("alice", [PermissionLevel::Read])))
///     .unwrap();
/// let owner = Owner::new("bob", "");
///
/// let alice = effective_permissions(&Actor::new("alice"), &owner, &acl);
/// assert_eq!(alice.to_vec(), vec![PermissionLevel::Read]);
///
/// let carol = effective_permissions(&Actor::new("carol"), &owner, &acl);
/// assert!(carol.is_empty());
/// ```
pub fn effective_permissions(actor: &Actor, owner: &Owner, acl: &Acl) -> PermissionSet {
    if owner.is_owned_by(actor) {
        return PermissionSet::owner();
    }

    acl.entries()
        .iter()
        .filter(|entry| entry.applies_to(actor))
        .fold(PermissionSet::new(), |mut held, entry| {
            held.merge(&entry.permissions);
            held
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AclEntry;
    use crate::ledger::AclUpdate;
    use crate::permission::PermissionLevel::*;

    fn acl_with(entries: Vec<AclEntry>) -> Acl {
        let update = entries
            .into_iter()
            .fold(AclUpdate::new(), |update, entry| update.grant(entry));
        Acl::new().apply(&update).unwrap()
    }

    #[test]
    fn test_owner_holds_admin_with_empty_acl() {
        let owner = Owner::new("bob", "");
        let held = effective_permissions(&Actor::new("bob"), &owner, &Acl::new());

        assert!(held.contains(Read));
        assert!(held.contains(Edit));
        assert!(held.contains(Admin));
        assert!(!held.contains(Provider));
    }

    #[test]
    fn test_owner_unaffected_by_acl_content() {
        let owner = Owner::new("bob", "");
        let acl = acl_with(vec![AclEntry::user("bob", [Read])]);

        assert_eq!(
            effective_permissions(&Actor::new("bob"), &owner, &acl),
            PermissionSet::owner()
        );
    }

    #[test]
    fn test_user_grant_scenario() {
        let owner = Owner::new("bob", "");
        let acl = acl_with(vec![AclEntry::user("alice", [Read])]);

        let alice = effective_permissions(&Actor::new("alice"), &owner, &acl);
        assert_eq!(alice.to_vec(), vec![Read]);

        let carol = effective_permissions(&Actor::new("carol"), &owner, &acl);
        assert!(carol.is_empty());
    }

    #[test]
    fn test_union_of_user_and_group_grants() {
        let owner = Owner::new("bob", "proj-1");
        let acl = acl_with(vec![
            AclEntry::user("alice", [Read]),
            AclEntry::project_group("proj-1", "editors", [Edit]),
            AclEntry::project_group("proj-1", "admins", [Admin]),
        ]);

        let alice = Actor::new("alice").with_group("proj-1", "editors");
        assert_eq!(
            effective_permissions(&alice, &owner, &acl).to_vec(),
            vec![Read, Edit]
        );
    }

    #[test]
    fn test_admin_grant_does_not_expand() {
        let owner = Owner::new("bob", "");
        let acl = acl_with(vec![AclEntry::user("alice", [Admin])]);

        let held = effective_permissions(&Actor::new("alice"), &owner, &acl);
        assert_eq!(held.to_vec(), vec![Admin]);
        assert!(held.has_at_least(Read));
    }

    #[test]
    fn test_project_creator_outside_context_uses_acl() {
        let owner = Owner::new("bob", "proj-1");
        let acl = acl_with(vec![AclEntry::user("bob", [Read])]);

        let bob_elsewhere = Actor::new("bob").with_project("proj-2");
        assert_eq!(
            effective_permissions(&bob_elsewhere, &owner, &acl).to_vec(),
            vec![Read]
        );
    }
}
