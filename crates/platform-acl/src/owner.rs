//! Resource ownership
//!
//! The owner is fixed when a resource is created. The ACL never changes it.

use serde::{Deserialize, Serialize};

use platform_org::Actor;

/// Owner of a resource.
///
/// # Examples
///
/// ```
/// use platform_acl::Owner;
/// use platform_org::Actor;
///
/// let personal = Owner::new("bob", "");
/// assert!(personal.project().is_none());
/// assert!(personal.is_owned_by(&Actor::new("bob")));
///
/// let shared = Owner::new("bob", "proj-1");
/// assert!(!shared.is_owned_by(&Actor::new("bob")));
/// assert!(shared.is_owned_by(&Actor::new("bob").with_project("proj-1")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    /// Actor who created the resource
    pub created_by: String,

    /// Project namespace (`None` for personal resources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Owner {
    /// Creates an owner. An empty project means a personal resource.
    pub fn new(created_by: impl Into<String>, project: impl Into<String>) -> Self {
        let project = project.into();
        Self {
            created_by: created_by.into(),
            project: if project.is_empty() { None } else { Some(project) },
        }
    }

    /// Owner for a resource created by `actor` in its current context.
    pub fn for_actor(actor: &Actor) -> Self {
        Self {
            created_by: actor.id.clone(),
            project: actor.project.clone(),
        }
    }

    /// Project namespace, if project-owned.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Check if the actor is recognized as this resource's owner.
    ///
    /// For project-owned resources, the creator must also be acting in that
    /// project's context.
    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        if actor.id != self.created_by {
            return false;
        }
        match self.project() {
            None => true,
            Some(project) => actor.is_in_project_context(project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project_is_personal() {
        let owner = Owner::new("bob", "");
        assert_eq!(owner.project, None);
        assert!(owner.is_owned_by(&Actor::new("bob")));
        assert!(owner.is_owned_by(&Actor::new("bob").with_project("proj-1")));
        assert!(!owner.is_owned_by(&Actor::new("alice")));
    }

    #[test]
    fn test_project_owner_requires_context() {
        let owner = Owner::new("bob", "proj-1");

        assert!(owner.is_owned_by(&Actor::new("bob").with_project("proj-1")));
        assert!(!owner.is_owned_by(&Actor::new("bob").with_project("proj-2")));
        assert!(!owner.is_owned_by(&Actor::new("alice").with_project("proj-1")));
    }

    #[test]
    fn test_for_actor_captures_context() {
        let actor = Actor::new("bob").with_project("proj-1");
        assert_eq!(Owner::for_actor(&actor), Owner::new("bob", "proj-1"));
    }
}
