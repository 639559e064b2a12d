//! The authenticated caller of a request
//!
//! This module provides the [`Actor`] type: the caller's user id together with
//! the context the identity provider established for the request (the active
//! project and the project groups the user belongs to).

use serde::{Deserialize, Serialize};

use crate::membership::GroupMembership;

/// The caller of a request, as established by the identity provider.
///
/// The drive service trusts this value completely. It never re-derives group
/// memberships or the active project on its own.
///
/// # Use Cases
///
/// - Owner checks (`id` and `project` against a resource owner)
/// - ACL matching (`id` for user grants, `groups` for project-group grants)
/// - Provider override (`provider` against the product backing a resource)
///
/// # Examples
///
/// ```
/// use platform_org::Actor;
///
/// let actor = Actor::new("bob").with_project("proj-1");
/// assert_eq!(actor.id, "bob");
/// assert!(actor.is_in_project_context("proj-1"));
/// assert!(!actor.is_in_project_context("proj-2"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// User identifier
    pub id: String,

    /// Active project context for this request (`None` for personal workspace)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Project groups the user is a member of
    #[serde(default)]
    pub groups: Vec<GroupMembership>,

    /// Provider this actor operates on behalf of.
    ///
    /// Only the platform sets this. It is the sole source of the provider
    /// permission level and is never derived from an ACL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Actor {
    /// Creates an actor in its personal workspace with no group memberships.
    ///
    /// # Arguments
    ///
    /// * `id` - The user identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project: None,
            groups: Vec::new(),
            provider: None,
        }
    }

    /// Set the active project context.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Add a project-group membership.
    ///
    /// Duplicate memberships are ignored.
    pub fn with_group(mut self, project: impl Into<String>, group: impl Into<String>) -> Self {
        let membership = GroupMembership::new(project, group);
        if !self.groups.contains(&membership) {
            self.groups.push(membership);
        }
        self
    }

    /// Mark the actor as operating on behalf of a provider.
    pub fn acting_as_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Check whether the request runs in the given project's context.
    pub fn is_in_project_context(&self, project: &str) -> bool {
        self.project.as_deref() == Some(project)
    }

    /// Check whether the actor belongs to the given project group.
    pub fn belongs_to_group(&self, project: &str, group: &str) -> bool {
        self.groups.iter().any(|m| m.matches(project, group))
    }

    /// Check whether the actor operates on behalf of the given provider.
    ///
    /// An empty provider id never matches.
    pub fn is_provider_for(&self, provider: &str) -> bool {
        !provider.is_empty() && self.provider.as_deref() == Some(provider)
    }
}
