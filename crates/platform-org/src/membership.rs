//! Project-group membership
//!
//! A group is always scoped to a project: the same group name in two projects
//! refers to two unrelated sets of users.

use serde::{Deserialize, Serialize};

/// Membership of an actor in a project group.
///
/// # Examples
///
/// ```
/// use platform_org::GroupMembership;
///
/// let membership = GroupMembership::new("proj-1", "researchers");
/// assert!(membership.matches("proj-1", "researchers"));
/// assert!(!membership.matches("proj-2", "researchers"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GroupMembership {
    /// Project the group belongs to
    pub project: String,

    /// Group identifier within the project
    pub group: String,
}

impl GroupMembership {
    /// Creates a new group membership.
    ///
    /// # Arguments
    ///
    /// * `project` - The project namespace of the group
    /// * `group` - The group identifier
    pub fn new(project: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            group: group.into(),
        }
    }

    /// Check whether this membership refers to the given project group.
    pub fn matches(&self, project: &str, group: &str) -> bool {
        self.project == project && self.group == group
    }
}
