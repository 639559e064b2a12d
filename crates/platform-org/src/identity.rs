//! Identity provider boundary
//!
//! The identity provider turns an authenticated actor id into a full
//! [`Actor`]. Production deployments back this with the platform's auth
//! service; [`StaticIdentityProvider`] serves tests and single-process setups.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::actor::Actor;

/// Resolves actor ids into actors with their memberships.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an actor id.
    ///
    /// Returns `None` if the id is unknown to the provider.
    async fn resolve(&self, actor_id: &str) -> Option<Actor>;
}

/// In-memory identity provider with a fixed set of actors.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    actors: Arc<RwLock<HashMap<String, Actor>>>,
}

impl StaticIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an actor.
    pub async fn register(&self, actor: Actor) {
        let mut actors = self.actors.write().await;
        actors.insert(actor.id.clone(), actor);
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, actor_id: &str) -> Option<Actor> {
        self.actors.read().await.get(actor_id).cloned()
    }
}
