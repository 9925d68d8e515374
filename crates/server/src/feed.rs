//! Recipe change feed and list cache.
//!
//! Every successful recipe mutation publishes a [`RecipeEvent`] on a
//! process-wide broadcast channel; `GET /recipes/watch` fans it out to the
//! owning user's clients over SSE so they re-render without polling. The
//! same publish step invalidates the per-user list cache, keeping the
//! database the single source of truth.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tokio::sync::broadcast;

use spoonit_core::{Recipe, RecipeId, UserId};

/// Broadcast channel capacity; slow SSE consumers that fall this far
/// behind see a `Lagged` gap and should refetch.
const CHANNEL_CAPACITY: usize = 256;

/// Cached user lists.
const CACHE_CAPACITY: u64 = 10_000;

/// List cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// A change to a user's recipe collection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecipeEvent {
    Created { recipe_id: RecipeId },
    Updated { recipe_id: RecipeId },
    Deleted { recipe_id: RecipeId },
    Favorited { recipe_id: RecipeId },
    Unfavorited { recipe_id: RecipeId },
}

/// An event addressed to one user's subscribers.
#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub user_id: UserId,
    pub event: RecipeEvent,
}

/// Broadcast feed of recipe changes plus the list cache it invalidates.
pub struct RecipeFeed {
    sender: broadcast::Sender<FeedMessage>,
    lists: Cache<UserId, Arc<Vec<Recipe>>>,
}

impl Default for RecipeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeFeed {
    /// Create a feed with default capacities.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let lists = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self { sender, lists }
    }

    /// Publish a change and drop the owner's cached list.
    ///
    /// Send failures mean nobody is watching, which is fine.
    pub async fn publish(&self, user_id: UserId, event: RecipeEvent) {
        self.lists.invalidate(&user_id).await;
        let _ = self.sender.send(FeedMessage { user_id, event });
    }

    /// Subscribe to the raw feed. Callers filter on `user_id`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.sender.subscribe()
    }

    /// The cached recipe list for a user, if fresh.
    pub async fn cached_list(&self, user_id: UserId) -> Option<Arc<Vec<Recipe>>> {
        self.lists.get(&user_id).await
    }

    /// Cache a freshly loaded list.
    pub async fn store_list(&self, user_id: UserId, recipes: Vec<Recipe>) -> Arc<Vec<Recipe>> {
        let recipes = Arc::new(recipes);
        self.lists.insert(user_id, Arc::clone(&recipes)).await;
        recipes
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = RecipeFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(
            UserId::new(1),
            RecipeEvent::Created {
                recipe_id: RecipeId::new(7),
            },
        )
        .await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.user_id, UserId::new(1));
        assert!(matches!(msg.event, RecipeEvent::Created { recipe_id } if recipe_id == RecipeId::new(7)));
    }

    #[tokio::test]
    async fn test_publish_invalidates_cached_list() {
        let feed = RecipeFeed::new();
        let user = UserId::new(1);

        feed.store_list(user, Vec::new()).await;
        assert!(feed.cached_list(user).await.is_some());

        feed.publish(
            user,
            RecipeEvent::Deleted {
                recipe_id: RecipeId::new(3),
            },
        )
        .await;
        assert!(feed.cached_list(user).await.is_none());
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = RecipeEvent::Favorited {
            recipe_id: RecipeId::new(5),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "favorited");
        assert_eq!(json["recipe_id"], 5);
    }
}
