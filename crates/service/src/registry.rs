use std::sync::Arc;

use models::{Item, NewItem, NewUser, Post, User};
use tracing::info;

use crate::errors::ServiceError;
use crate::resource::ResourceService;
use crate::stats::{StatsAggregator, StatsSnapshot};

/// The in-memory collections served by one process.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    pub users: ResourceService<User>,
    pub items: ResourceService<Item>,
    pub posts: ResourceService<Post>,
}

pub type SharedRegistry = Arc<ResourceRegistry>;

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the start-up sample users and items.
    pub fn with_samples() -> Result<Self, ServiceError> {
        let registry = Self::new();
        registry.users.create(NewUser::new("John Doe", "john@example.com", 30))?;
        registry.users.create(NewUser::new("Jane Smith", "jane@example.com", 25))?;
        registry.items.create(
            NewItem::new("Laptop", "High-performance laptop", 999.99)
                .with_tax(99.99)
                .with_tags(["electronics", "computers"]),
        )?;
        registry.items.create(
            NewItem::new("Coffee Mug", "Ceramic coffee mug", 12.99)
                .with_tax(1.30)
                .with_tags(["kitchen", "drinkware"]),
        )?;
        info!(event = "registry_seeded", users = registry.users.count(), items = registry.items.count());
        Ok(registry)
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsAggregator::new().with(&self.users).with(&self.items).with(&self.posts).snapshot()
    }
}
