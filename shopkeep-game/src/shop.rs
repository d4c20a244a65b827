//! Shop records read by offer refresh.
use serde::{Deserialize, Serialize};

use crate::contract::{ShopId, UserId};
use crate::seed::{SeedError, root_seed, validate_world_seed};

/// A player's shop and its position on the world clock.
///
/// Older records may lack a world seed or day counter; derivation treats
/// those as `""` and `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub user: UserId,
    #[serde(default)]
    pub world_seed: Option<String>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl Shop {
    /// Open a new shop on day zero.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the world seed would make derived seeds ambiguous.
    pub fn new(id: ShopId, user: UserId, world_seed: &str) -> Result<Self, SeedError> {
        validate_world_seed(world_seed)?;
        Ok(Self {
            id,
            user,
            world_seed: Some(world_seed.to_string()),
            day: Some(0),
        })
    }

    #[must_use]
    pub fn world_seed_or_default(&self) -> &str {
        self.world_seed.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn day_or_default(&self) -> u32 {
        self.day.unwrap_or_default()
    }

    /// Root seed scoping today's generation.
    #[must_use]
    pub fn root_seed(&self) -> String {
        root_seed(self.world_seed_or_default(), self.day_or_default())
    }

    /// Move the shop to the next in-game day.
    #[must_use]
    pub fn advance_day(mut self) -> Self {
        self.day = Some(self.day_or_default().saturating_add(1));
        self
    }
}
