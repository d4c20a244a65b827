//! Contract records issued by a shop to hired heroes.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self(value.trim().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Owning account of a shop and its contracts.
    UserId
);
string_id!(
    /// Identity of a shop.
    ShopId
);
string_id!(
    /// Storage-assigned identity of a persisted contract.
    ContractId
);

/// What the hired hero is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Retrieve,
    Scout,
    Escort,
}

impl Objective {
    /// Selection order used by the offer generator.
    pub const ALL: [Self; 3] = [Self::Retrieve, Self::Scout, Self::Escort];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Scout => "scout",
            Self::Escort => "escort",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a contract. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    Offered,
    Accepted,
    Resolved,
}

impl ContractState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Accepted => "accepted",
            Self::Resolved => "resolved",
        }
    }

    /// The single state reachable from this one, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Offered => Some(Self::Accepted),
            Self::Accepted => Some(Self::Resolved),
            Self::Resolved => None,
        }
    }

    /// Move to `next`, rejecting skips and backward moves.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when `next` is not the direct successor.
    pub fn advance_to(self, next: Self) -> Result<Self, LifecycleError> {
        if self.successor() == Some(next) {
            Ok(next)
        } else {
            Err(LifecycleError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("contract cannot move from {from} to {to}")]
pub struct LifecycleError {
    pub from: ContractState,
    pub to: ContractState,
}

/// Gold band a hero can expect, plus an optional loot teaser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedReward {
    pub gold_min: i32,
    pub gold_max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loot_hint: Option<String>,
}

/// Contract terms before storage assigns an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDraft {
    pub user: UserId,
    pub shop: ShopId,
    pub dungeon_tier: u8,
    pub objective: Objective,
    pub base_risk: f64,
    pub expected_reward: ExpectedReward,
    pub eta_days: u8,
    pub state: ContractState,
    /// Exact seed string the terms were generated from.
    pub seed: String,
}

/// Persisted contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub user: UserId,
    pub shop: ShopId,
    pub dungeon_tier: u8,
    pub objective: Objective,
    pub base_risk: f64,
    pub expected_reward: ExpectedReward,
    pub eta_days: u8,
    pub state: ContractState,
    pub seed: String,
}

impl Contract {
    /// Attach a storage identity to a draft.
    #[must_use]
    pub fn from_draft(id: ContractId, draft: ContractDraft) -> Self {
        let ContractDraft {
            user,
            shop,
            dungeon_tier,
            objective,
            base_risk,
            expected_reward,
            eta_days,
            state,
            seed,
        } = draft;
        Self {
            id,
            user,
            shop,
            dungeon_tier,
            objective,
            base_risk,
            expected_reward,
            eta_days,
            state,
            seed,
        }
    }

    /// Terms of this contract without its identity.
    #[must_use]
    pub fn to_draft(&self) -> ContractDraft {
        ContractDraft {
            user: self.user.clone(),
            shop: self.shop.clone(),
            dungeon_tier: self.dungeon_tier,
            objective: self.objective,
            base_risk: self.base_risk,
            expected_reward: self.expected_reward.clone(),
            eta_days: self.eta_days,
            state: self.state,
            seed: self.seed.clone(),
        }
    }
}

/// Selection of contracts by owner and, optionally, state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFilter {
    pub user: UserId,
    pub shop: ShopId,
    pub state: Option<ContractState>,
}

impl ContractFilter {
    /// Contracts of a shop still waiting for a hero.
    #[must_use]
    pub fn offered(user: &UserId, shop: &ShopId) -> Self {
        Self {
            user: user.clone(),
            shop: shop.clone(),
            state: Some(ContractState::Offered),
        }
    }

    /// Every contract of a shop regardless of state.
    #[must_use]
    pub fn all(user: &UserId, shop: &ShopId) -> Self {
        Self {
            user: user.clone(),
            shop: shop.clone(),
            state: None,
        }
    }

    #[must_use]
    pub fn matches(&self, contract: &Contract) -> bool {
        contract.user == self.user
            && contract.shop == self.shop
            && self.state.is_none_or(|state| contract.state == state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(state: ContractState) -> Contract {
        Contract {
            id: ContractId::new("c-1"),
            user: UserId::new("u-1"),
            shop: ShopId::new("s-1"),
            dungeon_tier: 2,
            objective: Objective::Scout,
            base_risk: 0.4,
            expected_reward: ExpectedReward {
                gold_min: 100,
                gold_max: 180,
                loot_hint: None,
            },
            eta_days: 3,
            state,
            seed: "arcadia:1:0".to_string(),
        }
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        assert_eq!(
            ContractState::Offered.advance_to(ContractState::Accepted),
            Ok(ContractState::Accepted)
        );
        assert_eq!(
            ContractState::Accepted.advance_to(ContractState::Resolved),
            Ok(ContractState::Resolved)
        );
        assert!(ContractState::Offered.advance_to(ContractState::Resolved).is_err());
        assert!(ContractState::Resolved.advance_to(ContractState::Offered).is_err());
        assert!(ContractState::Accepted.advance_to(ContractState::Accepted).is_err());
    }

    #[test]
    fn filter_matches_owner_and_state() {
        let user = UserId::new("u-1");
        let shop = ShopId::new("s-1");
        let offered = sample(ContractState::Offered);
        let accepted = sample(ContractState::Accepted);

        let filter = ContractFilter::offered(&user, &shop);
        assert!(filter.matches(&offered));
        assert!(!filter.matches(&accepted));
        assert!(ContractFilter::all(&user, &shop).matches(&accepted));
        assert!(!ContractFilter::offered(&UserId::new("u-2"), &shop).matches(&offered));
    }

    #[test]
    fn draft_roundtrip_keeps_terms() {
        let contract = sample(ContractState::Offered);
        let rebuilt = Contract::from_draft(contract.id.clone(), contract.to_draft());
        assert_eq!(rebuilt, contract);
    }

    #[test]
    fn enums_serialize_lowercase() {
        let json = serde_json::to_string(&sample(ContractState::Offered)).unwrap();
        assert!(json.contains("\"objective\":\"scout\""));
        assert!(json.contains("\"state\":\"offered\""));
        assert!(!json.contains("loot_hint"));
    }
}
