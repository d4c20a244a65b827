//! Daily offer refresh for a shop.
//!
//! A refresh derives the day's root seed, rolls a fresh batch of offers,
//! and swaps it in for the shop's unaccepted offers. Accepted and resolved
//! contracts are never touched.

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::{OfferConfig, OfferConfigError};
use crate::constants::LOG_TARGET_REFRESH;
use crate::contract::{Contract, ContractDraft, ContractFilter, ShopId};
use crate::offers::{generate_offer, offer_violation};
use crate::seed::offer_seed;
use crate::shop::Shop;
use crate::{ContractStore, ShopReader, StoreFailure, StoreOp};

/// Failures surfaced by [`RefreshOrchestrator::refresh`].
#[derive(Debug, Error, PartialEq)]
pub enum RefreshError {
    #[error("shop {shop} not found")]
    NotFound { shop: ShopId },
    #[error(transparent)]
    Storage(#[from] StoreFailure),
    #[error("generated offers broke an invariant: {0}")]
    InvariantViolation(String),
}

impl RefreshError {
    /// HTTP-style status for the caller's transport.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::Storage(_) => 404,
            Self::InvariantViolation(_) => 500,
        }
    }
}

/// Replaces a shop's offered contracts with the current day's batch.
#[derive(Debug, Clone)]
pub struct RefreshOrchestrator<R, S> {
    shops: R,
    contracts: S,
    cfg: OfferConfig,
}

impl<R, S> RefreshOrchestrator<R, S>
where
    R: ShopReader,
    S: ContractStore,
{
    /// Create an orchestrator with the default offer configuration.
    pub fn new(shops: R, contracts: S) -> Self {
        Self {
            shops,
            contracts,
            cfg: OfferConfig::default(),
        }
    }

    /// Create an orchestrator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(
        shops: R,
        contracts: S,
        cfg: OfferConfig,
    ) -> Result<Self, OfferConfigError> {
        cfg.validate()?;
        Ok(Self {
            shops,
            contracts,
            cfg,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &OfferConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn contracts(&self) -> &S {
        &self.contracts
    }

    /// Retire the shop's offered contracts and persist today's batch.
    ///
    /// Returns the persisted batch in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NotFound`] without touching storage when the
    /// shop does not exist, [`RefreshError::Storage`] when a storage call
    /// fails, and [`RefreshError::InvariantViolation`] if a generated offer
    /// breaks a design bound.
    pub fn refresh(&self, shop_id: &ShopId) -> Result<Vec<Contract>, RefreshError> {
        let shop = self
            .shops
            .find_shop(shop_id)
            .map_err(|err| {
                warn!(target: LOG_TARGET_REFRESH, "shop lookup for {shop_id} failed: {err}");
                StoreFailure::new(StoreOp::FindShop, err)
            })?
            .ok_or_else(|| {
                warn!(target: LOG_TARGET_REFRESH, "refresh requested for unknown shop {shop_id}");
                RefreshError::NotFound {
                    shop: shop_id.clone(),
                }
            })?;

        let drafts = self.preview(&shop);
        if let Some(violation) = drafts.iter().find_map(offer_violation) {
            return Err(RefreshError::InvariantViolation(violation));
        }

        let filter = ContractFilter::offered(&shop.user, &shop.id);
        let replaced = self.contracts.replace_offers(&filter, drafts).map_err(|err| {
            warn!(target: LOG_TARGET_REFRESH, "refresh of shop {} aborted: {err}", shop.id);
            err
        })?;

        if replaced.inserted.len() != self.cfg.batch_size {
            return Err(RefreshError::InvariantViolation(format!(
                "store persisted {} of {} offers",
                replaced.inserted.len(),
                self.cfg.batch_size
            )));
        }

        info!(
            target: LOG_TARGET_REFRESH,
            "refreshed shop {} for day {}: retired {}, offered {}",
            shop.id,
            shop.day_or_default(),
            replaced.retired,
            replaced.inserted.len()
        );
        Ok(replaced.inserted)
    }

    /// Roll the shop's batch for its current day without persisting it.
    #[must_use]
    pub fn preview(&self, shop: &Shop) -> Vec<ContractDraft> {
        let root = shop.root_seed();
        debug!(
            target: LOG_TARGET_REFRESH,
            "rolling {} offers for shop {} from root seed {root}",
            self.cfg.batch_size,
            shop.id
        );
        (0..self.cfg.batch_size)
            .map(|index| {
                generate_offer(
                    &offer_seed(&root, index),
                    &shop.user,
                    &shop.id,
                    &self.cfg,
                )
            })
            .collect()
    }
}
