//! Shopkeep Game Engine
//!
//! Platform-agnostic core logic for the Shopkeep shop simulation.
//! This crate derives seeds, rolls contract offers, and refreshes a shop's
//! daily offer board without any storage or transport dependencies.

pub mod config;
pub mod constants;
pub mod contract;
pub mod memory;
pub mod numbers;
pub mod offers;
pub mod refresh;
pub mod seed;
pub mod shop;
pub mod stream;

use std::fmt;
use thiserror::Error;

// Re-export commonly used types
pub use config::{OfferConfig, OfferConfigError};
pub use contract::{
    Contract, ContractDraft, ContractFilter, ContractId, ContractState, ExpectedReward,
    LifecycleError, Objective, ShopId, UserId,
};
pub use memory::{MemoryStore, TransitionError};
pub use offers::{OfferRoll, generate_offer, offer_violation};
pub use refresh::{RefreshError, RefreshOrchestrator};
pub use seed::{
    OfferSeedParts, SeedError, offer_seed, parse_offer_seed, root_seed, validate_world_seed,
    world_seed_from_entropy,
};
pub use shop::Shop;
pub use stream::DeterministicStream;

/// Error reported by a storage collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected the request: {0}")]
    Rejected(String),
}

/// Storage call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    FindShop,
    DeleteOffered,
    BulkInsert,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FindShop => "shop lookup",
            Self::DeleteOffered => "offer retirement",
            Self::BulkInsert => "offer insert",
        })
    }
}

/// A storage error tagged with the call that produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{op} failed: {source}")]
pub struct StoreFailure {
    pub op: StoreOp,
    #[source]
    pub source: StoreError,
}

impl StoreFailure {
    #[must_use]
    pub const fn new(op: StoreOp, source: StoreError) -> Self {
        Self { op, source }
    }
}

/// Acknowledgment of a delete-matching call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteAck {
    pub deleted: usize,
}

/// Outcome of swapping a shop's offer board.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferReplacement {
    pub retired: usize,
    pub inserted: Vec<Contract>,
}

/// Read access to shop records.
pub trait ShopReader {
    /// Look up a shop by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, StoreError>;
}

/// Contract persistence used by offer refresh.
pub trait ContractStore {
    /// Remove every contract matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete could not be applied.
    fn delete_matching(&self, filter: &ContractFilter) -> Result<DeleteAck, StoreError>;

    /// Insert drafts in order, assigning identities.
    ///
    /// Implementations must persist all drafts or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch was not persisted.
    fn bulk_insert(&self, drafts: Vec<ContractDraft>) -> Result<Vec<Contract>, StoreError>;

    /// Retire the contracts matching `filter` and persist `drafts` in their place.
    ///
    /// The default runs the delete and the insert back to back. Stores that
    /// support transactions should override this so readers never observe
    /// the board between the two steps.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] naming the step that failed.
    fn replace_offers(
        &self,
        filter: &ContractFilter,
        drafts: Vec<ContractDraft>,
    ) -> Result<OfferReplacement, StoreFailure> {
        let ack = self
            .delete_matching(filter)
            .map_err(|err| StoreFailure::new(StoreOp::DeleteOffered, err))?;
        let inserted = self
            .bulk_insert(drafts)
            .map_err(|err| StoreFailure::new(StoreOp::BulkInsert, err))?;
        Ok(OfferReplacement {
            retired: ack.deleted,
            inserted,
        })
    }
}

impl<T: ShopReader + ?Sized> ShopReader for &T {
    fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, StoreError> {
        (**self).find_shop(id)
    }
}

impl<T: ContractStore + ?Sized> ContractStore for &T {
    fn delete_matching(&self, filter: &ContractFilter) -> Result<DeleteAck, StoreError> {
        (**self).delete_matching(filter)
    }

    fn bulk_insert(&self, drafts: Vec<ContractDraft>) -> Result<Vec<Contract>, StoreError> {
        (**self).bulk_insert(drafts)
    }

    fn replace_offers(
        &self,
        filter: &ContractFilter,
        drafts: Vec<ContractDraft>,
    ) -> Result<OfferReplacement, StoreFailure> {
        (**self).replace_offers(filter, drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CallLog {
        calls: RefCell<Vec<&'static str>>,
        fail_delete: bool,
    }

    impl ContractStore for CallLog {
        fn delete_matching(&self, _filter: &ContractFilter) -> Result<DeleteAck, StoreError> {
            self.calls.borrow_mut().push("delete");
            if self.fail_delete {
                return Err(StoreError::Unavailable("offline".to_string()));
            }
            Ok(DeleteAck { deleted: 2 })
        }

        fn bulk_insert(&self, drafts: Vec<ContractDraft>) -> Result<Vec<Contract>, StoreError> {
            self.calls.borrow_mut().push("insert");
            Ok(drafts
                .into_iter()
                .enumerate()
                .map(|(i, d)| Contract::from_draft(ContractId(format!("c-{i}")), d))
                .collect())
        }
    }

    fn filter() -> ContractFilter {
        ContractFilter::offered(&UserId::new("u-1"), &ShopId::new("s-1"))
    }

    #[test]
    fn default_replace_deletes_before_inserting() {
        let store = CallLog::default();
        let outcome = store.replace_offers(&filter(), Vec::new()).unwrap();
        assert_eq!(outcome.retired, 2);
        assert!(outcome.inserted.is_empty());
        assert_eq!(*store.calls.borrow(), vec!["delete", "insert"]);
    }

    #[test]
    fn default_replace_stops_after_failed_delete() {
        let store = CallLog {
            fail_delete: true,
            ..CallLog::default()
        };
        let err = store.replace_offers(&filter(), Vec::new()).unwrap_err();
        assert_eq!(err.op, StoreOp::DeleteOffered);
        assert_eq!(*store.calls.borrow(), vec!["delete"]);
        assert!(err.to_string().contains("offer retirement failed"));
    }
}
