//! In-memory shop and contract storage.
//!
//! Backs tests and tooling. Every operation runs under one lock, so
//! `replace_offers` swaps a shop's board atomically.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::contract::{
    Contract, ContractDraft, ContractFilter, ContractId, ContractState, LifecycleError, ShopId,
};
use crate::shop::Shop;
use crate::{
    ContractStore, DeleteAck, OfferReplacement, ShopReader, StoreError, StoreFailure, StoreOp,
};

/// Rejected state change on a stored contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("contract {0} not found")]
    UnknownContract(ContractId),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Debug, Default)]
struct Inner {
    shops: HashMap<ShopId, Shop>,
    contracts: Vec<Contract>,
    next_id: u64,
    delete_calls: usize,
    insert_calls: usize,
    fail_deletes: bool,
    fail_inserts: bool,
}

impl Inner {
    fn retire(&mut self, filter: &ContractFilter) -> Result<DeleteAck, StoreError> {
        self.delete_calls += 1;
        if self.fail_deletes {
            return Err(StoreError::Unavailable("delete rejected".to_string()));
        }
        let before = self.contracts.len();
        self.contracts.retain(|contract| !filter.matches(contract));
        Ok(DeleteAck {
            deleted: before - self.contracts.len(),
        })
    }

    fn insert(&mut self, drafts: Vec<ContractDraft>) -> Result<Vec<Contract>, StoreError> {
        self.insert_calls += 1;
        if self.fail_inserts {
            return Err(StoreError::Rejected("bulk insert rejected".to_string()));
        }
        let inserted: Vec<Contract> = drafts
            .into_iter()
            .map(|draft| {
                self.next_id += 1;
                Contract::from_draft(ContractId(format!("c-{:06}", self.next_id)), draft)
            })
            .collect();
        self.contracts.extend(inserted.iter().cloned());
        Ok(inserted)
    }
}

/// Thread-safe in-memory store implementing the refresh collaborators.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a shop record.
    pub fn put_shop(&self, shop: Shop) {
        self.lock().shops.insert(shop.id.clone(), shop);
    }

    /// Advance a stored shop by one day and return the updated record.
    pub fn advance_shop_day(&self, id: &ShopId) -> Option<Shop> {
        let mut inner = self.lock();
        let shop = inner.shops.remove(id)?.advance_day();
        inner.shops.insert(id.clone(), shop.clone());
        Some(shop)
    }

    /// Contracts matching the filter, in insertion order.
    #[must_use]
    pub fn contracts(&self, filter: &ContractFilter) -> Vec<Contract> {
        self.lock()
            .contracts
            .iter()
            .filter(|contract| filter.matches(contract))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self, filter: &ContractFilter) -> usize {
        self.lock()
            .contracts
            .iter()
            .filter(|contract| filter.matches(contract))
            .count()
    }

    /// Drop all contracts and call counters, keeping shops.
    pub fn reset_contracts(&self) {
        let mut inner = self.lock();
        inner.contracts.clear();
        inner.next_id = 0;
        inner.delete_calls = 0;
        inner.insert_calls = 0;
    }

    /// Mark an offered contract as taken by a hero.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract is unknown or not offered.
    pub fn accept(&self, id: &ContractId) -> Result<Contract, TransitionError> {
        self.transition(id, ContractState::Accepted)
    }

    /// Close out an accepted contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract is unknown or not accepted.
    pub fn resolve(&self, id: &ContractId) -> Result<Contract, TransitionError> {
        self.transition(id, ContractState::Resolved)
    }

    fn transition(
        &self,
        id: &ContractId,
        next: ContractState,
    ) -> Result<Contract, TransitionError> {
        let mut inner = self.lock();
        let contract = inner
            .contracts
            .iter_mut()
            .find(|contract| &contract.id == id)
            .ok_or_else(|| TransitionError::UnknownContract(id.clone()))?;
        contract.state = contract.state.advance_to(next)?;
        Ok(contract.clone())
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.lock().fail_inserts = fail;
    }

    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.lock().delete_calls
    }

    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.lock().insert_calls
    }
}

impl ShopReader for MemoryStore {
    fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, StoreError> {
        Ok(self.lock().shops.get(id).cloned())
    }
}

impl ContractStore for MemoryStore {
    fn delete_matching(&self, filter: &ContractFilter) -> Result<DeleteAck, StoreError> {
        self.lock().retire(filter)
    }

    fn bulk_insert(&self, drafts: Vec<ContractDraft>) -> Result<Vec<Contract>, StoreError> {
        self.lock().insert(drafts)
    }

    fn replace_offers(
        &self,
        filter: &ContractFilter,
        drafts: Vec<ContractDraft>,
    ) -> Result<OfferReplacement, StoreFailure> {
        let mut inner = self.lock();
        let snapshot = inner.contracts.clone();
        let next_id = inner.next_id;
        let ack = inner
            .retire(filter)
            .map_err(|err| StoreFailure::new(StoreOp::DeleteOffered, err))?;
        match inner.insert(drafts) {
            Ok(inserted) => Ok(OfferReplacement {
                retired: ack.deleted,
                inserted,
            }),
            Err(err) => {
                inner.contracts = snapshot;
                inner.next_id = next_id;
                Err(StoreFailure::new(StoreOp::BulkInsert, err))
            }
        }
    }
}
