use thiserror::Error;

use crate::account::{Account, AccountNumber};

pub mod in_memory_store;

pub const FIRST_ACCOUNT_NUMBER: AccountNumber = 1001;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid Account Number")]
    AccountNotFound(AccountNumber),
    #[error("Account Number already exists")]
    AccountAlreadyExists(AccountNumber),
}

/// Keyed account storage.
///
/// Readers always get a copy of the stored record, so nothing reaches the
/// store except through [`AccountStore::insert`] and [`AccountStore::update`].
pub trait AccountStore {
    /// [`FIRST_ACCOUNT_NUMBER`] for an empty store, otherwise one past the highest number in use.
    fn allocate_next(&self) -> AccountNumber;

    fn get(&self, number: AccountNumber) -> Result<Account, StoreError>;

    /// Stores a new account, the number must not be in use yet.
    fn insert(&mut self, number: AccountNumber, account: Account) -> Result<(), StoreError>;

    /// Overwrites an existing account.
    fn update(&mut self, number: AccountNumber, account: Account) -> Result<(), StoreError>;
}
