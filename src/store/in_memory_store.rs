use std::collections::{BTreeMap, btree_map::Entry};

use crate::account::{Account, AccountNumber};

use super::{AccountStore, FIRST_ACCOUNT_NUMBER, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: BTreeMap<AccountNumber, Account>,
}

impl InMemoryAccountStore {
    /// All accounts, ordered by account number.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountNumber, &Account)> {
        self.accounts.iter().map(|(number, acc)| (*number, acc))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn allocate_next(&self) -> AccountNumber {
        self.accounts
            .last_key_value()
            .map_or(FIRST_ACCOUNT_NUMBER, |(number, _)| number + 1)
    }

    fn get(&self, number: AccountNumber) -> Result<Account, StoreError> {
        self.accounts
            .get(&number)
            .cloned()
            .ok_or(StoreError::AccountNotFound(number))
    }

    fn insert(&mut self, number: AccountNumber, account: Account) -> Result<(), StoreError> {
        match self.accounts.entry(number) {
            Entry::Vacant(entry) => {
                entry.insert(account);
                Ok(())
            }
            Entry::Occupied(_) => Err(StoreError::AccountAlreadyExists(number)),
        }
    }

    fn update(&mut self, number: AccountNumber, account: Account) -> Result<(), StoreError> {
        let Some(stored) = self.accounts.get_mut(&number) else {
            return Err(StoreError::AccountNotFound(number));
        };
        *stored = account;
        Ok(())
    }
}
