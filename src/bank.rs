use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    account::{Account, AccountEvent, AccountNumber, Operation, RuleViolation},
    clock::Clock,
    config::Limits,
    store::{AccountStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

/// A failed transfer leg, tagged with the account it failed on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source} for account {account}")]
pub struct TransferError {
    pub account: AccountNumber,
    pub source: BankError,
}

/// Account state after the day rollover, plus the rule decision for the requested amount.
struct Prepared {
    account: Account,
    rolled_over: bool,
    decision: Result<AccountEvent, RuleViolation>,
}

/// Account operations over an injected store, clock and limits.
///
/// Every mutating operation takes `&mut self`, so a validate-then-commit sequence
/// (both legs, for a transfer) always runs with exclusive access to the store.
pub struct Bank<S, C> {
    store: S,
    clock: C,
    limits: Limits,
}

impl<S, C> Bank<S, C>
where
    S: AccountStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, limits: Limits) -> Self {
        Self {
            store,
            clock,
            limits,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn create_account(&mut self, name: &str) -> Result<AccountNumber, BankError> {
        let number = self.store.allocate_next();
        self.store
            .insert(number, Account::open(name, self.clock.today()))?;
        info!(account = number, "account created");
        Ok(number)
    }

    pub fn balance(&self, number: AccountNumber) -> Result<u64, BankError> {
        Ok(self.store.get(number)?.balance())
    }

    /// Deposits `amount` and returns the new balance.
    pub fn deposit(&mut self, number: AccountNumber, amount: u64) -> Result<u64, BankError> {
        self.commit(Operation::Deposit, number, amount)
    }

    /// Withdraws `amount` and returns the new balance.
    pub fn withdraw(&mut self, number: AccountNumber, amount: u64) -> Result<u64, BankError> {
        self.commit(Operation::Withdrawal, number, amount)
    }

    /// Computes the account state a deposit would produce, without storing it.
    pub fn stage_deposit(&self, number: AccountNumber, amount: u64) -> Result<Account, BankError> {
        self.stage(Operation::Deposit, number, amount, None)
    }

    /// Computes the account state a withdrawal would produce, without storing it.
    pub fn stage_withdrawal(
        &self,
        number: AccountNumber,
        amount: u64,
    ) -> Result<Account, BankError> {
        self.stage(Operation::Withdrawal, number, amount, None)
    }

    /// Moves `amount` from `from` to `to`. Both legs are staged first and the
    /// store is only touched when both of them passed.
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: u64,
    ) -> Result<(), TransferError> {
        let withdrawn = self
            .stage(Operation::Withdrawal, from, amount, None)
            .inspect_err(|err| warn!(from, to, amount, %err, "transfer rejected"))
            .map_err(|source| TransferError {
                account: from,
                source,
            })?;
        // a transfer to self deposits into the already withdrawn state
        let base = (from == to).then(|| withdrawn.clone());
        let deposited = self
            .stage(Operation::Deposit, to, amount, base)
            .inspect_err(|err| warn!(from, to, amount, %err, "transfer rejected"))
            .map_err(|source| TransferError {
                account: to,
                source,
            })?;

        if from != to {
            self.store
                .update(from, withdrawn)
                .map_err(|err| TransferError {
                    account: from,
                    source: err.into(),
                })?;
        }
        self.store
            .update(to, deposited)
            .map_err(|err| TransferError {
                account: to,
                source: err.into(),
            })?;
        info!(from, to, amount, "transfer committed");
        Ok(())
    }

    fn prepare(
        &self,
        operation: Operation,
        number: AccountNumber,
        amount: u64,
        base: Option<Account>,
    ) -> Result<Prepared, BankError> {
        self.limits.check_amount(operation, amount)?;
        let mut account = match base {
            Some(account) => account,
            None => self.store.get(number)?,
        };
        let today = self.clock.today();
        let rolled_over = account.roll_over(today);
        if rolled_over {
            debug!(account = number, %today, "daily counters reset");
        }
        let decision = account.handle_transaction(operation, amount, &self.limits);
        Ok(Prepared {
            account,
            rolled_over,
            decision,
        })
    }

    fn stage(
        &self,
        operation: Operation,
        number: AccountNumber,
        amount: u64,
        base: Option<Account>,
    ) -> Result<Account, BankError> {
        let Prepared {
            mut account,
            decision,
            ..
        } = self.prepare(operation, number, amount, base)?;
        let event = decision?;
        account.apply(&event);
        debug!(account = number, %operation, amount, "staged");
        Ok(account)
    }

    fn commit(
        &mut self,
        operation: Operation,
        number: AccountNumber,
        amount: u64,
    ) -> Result<u64, BankError> {
        let prepared = self
            .prepare(operation, number, amount, None)
            .inspect_err(|err| warn!(account = number, %operation, amount, %err, "rejected"))?;
        let Prepared {
            mut account,
            rolled_over,
            decision,
        } = prepared;
        match decision {
            Ok(event) => {
                account.apply(&event);
                let balance = account.balance();
                self.store.update(number, account)?;
                info!(account = number, %operation, amount, balance, "committed");
                Ok(balance)
            }
            Err(violation) => {
                // the new day has started regardless of the rejected amount
                if rolled_over {
                    self.store.update(number, account)?;
                }
                warn!(account = number, %operation, amount, %violation, "rejected");
                Err(violation.into())
            }
        }
    }
}
