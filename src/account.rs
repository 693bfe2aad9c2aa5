use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::Limits;

pub type AccountNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdrawal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deposit => f.write_str("deposit"),
            Operation::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: u64,
    kind: AccountEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("minimum {operation} amount is {min}")]
    BelowMinimum { operation: Operation, min: u64 },
    #[error("maximum {operation} amount is {max}")]
    AboveMaximum { operation: Operation, max: u64 },
    #[error("only {limit} {operation}s are allowed in a day")]
    DailyLimitExceeded { operation: Operation, limit: u32 },
    #[error("account balance cannot exceed {max_balance}")]
    BalanceCeilingExceeded { max_balance: u64 },
    #[error("insufficient balance")]
    InsufficientBalance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    name: String,
    balance: u64,
    deposits_today: u32,
    withdrawals_today: u32,
    last_activity: NaiveDate,
}

impl Account {
    pub fn open(name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            name: name.into(),
            balance: 0,
            deposits_today: 0,
            withdrawals_today: 0,
            last_activity: today,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_state(
        name: &str,
        balance: u64,
        deposits_today: u32,
        withdrawals_today: u32,
        last_activity: NaiveDate,
    ) -> Self {
        Self {
            name: name.to_string(),
            balance,
            deposits_today,
            withdrawals_today,
            last_activity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn deposits_today(&self) -> u32 {
        self.deposits_today
    }

    pub fn withdrawals_today(&self) -> u32 {
        self.withdrawals_today
    }

    pub fn last_activity(&self) -> NaiveDate {
        self.last_activity
    }

    /// Starts a new activity day when `today` differs from the last recorded one.
    ///
    /// Both daily counters belong to the same day, so both are cleared together.
    /// Returns `true` if anything changed.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_activity == today {
            return false;
        }
        self.deposits_today = 0;
        self.withdrawals_today = 0;
        self.last_activity = today;
        true
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
                self.deposits_today += 1;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
                self.withdrawals_today += 1;
            }
        }
    }

    /// Checks the daily limit and balance bounds for a transaction of `amount`.
    ///
    /// Amount bounds are checked by [`Limits::check_amount`] before the account is
    /// even loaded, and the account is expected to be rolled over to the current day.
    pub fn handle_transaction(
        &self,
        operation: Operation,
        amount: u64,
        limits: &Limits,
    ) -> Result<AccountEvent, RuleViolation> {
        match operation {
            Operation::Deposit => {
                if self.deposits_today >= limits.deposit_limit {
                    return Err(RuleViolation::DailyLimitExceeded {
                        operation,
                        limit: limits.deposit_limit,
                    });
                }
                match self.balance.checked_add(amount) {
                    Some(new_balance) if new_balance <= limits.max_balance => Ok(AccountEvent {
                        amount,
                        kind: AccountEventKind::Deposited,
                    }),
                    _ => Err(RuleViolation::BalanceCeilingExceeded {
                        max_balance: limits.max_balance,
                    }),
                }
            }
            Operation::Withdrawal => {
                if self.withdrawals_today >= limits.withdrawal_limit {
                    return Err(RuleViolation::DailyLimitExceeded {
                        operation,
                        limit: limits.withdrawal_limit,
                    });
                }
                match self.balance.checked_sub(amount) {
                    Some(new_balance) if new_balance >= limits.min_balance => Ok(AccountEvent {
                        amount,
                        kind: AccountEventKind::Withdrawn,
                    }),
                    _ => Err(RuleViolation::InsufficientBalance),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn account_with(balance: u64, deposits_today: u32, withdrawals_today: u32) -> Account {
        Account {
            balance,
            deposits_today,
            withdrawals_today,
            ..Account::open("Amit Dugal", day(1))
        }
    }

    #[test]
    fn open_account_is_empty() {
        let acc = Account::open("Gauri Kalla", day(4));
        assert_eq!(acc.name(), "Gauri Kalla");
        assert_eq!(acc.balance(), 0);
        assert_eq!(acc.deposits_today(), 0);
        assert_eq!(acc.withdrawals_today(), 0);
        assert_eq!(acc.last_activity(), day(4));
    }

    #[test]
    fn apply_events() {
        let mut acc = Account::open("Amit Dugal", day(1));
        acc.apply(&AccountEvent {
            amount: 1500,
            kind: AccountEventKind::Deposited,
        });
        assert_eq!(acc.balance(), 1500);
        assert_eq!(acc.deposits_today(), 1);
        assert_eq!(acc.withdrawals_today(), 0);

        acc.apply(&AccountEvent {
            amount: 1000,
            kind: AccountEventKind::Withdrawn,
        });
        assert_eq!(acc.balance(), 500);
        assert_eq!(acc.deposits_today(), 1);
        assert_eq!(acc.withdrawals_today(), 1);
    }

    #[test]
    fn roll_over_clears_both_counters() {
        let mut acc = account_with(700, 3, 2);
        assert!(!acc.roll_over(day(1)));
        assert_eq!(acc.deposits_today(), 3);
        assert_eq!(acc.withdrawals_today(), 2);

        assert!(acc.roll_over(day(2)));
        assert_eq!(acc.deposits_today(), 0);
        assert_eq!(acc.withdrawals_today(), 0);
        assert_eq!(acc.last_activity(), day(2));
        // balance is not a daily figure
        assert_eq!(acc.balance(), 700);
    }

    #[test]
    fn handle_deposit() {
        let limits = Limits::default();
        let acc = account_with(1500, 2, 0);

        let evt = acc
            .handle_transaction(Operation::Deposit, 10000, &limits)
            .unwrap();
        assert_eq!(evt.amount, 10000);
        assert_eq!(evt.kind, AccountEventKind::Deposited);

        // daily limit reached
        let acc = account_with(1500, 3, 0);
        let err = acc
            .handle_transaction(Operation::Deposit, 10000, &limits)
            .unwrap_err();
        assert_eq!(err.to_string(), "only 3 deposits are allowed in a day");

        // balance ceiling
        let acc = account_with(60000, 0, 0);
        let err = acc
            .handle_transaction(Operation::Deposit, 50000, &limits)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleViolation::BalanceCeilingExceeded {
                max_balance: 100000
            }
        ));
        assert_eq!(err.to_string(), "account balance cannot exceed 100000");
    }

    #[test]
    fn handle_withdrawal() {
        let limits = Limits::default();
        let acc = account_with(1500, 0, 0);

        let err = acc
            .handle_transaction(Operation::Withdrawal, 20000, &limits)
            .unwrap_err();
        assert!(matches!(err, RuleViolation::InsufficientBalance));
        assert_eq!(err.to_string(), "insufficient balance");

        let evt = acc
            .handle_transaction(Operation::Withdrawal, 1500, &limits)
            .unwrap();
        assert_eq!(evt.kind, AccountEventKind::Withdrawn);

        let acc = account_with(90000, 3, 3);
        let err = acc
            .handle_transaction(Operation::Withdrawal, 1000, &limits)
            .unwrap_err();
        assert_eq!(err.to_string(), "only 3 withdrawals are allowed in a day");
    }

    #[rstest]
    #[case(0, 1500, true)]
    #[case(500, 1000, true)]
    #[case(501, 1000, false)]
    #[case(0, 1501, false)]
    fn withdrawal_respects_min_balance(
        #[case] min_balance: u64,
        #[case] amount: u64,
        #[case] allowed: bool,
    ) {
        let limits = Limits {
            min_balance,
            ..Limits::default()
        };
        let acc = account_with(1500, 0, 0);
        let result = acc.handle_transaction(Operation::Withdrawal, amount, &limits);
        assert_eq!(result.is_ok(), allowed);
    }
}
