use std::{env, str::FromStr};

use thiserror::Error;

use crate::account::{Operation, RuleViolation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Inconsistent limits: {0}")]
    Inconsistent(String),
}

/// Amount bounds, daily counts and balance bounds every account operation is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub min_deposit: u64,
    pub max_deposit: u64,
    pub deposit_limit: u32,
    pub min_withdrawal: u64,
    pub max_withdrawal: u64,
    pub withdrawal_limit: u32,
    pub min_balance: u64,
    pub max_balance: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_deposit: 500,
            max_deposit: 50000,
            deposit_limit: 3,
            min_withdrawal: 1000,
            max_withdrawal: 25000,
            withdrawal_limit: 3,
            min_balance: 0,
            max_balance: 100000,
        }
    }
}

impl Limits {
    /// Starts from [`Limits::default`] and overrides every field that has a
    /// `LEDGER_*` environment variable set, e.g. `LEDGER_MAX_BALANCE`.
    /// A `.env` file in the working directory is loaded first, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let limits = Self {
            min_deposit: env_or("LEDGER_MIN_DEPOSIT", defaults.min_deposit)?,
            max_deposit: env_or("LEDGER_MAX_DEPOSIT", defaults.max_deposit)?,
            deposit_limit: env_or("LEDGER_DEPOSIT_LIMIT", defaults.deposit_limit)?,
            min_withdrawal: env_or("LEDGER_MIN_WITHDRAWAL", defaults.min_withdrawal)?,
            max_withdrawal: env_or("LEDGER_MAX_WITHDRAWAL", defaults.max_withdrawal)?,
            withdrawal_limit: env_or("LEDGER_WITHDRAWAL_LIMIT", defaults.withdrawal_limit)?,
            min_balance: env_or("LEDGER_MIN_BALANCE", defaults.min_balance)?,
            max_balance: env_or("LEDGER_MAX_BALANCE", defaults.max_balance)?,
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_deposit > self.max_deposit {
            return Err(ConfigError::Inconsistent(format!(
                "min_deposit {} is above max_deposit {}",
                self.min_deposit, self.max_deposit
            )));
        }
        if self.min_withdrawal > self.max_withdrawal {
            return Err(ConfigError::Inconsistent(format!(
                "min_withdrawal {} is above max_withdrawal {}",
                self.min_withdrawal, self.max_withdrawal
            )));
        }
        if self.min_balance > self.max_balance {
            return Err(ConfigError::Inconsistent(format!(
                "min_balance {} is above max_balance {}",
                self.min_balance, self.max_balance
            )));
        }
        Ok(())
    }

    /// Amount bounds for a single deposit or withdrawal, independent of any account.
    pub fn check_amount(&self, operation: Operation, amount: u64) -> Result<(), RuleViolation> {
        let (min, max) = match operation {
            Operation::Deposit => (self.min_deposit, self.max_deposit),
            Operation::Withdrawal => (self.min_withdrawal, self.max_withdrawal),
        };
        if amount < min {
            Err(RuleViolation::BelowMinimum { operation, min })
        } else if amount > max {
            Err(RuleViolation::AboveMaximum { operation, max })
        } else {
            Ok(())
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: err.to_string(),
            }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "value is not valid Unicode".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Operation::Deposit, 100, "minimum deposit amount is 500")]
    #[case(Operation::Deposit, 60000, "maximum deposit amount is 50000")]
    #[case(Operation::Withdrawal, 500, "minimum withdrawal amount is 1000")]
    #[case(Operation::Withdrawal, 25001, "maximum withdrawal amount is 25000")]
    fn amount_out_of_bounds(
        #[case] operation: Operation,
        #[case] amount: u64,
        #[case] message: &str,
    ) {
        let err = Limits::default()
            .check_amount(operation, amount)
            .unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case(Operation::Deposit, 500)]
    #[case(Operation::Deposit, 50000)]
    #[case(Operation::Withdrawal, 1000)]
    #[case(Operation::Withdrawal, 25000)]
    fn amount_bounds_are_inclusive(#[case] operation: Operation, #[case] amount: u64) {
        assert!(Limits::default().check_amount(operation, amount).is_ok());
    }

    #[test]
    fn defaults_are_consistent() {
        assert!(Limits::default().validate().is_ok());
    }

    #[test]
    fn inconsistent_limits() {
        let limits = Limits {
            min_balance: 10,
            max_balance: 5,
            ..Limits::default()
        };
        let err = limits.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inconsistent limits: min_balance 10 is above max_balance 5"
        );
    }

    #[test]
    fn unset_env_falls_back_to_default() {
        let value = env_or::<u64>("LEDGER_UNSET_FOR_TESTS", 7);
        assert_eq!(value, Ok(7));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_env_is_rejected() {
        use std::{ffi::OsString, os::unix::ffi::OsStringExt};

        let key = "LEDGER_NOT_UNICODE_FOR_TESTS";
        // SAFETY: the key is unique to this test, nothing else reads or writes it
        unsafe { env::set_var(key, OsString::from_vec(vec![0x66, 0xff, 0x6f])) };
        let err = env_or::<u64>(key, 7).unwrap_err();
        unsafe { env::remove_var(key) };
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: "value is not valid Unicode".to_string(),
            }
        );
    }

    #[test]
    fn unparsable_env_is_rejected() {
        let key = "LEDGER_NOT_A_NUMBER_FOR_TESTS";
        // SAFETY: the key is unique to this test, nothing else reads or writes it
        unsafe { env::set_var(key, "ten") };
        let err = env_or::<u64>(key, 7).unwrap_err();
        unsafe { env::remove_var(key) };
        assert!(matches!(err, ConfigError::InvalidValue { key: k, .. } if k == key));
    }
}
