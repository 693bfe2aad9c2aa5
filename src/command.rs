use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountNumber;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Create,
    Balance,
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    CreateAccount {
        name: String,
    },
    Balance {
        account: AccountNumber,
    },
    Deposit {
        account: AccountNumber,
        amount: u64,
    },
    Withdraw {
        account: AccountNumber,
        amount: u64,
    },
    Transfer {
        from: AccountNumber,
        to: AccountNumber,
        amount: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("`{field}` is required for {kind:?}")]
    FieldRequired {
        kind: CommandKind,
        field: &'static str,
    },
    #[error("Account holder name must not be empty")]
    EmptyName,
}

/// Successful result of a [`BankCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created(AccountNumber),
    Balance(u64),
    Transferred,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(number) => write!(f, "{number}"),
            Outcome::Balance(balance) => write!(f, "{balance}"),
            Outcome::Transferred => f.write_str("Successful"),
        }
    }
}

impl BankCommand {
    pub fn parse_command(
        kind: CommandKind,
        account: Option<AccountNumber>,
        to: Option<AccountNumber>,
        amount: Option<u64>,
        name: Option<String>,
    ) -> Result<Self, CommandError> {
        let required = |field: &'static str| CommandError::FieldRequired { kind, field };
        match kind {
            CommandKind::Create => {
                let name = name.ok_or_else(|| required("name"))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(CommandError::EmptyName);
                }
                Ok(Self::CreateAccount {
                    name: name.to_string(),
                })
            }
            CommandKind::Balance => Ok(Self::Balance {
                account: account.ok_or_else(|| required("account"))?,
            }),
            CommandKind::Deposit => Ok(Self::Deposit {
                account: account.ok_or_else(|| required("account"))?,
                amount: amount.ok_or_else(|| required("amount"))?,
            }),
            CommandKind::Withdraw => Ok(Self::Withdraw {
                account: account.ok_or_else(|| required("account"))?,
                amount: amount.ok_or_else(|| required("amount"))?,
            }),
            CommandKind::Transfer => Ok(Self::Transfer {
                from: account.ok_or_else(|| required("account"))?,
                to: to.ok_or_else(|| required("to"))?,
                amount: amount.ok_or_else(|| required("amount"))?,
            }),
        }
    }
}
