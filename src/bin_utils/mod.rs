//! Drives a [`Bank`] from a CSV list of commands and prints the resulting
//! account table. Kept inside the library so the integration tests can run it.

use std::io::{Read, Write};

use crate::{
    bank::{Bank, BankError, TransferError},
    clock::Clock,
    command::{BankCommand, CommandError, Outcome},
    config::Limits,
    store::{AccountStore, in_memory_store::InMemoryAccountStore},
};
use anyhow::Result;
use csv_parser::{CommandRecord, CsvCommandParser};
use csv_printer::{AccountRow, print_accounts};
use thiserror::Error;
use tracing::debug;
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    BankErr(#[from] BankError),
    #[error(transparent)]
    TransferErr(#[from] TransferError),
}

pub struct Service<'w, R, W: 'w, C> {
    pub input: R,
    pub output: &'w mut W,
    pub clock: C,
    pub limits: Limits,
    pub reporter: Box<dyn FnMut(u64, Result<Outcome, ServiceError>)>,
}

impl<'w, R, W, C> Service<'w, R, W, C>
where
    R: Read,
    W: Write + 'w,
    C: Clock,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvCommandParser::new(self.input);

        let mut bank = Bank::new(InMemoryAccountStore::default(), self.clock, self.limits);

        for (line, row) in parser {
            let result = row
                .map_err(ServiceError::from)
                .and_then(|record| execute(&mut bank, record));
            (self.reporter)(line, result);
        }

        debug!(accounts = bank.store().len(), "all commands processed");
        print_accounts(
            self.output,
            bank.store().accounts().map(|(number, acc)| AccountRow {
                account: number,
                name: acc.name(),
                balance: acc.balance(),
                deposits_today: acc.deposits_today(),
                withdrawals_today: acc.withdrawals_today(),
                last_activity: acc.last_activity(),
            }),
        )
    }
}

fn execute<S, C>(
    bank: &mut Bank<S, C>,
    record: CommandRecord,
) -> Result<Outcome, ServiceError>
where
    S: AccountStore,
    C: Clock,
{
    let command = BankCommand::parse_command(
        record.kind,
        record.account,
        record.to,
        record.amount,
        record.name,
    )?;
    let outcome = match command {
        BankCommand::CreateAccount { name } => Outcome::Created(bank.create_account(&name)?),
        BankCommand::Balance { account } => Outcome::Balance(bank.balance(account)?),
        BankCommand::Deposit { account, amount } => {
            Outcome::Balance(bank.deposit(account, amount)?)
        }
        BankCommand::Withdraw { account, amount } => {
            Outcome::Balance(bank.withdraw(account, amount)?)
        }
        BankCommand::Transfer { from, to, amount } => {
            bank.transfer(from, to, amount)?;
            Outcome::Transferred
        }
    };
    Ok(outcome)
}
