use std::io::Read;

use crate::{account::AccountNumber, command::CommandKind};
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub account: Option<AccountNumber>,
    pub to: Option<AccountNumber>,
    pub amount: Option<u64>,
    pub name: Option<String>,
}

/// Parses a list of bank commands in CSV format.
///
/// Rows that cannot be deserialized are yielded as errors, so the caller can
/// report them and carry on with the next line.
pub struct CsvCommandParser<R> {
    iter: DeserializeRecordsIntoIter<R, CommandRecord>,
}

impl<R> CsvCommandParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvCommandParser<R>
where
    R: Read,
{
    type Item = (u64, Result<CommandRecord, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
