use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: amount {value:?} is not a number")]
    MalformedAmount { line: usize, value: String },
    #[error("line {line}: date {value:?} is not a YYYY-MM-DD date")]
    MalformedDate { line: usize, value: String },
    #[error("line {line}: row has no category")]
    UncategorizedRow { line: usize },
    #[error("start date {from} is after end date {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    #[error("line {line}: adding amount {value} overflows the running total")]
    AmountOverflow { line: usize, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
