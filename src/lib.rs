//! Per-category totals for a CSV file of dated transactions.
//!
//! [`csv::open`] streams validated [`Transaction`]s out of a file,
//! [`CategorySummary::from_transactions`] folds them into totals and
//! [`report::render`] prints the result.

pub mod csv;
pub mod domain;
pub mod error;
pub mod report;

pub use domain::{
    range::DateRange,
    summary::{CategorySummary, SortOrder},
    transaction::Transaction,
};
