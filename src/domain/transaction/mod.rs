use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Characters dropped from an amount before parsing, so `£1,200.50` reads
/// as `1200.50`.
const AMOUNT_NOISE: [char; 4] = ['£', '$', '€', ','];

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transaction {
    /// 1-indexed line of the source row, header included.
    pub line: usize,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
}

impl Transaction {
    /// Validate the raw fields of the data row found at `line`.
    ///
    /// The category is kept even when empty; whether that is acceptable is
    /// up to the caller (see [`Transaction::is_uncategorized`]).
    pub fn parse(line: usize, date: &str, category: &str, amount: &str) -> Result<Self> {
        let date = parse_date(date).ok_or_else(|| Error::MalformedDate {
            line,
            value: date.to_owned(),
        })?;
        let amount = parse_amount(amount).ok_or_else(|| Error::MalformedAmount {
            line,
            value: amount.to_owned(),
        })?;

        Ok(Transaction {
            line,
            date,
            category: category.trim().to_owned(),
            amount,
        })
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !AMOUNT_NOISE.contains(c))
        .collect();

    Decimal::from_str(&cleaned).ok()
}
