use std::{collections::BTreeMap, str::FromStr};

use itertools::Itertools;
use log::{debug, info};
use rust_decimal::Decimal;

use super::{error::Error, range::DateRange, transaction::Transaction};
use crate::error::Error as LoadError;

/// How summary lines are ordered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending category name, byte-wise so `Zoo` sorts before `apple`.
    #[default]
    Category,
    /// Descending total, ties broken by category name.
    Amount,
}

impl FromStr for SortOrder {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(SortOrder::Category),
            "amount" => Ok(SortOrder::Amount),
            other => Err(LoadError::UnknownSortOrder(other.to_owned())),
        }
    }
}

/// Running totals per category for a single run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    totals: BTreeMap<String, Decimal>,
    grand_total: Decimal,
    processed: usize,
    skipped: usize,
}

impl CategorySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every transaction into a summary, stopping at the first error.
    ///
    /// Transactions dated outside `range` are counted as skipped and do not
    /// contribute to any total. No summary is produced when the input holds
    /// an error, so a malformed row can never skew the totals. A total that
    /// would overflow fails with [`Error::AmountOverflow`].
    pub fn from_transactions<E: From<Error>>(
        txns: impl IntoIterator<Item = Result<Transaction, E>>,
        range: &DateRange,
    ) -> Result<Self, E> {
        let summary = txns
            .into_iter()
            .try_fold(Self::new(), |mut summary, tx| {
                summary.record(tx?, range)?;
                Ok::<_, E>(summary)
            })?;

        info!(
            "rows processed: {} | rows skipped: {}",
            summary.processed, summary.skipped
        );
        Ok(summary)
    }

    /// Add one transaction. On overflow no total is changed.
    pub fn record(&mut self, tx: Transaction, range: &DateRange) -> Result<(), Error> {
        self.processed += 1;

        if !range.contains(tx.date) {
            debug!("skipping {} dated {}", tx.category, tx.date);
            self.skipped += 1;
            return Ok(());
        }

        let overflow = || Error::AmountOverflow {
            line: tx.line,
            value: tx.amount.to_string(),
        };
        let category_total = self
            .get(&tx.category)
            .unwrap_or(Decimal::ZERO)
            .checked_add(tx.amount)
            .ok_or_else(overflow)?;
        let grand_total = self
            .grand_total
            .checked_add(tx.amount)
            .ok_or_else(overflow)?;

        self.totals.insert(tx.category, category_total);
        self.grand_total = grand_total;
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals.get(category).copied()
    }

    /// Sum of every category total, kept up to date by [`Self::record`].
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Share of the grand total, in percent. `None` when the grand total is
    /// zero, the category is unknown or the share does not fit a `Decimal`.
    pub fn percent_of_total(&self, category: &str) -> Option<Decimal> {
        self.get(category)?
            .checked_div(self.grand_total)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }

    pub fn sorted(&self, order: SortOrder) -> Vec<(&str, Decimal)> {
        let entries = self
            .totals
            .iter()
            .map(|(category, total)| (category.as_str(), *total));

        match order {
            SortOrder::Category => entries.collect(),
            SortOrder::Amount => entries
                .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn tx(day: u32, category: &str, amount: Decimal) -> Result<Transaction, Error> {
        Ok(Transaction {
            line: day as usize + 1,
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            category: category.to_owned(),
            amount,
        })
    }

    fn scenario() -> Vec<Result<Transaction, Error>> {
        vec![
            tx(1, "Food", dec!(12.50)),
            tx(2, "Transport", dec!(7.20)),
            tx(2, "Rent", dec!(450)),
            tx(3, "Food", dec!(5.00)),
        ]
    }

    #[test]
    fn sums_per_category() {
        let summary = CategorySummary::from_transactions(scenario(), &DateRange::unbounded()).unwrap();

        assert_eq!(summary.len(), 3);
        assert_eq!(summary.get("Food"), Some(dec!(17.50)));
        assert_eq!(summary.get("Rent"), Some(dec!(450)));
        assert_eq!(summary.get("Transport"), Some(dec!(7.20)));
        assert_eq!(summary.grand_total(), dec!(474.70));
        assert_eq!(summary.processed(), 4);
        assert_eq!(summary.skipped(), 0);
    }

    #[test]
    fn row_order_does_not_change_totals() {
        let forward = CategorySummary::from_transactions(scenario(), &DateRange::unbounded()).unwrap();
        let backward = CategorySummary::from_transactions(
            scenario().into_iter().rev(),
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn categories_are_case_sensitive() {
        let summary = CategorySummary::from_transactions(
            vec![tx(1, "food", dec!(1)), tx(1, "Food", dec!(2))],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(summary.get("food"), Some(dec!(1)));
        assert_eq!(summary.get("Food"), Some(dec!(2)));
    }

    #[test]
    fn stops_at_first_error() {
        let mut txns = scenario();
        txns.insert(
            1,
            Err(Error::MalformedAmount {
                line: 3,
                value: "abc".to_owned(),
            }),
        );

        let err = CategorySummary::from_transactions(txns, &DateRange::unbounded()).unwrap_err();

        assert!(matches!(err, Error::MalformedAmount { line: 3, .. }));
    }

    #[test]
    fn out_of_range_rows_are_skipped() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2025, 1, 2), None).unwrap();
        let summary = CategorySummary::from_transactions(scenario(), &range).unwrap();

        assert_eq!(summary.get("Food"), Some(dec!(5.00)));
        assert_eq!(summary.grand_total(), dec!(462.20));
        assert_eq!(summary.processed(), 4);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn sorts_by_amount_descending() {
        let summary = CategorySummary::from_transactions(
            vec![
                tx(1, "B", dec!(5)),
                tx(1, "A", dec!(5)),
                tx(1, "C", dec!(9)),
            ],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(
            summary.sorted(SortOrder::Amount),
            vec![("C", dec!(9)), ("A", dec!(5)), ("B", dec!(5))]
        );
        assert_eq!(
            summary.sorted(SortOrder::Category),
            vec![("A", dec!(5)), ("B", dec!(5)), ("C", dec!(9))]
        );
    }

    #[test]
    fn percent_of_total() {
        let summary = CategorySummary::from_transactions(
            vec![tx(1, "Food", dec!(25)), tx(1, "Rent", dec!(75))],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(summary.percent_of_total("Rent"), Some(dec!(75)));
        assert_eq!(summary.percent_of_total("Gym"), None);
    }

    #[test]
    fn percent_of_zero_total_is_none() {
        let summary = CategorySummary::from_transactions(
            vec![tx(1, "Food", dec!(10)), tx(1, "Refund", dec!(-10))],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(summary.percent_of_total("Food"), None);
    }

    #[test]
    fn parses_sort_order() {
        assert_eq!("category".parse::<SortOrder>().unwrap(), SortOrder::Category);
        assert_eq!("amount".parse::<SortOrder>().unwrap(), SortOrder::Amount);
        assert!(matches!(
            "date".parse::<SortOrder>(),
            Err(LoadError::UnknownSortOrder(ref value)) if value == "date"
        ));
    }

    #[test]
    fn category_overflow_is_an_error() {
        let err = CategorySummary::from_transactions(
            vec![tx(1, "Food", Decimal::MAX), tx(2, "Food", dec!(1))],
            &DateRange::unbounded(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::AmountOverflow { line: 3, ref value } if value == "1"
        ));
    }

    #[test]
    fn grand_total_overflow_is_an_error() {
        let err = CategorySummary::from_transactions(
            vec![tx(1, "Food", Decimal::MAX), tx(2, "Rent", dec!(1))],
            &DateRange::unbounded(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::AmountOverflow { line: 3, .. }));
    }

    #[test]
    fn overflow_leaves_summary_unchanged() {
        let mut summary = CategorySummary::new();
        summary
            .record(tx(1, "Food", Decimal::MAX).unwrap(), &DateRange::unbounded())
            .unwrap();

        assert!(summary
            .record(tx(2, "Rent", dec!(1)).unwrap(), &DateRange::unbounded())
            .is_err());
        assert_eq!(summary.get("Rent"), None);
        assert_eq!(summary.grand_total(), Decimal::MAX);
    }

    #[test]
    fn percent_of_huge_total() {
        let summary = CategorySummary::from_transactions(
            vec![tx(1, "Food", dec!(1000000000000000000000000000))],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(summary.percent_of_total("Food"), Some(dec!(100)));
    }

    #[test]
    fn percent_that_does_not_fit_is_none() {
        let summary = CategorySummary::from_transactions(
            vec![
                tx(1, "Food", dec!(1000000000000000000000000000)),
                tx(2, "Refund", dec!(-999999999999999999999999999.9)),
            ],
            &DateRange::unbounded(),
        )
        .unwrap();

        assert_eq!(summary.grand_total(), dec!(0.1));
        assert_eq!(summary.percent_of_total("Food"), None);
    }
}
