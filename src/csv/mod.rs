use std::{
    fs::File,
    io::{self, BufRead, BufReader, Lines, Write},
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        error::Error as RowError,
        summary::{CategorySummary, SortOrder},
        transaction::Transaction,
    },
    error::{Error, Result},
    report::format_amount,
};

const HEADER: [&str; 3] = ["date", "category", "amount"];

/// Buffer for the per-line reader. Longer lines still parse, the reader
/// refills as needed.
const LINE_BUFFER: usize = 256;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoadOptions {
    /// Fail with [`RowError::UncategorizedRow`] instead of only warning when
    /// a row has an empty category.
    pub reject_uncategorized: bool,
}

#[derive(Debug, Deserialize)]
struct Row<'a> {
    date: &'a str,
    category: &'a str,
    amount: &'a str,
}

/// Open the transactions file at `path`.
pub fn open(path: impl AsRef<Path>, options: LoadOptions) -> Result<Transactions<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_owned(),
        },
        _ => Error::FileError(err),
    })?;

    read(BufReader::new(file), options)
}

/// Parse [`Transaction`]s from a reader.
///
/// The header is checked eagerly; data rows are parsed lazily, one line at a
/// time, in file order. The returned iterator yields at most one error and
/// then stops.
pub fn read<R: BufRead>(reader: R, options: LoadOptions) -> Result<Transactions<R>> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(header) => header?,
        None => return Err(Error::EmptyFile),
    };
    let header = header.trim_start_matches('\u{feff}');

    let splitter = line_splitter();
    let fields = split(&splitter, header)?;
    if fields.is_empty() {
        return Err(Error::EmptyFile);
    }
    if !fields.iter().map(str::trim).eq(HEADER) {
        return Err(Error::InvalidHeader {
            found: header.to_owned(),
        });
    }

    Ok(Transactions {
        lines,
        splitter,
        options,
        line: 1,
        yielded: 0,
        done: false,
    })
}

/// Lazy sequence of the data rows of a transactions file.
pub struct Transactions<R> {
    lines: Lines<R>,
    splitter: ReaderBuilder,
    options: LoadOptions,
    line: usize,
    yielded: usize,
    done: bool,
}

impl<R: BufRead> Transactions<R> {
    fn parse(&self, text: &str) -> Result<Transaction> {
        let line = self.line;
        let record = split(&self.splitter, text)?;
        if record.len() != HEADER.len() {
            return Err(Error::UnexpectedColumnCount {
                line,
                found: record.len(),
                text: text.to_owned(),
            });
        }

        let row: Row = record.deserialize(None)?;
        let tx = Transaction::parse(line, row.date, row.category, row.amount)?;

        if tx.is_uncategorized() {
            if self.options.reject_uncategorized {
                return Err(RowError::UncategorizedRow { line }.into());
            }
            warn!("line {line}: row has no category");
        }

        debug!("line {line}: {} {} {}", tx.date, tx.category, tx.amount);
        Ok(tx)
    }
}

impl<R: BufRead> Iterator for Transactions<R> {
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = match self.lines.next() {
            Some(text) => {
                self.line += 1;
                text.map_err(Error::from).and_then(|text| self.parse(&text))
            }
            None => {
                self.done = true;
                return (self.yielded == 0).then_some(Err(Error::EmptyFile));
            }
        };

        match item {
            Ok(_) => self.yielded += 1,
            Err(_) => self.done = true,
        }
        Some(item)
    }
}

/// Rows are split one line at a time: the whole-file reader skips blank
/// lines silently and stamps a record's position before skipping them, so
/// it cannot report the line a blank row sits on.
fn line_splitter() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .buffer_capacity(LINE_BUFFER);
    builder
}

/// Split a single line into fields. A blank line has no fields.
fn split(splitter: &ReaderBuilder, line: &str) -> Result<StringRecord> {
    let mut record = StringRecord::new();
    splitter
        .from_reader(line.as_bytes())
        .read_record(&mut record)?;

    Ok(record)
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    category: &'a str,
    amount: String,
    percent_of_total: Option<String>,
}

/// Write the summary as CSV, one row per category in `order`.
pub fn write(summary: &CategorySummary, order: SortOrder, writer: impl Write) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(["category", "amount", "percent_of_total"])?;

    for (category, total) in summary.sorted(order) {
        writer.serialize(SummaryRow {
            category,
            amount: format_amount(total, 2),
            percent_of_total: summary
                .percent_of_total(category)
                .map(|pct| format_amount(pct, 1)),
        })?;
    }

    writer.flush()?;
    Ok(())
}
