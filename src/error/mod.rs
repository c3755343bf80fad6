use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("file has no header or no data rows")]
    EmptyFile,
    #[error("expected header `date,category,amount`, found {found:?}")]
    InvalidHeader { found: String },
    #[error("line {line}: expected 3 columns, found {found} in {text:?}")]
    UnexpectedColumnCount {
        line: usize,
        found: usize,
        text: String,
    },
    #[error("unknown sort order {0:?}, expected `category` or `amount`")]
    UnknownSortOrder(String),
    #[error("could not read transactions file")]
    FileError(#[from] std::io::Error),
    #[error("could not parse CSV row")]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
