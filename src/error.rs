use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("invalid currency format: '{raw}'")]
    InvalidCurrencyFormat { raw: String },
}

/// Why a ticket submission was rejected. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("fill in all six numbers")]
    MissingDigits,
    #[error("numbers must be between 1 and 60")]
    OutOfRange,
    #[error("numbers cannot repeat")]
    DuplicateNumbers,
}

impl TicketError {
    pub fn code(&self) -> &'static str {
        match self {
            TicketError::MissingDigits => "missing_digits",
            TicketError::OutOfRange => "out_of_range",
            TicketError::DuplicateNumbers => "duplicate_numbers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("no draws in the selected range")]
    EmptySeries,
    #[error("invalid contest range: {lo} > {hi}")]
    InvertedRange { lo: u32, hi: u32 },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("column '{0}' not found in results sheet")]
    MissingColumn(String),

    #[error("row {row}: invalid contest number")]
    InvalidContest { row: usize },

    #[error("contest {0} appears more than once")]
    DuplicateContest(u32),

    #[error("contest {contest}: drawn numbers are not six distinct values in 1..=60")]
    InvalidDrawnNumbers { contest: u32 },

    #[error("column '{column}': {source}")]
    Currency {
        column: String,
        #[source]
        source: CurrencyError,
    },

    #[error("contest {contest}: '{column}' is negative ({amount})")]
    NegativePrize {
        column: String,
        contest: u32,
        amount: Decimal,
    },
}

/// Either step of loading the draw history can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("cannot open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    NoSheet,

    #[error("first sheet has no header row")]
    NoHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidNumber { var: String, value: String },
}
