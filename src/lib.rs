pub mod api;
pub mod cache;
pub mod cleaning;
pub mod config;
pub mod currency;
pub mod error;
pub mod history;
pub mod reports;
pub mod scoring;
pub mod tickets;
pub mod types;
pub mod utils;
pub mod workbook;

pub use api::*;
pub use cache::TtlCache;
pub use cleaning::{clean_table, parse_day_first};
pub use config::{Config, Endpoint};
pub use currency::{CurrencyInput, normalize_column, normalize_currency};
pub use error::*;
pub use history::*;
pub use scoring::*;
pub use tickets::*;
pub use types::*;
