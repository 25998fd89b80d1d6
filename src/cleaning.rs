use chrono::NaiveDate;
use tracing::debug;

use crate::error::HistoryError;
use crate::types::{Cell, RawTable};

// Format and the digit count its year field must have. chrono's `%Y` alone
// would read "14/12/24" as year 24.
const DAY_FIRST_FORMATS: [(&str, usize); 5] = [
    ("%d/%m/%Y", 4),
    ("%d-%m-%Y", 4),
    ("%d/%m/%y", 2),
    ("%d-%m-%y", 2),
    ("%Y-%m-%d", 4),
];

/// Parses a day-first date such as `25/12/2024` or `25/12/24`. ISO dates are
/// accepted too.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Some exports carry a time component after the date.
    let date_part = raw.split_whitespace().next().unwrap_or(raw);
    DAY_FIRST_FORMATS
        .iter()
        .filter(|(format, digits)| year_field(date_part, format).map(str::len) == Some(*digits))
        .find_map(|(format, _)| NaiveDate::parse_from_str(date_part, format).ok())
}

fn year_field<'a>(date_part: &'a str, format: &str) -> Option<&'a str> {
    let mut fields = date_part.split(['/', '-']);
    if format.starts_with("%Y") {
        fields.next()
    } else {
        fields.nth(2)
    }
}

/// Trims every header and turns `date_column` into date cells.
///
/// Cells that cannot be read as a date become `Cell::Empty`; that never fails
/// the table. A missing date column does.
pub fn clean_table(mut table: RawTable, date_column: &str) -> Result<RawTable, HistoryError> {
    for header in table.headers.iter_mut() {
        let trimmed = header.trim();
        if trimmed.len() != header.len() {
            *header = trimmed.to_string();
        }
    }

    let index = table
        .column_index(date_column)
        .ok_or_else(|| HistoryError::MissingColumn(date_column.to_string()))?;

    let mut degraded = 0usize;
    for row in table.rows.iter_mut() {
        if let Some(cell) = row.get_mut(index) {
            let coerced = coerce_date(cell);
            if coerced == Cell::Empty && !cell.is_empty() {
                degraded += 1;
            }
            *cell = coerced;
        }
    }

    if degraded > 0 {
        debug!("{} '{}' cells could not be read as dates", degraded, date_column);
    }
    Ok(table)
}

fn coerce_date(cell: &Cell) -> Cell {
    match cell {
        Cell::Date(date) => Cell::Date(*date),
        Cell::Text(raw) => parse_day_first(raw).map_or(Cell::Empty, Cell::Date),
        _ => Cell::Empty,
    }
}
