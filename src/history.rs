use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::cleaning::clean_table;
use crate::currency::{CurrencyInput, normalize_column};
use crate::error::{HistoryError, SeriesError};
use crate::types::{Cell, DrawRecord, Numbers, RawTable};

pub const CONTEST_COLUMN: &str = "Concurso";
pub const DATE_COLUMN: &str = "Data do Sorteio";
pub const ESTIMATED_PRIZE_COLUMN: &str = "Estimativa prêmio";
pub const ACCUMULATED_PRIZE_COLUMN: &str = "Acumulado 6 acertos";
pub const BALL_COLUMNS: [&str; 6] = ["Bola1", "Bola2", "Bola3", "Bola4", "Bola5", "Bola6"];

/// Draw records sorted ascending by contest number, each contest at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawSeries {
    records: Vec<DrawRecord>,
}

impl DrawSeries {
    pub fn new(mut records: Vec<DrawRecord>) -> Result<Self, HistoryError> {
        records.sort_by_key(|record| record.contest_number);
        if let Some(pair) = records
            .windows(2)
            .find(|pair| pair[0].contest_number == pair[1].contest_number)
        {
            return Err(HistoryError::DuplicateContest(pair[0].contest_number));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lowest and highest contest numbers present.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.contest_number, last.contest_number))
    }

    /// Clamps a requested range into `bounds()`, swapping inverted input.
    pub fn clamp(&self, lo: u32, hi: u32) -> Option<(u32, u32)> {
        let (min, max) = self.bounds()?;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        Some((lo.clamp(min, max), hi.clamp(min, max)))
    }

    /// Records with `lo <= contest_number <= hi`, in series order.
    pub fn range(&self, lo: u32, hi: u32) -> Result<&[DrawRecord], SeriesError> {
        if lo > hi {
            return Err(SeriesError::InvertedRange { lo, hi });
        }
        let start = self.records.partition_point(|r| r.contest_number < lo);
        let end = self.records.partition_point(|r| r.contest_number <= hi);
        Ok(&self.records[start..end])
    }

    /// The last `limit` draws, newest first.
    pub fn most_recent(&self, limit: usize) -> impl Iterator<Item = &DrawRecord> {
        self.records.iter().rev().take(limit)
    }
}

/// Builds a series from the raw results sheet.
///
/// Headers are trimmed and the draw date is coerced leniently. Both prize
/// columns are normalized strictly: one malformed cell fails the build.
pub fn build_series(raw: RawTable) -> Result<DrawSeries, HistoryError> {
    let table = clean_table(raw, DATE_COLUMN)?;

    let column = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| HistoryError::MissingColumn(name.to_string()))
    };
    let contest_col = column(CONTEST_COLUMN)?;
    let date_col = column(DATE_COLUMN)?;
    let estimated_col = column(ESTIMATED_PRIZE_COLUMN)?;
    let accumulated_col = column(ACCUMULATED_PRIZE_COLUMN)?;
    let ball_cols = BALL_COLUMNS
        .iter()
        .map(|&name| column(name))
        .collect::<Result<Vec<_>, _>>()?;

    // Trailing blank rows are common at the bottom of the export.
    let rows: Vec<usize> = (0..table.rows.len())
        .filter(|&row| !table.rows[row].iter().all(Cell::is_empty))
        .collect();

    let prize_column = |col: usize, name: &str| {
        let inputs: Vec<CurrencyInput> = rows
            .iter()
            .map(|&row| CurrencyInput::from(table.cell(row, col)))
            .collect();
        normalize_column(&inputs).map_err(|source| HistoryError::Currency {
            column: name.to_string(),
            source,
        })
    };
    let estimated = prize_column(estimated_col, ESTIMATED_PRIZE_COLUMN)?;
    let accumulated = prize_column(accumulated_col, ACCUMULATED_PRIZE_COLUMN)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, &row) in rows.iter().enumerate() {
        let contest_number = table
            .cell(row, contest_col)
            .as_integer()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
            .ok_or(HistoryError::InvalidContest { row: row + 1 })?;

        let balls = ball_cols
            .iter()
            .map(|&col| table.cell(row, col).as_integer().and_then(|n| u32::try_from(n).ok()))
            .collect::<Option<Vec<u32>>>();
        let drawn_numbers = balls
            .and_then(Numbers::from_values)
            .ok_or(HistoryError::InvalidDrawnNumbers {
                contest: contest_number,
            })?;

        for (column, amount) in [
            (ESTIMATED_PRIZE_COLUMN, estimated[i]),
            (ACCUMULATED_PRIZE_COLUMN, accumulated[i]),
        ] {
            if amount < Decimal::ZERO {
                return Err(HistoryError::NegativePrize {
                    column: column.to_string(),
                    contest: contest_number,
                    amount,
                });
            }
        }

        let draw_date = match table.cell(row, date_col) {
            Cell::Date(date) => Some(*date),
            _ => None,
        };

        records.push(DrawRecord {
            contest_number,
            draw_date,
            estimated_prize: estimated[i],
            accumulated_prize: accumulated[i],
            drawn_numbers,
        });
    }

    let undated = records.iter().filter(|r| r.draw_date.is_none()).count();
    if undated > 0 {
        warn!("{} draws have no readable date", undated);
    }

    let series = DrawSeries::new(records)?;
    info!("📚 Loaded {} historical draws", series.len());
    Ok(series)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeSummary {
    pub draws: usize,
    pub max_estimated_prize: Decimal,
    pub mean_estimated_prize: Decimal,
    pub accumulated_draws: usize,
}

impl PrizeSummary {
    /// Fails with `EmptySeries` when there is nothing to aggregate.
    pub fn compute(records: &[DrawRecord]) -> Result<Self, SeriesError> {
        let max_estimated_prize = records
            .iter()
            .map(|r| r.estimated_prize)
            .max()
            .ok_or(SeriesError::EmptySeries)?;

        let total: Decimal = records.iter().map(|r| r.estimated_prize).sum();
        let mean_estimated_prize = total / Decimal::from(records.len());

        let accumulated_draws = records
            .iter()
            .filter(|r| r.accumulated_prize > Decimal::ZERO)
            .count();

        Ok(Self {
            draws: records.len(),
            max_estimated_prize,
            mean_estimated_prize,
            accumulated_draws,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub contest_number: u32,
    pub draw_date: Option<NaiveDate>,
    pub estimated_prize: Decimal,
}

/// Estimated prize per contest, in contest order.
pub fn prize_timeline(records: &[DrawRecord]) -> Vec<TimelinePoint> {
    records
        .iter()
        .map(|r| TimelinePoint {
            contest_number: r.contest_number,
            draw_date: r.draw_date,
            estimated_prize: r.estimated_prize,
        })
        .collect()
}
