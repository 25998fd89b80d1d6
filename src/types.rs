use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BALLS_PER_DRAW: usize = 6;
pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 60;

/// Six distinct numbers in `1..=60`, kept sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Numbers([u8; BALLS_PER_DRAW]);

impl Numbers {
    /// Returns `None` unless `values` holds exactly six distinct numbers in range.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut numbers = [0u8; BALLS_PER_DRAW];
        let mut count = 0;
        for value in values {
            if count == BALLS_PER_DRAW || !(MIN_NUMBER..=MAX_NUMBER).contains(&value) {
                return None;
            }
            numbers[count] = value as u8;
            count += 1;
        }
        if count != BALLS_PER_DRAW {
            return None;
        }

        numbers.sort_unstable();
        if numbers.windows(2).any(|pair| pair[0] == pair[1]) {
            return None;
        }
        Some(Self(numbers))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Bit `n` is set when `n` is one of the numbers.
    pub fn mask(&self) -> u64 {
        self.0.iter().fold(0u64, |mask, &n| mask | (1u64 << n))
    }

    /// Display key, e.g. `01-02-03-04-05-06`.
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Numbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// One row of the historical results spreadsheet after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    pub contest_number: u32,
    pub draw_date: Option<NaiveDate>,
    pub estimated_prize: Decimal,
    pub accumulated_prize: Decimal,
    pub drawn_numbers: Numbers,
}

/// The most recent official draw as published by the results API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestDraw {
    pub contest_number: u32,
    pub draw_date: Option<NaiveDate>,
    pub drawn_numbers: Numbers,
    pub next_estimated_prize: Decimal,
    pub accumulated: bool,
}

#[derive(Deserialize, Debug)]
pub struct CurrentDrawPayload {
    #[serde(rename = "numero")]
    pub contest_number: u32,
    #[serde(rename = "dataApuracao")]
    pub draw_date: String,
    #[serde(rename = "listaDezenas")]
    pub drawn_numbers: Vec<RawNumber>,
    #[serde(rename = "valorEstimadoProximoConcurso")]
    pub next_estimated_prize: f64,
    #[serde(rename = "acumulado", default)]
    pub accumulated: bool,
}

/// `listaDezenas` entries arrive as zero-padded strings or as integers.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawNumber {
    Int(u32),
    Text(String),
}

impl RawNumber {
    pub fn value(&self) -> Option<u32> {
        match self {
            RawNumber::Int(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A spreadsheet cell before any typing beyond what the workbook carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Integral value of a numeric or digit-only text cell.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Header row plus data rows, as decoded from the results workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at `(row, column)`; short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}
