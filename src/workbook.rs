use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

use crate::error::WorkbookError;
use crate::types::{Cell, RawTable};

/// Reads the first sheet of an xlsx/xls/ods payload; its first row is the header.
pub fn read_workbook(bytes: Vec<u8>) -> Result<RawTable, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(WorkbookError::NoSheet)??;
    table_from_range(&range)
}

pub fn table_from_range(range: &Range<Data>) -> Result<RawTable, WorkbookError> {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(WorkbookError::NoHeader)?
        .iter()
        .map(|data| data.to_string())
        .collect();
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(RawTable { headers, rows })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Cell::Empty, |datetime| Cell::Date(datetime.date())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};

    /// A two-draw results export the way Caixa lays it out: a real date cell
    /// in the first row, a text date and numeric prizes in the second.
    pub(crate) fn results_workbook() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");

        let headers = [
            "Concurso", "Data do Sorteio", "Bola1", "Bola2", "Bola3", "Bola4", "Bola5", "Bola6",
            "Ganhadores 6 acertos", "Estimativa prêmio", "Acumulado 6 acertos",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }

        sheet.write_number(1, 0, 1)?;
        sheet.write_datetime_with_format(1, 1, &ExcelDateTime::from_ymd(1996, 3, 11)?, &date_format)?;
        for (col, ball) in [4, 5, 30, 33, 41, 52].into_iter().enumerate() {
            sheet.write_number(1, col as u16 + 2, ball)?;
        }
        sheet.write_number(1, 8, 0)?;
        sheet.write_string(1, 9, "R$0,00")?;
        sheet.write_string(1, 10, "R$1.714.650,23")?;

        sheet.write_number(2, 0, 2)?;
        sheet.write_string(2, 1, "18/03/1996")?;
        for (col, ball) in [5, 11, 34, 39, 44, 59].into_iter().enumerate() {
            sheet.write_number(2, col as u16 + 2, ball)?;
        }
        sheet.write_number(2, 8, 1)?;
        sheet.write_number(2, 9, 1000.5)?;
        sheet.write_number(2, 10, 0)?;

        workbook.save_to_buffer()
    }
}
