//! Spreadsheet reader (xls, xlsx, xlsb, ods).
//!
//! Only the first sheet is read. Cells are rendered to text and typed with
//! the same rules as delimited input, so a number column in a workbook and
//! in a CSV export infer to the same dtype.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::Timelike;
use tracing::debug;

use crate::data::Table;
use crate::error::{PreplineError, Result};

use super::parser::{ParserConfig, assemble_table};

/// Read the first sheet of a workbook held in memory.
pub(super) fn read_first_sheet(contents: Vec<u8>, config: &ParserConfig) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PreplineError::EmptyData("Workbook has no sheets".to_string()))??;

    if range.is_empty() {
        return Err(PreplineError::EmptyData(format!("Sheet '{}' is empty", sheet)));
    }
    debug!(sheet = %sheet, height = range.height(), width = range.width(), "Reading sheet");

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let headers: Vec<String> = if config.has_header {
        match rows.next() {
            Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
            None => return Err(PreplineError::EmptyData("No header row found".to_string())),
        }
    } else {
        vec![String::new(); range.width()]
    };

    let records: Vec<Vec<String>> = match config.max_rows {
        Some(max) => rows.take(max).collect(),
        None => rows.collect(),
    };

    assemble_table(headers, &records, |record, index| {
        record.get(index).map(String::as_str)
    })
}

/// Render a cell the way it would appear in a CSV export.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(excel) => match excel.as_datetime() {
            Some(dt) if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 => {
                dt.date().to_string()
            }
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnType, Value};
    use rust_xlsxwriter::Workbook;

    fn survey_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "age").unwrap();
        sheet.write_string(0, 1, "city").unwrap();
        sheet.write_string(0, 2, "active").unwrap();
        sheet.write_string(0, 3, "joined").unwrap();

        sheet.write_number(1, 0, 25).unwrap();
        sheet.write_string(1, 1, "NY").unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_string(1, 3, "2024-01-05").unwrap();

        // Row 2 leaves age blank and spells the city as a null token.
        sheet.write_string(2, 1, "NA").unwrap();
        sheet.write_boolean(2, 2, false).unwrap();
        sheet.write_string(2, 3, "2024-02-10").unwrap();

        sheet.write_number(3, 0, 35.5).unwrap();
        sheet.write_string(3, 1, "LA").unwrap();
        sheet.write_boolean(3, 2, true).unwrap();
        sheet.write_string(3, 3, "2024-03-15").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_first_sheet_is_typed() {
        let table = read_first_sheet(survey_workbook(), &ParserConfig::default()).unwrap();

        assert_eq!(table.column_names(), vec!["age", "city", "active", "joined"]);
        assert_eq!(table.row_count(), 3);

        let age = table.column("age").unwrap();
        assert_eq!(age.dtype, ColumnType::Number);
        assert_eq!(
            age.values,
            vec![Value::Number(25.0), Value::Missing, Value::Number(35.5)]
        );

        let city = table.column("city").unwrap();
        assert_eq!(city.dtype, ColumnType::Text);
        assert_eq!(city.values[1], Value::Missing);

        assert_eq!(table.column("active").unwrap().dtype, ColumnType::Boolean);
        assert_eq!(table.column("joined").unwrap().dtype, ColumnType::Date);
    }

    #[test]
    fn test_max_rows_and_no_header() {
        let config = ParserConfig {
            has_header: false,
            max_rows: Some(2),
            ..ParserConfig::default()
        };
        let table = read_first_sheet(survey_workbook(), &config).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names()[0], "column_1");
        assert_eq!(table.get(0, 0), Some(&Value::text("age")));
    }

    #[test]
    fn test_empty_sheet() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = read_first_sheet(bytes, &ParserConfig::default()).unwrap_err();
        assert_eq!(err.code(), "empty_data");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(25.0)), "25");
        assert_eq!(cell_text(&Data::Int(-3)), "-3");
        assert_eq!(cell_text(&Data::Bool(false)), "false");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
