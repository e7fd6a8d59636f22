// src/sheet/mod.rs
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::Workbook;

use crate::resolver::RateResolver;
use crate::utils::error::SheetError;

// Column headers the resolver reads from. These identifiers are fixed and
// case-sensitive; upstream sheets are expected to carry them verbatim.
const SCHEME_COLUMN: &str = "Schemename";
const TIER_COLUMN: &str = "BrokerageName";

// Output columns carrying the resolved rate: the primary column and its
// legacy duplicate, always written with the same value.
const RATE_COLUMNS: [&str; 2] = ["T15", "B15"];

const DATE_OUTPUT_FORMAT: &str = "%d-%m-%Y";

/// One spreadsheet cell, reduced to the value kinds the fill pass
/// round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Text rendering used when a cell feeds the resolver.
    fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// The input spreadsheet: a header row plus the cell matrix. All original
/// columns pass through to the output unchanged, apart from the rate
/// columns and the date-column reformat.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Reads the first worksheet of an xlsx/xls file.
pub fn read_sheet<P: AsRef<Path>>(path: P) -> Result<SheetData, SheetError> {
    let mut workbook = open_workbook_auto(path.as_ref())?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(SheetError::EmptySheet)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    tracing::info!(
        "Read worksheet {:?}: {} columns",
        sheet_name,
        headers.len()
    );
    Ok(SheetData { headers, rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Text(value.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::DateTime(naive),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Resolves every row against the registry and writes the result into the
/// rate columns. Rows that do not resolve get explicit empty cells, never
/// zero.
pub fn fill_rates(sheet: &mut SheetData, resolver: &mut RateResolver) -> Result<(), SheetError> {
    let scheme_idx = column_index(&sheet.headers, SCHEME_COLUMN)
        .ok_or_else(|| SheetError::MissingColumn(SCHEME_COLUMN.to_string()))?;
    let tier_idx = column_index(&sheet.headers, TIER_COLUMN)
        .ok_or_else(|| SheetError::MissingColumn(TIER_COLUMN.to_string()))?;

    reformat_date_column(sheet);

    let rate_cols: Vec<usize> = RATE_COLUMNS
        .iter()
        .map(|name| ensure_column(&mut sheet.headers, name))
        .collect();

    for row in &mut sheet.rows {
        let fund_name = row.get(scheme_idx).map(Cell::as_text).unwrap_or_default();
        let tier_label = row.get(tier_idx).map(Cell::as_text).unwrap_or_default();
        let rate = resolver.resolve(&fund_name, &tier_label);

        for &col in &rate_cols {
            if row.len() <= col {
                row.resize(col + 1, Cell::Empty);
            }
            row[col] = match rate {
                Some(value) => Cell::Number(value),
                None => Cell::Empty,
            };
        }
    }
    Ok(())
}

/// Writes the filled sheet as a fresh workbook.
pub fn write_sheet<P: AsRef<Path>>(sheet: &SheetData, path: P) -> Result<(), SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    worksheet.write_string(out_row, col, text)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(out_row, col, *value)?;
                }
                Cell::DateTime(dt) => {
                    worksheet.write_string(
                        out_row,
                        col,
                        &dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                    )?;
                }
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn ensure_column(headers: &mut Vec<String>, name: &str) -> usize {
    match column_index(headers, name) {
        Some(idx) => idx,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Rewrites the first date column (header contains "date" but not
/// "brokerage") as DD-MM-YYYY strings. Unparseable cells pass through.
fn reformat_date_column(sheet: &mut SheetData) {
    let Some(date_idx) = sheet.headers.iter().position(|header| {
        let lower = header.to_lowercase();
        lower.contains("date") && !lower.contains("brokerage")
    }) else {
        return;
    };

    for row in &mut sheet.rows {
        let Some(cell) = row.get_mut(date_idx) else {
            continue;
        };
        match cell {
            Cell::DateTime(dt) => {
                *cell = Cell::Text(dt.format(DATE_OUTPUT_FORMAT).to_string());
            }
            Cell::Text(text) => {
                if let Some(date) = parse_loose_date(text) {
                    *cell = Cell::Text(date.format(DATE_OUTPUT_FORMAT).to_string());
                }
            }
            _ => {}
        }
    }
}

fn parse_loose_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::extractors::registry::{RateCard, SchemeRegistry};
    use crate::extractors::tier::CanonicalTier::*;

    fn test_registry() -> SchemeRegistry {
        let mut registry = SchemeRegistry::new();
        let mut card = RateCard::default();
        card.set(FirstYear, 0.5);
        registry.insert("abc fund".to_string(), card);
        registry
    }

    fn two_row_sheet() -> SheetData {
        SheetData {
            headers: vec![SCHEME_COLUMN.to_string(), TIER_COLUMN.to_string()],
            rows: vec![
                vec![
                    Cell::Text("ABC Fund".to_string()),
                    Cell::Text("FIRST YEAR TRAIL".to_string()),
                ],
                vec![
                    Cell::Text("Unknown Fund".to_string()),
                    Cell::Text("FIRST YEAR TRAIL".to_string()),
                ],
            ],
        }
    }

    #[test]
    fn test_fill_appends_both_rate_columns() {
        let registry = test_registry();
        let cfg = RunConfig::default();
        let mut resolver = RateResolver::new(&registry, &cfg);
        let mut sheet = two_row_sheet();

        fill_rates(&mut sheet, &mut resolver).unwrap();

        assert_eq!(sheet.headers, vec![SCHEME_COLUMN, TIER_COLUMN, "T15", "B15"]);
        assert_eq!(sheet.rows[0][2], Cell::Number(0.5));
        assert_eq!(sheet.rows[0][3], Cell::Number(0.5));
        // Unresolved rows stay explicitly empty, never zero.
        assert_eq!(sheet.rows[1][2], Cell::Empty);
        assert_eq!(sheet.rows[1][3], Cell::Empty);
    }

    #[test]
    fn test_fill_overwrites_existing_rate_columns() {
        let registry = test_registry();
        let cfg = RunConfig::default();
        let mut resolver = RateResolver::new(&registry, &cfg);
        let mut sheet = SheetData {
            headers: vec![
                "T15".to_string(),
                SCHEME_COLUMN.to_string(),
                TIER_COLUMN.to_string(),
            ],
            rows: vec![vec![
                Cell::Number(9.9),
                Cell::Text("ABC Fund".to_string()),
                Cell::Text("FIRST YEAR TRAIL".to_string()),
            ]],
        };

        fill_rates(&mut sheet, &mut resolver).unwrap();

        assert_eq!(sheet.headers.len(), 4); // T15 kept in place, B15 appended
        assert_eq!(sheet.rows[0][0], Cell::Number(0.5));
        assert_eq!(sheet.rows[0][3], Cell::Number(0.5));
    }

    #[test]
    fn test_missing_required_column_is_an_input_error() {
        let registry = test_registry();
        let cfg = RunConfig::default();
        let mut resolver = RateResolver::new(&registry, &cfg);
        let mut sheet = SheetData {
            headers: vec!["SomethingElse".to_string()],
            rows: vec![],
        };
        let err = fill_rates(&mut sheet, &mut resolver).unwrap_err();
        assert!(matches!(err, SheetError::MissingColumn(_)));
    }

    #[test]
    fn test_garbage_document_leaves_all_rows_unfilled() {
        // A document no credential can open ends the extraction phase with
        // an empty registry, and the fill pass still completes cleanly.
        let cfg = RunConfig::default();
        let registry = crate::extractors::extract_scheme_data(b"not a pdf at all", &cfg);
        assert!(registry.is_empty());

        let mut resolver = RateResolver::new(&registry, &cfg);
        let mut sheet = two_row_sheet();
        fill_rates(&mut sheet, &mut resolver).unwrap();

        for row in &sheet.rows {
            assert_eq!(row[2], Cell::Empty);
            assert_eq!(row[3], Cell::Empty);
        }
        assert_eq!(resolver.stats().misses, 2);
    }

    #[test]
    fn test_date_column_reformatted() {
        let mut sheet = SheetData {
            headers: vec!["Trade Date".to_string(), "BrokerageDate".to_string()],
            rows: vec![vec![
                Cell::Text("2024-03-31".to_string()),
                Cell::Text("2024-03-31".to_string()),
            ]],
        };
        reformat_date_column(&mut sheet);
        assert_eq!(sheet.rows[0][0], Cell::Text("31-03-2024".to_string()));
        // Columns mentioning brokerage are left alone.
        assert_eq!(sheet.rows[0][1], Cell::Text("2024-03-31".to_string()));
    }

    #[test]
    fn test_datetime_cells_reformatted() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut sheet = SheetData {
            headers: vec!["Date".to_string()],
            rows: vec![vec![Cell::DateTime(naive)]],
        };
        reformat_date_column(&mut sheet);
        assert_eq!(sheet.rows[0][0], Cell::Text("05-01-2024".to_string()));
    }

    #[test]
    fn test_unparseable_dates_pass_through() {
        let mut sheet = SheetData {
            headers: vec!["Date".to_string()],
            rows: vec![vec![Cell::Text("not a date".to_string())]],
        };
        reformat_date_column(&mut sheet);
        assert_eq!(sheet.rows[0][0], Cell::Text("not a date".to_string()));
    }
}
