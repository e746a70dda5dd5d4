use crate::comparison::table::{Cell, ComparisonTable, SampleSelection};
use crate::error::TableError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub const DEFAULT_SHEET_NAME: &str = "variant comparison";

/// Cell texts read as missing, the same set pandas treats as NaN by default.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum TableFormat {
    Spreadsheet,
    Delimited(u8),
}

impl TableFormat {
    fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            "csv" => Ok(TableFormat::Delimited(b',')),
            "tsv" | "tab" | "txt" => Ok(TableFormat::Delimited(b'\t')),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads the comparison table from a workbook sheet or a delimited export.
///
/// Spreadsheets are read from `sheet_name`; `.csv` files are comma separated,
/// `.tsv`/`.tab`/`.txt` tab separated. The first row is the header.
pub fn load_comparison_table(
    path: &Path,
    sheet_name: &str,
    selection: &SampleSelection,
) -> Result<ComparisonTable, TableError> {
    match TableFormat::from_path(path)? {
        TableFormat::Spreadsheet => read_sheet(path, sheet_name, selection),
        TableFormat::Delimited(delimiter) => read_delimited(path, delimiter, selection),
    }
}

fn read_sheet(
    path: &Path,
    sheet_name: &str,
    selection: &SampleSelection,
) -> Result<ComparisonTable, TableError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet_name) {
        return Err(TableError::SheetNotFound {
            sheet: sheet_name.to_string(),
            path: path.to_path_buf(),
            available: sheet_names.join(", "),
        });
    }

    let range = workbook.worksheet_range(sheet_name)?;
    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(TableError::Empty)?
        .iter()
        .map(header_text)
        .collect();
    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    ComparisonTable::from_rows(headers, body, selection)
}

fn read_delimited(
    path: &Path,
    delimiter: u8,
    selection: &SampleSelection,
) -> Result<ComparisonTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut body: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        body.push(record?.iter().map(text_cell).collect());
    }

    ComparisonTable::from_rows(headers, body, selection)
}

fn text_cell(text: &str) -> Cell {
    if NA_VALUES.contains(&text) {
        None
    } else {
        Some(text.to_string())
    }
}

/// Header names are taken as written; only body cells can be missing.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => cell_text(other).unwrap_or_default(),
    }
}

/// Text of a spreadsheet cell. Whole-number floats lose their fraction so
/// `2.0` and `2` read the same.
fn cell_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => text_cell(s),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        other => Some(other.to_string()),
    }
}
