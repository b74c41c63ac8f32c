//! Numeric column extraction from spreadsheets and CSV files.
//!
//! Spreadsheets (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.ods`) are read with
//! calamine, `.csv`/`.txt` files are split on commas. In both cases the
//! header row is the first row (among the first [`HEADER_SEARCH_ROWS`]) that
//! contains every requested column name, so title lines above the table are
//! skipped.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};

/// Rows inspected when looking for the header.
pub const HEADER_SEARCH_ROWS: usize = 32;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    fn parse(field: &str) -> Self {
        let field = field.trim().trim_matches('"').trim();
        if field.is_empty() {
            Self::Empty
        } else if let Ok(v) = field.parse::<f64>() {
            Self::Number(v)
        } else {
            Self::Text(field.to_string())
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Text(s) => s.trim().eq_ignore_ascii_case(name.trim()),
            _ => false,
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Self::Empty,
            Data::Float(v) => Self::Number(*v),
            Data::Int(v) => Self::Number(*v as f64),
            Data::Bool(b) => Self::Number(if *b { 1.0 } else { 0.0 }),
            Data::String(s) => Self::parse(s),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Reads the named numeric columns of a table file.
///
/// `sheet` selects a worksheet by name (spreadsheets only); the first sheet
/// is used when `None`. Returns one vector per requested column, in order.
pub fn read_columns(path: &Path, columns: &[&str], sheet: Option<&str>) -> Result<Vec<Vec<f64>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" | "txt" => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            parse_csv(&content)
        }
        _ => read_workbook(path, sheet)?,
    };

    extract_columns(&rows, columns)
        .with_context(|| format!("Failed to extract columns {columns:?} from {}", path.display()))
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Spreadsheet has no sheets: {}", path.display()))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet '{sheet_name}'"))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect())
}

/// Splits CSV content into cells. Quoted fields containing commas are not supported.
pub fn parse_csv(content: &str) -> Vec<Vec<Cell>> {
    content
        .lines()
        .map(|line| line.split(',').map(Cell::parse).collect())
        .collect()
}

/// Locates the header row and collects the named columns below it.
///
/// Rows where every requested cell is empty are skipped; a non-numeric or
/// missing value in a requested column is an error.
pub fn extract_columns(rows: &[Vec<Cell>], columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    anyhow::ensure!(!columns.is_empty(), "No columns requested");

    let (header_row, indices) = rows
        .iter()
        .take(HEADER_SEARCH_ROWS)
        .enumerate()
        .find_map(|(r, row)| {
            let idx: Option<Vec<usize>> = columns
                .iter()
                .map(|name| row.iter().position(|c| c.matches_name(name)))
                .collect();
            idx.map(|idx| (r, idx))
        })
        .ok_or_else(|| anyhow!("Header row with columns {columns:?} not found"))?;

    let mut out = vec![Vec::new(); columns.len()];
    for (r, row) in rows.iter().enumerate().skip(header_row + 1) {
        let cells: Vec<Option<&Cell>> = indices
            .iter()
            .map(|&i| row.get(i).filter(|c| **c != Cell::Empty))
            .collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        for ((col, cell), name) in out.iter_mut().zip(cells).zip(columns) {
            match cell {
                Some(Cell::Number(v)) => col.push(*v),
                Some(Cell::Text(t)) => {
                    anyhow::bail!("Non-numeric value '{t}' in column '{name}' at row {}", r + 1)
                }
                _ => anyhow::bail!("Missing value in column '{name}' at row {}", r + 1),
            }
        }
    }

    anyhow::ensure!(!out[0].is_empty(), "No data rows below the header");
    Ok(out)
}
