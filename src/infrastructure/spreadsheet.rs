//! Spreadsheet Decoding
//!
//! Reads quantity-patch rows out of uploaded workbooks (xlsx, xls, ods).
//! The first non-empty row is the header; columns are found by name so
//! their order in the sheet does not matter.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::domain::Size;

const ARTICLE: &str = "article";
const NAME: &str = "name";
const QUANTITY: &str = "quantity";
const SIZE: &str = "size";

/// One decoded spreadsheet line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityRow {
    /// 1-based row number in the sheet
    pub line: usize,
    pub article: i64,
    pub name: Option<String>,
    /// Delta added to the stored quantity
    pub quantity: i64,
    pub size: Size,
}

/// Spreadsheet decoding errors
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("Unreadable workbook: {0}")]
    Unreadable(String),

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Sheet has no header row")]
    MissingHeader,

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {line}: invalid {column} '{value}'")]
    InvalidCell {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Column positions resolved from the header row.
struct Columns {
    article: usize,
    name: Option<usize>,
    quantity: usize,
    size: usize,
}

impl Columns {
    fn from_header(header: &[Data]) -> Result<Self, SpreadsheetError> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|cell| cell_text(cell).is_some_and(|t| t.eq_ignore_ascii_case(wanted)))
        };

        Ok(Self {
            article: find(ARTICLE).ok_or(SpreadsheetError::MissingColumn(ARTICLE))?,
            name: find(NAME),
            quantity: find(QUANTITY).ok_or(SpreadsheetError::MissingColumn(QUANTITY))?,
            size: find(SIZE).ok_or(SpreadsheetError::MissingColumn(SIZE))?,
        })
    }
}

/// Decode the first sheet of a workbook into quantity rows.
pub fn read_quantity_rows(bytes: &[u8]) -> Result<Vec<QuantityRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoSheets)?
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    rows_from_range(&range)
}

fn rows_from_range(range: &Range<Data>) -> Result<Vec<QuantityRow>, SpreadsheetError> {
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut lines = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| (first_line + offset, cells))
        .filter(|(_, cells)| !is_blank(cells));

    let (_, header) = lines.next().ok_or(SpreadsheetError::MissingHeader)?;
    let columns = Columns::from_header(header)?;

    lines
        .map(|(line, cells)| {
            let cell = |idx: usize| cells.get(idx).unwrap_or(&Data::Empty);

            let article = parse_integer(cell(columns.article))
                .ok_or_else(|| invalid(line, ARTICLE, cell(columns.article)))?;
            let quantity = parse_integer(cell(columns.quantity))
                .ok_or_else(|| invalid(line, QUANTITY, cell(columns.quantity)))?;
            let size = parse_size(cell(columns.size))
                .ok_or_else(|| invalid(line, SIZE, cell(columns.size)))?;
            let name = columns
                .name
                .and_then(|idx| cell_text(cell(idx)))
                .filter(|n| !n.is_empty());

            Ok(QuantityRow {
                line,
                article,
                name,
                quantity,
                size,
            })
        })
        .collect()
}

fn is_blank(cells: &[Data]) -> bool {
    cells.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn parse_integer(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_size(cell: &Data) -> Option<Size> {
    match cell {
        Data::String(s) => s.parse().ok(),
        other => parse_integer(other)
            .and_then(|ml| u32::try_from(ml).ok())
            .and_then(Size::from_ml),
    }
}

fn invalid(line: usize, column: &'static str, cell: &Data) -> SpreadsheetError {
    SpreadsheetError::InvalidCell {
        line,
        column,
        value: cell_text(cell).unwrap_or_else(|| format!("{:?}", cell)),
    }
}
