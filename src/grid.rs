//! Grid and cell data structures.
//!
//! This module defines the in-memory representation of one lab result sheet:
//! - [`Grid`]: a dense, rectangular 2D table of untyped cell values
//! - [`CellValue`]: a closed variant over number, text, and blank cells
//!
//! The grid is built once by the caller (typically from an uploaded
//! spreadsheet) and is never mutated by the extraction engine.

use serde::{Deserialize, Serialize};

/// The value held by a single grid cell.
///
/// `Blank` covers empty cells and not-a-number inputs, so classification over
/// cell values is exhaustive and total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Blank,
}

impl CellValue {
    /// Coerce a float into a cell value, mapping NaN to `Blank`.
    pub fn from_number(n: f64) -> CellValue {
        if n.is_nan() {
            CellValue::Blank
        } else {
            CellValue::Number(n)
        }
    }

    pub fn from_text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let CellValue::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// The display form used for labels and classification.
    ///
    /// Numbers use the `f64` Display form, so `8.0` renders as `"8"`.
    pub fn render(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Blank => String::new(),
        }
    }
}

/// A dense, rectangular grid of cell values.
///
/// # Invariants
///
/// `cells.len() == (nrows * ncols) as usize`; storage is row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    nrows: u32,
    ncols: u32,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Build a grid from row vectors, padding short rows with `Blank` so the
    /// result is always rectangular.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Grid {
        let nrows = rows.len() as u32;
        let ncols = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;

        let mut cells = Vec::with_capacity((nrows * ncols) as usize);
        for mut row in rows {
            row.resize(ncols as usize, CellValue::Blank);
            cells.extend(row);
        }

        Grid {
            nrows,
            ncols,
            cells,
        }
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Look up a cell by zero-based coordinates. Out-of-range access returns
    /// `None` rather than panicking.
    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.cells.get((row * self.ncols + col) as usize)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.nrows && col < self.ncols
    }
}
