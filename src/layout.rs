//! Resolved table layout and the orientation abstraction.
//!
//! A [`Layout`] pins down where sample identifiers, parameter labels, and
//! data live inside a grid. [`AxisView`] then folds the two table
//! orientations (samples along rows vs along columns) into one set of
//! axis-symmetric accessors, so the matching and aggregation logic is written
//! once instead of as mirrored row/column code paths.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addressing::{cell_to_index, AddressParseError};
use crate::grid::{CellValue, Grid};

/// Which grid axis carries the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Parameters are column headers; each sample is a row.
    ColumnOriented,
    /// Parameters label rows; each sample is a column.
    RowOriented,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown orientation '{value}'")]
pub struct OrientationParseError {
    pub value: String,
}

impl FromStr for Orientation {
    type Err = OrientationParseError;

    /// Accepts the spellings used by the configuration producer, including
    /// the legacy French ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "columns" | "colonnes" | "column_oriented" => Ok(Orientation::ColumnOriented),
            "rows" | "lignes" | "row_oriented" => Ok(Orientation::RowOriented),
            _ => Err(OrientationParseError {
                value: s.to_string(),
            }),
        }
    }
}

/// Resolved zero-based coordinates describing one table's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Row of the first sample identifier (column-oriented) or of the
    /// identifier strip (row-oriented).
    pub sample_id_row: u32,
    /// Column holding sample identifiers (column-oriented).
    pub sample_id_col: u32,
    /// Row holding parameter labels (column-oriented).
    pub param_row: u32,
    /// Column holding parameter labels (row-oriented).
    pub param_col: u32,
    /// First data row.
    pub data_start_row: u32,
    /// First data column.
    pub data_start_col: u32,
    /// Auxiliary named coordinates, passed through untouched.
    #[serde(default)]
    pub extras: HashMap<String, (u32, u32)>,
}

impl Layout {
    /// Build a layout from human-entered cell references, the way the
    /// configuration UI supplies them. Extras whose value is the literal
    /// `"none"` are skipped.
    pub fn from_cells(
        sample_id: &str,
        parameters: &str,
        data_start: &str,
        extras: &HashMap<String, String>,
    ) -> Result<Layout, AddressParseError> {
        let (sample_id_row, sample_id_col) = cell_to_index(sample_id)?;
        let (param_row, param_col) = cell_to_index(parameters)?;
        let (data_start_row, data_start_col) = cell_to_index(data_start)?;

        let mut resolved = HashMap::new();
        for (name, cell) in extras {
            if cell.trim().eq_ignore_ascii_case("none") {
                continue;
            }
            resolved.insert(name.clone(), cell_to_index(cell)?);
        }

        Ok(Layout {
            sample_id_row,
            sample_id_col,
            param_row,
            param_col,
            data_start_row,
            data_start_col,
            extras: resolved,
        })
    }

    /// Check every required coordinate against the grid bounds. Returns the
    /// first offending coordinate as `(name, row, col)`.
    pub fn check_bounds(&self, grid: &Grid) -> Result<(), (&'static str, u32, u32)> {
        let coords = [
            ("sample_id", self.sample_id_row, self.sample_id_col),
            ("parameters", self.param_row, self.param_col),
            ("data_start", self.data_start_row, self.data_start_col),
        ];
        for (name, row, col) in coords {
            if !grid.contains(row, col) {
                return Err((name, row, col));
            }
        }
        Ok(())
    }
}

/// Orientation-neutral view over one grid.
///
/// Sample indices run along the sample axis (grid rows when column-oriented,
/// grid columns when row-oriented). Parameter indices are positions in the
/// label list returned by [`AxisView::param_labels`]: absolute column indices
/// when column-oriented, and offsets from `param_row` when row-oriented,
/// matching the index space the match preview records into descriptors.
#[derive(Debug, Clone, Copy)]
pub struct AxisView<'a> {
    grid: &'a Grid,
    layout: &'a Layout,
    orientation: Orientation,
}

impl<'a> AxisView<'a> {
    pub fn new(grid: &'a Grid, layout: &'a Layout, orientation: Orientation) -> AxisView<'a> {
        AxisView {
            grid,
            layout,
            orientation,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn layout(&self) -> &Layout {
        self.layout
    }

    /// Length of the sample axis.
    pub fn sample_len(&self) -> u32 {
        match self.orientation {
            Orientation::ColumnOriented => self.grid.nrows(),
            Orientation::RowOriented => self.grid.ncols(),
        }
    }

    /// First sample index worth visiting.
    pub fn sample_start(&self) -> u32 {
        match self.orientation {
            Orientation::ColumnOriented => self.layout.sample_id_row,
            Orientation::RowOriented => self.layout.data_start_col,
        }
    }

    /// The identifier cell for one sample.
    pub fn read_sample_id(&self, sample_idx: u32) -> Option<&'a CellValue> {
        let (row, col) = self.sample_id_coords(sample_idx);
        self.grid.get(row, col)
    }

    pub fn sample_id_coords(&self, sample_idx: u32) -> (u32, u32) {
        match self.orientation {
            Orientation::ColumnOriented => (sample_idx, self.layout.sample_id_col),
            Orientation::RowOriented => (self.layout.sample_id_row, sample_idx),
        }
    }

    /// The full parameter-axis label list, rendered to text.
    pub fn param_labels(&self) -> Vec<String> {
        match self.orientation {
            Orientation::ColumnOriented => (0..self.grid.ncols())
                .map(|col| self.render_at(self.layout.param_row, col))
                .collect(),
            Orientation::RowOriented => (self.layout.param_row..self.grid.nrows())
                .map(|row| self.render_at(row, self.layout.param_col))
                .collect(),
        }
    }

    /// Read the value cell at a sample's position and a parameter position.
    /// Parameter positions outside the grid return `None`.
    pub fn read_cell(&self, sample_idx: u32, param_idx: u32) -> Option<&'a CellValue> {
        let (row, col) = self.cell_coords(sample_idx, param_idx);
        self.grid.get(row, col)
    }

    pub fn cell_coords(&self, sample_idx: u32, param_idx: u32) -> (u32, u32) {
        match self.orientation {
            Orientation::ColumnOriented => (sample_idx, param_idx),
            Orientation::RowOriented => (param_idx, sample_idx),
        }
    }

    /// Grid coordinates of the label cell at a parameter position.
    pub fn param_coords(&self, param_idx: u32) -> (u32, u32) {
        match self.orientation {
            Orientation::ColumnOriented => (self.layout.param_row, param_idx),
            Orientation::RowOriented => (param_idx, self.layout.param_col),
        }
    }

    /// The start-of-axis offset applied to aggregate-all candidates when the
    /// row-oriented label list is relative to `param_row`.
    pub fn aggregate_all_offset(&self) -> u32 {
        match self.orientation {
            Orientation::ColumnOriented => 0,
            Orientation::RowOriented => self.layout.param_row,
        }
    }

    fn render_at(&self, row: u32, col: u32) -> String {
        self.grid
            .get(row, col)
            .map(CellValue::render)
            .unwrap_or_default()
    }
}
