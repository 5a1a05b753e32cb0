//! Geochem Extract: keyword-driven extraction of lab results from
//! loosely structured spreadsheet grids.
//!
//! This crate provides functionality for:
//! - Matching user-declared keywords against ambiguous parameter labels
//! - Resolving extraction targets into classified, censored-aware values
//! - Aggregating per-sample results, including user-defined censored-sum groups
//! - Ordering and serializing the result table for export
//!
//! # Quick Start
//!
//! ```ignore
//! use geochem_extract::{aggregate, ExtractConfig, Grid, Orientation, Selection};
//!
//! let grid = Grid::from_rows(rows);
//! let config = ExtractConfig::new(Orientation::ColumnOriented, layout);
//! let table = aggregate(&grid, &config, &selection)?;
//! ```

mod addressing;
mod classify;
mod descriptor;
mod engine;
pub(crate) mod error_codes;
mod export;
mod grid;
mod layout;
mod matcher;
mod normalize;
mod progress;
mod resolver;
mod result;

pub use addressing::{cell_to_index, index_to_cell, AddressParseError};
pub use classify::{classify, is_censored, parse_decimal, CensoredSum, LqSubstitution};
pub use descriptor::{ItemDescriptor, Target, ARROW};
pub use engine::{
    aggregate, aggregate_with_context, binding_suggestions, preview_matches, spot_check,
    ExtractConfig, ExtractError, Group, Selection, SpotCheck,
};
pub use export::{ordered_columns, serialize_export, ExportRow, ExportTable, SAMPLE_ID_HEADER};
pub use grid::{CellValue, Grid};
pub use layout::{AxisView, Layout, Orientation, OrientationParseError};
pub use matcher::{aggregate_key, match_keywords, Match, MatchTable};
pub use normalize::{normalize, tokenize};
pub use progress::{CancelToken, JobContext, NoProgress, ProgressSink};
pub use resolver::{resolve, ResolveContext};
pub use result::{Record, ResultTable};
