//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use geochem_extract::{
    CellValue, ExtractConfig, Grid, ItemDescriptor, Layout, Orientation, Selection,
};

pub fn text(s: &str) -> CellValue {
    CellValue::from_text(s)
}

pub fn num(n: f64) -> CellValue {
    CellValue::from_number(n)
}

pub fn blank() -> CellValue {
    CellValue::Blank
}

/// The canonical column-oriented fixture: parameter labels across row 0,
/// sample identifiers down column 0, one sample per row.
pub fn geochem_grid() -> Grid {
    Grid::from_rows(vec![
        vec![text("Code"), text("Arsenic (mg/kg)"), text("Lead (mg/kg)")],
        vec![text("S1"), num(5.0), text("<0.1")],
        vec![text("S2"), text("n.d."), num(2.0)],
    ])
}

pub fn column_layout() -> Layout {
    Layout {
        sample_id_row: 1,
        sample_id_col: 0,
        param_row: 0,
        param_col: 0,
        data_start_row: 1,
        data_start_col: 1,
        extras: HashMap::new(),
    }
}

pub fn column_config() -> ExtractConfig {
    ExtractConfig::new(Orientation::ColumnOriented, column_layout())
}

/// The same table transposed: labels down column 0, one sample per column.
pub fn transposed_grid() -> Grid {
    Grid::from_rows(vec![
        vec![text("Code"), text("S1"), text("S2")],
        vec![text("Arsenic (mg/kg)"), num(5.0), text("n.d.")],
        vec![text("Lead (mg/kg)"), text("<0.1"), num(2.0)],
    ])
}

pub fn row_layout() -> Layout {
    Layout {
        sample_id_row: 0,
        sample_id_col: 0,
        param_row: 1,
        param_col: 0,
        data_start_row: 1,
        data_start_col: 1,
        extras: HashMap::new(),
    }
}

pub fn row_config() -> ExtractConfig {
    ExtractConfig::new(Orientation::RowOriented, row_layout())
}

pub fn keywords(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

pub fn selection(items: &[&str]) -> Selection {
    Selection {
        keywords: items.iter().map(|s| ItemDescriptor::parse(s)).collect(),
        groups: Vec::new(),
    }
}
