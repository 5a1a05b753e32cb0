//! The aggregation engine: one pass over the sample axis.
//!
//! `aggregate` is the top-level entry point behind every extraction, preview,
//! and export operation. It validates the request, builds the aggregate-all
//! match table once, then walks the sample axis resolving every group member
//! and selected keyword. Per-item failures degrade to empty strings and
//! never abort the pass; only an unusable request (bad orientation, layout
//! outside the grid, empty grid) or cancellation is fatal.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addressing::index_to_cell;
use crate::classify::{CensoredSum, LqSubstitution};
use crate::descriptor::ItemDescriptor;
use crate::error_codes;
use crate::grid::{CellValue, Grid};
use crate::layout::{AxisView, Layout, Orientation, OrientationParseError};
use crate::matcher::{aggregate_key, match_keywords, Match, MatchTable};
use crate::progress::JobContext;
use crate::resolver::{resolve, ResolveContext};
use crate::result::{Record, ResultTable};

/// Errors that abort an entire extraction request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    #[error(
        "[GEOX_EXTRACT_001] invalid orientation '{value}'. Suggestion: use 'columns' or 'rows'."
    )]
    InvalidOrientation { value: String },

    #[error(
        "[GEOX_EXTRACT_002] layout coordinate '{coordinate}' ({reference}) lies outside the grid. Suggestion: check the configured cell references against the sheet."
    )]
    MissingLayout {
        coordinate: &'static str,
        reference: String,
    },

    #[error(
        "[GEOX_EXTRACT_003] grid is empty or ill-shaped. Suggestion: check that the selected sheet contains data."
    )]
    UnreadableGrid,

    #[error("[GEOX_EXTRACT_004] extraction cancelled by the caller.")]
    Cancelled,
}

impl ExtractError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::InvalidOrientation { .. } => error_codes::EXTRACT_INVALID_ORIENTATION,
            ExtractError::MissingLayout { .. } => error_codes::EXTRACT_MISSING_LAYOUT,
            ExtractError::UnreadableGrid => error_codes::EXTRACT_UNREADABLE_GRID,
            ExtractError::Cancelled => error_codes::EXTRACT_CANCELLED,
        }
    }
}

impl From<OrientationParseError> for ExtractError {
    fn from(err: OrientationParseError) -> ExtractError {
        ExtractError::InvalidOrientation { value: err.value }
    }
}

/// Per-request extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub orientation: Orientation,
    pub layout: Layout,
    #[serde(default)]
    pub lq_substitution: LqSubstitution,
    /// Offset aggregate-all candidates by `param_row` under row orientation.
    /// The row-oriented label list is relative to `param_row`, so this
    /// converts recorded match indices back to grid rows. Disambiguated
    /// `(index, label)` bindings are always used as given.
    #[serde(default = "default_offset_all")]
    pub offset_row_oriented_all: bool,
}

fn default_offset_all() -> bool {
    true
}

impl ExtractConfig {
    pub fn new(orientation: Orientation, layout: Layout) -> ExtractConfig {
        ExtractConfig {
            orientation,
            layout,
            lq_substitution: LqSubstitution::Keep,
            offset_row_oriented_all: true,
        }
    }
}

/// A user-named group whose member values combine under the censored-sum
/// policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: Vec<ItemDescriptor>,
}

/// The user's selection: keywords to extract plus groups, in declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub keywords: Vec<ItemDescriptor>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Run a full aggregation pass with no progress reporting or cancellation.
pub fn aggregate(
    grid: &Grid,
    config: &ExtractConfig,
    selection: &Selection,
) -> Result<ResultTable, ExtractError> {
    aggregate_with_context(grid, config, selection, JobContext::detached())
}

/// Run a full aggregation pass under a job context. Cancellation is checked
/// between samples; progress is reported once per sample over the `samples`
/// phase.
pub fn aggregate_with_context(
    grid: &Grid,
    config: &ExtractConfig,
    selection: &Selection,
    job: JobContext<'_>,
) -> Result<ResultTable, ExtractError> {
    let view = validated_view(grid, config)?;
    let labels = view.param_labels();

    let match_index = build_match_index(&labels, selection);
    let ctx = ResolveContext {
        view: &view,
        labels: &labels,
        matches: &match_index,
        apply_all_offset: config.offset_row_oriented_all,
    };

    let start = view.sample_start();
    let len = view.sample_len();
    let span = len.saturating_sub(start).max(1);

    let mut table = ResultTable::new();

    for sample_idx in start..len {
        if job.cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }
        job.progress
            .on_progress("samples", (sample_idx - start) as f32 / span as f32);

        let Some(sample_id) = sample_identifier(&view, sample_idx) else {
            continue;
        };

        let mut record = Record::new();

        for group in &selection.groups {
            let mut acc = CensoredSum::new();
            for member in &group.members {
                let bound = bind_plain(member, &match_index);
                let value = resolve(&bound, sample_idx, &ctx);
                acc.push(&value);
                record.insert(member.to_string(), value);
            }
            record.insert(&group.name, config.lq_substitution.apply(acc.finish()));
        }

        for item in &selection.keywords {
            let name = item.to_string();
            if selection.groups.iter().any(|g| g.name == name) {
                continue;
            }
            let bound = bind_plain(item, &match_index);
            let value = resolve(&bound, sample_idx, &ctx);
            record.insert(name, config.lq_substitution.apply(value));
        }

        table.insert(sample_id, record);
    }

    job.progress.on_progress("samples", 1.0);
    log::debug!("aggregation produced {} sample records", table.len());
    Ok(table)
}

/// Match the given keywords against the grid's parameter axis, for the
/// pre-extraction preview step.
pub fn preview_matches(
    grid: &Grid,
    config: &ExtractConfig,
    keywords: &[String],
) -> Result<MatchTable, ExtractError> {
    let view = validated_view(grid, config)?;
    let labels = view.param_labels();
    Ok(match_keywords(&labels, keywords))
}

/// Turn a match table into the descriptor list offered back to the user:
/// `→ all` bindings for ambiguous keywords (alphabetical), one disambiguated
/// binding per recorded match, and the plain keyword when nothing matched.
pub fn binding_suggestions(table: &MatchTable) -> Vec<ItemDescriptor> {
    let mut suggestions = Vec::new();

    let mut ambiguous = table.ambiguous();
    ambiguous.sort_unstable();
    for kw in ambiguous {
        suggestions.push(ItemDescriptor::AggregateAll(kw.to_string()));
    }

    for (kw, matches) in table.iter() {
        for m in matches {
            suggestions.push(ItemDescriptor::parse(&format!(
                "{kw} → ({}, {})",
                m.index, m.label
            )));
        }
    }

    for (kw, matches) in table.iter() {
        if matches.is_empty() {
            suggestions.push(ItemDescriptor::Plain(kw.to_string()));
        }
    }

    suggestions
}

/// One randomly drawn verification point, with the grid references a caller
/// needs to highlight the cells involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotCheck {
    pub sample_id: String,
    pub keyword: String,
    pub label: String,
    /// The classified value, as the aggregation pass would report it.
    pub value: String,
    /// The raw cell text, unclassified.
    pub raw_value: String,
    pub sample_id_cell: String,
    pub label_cell: String,
    pub value_cell: String,
}

/// Draw one matched binding and one sample at random and resolve it, purely
/// for user sanity-checking. Returns `None` when there is nothing to draw
/// (no matches, or no samples past the identifier strip).
pub fn spot_check(
    grid: &Grid,
    config: &ExtractConfig,
    table: &MatchTable,
    rng: &mut impl Rng,
) -> Result<Option<SpotCheck>, ExtractError> {
    let view = validated_view(grid, config)?;

    let bindings: Vec<(&str, &Match)> = table
        .iter()
        .flat_map(|(kw, matches)| matches.iter().map(move |m| (kw, m)))
        .collect();
    if bindings.is_empty() {
        return Ok(None);
    }

    let first_sample = view.sample_start() + 1;
    if first_sample >= view.sample_len() {
        return Ok(None);
    }

    let (keyword, drawn) = bindings[rng.gen_range(0..bindings.len())];
    let sample_idx = rng.gen_range(first_sample..view.sample_len());

    let labels = view.param_labels();
    let matches = HashMap::new();
    let ctx = ResolveContext {
        view: &view,
        labels: &labels,
        matches: &matches,
        apply_all_offset: config.offset_row_oriented_all,
    };
    let item = ItemDescriptor::parse(&format!("{keyword} → ({}, {})", drawn.index, drawn.label));
    let value = resolve(&item, sample_idx, &ctx);

    let (id_row, id_col) = view.sample_id_coords(sample_idx);
    let (label_row, label_col) = view.param_coords(drawn.index);
    let (val_row, val_col) = view.cell_coords(sample_idx, drawn.index);

    let raw_value = grid
        .get(val_row, val_col)
        .map(CellValue::render)
        .unwrap_or_default();
    let sample_id = view
        .read_sample_id(sample_idx)
        .map(CellValue::render)
        .unwrap_or_default();

    Ok(Some(SpotCheck {
        sample_id,
        keyword: keyword.to_string(),
        label: drawn.label.clone(),
        value,
        raw_value,
        sample_id_cell: index_to_cell(id_row, id_col),
        label_cell: index_to_cell(label_row, label_col),
        value_cell: index_to_cell(val_row, val_col),
    }))
}

fn validated_view<'a>(
    grid: &'a Grid,
    config: &'a ExtractConfig,
) -> Result<AxisView<'a>, ExtractError> {
    if grid.is_empty() {
        return Err(ExtractError::UnreadableGrid);
    }
    config
        .layout
        .check_bounds(grid)
        .map_err(|(coordinate, row, col)| ExtractError::MissingLayout {
            coordinate,
            reference: index_to_cell(row, col),
        })?;
    Ok(AxisView::new(grid, &config.layout, config.orientation))
}

/// Run the matcher once over every base keyword the selection mentions
/// (selection items and group members alike, first-seen order). Aggregate-all
/// bindings are keyed by the synthetic `"kw → all"` form; plain and bare
/// keywords by their raw text.
fn build_match_index(labels: &[String], selection: &Selection) -> HashMap<String, Vec<Match>> {
    let mut aggregate_keywords: Vec<String> = Vec::new();
    let mut plain_keywords: Vec<String> = Vec::new();

    let items = selection
        .keywords
        .iter()
        .chain(selection.groups.iter().flat_map(|g| g.members.iter()));
    for item in items {
        match item {
            ItemDescriptor::AggregateAll(kw) => {
                if !aggregate_keywords.contains(kw) {
                    aggregate_keywords.push(kw.clone());
                }
            }
            ItemDescriptor::Plain(kw) | ItemDescriptor::BareRef(kw) => {
                if !plain_keywords.contains(kw) {
                    plain_keywords.push(kw.clone());
                }
            }
            ItemDescriptor::Disambiguated { .. } => {}
        }
    }

    let mut index = HashMap::new();
    for (kw, matches) in match_keywords(labels, &aggregate_keywords).iter() {
        index.insert(aggregate_key(kw), matches.to_vec());
    }
    for (kw, matches) in match_keywords(labels, &plain_keywords).iter() {
        // Both key forms, so a single-match plain keyword can be promoted to
        // its aggregate binding and bare references can look up raw text.
        index.insert(aggregate_key(kw), matches.to_vec());
        index.insert(kw.to_string(), matches.to_vec());
    }
    index
}

/// Promote a plain keyword with exactly one recorded match to an aggregate
/// binding over that single candidate. The matcher runs once before the
/// pass, so an unambiguous keyword resolves without the user spelling out
/// the binding; zero or multiple matches leave the keyword plain and it
/// degrades to the empty string (ambiguity is never silently guessed).
fn bind_plain(item: &ItemDescriptor, index: &HashMap<String, Vec<Match>>) -> ItemDescriptor {
    if let ItemDescriptor::Plain(kw) = item {
        if let Some([_]) = index.get(kw).map(Vec::as_slice) {
            return ItemDescriptor::AggregateAll(kw.clone());
        }
    }
    item.clone()
}

/// The sample identifier must be non-blank text; anything else skips the
/// sample.
fn sample_identifier(view: &AxisView<'_>, sample_idx: u32) -> Option<String> {
    let text = view.read_sample_id(sample_idx)?.as_text()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_keywords;

    #[test]
    fn suggestions_cover_ambiguous_matched_and_unmatched() {
        let labels = vec![
            "plomb total".to_string(),
            "plomb lixiviat".to_string(),
            "cadmium".to_string(),
        ];
        let keywords = vec![
            "plomb".to_string(),
            "cadmium".to_string(),
            "zinc".to_string(),
        ];
        let table = match_keywords(&labels, &keywords);

        let rendered: Vec<String> = binding_suggestions(&table)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "plomb → all",
                "plomb → (0, plomb total)",
                "plomb → (1, plomb lixiviat)",
                "cadmium → (2, cadmium)",
                "zinc",
            ]
        );
    }
}
