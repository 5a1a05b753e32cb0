//! Resolution of one item descriptor against the grid.
//!
//! `resolve` is the per-item half of the extraction engine: given a
//! descriptor and a sample's axis index it produces exactly one classified
//! value. Every recoverable failure (label miss, out-of-range index,
//! ambiguous bare reference) degrades to the empty string; resolution never
//! aborts an aggregation pass.

use std::collections::HashMap;

use crate::classify::classify;
use crate::descriptor::{ItemDescriptor, Target};
use crate::layout::AxisView;
use crate::matcher::{aggregate_key, Match};

/// Shared inputs for resolving items against one grid.
pub struct ResolveContext<'a> {
    pub view: &'a AxisView<'a>,
    /// The full ordered parameter-axis label list.
    pub labels: &'a [String],
    /// Match lists keyed by the descriptor's lookup text: the synthetic
    /// `"kw → all"` key for aggregate-all bindings, the raw text for bare
    /// references.
    pub matches: &'a HashMap<String, Vec<Match>>,
    /// Whether aggregate-all candidates are offset by the parameter axis
    /// start (see `ExtractConfig::offset_row_oriented_all`).
    pub apply_all_offset: bool,
}

/// Resolve one item descriptor at one sample position into a classified
/// value. Evaluation follows a fixed priority: aggregate-all, disambiguated
/// reference, plain keyword, bare reference.
pub fn resolve(item: &ItemDescriptor, sample_idx: u32, ctx: &ResolveContext<'_>) -> String {
    match item {
        ItemDescriptor::AggregateAll(keyword) => resolve_aggregate_all(keyword, sample_idx, ctx),
        ItemDescriptor::Disambiguated { keyword, target } => {
            resolve_disambiguated(keyword, target, sample_idx, ctx)
        }
        ItemDescriptor::Plain(_) => String::new(),
        ItemDescriptor::BareRef(text) => resolve_bare_ref(text, sample_idx, ctx),
    }
}

/// Probe every recorded match in ascending order and classify the first
/// present, non-blank cell.
fn resolve_aggregate_all(keyword: &str, sample_idx: u32, ctx: &ResolveContext<'_>) -> String {
    let key = aggregate_key(keyword);
    let Some(candidates) = ctx.matches.get(&key) else {
        log::debug!("no aggregate matches recorded for '{keyword}'");
        return String::new();
    };

    let offset = if ctx.apply_all_offset {
        ctx.view.aggregate_all_offset()
    } else {
        0
    };

    for candidate in candidates {
        let param_idx = candidate.index + offset;
        match ctx.view.read_cell(sample_idx, param_idx) {
            Some(cell) if !cell.render().trim().is_empty() => return classify(cell),
            Some(_) => {}
            None => {
                log::debug!(
                    "aggregate candidate '{}' at {param_idx} is out of range",
                    candidate.label
                );
            }
        }
    }

    String::new()
}

fn resolve_disambiguated(
    keyword: &str,
    target: &Target,
    sample_idx: u32,
    ctx: &ResolveContext<'_>,
) -> String {
    let param_idx = match target {
        Target::Index { index, .. } => *index,
        Target::Label(name) => match ctx.labels.iter().position(|l| l == name) {
            Some(pos) => pos as u32,
            None => {
                log::debug!("label '{name}' not found for keyword '{keyword}'");
                return String::new();
            }
        },
    };

    read_classified(sample_idx, param_idx, ctx)
}

/// A bare reference resolves only when exactly one candidate exists;
/// ambiguity is never silently guessed.
fn resolve_bare_ref(text: &str, sample_idx: u32, ctx: &ResolveContext<'_>) -> String {
    match ctx.matches.get(text).map(Vec::as_slice) {
        Some([only]) => read_classified(sample_idx, only.index, ctx),
        other => {
            log::debug!(
                "bare reference '{text}' skipped: {} candidates",
                other.map_or(0, <[Match]>::len)
            );
            String::new()
        }
    }
}

fn read_classified(sample_idx: u32, param_idx: u32, ctx: &ResolveContext<'_>) -> String {
    match ctx.view.read_cell(sample_idx, param_idx) {
        Some(cell) => classify(cell),
        None => String::new(),
    }
}
