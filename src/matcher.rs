//! Keyword-to-label matching over the parameter axis.
//!
//! A keyword matches a label when every keyword token appears as a whole
//! token of the label. This is containment over token sets, not substring
//! search: "as" does not match "arsenic", but "arsenic" matches
//! "Arsenic (mg/kg)". A keyword matching more than one label index is
//! flagged ambiguous so the caller can disambiguate or bind it to `→ all`.

use serde::{Deserialize, Serialize};

use crate::descriptor::ARROW;
use crate::normalize::tokenize;

/// One label matched by a keyword: position along the parameter axis plus
/// the label text as read from the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub index: u32,
    pub label: String,
}

/// Match results for a set of keywords, in keyword input order.
///
/// Matches for one keyword are strictly ascending by label index; the
/// aggregate-all binding relies on that order to pick the first present
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchTable {
    entries: Vec<(String, Vec<Match>)>,
}

impl MatchTable {
    pub fn get(&self, keyword: &str) -> Option<&[Match]> {
        self.entries
            .iter()
            .find(|(kw, _)| kw == keyword)
            .map(|(_, matches)| matches.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Match])> {
        self.entries
            .iter()
            .map(|(kw, matches)| (kw.as_str(), matches.as_slice()))
    }

    pub fn is_ambiguous(&self, keyword: &str) -> bool {
        self.get(keyword).map_or(false, |m| m.len() > 1)
    }

    /// Keywords with more than one recorded match, in input order.
    pub fn ambiguous(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, matches)| matches.len() > 1)
            .map(|(kw, _)| kw.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The lookup key under which a keyword's aggregate-all matches are stored.
///
/// The textual form is a stable contract with the configuration producer.
pub fn aggregate_key(keyword: &str) -> String {
    format!("{keyword}{ARROW}all")
}

/// Match every keyword against every label.
///
/// Labels containing `%` are never matchable (percentage columns). A label
/// text appearing at several indices is recorded once per distinct index.
pub fn match_keywords(labels: &[String], keywords: &[String]) -> MatchTable {
    let mut entries: Vec<(String, Vec<Match>)> = keywords
        .iter()
        .map(|kw| (kw.clone(), Vec::new()))
        .collect();

    let keyword_tokens: Vec<Vec<String>> = keywords.iter().map(|kw| tokenize(kw)).collect();

    for (index, label) in labels.iter().enumerate() {
        if label.contains('%') {
            continue;
        }
        let label_tokens = tokenize(label);

        for (entry, tokens) in entries.iter_mut().zip(&keyword_tokens) {
            if tokens.iter().all(|tok| label_tokens.contains(tok)) {
                let m = Match {
                    index: index as u32,
                    label: label.clone(),
                };
                if !entry.1.contains(&m) {
                    entry.1.push(m);
                }
            }
        }
    }

    MatchTable { entries }
}
