//! Censored-value classification and the group sum policy.
//!
//! Lab sheets report below-detection-limit measurements in several spellings
//! (`<0.05`, `n.d.`, `-`). Classification maps every raw cell onto a small
//! textual vocabulary: the empty string for missing analyses, `<LQ`-prefixed
//! forms for censored values, and the trimmed original text otherwise.

use serde::{Deserialize, Serialize};

use crate::grid::CellValue;

/// Spellings meaning "not detected", compared case-insensitively.
const NOT_DETECTED: [&str; 6] = ["n.d.", "n.d", "nd", "-", "n.d,", "n.d.."];

/// What to emit for censored terminal results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LqSubstitution {
    /// Keep the textual `<LQ` forms.
    #[default]
    Keep,
    /// Replace any censored terminal result with the numeric sentinel `-1`.
    MinusOne,
}

impl LqSubstitution {
    /// Apply the substitution to an already classified value.
    pub fn apply(&self, classified: String) -> String {
        match self {
            LqSubstitution::Keep => classified,
            LqSubstitution::MinusOne => {
                if is_censored(&classified) {
                    "-1".to_string()
                } else {
                    classified
                }
            }
        }
    }
}

/// Classify a raw cell under censored-value semantics.
///
/// Blank → `""`. Text starting with `<` → `"<LQ (text)"`. A not-detected
/// spelling → `"<LQ"`. Anything else passes through trimmed and unmodified;
/// decimal-comma numbers stay text.
pub fn classify(cell: &CellValue) -> String {
    if cell.is_blank() {
        return String::new();
    }

    let rendered = cell.render();
    let trimmed = rendered.trim();

    if trimmed.starts_with('<') {
        return format!("<LQ ({trimmed})");
    }

    let lowered = trimmed.to_lowercase();
    if NOT_DETECTED.contains(&lowered.as_str()) {
        return "<LQ".to_string();
    }

    trimmed.to_string()
}

/// Whether a classified value is censored: starts with `<` or contains `lq`
/// in any casing.
pub fn is_censored(classified: &str) -> bool {
    let lowered = classified.trim().to_lowercase();
    lowered.starts_with('<') || lowered.contains("lq")
}

/// Parse a classified value as a number, accepting a decimal comma.
pub fn parse_decimal(classified: &str) -> Option<f64> {
    classified.trim().replace(',', ".").parse::<f64>().ok()
}

/// Accumulator implementing the group policy over classified member values.
///
/// Numeric members sum. Censored members never join the sum but are
/// remembered, so an all-censored group still reports `<LQ` rather than
/// nothing. Unparseable non-censored members drop silently.
#[derive(Debug, Default)]
pub struct CensoredSum {
    sum: f64,
    numeric_seen: bool,
    censored_seen: bool,
}

impl CensoredSum {
    pub fn new() -> CensoredSum {
        CensoredSum::default()
    }

    pub fn push(&mut self, classified: &str) {
        if is_censored(classified) {
            self.censored_seen = true;
            return;
        }
        if let Some(n) = parse_decimal(classified) {
            self.sum += n;
            self.numeric_seen = true;
        }
    }

    /// The group's terminal value: the classified sum when any member was
    /// numeric, the plain `<LQ` token when only censored members were seen,
    /// and the empty string otherwise.
    pub fn finish(self) -> String {
        if self.numeric_seen {
            classify(&CellValue::from_number(self.sum))
        } else if self.censored_seen {
            "<LQ".to_string()
        } else {
            String::new()
        }
    }
}
