//! Item descriptors and their textual encoding.
//!
//! The configuration producer hands extraction targets to the engine as
//! short strings: `"kw"`, `"kw → all"`, `"kw → (12, Toluène)"`, or
//! `"kw → Label"`. That encoding is a stable micro-protocol; this module
//! parses it once, at configuration-load time, into a tagged variant so the
//! resolver never pattern-matches on raw strings.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The arrow separator of the descriptor encoding, with its canonical
/// surrounding spaces.
pub const ARROW: &str = " → ";

/// A disambiguation target on the right-hand side of the arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An explicit `(index, label)` pair recorded during match preview.
    Index { index: u32, label: String },
    /// A label to look up verbatim in the parameter axis label list.
    Label(String),
}

/// One extraction target, parsed from the textual micro-protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDescriptor {
    /// A keyword with no binding; resolution yields the empty string.
    Plain(String),
    /// `kw → all`: probe every recorded match, take the first present value.
    AggregateAll(String),
    /// `kw → target`: a single disambiguated binding.
    Disambiguated { keyword: String, target: Target },
    /// A bare parenthetical reference without an arrow, used by the
    /// spot-check path; resolved only when exactly one match exists.
    BareRef(String),
}

impl ItemDescriptor {
    /// Parse a descriptor string. Parsing is total: every input maps to some
    /// descriptor, and malformed targets degrade to label targets whose
    /// resolution later yields the empty string.
    pub fn parse(text: &str) -> ItemDescriptor {
        let text = text.trim();

        if let Some(arrow_pos) = text.find('→') {
            let keyword = text[..arrow_pos].trim().to_string();
            let target = text[arrow_pos + '→'.len_utf8()..].trim();

            if target == "all" {
                return ItemDescriptor::AggregateAll(keyword);
            }

            if let Some(parsed) = parse_index_target(target) {
                return ItemDescriptor::Disambiguated {
                    keyword,
                    target: parsed,
                };
            }

            return ItemDescriptor::Disambiguated {
                keyword,
                target: Target::Label(target.to_string()),
            };
        }

        if text.contains('(') {
            ItemDescriptor::BareRef(text.to_string())
        } else {
            ItemDescriptor::Plain(text.to_string())
        }
    }

    /// The base keyword this descriptor was declared for.
    pub fn keyword(&self) -> &str {
        match self {
            ItemDescriptor::Plain(kw)
            | ItemDescriptor::AggregateAll(kw)
            | ItemDescriptor::BareRef(kw) => kw,
            ItemDescriptor::Disambiguated { keyword, .. } => keyword,
        }
    }
}

/// `(idx, label)` with a numeric first component; anything else is not an
/// index target.
fn parse_index_target(target: &str) -> Option<Target> {
    let inner = target.strip_prefix('(')?.strip_suffix(')')?;
    let (idx_str, label) = inner.split_once(',')?;
    let index = idx_str.trim().parse::<u32>().ok()?;
    Some(Target::Index {
        index,
        label: label.trim().to_string(),
    })
}

impl fmt::Display for ItemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemDescriptor::Plain(kw) | ItemDescriptor::BareRef(kw) => write!(f, "{kw}"),
            ItemDescriptor::AggregateAll(kw) => write!(f, "{kw}{ARROW}all"),
            ItemDescriptor::Disambiguated { keyword, target } => match target {
                Target::Index { index, label } => {
                    write!(f, "{keyword}{ARROW}({index}, {label})")
                }
                Target::Label(label) => write!(f, "{keyword}{ARROW}{label}"),
            },
        }
    }
}

impl FromStr for ItemDescriptor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ItemDescriptor::parse(s))
    }
}

impl Serialize for ItemDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(|_| DeError::custom("unreachable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keyword() {
        assert_eq!(
            ItemDescriptor::parse("arsenic"),
            ItemDescriptor::Plain("arsenic".into())
        );
    }

    #[test]
    fn aggregate_all_binding() {
        assert_eq!(
            ItemDescriptor::parse("toluene → all"),
            ItemDescriptor::AggregateAll("toluene".into())
        );
        // Missing surrounding spaces still parse.
        assert_eq!(
            ItemDescriptor::parse("toluene →all"),
            ItemDescriptor::AggregateAll("toluene".into())
        );
    }

    #[test]
    fn disambiguated_index_binding() {
        assert_eq!(
            ItemDescriptor::parse("toluene → (68, Toluène)"),
            ItemDescriptor::Disambiguated {
                keyword: "toluene".into(),
                target: Target::Index {
                    index: 68,
                    label: "Toluène".into()
                },
            }
        );
    }

    #[test]
    fn disambiguated_label_binding() {
        assert_eq!(
            ItemDescriptor::parse("plomb → Plomb (mg/kg)"),
            ItemDescriptor::Disambiguated {
                keyword: "plomb".into(),
                target: Target::Label("Plomb (mg/kg)".into()),
            }
        );
    }

    #[test]
    fn malformed_index_degrades_to_label_target() {
        assert_eq!(
            ItemDescriptor::parse("kw → (abc, x)"),
            ItemDescriptor::Disambiguated {
                keyword: "kw".into(),
                target: Target::Label("(abc, x)".into()),
            }
        );
    }

    #[test]
    fn bare_parenthetical_is_a_bare_ref() {
        assert_eq!(
            ItemDescriptor::parse("arsenic (mg/kg)"),
            ItemDescriptor::BareRef("arsenic (mg/kg)".into())
        );
    }

    #[test]
    fn display_round_trips_the_encoding() {
        for text in ["arsenic", "toluene → all", "kw → (3, Label)", "kw → Label"] {
            let descriptor = ItemDescriptor::parse(text);
            assert_eq!(ItemDescriptor::parse(&descriptor.to_string()), descriptor);
        }
    }
}
