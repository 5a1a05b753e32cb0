//! Stable error code constants.
//!
//! Every error surfaced by the crate carries one of these codes in its
//! message so callers and logs can key on them without parsing prose.

pub const ADDR_PARSE: &str = "GEOX_ADDR_001";

pub const EXTRACT_INVALID_ORIENTATION: &str = "GEOX_EXTRACT_001";
pub const EXTRACT_MISSING_LAYOUT: &str = "GEOX_EXTRACT_002";
pub const EXTRACT_UNREADABLE_GRID: &str = "GEOX_EXTRACT_003";
pub const EXTRACT_CANCELLED: &str = "GEOX_EXTRACT_004";
