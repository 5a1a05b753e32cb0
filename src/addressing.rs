use thiserror::Error;

use crate::error_codes;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "[GEOX_ADDR_001] invalid cell reference '{input}'. Suggestion: use a spreadsheet-style reference such as 'B3'."
)]
pub struct AddressParseError {
    pub input: String,
}

impl AddressParseError {
    pub fn code(&self) -> &'static str {
        error_codes::ADDR_PARSE
    }
}

/// Parse a spreadsheet-style cell reference into zero-based (row, col) indices.
///
/// Letters form a base-26 column number (A=1), digits a 1-indexed row.
/// Letters must precede digits; anything else is rejected.
pub fn cell_to_index(cell: &str) -> Result<(u32, u32), AddressParseError> {
    let err = || AddressParseError {
        input: cell.to_string(),
    };

    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_letter = false;
    let mut saw_digit = false;

    for ch in cell.trim().chars() {
        if ch.is_ascii_alphabetic() {
            if saw_digit {
                // Letters after digits are not allowed.
                return Err(err());
            }
            saw_letter = true;
            let upper = ch.to_ascii_uppercase() as u8;
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add((upper - b'A' + 1) as u32))
                .ok_or_else(err)?;
        } else if ch.is_ascii_digit() {
            saw_digit = true;
            row = row
                .checked_mul(10)
                .and_then(|r| r.checked_add((ch as u8 - b'0') as u32))
                .ok_or_else(err)?;
        } else {
            return Err(err());
        }
    }

    if !saw_letter || !saw_digit || row == 0 || col == 0 {
        return Err(err());
    }

    Ok((row - 1, col - 1))
}

/// Convert zero-based (row, col) indices back to a spreadsheet-style reference.
pub fn index_to_cell(row: u32, col: u32) -> String {
    let mut col_index = col;
    let mut col_label = String::new();

    loop {
        let rem = (col_index % 26) as u8;
        col_label.push((b'A' + rem) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }

    col_label.chars().rev().collect::<String>() + &(row + 1).to_string()
}
