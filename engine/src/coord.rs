//! FILENAME: engine/src/coord.rs
//! PURPOSE: Conversions between textual cell/range names and internal
//! `Position`s, plus range expansion.
//! CONTEXT: Deliberately NOT ordinary base-26 spreadsheet column naming.
//! The column algebra here treats the *leftmost* character of a column
//! name as its low-order digit: `col_index = Σ digit(name[i]) * 26^i`
//! for `i` counted from the start of the string. This means, for
//! instance, `"B"` and `"BA"` both resolve to the same column index (the
//! trailing `'A'` contributes a zero digit) — the inverse conversion
//! always produces the canonical (shortest) name for an index, so the
//! round trip `name -> index -> name` only holds for such canonical
//! names, not for every string a caller might type in. This is an
//! intentional divergence from the "normal" spreadsheet convention.

use thiserror::Error;

pub const ROWS: u32 = 20;
pub const COLUMNS: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordError {
    #[error("'{0}' is not a well-formed cell or range name")]
    Malformed(String),

    #[error("'{0}' is out of the sheet's bounds")]
    OutOfBounds(String),

    #[error("'{0}' is not a valid horizontal or vertical range")]
    InvalidRange(String),
}

/// A zero-based (row, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Position { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < ROWS && self.col < COLUMNS
    }
}

/// `"n"` <-> `n - 1`.
fn row_name_to_index(s: &str) -> Option<u32> {
    let n: u32 = s.parse().ok()?;
    n.checked_sub(1)
}

fn row_index_to_name(index: u32) -> String {
    (index + 1).to_string()
}

/// `col_index = Σ digit(name[i]) * 26^i`, digit('A') = 0 .. digit('Z') = 25,
/// with `i` counted from the leftmost character.
fn col_name_to_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let mut index: u64 = 0;
    let mut power: u64 = 1;
    for b in s.bytes() {
        let digit = (b - b'A') as u64;
        index += digit * power;
        power *= 26;
    }
    u32::try_from(index).ok()
}

/// Repeatedly emits `index mod 26` as a letter and sets
/// `index = index div 26 - 1`, stopping once the index goes negative.
/// Always produces the canonical (shortest) name for `index`.
fn col_index_to_name(index: u32) -> String {
    let mut idx = index as i64;
    let mut letters = Vec::new();
    loop {
        let rem = (idx % 26) as u8;
        letters.push((b'A' + rem) as char);
        idx = idx / 26 - 1;
        if idx < 0 {
            break;
        }
    }
    letters.into_iter().collect()
}

/// Splits `"AB12"` into its column-letter prefix and digit suffix. Does
/// not validate bounds, only shape: `^[A-Z]+[0-9]+$`.
fn split_cell_name(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_uppercase() {
        i += 1;
    }
    if i == 0 || i == bytes.len() {
        return None;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i != bytes.len() || i == digits_start {
        return None;
    }
    Some((&s[..digits_start], &s[digits_start..]))
}

/// Parses a cell name like `"A1"` or `"AB12"` into a bounds-checked
/// `Position`.
pub fn parse_cell_name(s: &str) -> Result<Position, CoordError> {
    let (col_part, row_part) = split_cell_name(s).ok_or_else(|| CoordError::Malformed(s.to_string()))?;
    let col = col_name_to_index(col_part).ok_or_else(|| CoordError::Malformed(s.to_string()))?;
    let row = row_name_to_index(row_part).ok_or_else(|| CoordError::Malformed(s.to_string()))?;
    let position = Position::new(row, col);
    if !position.in_bounds() {
        return Err(CoordError::OutOfBounds(s.to_string()));
    }
    Ok(position)
}

/// Renders a `Position` back to its canonical cell name.
pub fn position_to_name(position: Position) -> String {
    format!(
        "{}{}",
        col_index_to_name(position.col),
        row_index_to_name(position.row)
    )
}

/// Expands `"A1:A4"`-shaped range names into the inclusive set of
/// positions along the shared row or column. Equal endpoints (a
/// single-cell range) are accepted.
pub fn expand_range(s: &str) -> Result<Vec<Position>, CoordError> {
    let (start_name, end_name) = s
        .split_once(':')
        .ok_or_else(|| CoordError::Malformed(s.to_string()))?;
    let start = parse_cell_name(start_name)?;
    let end = parse_cell_name(end_name)?;

    if start.row == end.row && start.col <= end.col {
        Ok((start.col..=end.col).map(|col| Position::new(start.row, col)).collect())
    } else if start.col == end.col && start.row <= end.row {
        Ok((start.row..=end.row).map(|row| Position::new(row, start.col)).collect())
    } else {
        Err(CoordError::InvalidRange(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_cell_names() {
        assert_eq!(parse_cell_name("A1").unwrap(), Position::new(0, 0));
        assert_eq!(parse_cell_name("B2").unwrap(), Position::new(1, 1));
    }

    #[test]
    fn column_digit_is_low_order_on_the_left() {
        // digit('B') = 1 * 26^0 = 1, so "B1" and "B" alone both resolve to column 1.
        assert_eq!(parse_cell_name("B1").unwrap().col, 1);
        // "BA1": digit('B')=1*1 + digit('A')=0*26 = 1, same column as "B1".
        assert_eq!(parse_cell_name("BA1").unwrap().col, 1);
    }

    #[test]
    fn canonical_name_round_trips() {
        for col in 0..COLUMNS {
            for row in 0..ROWS {
                let position = Position::new(row, col);
                let name = position_to_name(position);
                assert_eq!(parse_cell_name(&name).unwrap(), position);
            }
        }
    }

    #[test]
    fn out_of_bounds_name_is_rejected() {
        assert_eq!(
            parse_cell_name("ZZ9999"),
            Err(CoordError::OutOfBounds("ZZ9999".to_string()))
        );
    }

    #[test]
    fn malformed_name_is_rejected() {
        assert!(parse_cell_name("1A").is_err());
        assert!(parse_cell_name("A").is_err());
        assert!(parse_cell_name("").is_err());
    }

    #[test]
    fn expands_horizontal_and_vertical_ranges() {
        assert_eq!(
            expand_range("A1:C1").unwrap(),
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]
        );
        assert_eq!(
            expand_range("A1:A3").unwrap(),
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
        );
    }

    #[test]
    fn single_cell_range_is_accepted() {
        assert_eq!(expand_range("A1:A1").unwrap(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn diagonal_range_is_rejected() {
        assert_eq!(
            expand_range("A1:B2"),
            Err(CoordError::InvalidRange("A1:B2".to_string()))
        );
    }
}
