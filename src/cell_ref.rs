//! Utilities for parsing and formatting A1 and R1C1 cell references.
//!
//! Tuples returned here are `(col, row)`, both 0-indexed. R1C1 strings
//! are 1-based on the wire (`R1C1` is the top-left cell).

/// Number of rows in an XLSX worksheet.
pub const MAX_ROWS: u32 = 1_048_576;

/// Number of columns in an XLSX worksheet.
pub const MAX_COLS: u32 = 16_384;

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
///
/// `$` markers are skipped, so absolute references parse too. Letters must
/// come before digits, and row 0 is rejected.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for b in cell_ref.trim().bytes() {
        match b {
            b'$' => {}
            b'a'..=b'z' | b'A'..=b'Z' if !saw_row => {
                let upper = b.to_ascii_uppercase();
                col = col.checked_mul(26)?.checked_add(u32::from(upper - b'A') + 1)?;
                saw_col = true;
            }
            b'0'..=b'9' => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    if !saw_col || !saw_row || col == 0 || row == 0 {
        return None;
    }

    Some((col - 1, row - 1))
}

/// Parse a cell range like "A1:B10" or "A1" into (start_row, start_col, end_row, end_col).
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_col, start_row) = parse_cell_ref(start)?;
        let (end_col, end_row) = parse_cell_ref(end)?;
        Some((start_row, start_col, end_row, end_col))
    } else {
        let (start_col, start_row) = parse_cell_ref(range)?;
        Some((start_row, start_col, start_row, start_col))
    }
}

/// Parse an absolute R1C1 reference like "R5C3" into (col, row), 0-indexed.
///
/// Strict: both parts are required, 1-based and non-zero. Relative forms
/// (`R[1]C[-1]`) are not accepted.
pub fn parse_r1c1(reference: &str) -> Option<(u32, u32)> {
    let rest = reference.trim();
    let rest = rest.strip_prefix('R').or_else(|| rest.strip_prefix('r'))?;
    let split = rest.find(['C', 'c'])?;
    let (row_part, col_part) = rest.split_at(split);
    let col_part = col_part.get(1..)?;

    let row = parse_index(row_part)?;
    let col = parse_index(col_part)?;
    Some((col - 1, row - 1))
}

/// Parse a 1-based decimal index, rejecting zero, signs and empty input.
fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

/// Format 0-indexed coordinates as an R1C1 reference ("R1C1" for (0, 0)).
pub fn format_r1c1(row: u32, col: u32) -> String {
    format!("R{}C{}", u64::from(row) + 1, u64::from(col) + 1)
}

/// Format 0-indexed coordinates as an A1 reference ("A1" for (0, 0)).
pub fn format_a1(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

/// Convert a 0-based column index to Excel column letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + digit));
        n /= 26;
    }
    result
}

/// Whether 0-indexed coordinates fall inside the worksheet grid.
pub fn in_bounds(row: u32, col: u32) -> bool {
    row < MAX_ROWS && col < MAX_COLS
}
