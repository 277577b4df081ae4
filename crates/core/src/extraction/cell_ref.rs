//! A1-style cell references.

use std::fmt;
use std::str::FromStr;

use crate::commissions::CommissionError;

/// Zero-based position of a single worksheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    row: u32,
    col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parses `E4`, `AU10`, `$BC$8`. Column letters must precede the row digits.
    pub fn parse(a1: &str) -> Result<Self, CommissionError> {
        let invalid = || CommissionError::InvalidCellReference(a1.to_string());

        let s = a1.trim().replace('$', "").to_ascii_uppercase();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = s.split_at(split);

        let col = letters_to_column_index(letters).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { row: row - 1, col })
    }

    pub const fn row(&self) -> u32 {
        self.row
    }

    pub const fn col(&self) -> u32 {
        self.col
    }

    /// `(row, col)` tuple in the order spreadsheet readers expect.
    pub const fn position(&self) -> (u32, u32) {
        (self.row, self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = CommissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::parse(s)
    }
}

fn column_to_letters(mut col: u32) -> String {
    let mut buf = Vec::new();
    loop {
        buf.push(b'A' + (col % 26) as u8);
        col /= 26;
        if col == 0 {
            break;
        }
        col -= 1;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

fn letters_to_column_index(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for (idx, ch) in s.bytes().enumerate() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?;
        col = col.checked_add((ch - b'A') as u32)?;
        if idx != s.len() - 1 {
            col = col.checked_add(1)?;
        }
    }
    Some(col)
}
