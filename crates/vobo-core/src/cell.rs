use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Zero-based cell position, rendered in spreadsheet notation (`D12`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid cell reference: {0}")]
pub struct ParseCellRefError(pub String);

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Column letters for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
    pub fn column_letters(col: usize) -> String {
        let mut n = col + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = ParseCellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let split = t.find(|c: char| c.is_ascii_digit()).ok_or_else(|| ParseCellRefError(s.to_string()))?;
        let (letters, digits) = t.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ParseCellRefError(s.to_string()));
        }
        let row: usize = digits.parse().map_err(|_| ParseCellRefError(s.to_string()))?;
        if row == 0 {
            return Err(ParseCellRefError(s.to_string()));
        }
        let mut col = 0usize;
        for c in letters.chars() {
            let digit = c.to_ascii_uppercase() as usize - 'A' as usize + 1;
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| ParseCellRefError(s.to_string()))?;
        }
        Ok(Self { row: row - 1, col: col - 1 })
    }
}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
