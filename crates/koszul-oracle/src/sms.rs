//! # Sparse Interchange Format
//!
//! Plain-text row/column/value listing read by external rank tools:
//!
//! ```text
//! <rows> <cols> M
//! <row> <col> <value>        one line per nonzero, 1-based indices
//! 0 0 0
//! ```
//!
//! [`SmsMatrix`] keeps entries 0-based, nonzero, and sorted row-major, so
//! the same matrix always serializes to the same bytes.

use std::io::{self, Write};
use std::str::FromStr;

use sprs::CsMat;

use crate::error::SmsError;

/// A sparse integer matrix in triplet form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize, i64)>,
}

impl SmsMatrix {
    /// Build from 0-based `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed and zero values dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::OutOfRange`] if a triplet lies outside the shape
    /// and [`SmsError::ValueOverflow`] if summing duplicates overflows.
    pub fn new(
        rows: usize,
        cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, i64)>,
    ) -> Result<Self, SmsError> {
        let mut entries: Vec<(usize, usize, i64)> = Vec::new();
        for (r, c, v) in triplets {
            if r >= rows || c >= cols {
                return Err(SmsError::OutOfRange {
                    row: r + 1,
                    col: c + 1,
                    rows,
                    cols,
                });
            }
            entries.push((r, c, v));
        }
        entries.sort_unstable_by_key(|&(r, c, _)| (r, c));
        let mut merged: Vec<(usize, usize, i64)> = Vec::with_capacity(entries.len());
        for (r, c, v) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == r && last.1 == c => {
                    last.2 = last.2.checked_add(v).ok_or(SmsError::ValueOverflow {
                        row: r + 1,
                        col: c + 1,
                    })?;
                }
                _ => merged.push((r, c, v)),
            }
        }
        merged.retain(|&(_, _, v)| v != 0);
        Ok(Self {
            rows,
            cols,
            entries: merged,
        })
    }

    /// Copy the nonzero entries of a sparse matrix.
    pub fn from_csmat(matrix: &CsMat<i64>) -> Self {
        let (rows, cols) = matrix.shape();
        let mut entries: Vec<(usize, usize, i64)> = matrix
            .iter()
            .filter(|(&v, _)| v != 0)
            .map(|(&v, (r, c))| (r, c, v))
            .collect();
        entries.sort_unstable_by_key(|&(r, c, _)| (r, c));
        Self {
            rows,
            cols,
            entries,
        }
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Nonzero entries, 0-based, sorted row-major.
    pub fn entries(&self) -> &[(usize, usize, i64)] {
        &self.entries
    }

    /// Number of nonzero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Stream the interchange text to `w`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{} {} M", self.rows, self.cols)?;
        for &(r, c, v) in &self.entries {
            writeln!(w, "{} {} {}", r + 1, c + 1, v)?;
        }
        writeln!(w, "0 0 0")
    }

    /// The interchange text as a string.
    pub fn to_sms_string(&self) -> String {
        let mut buf = Vec::with_capacity(16 * (self.entries.len() + 2));
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Parse interchange text.
    pub fn parse(text: &str) -> Result<Self, SmsError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (line, header) = lines.next().ok_or(SmsError::MissingHeader)?;
        let (rows, cols) = parse_header(header).ok_or_else(|| SmsError::BadHeader {
            line,
            content: header.to_string(),
        })?;

        let mut triplets = Vec::new();
        let mut terminated = false;
        for (line, content) in lines.by_ref() {
            let (r, c, v) = parse_entry(content).ok_or_else(|| SmsError::BadEntry {
                line,
                content: content.to_string(),
            })?;
            if r == 0 && c == 0 && v == 0 {
                terminated = true;
                break;
            }
            if r == 0 || c == 0 || r > rows || c > cols {
                return Err(SmsError::OutOfRange {
                    row: r,
                    col: c,
                    rows,
                    cols,
                });
            }
            triplets.push((r - 1, c - 1, v));
        }
        if !terminated {
            return Err(SmsError::MissingTerminator);
        }
        if let Some((line, _)) = lines.next() {
            return Err(SmsError::TrailingData { line });
        }
        Self::new(rows, cols, triplets)
    }
}

impl FromStr for SmsMatrix {
    type Err = SmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let rows = parts.next()?.parse().ok()?;
    let cols = parts.next()?.parse().ok()?;
    match (parts.next(), parts.next()) {
        (Some("M"), None) => Some((rows, cols)),
        _ => None,
    }
}

fn parse_entry(line: &str) -> Option<(usize, usize, i64)> {
    let mut parts = line.split_whitespace();
    let r = parts.next()?.parse().ok()?;
    let c = parts.next()?.parse().ok()?;
    let v = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, c, v))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing arbitrary text returns an error instead of panicking.
        #[test]
        fn parse_never_panics(text in "[0-9 M\\-\n]{0,64}") {
            let _ = SmsMatrix::parse(&text);
        }
    }
}
