//! Cell address type
//!
//! An address is a `(column, row)` pair. Its textual form is a single
//! column letter (`A`-`Z`, case-insensitive on input) followed by a
//! zero-based decimal row number, e.g. `"A0"`, `"B12"`, `"Z99"`.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A0", "Z99")
///
/// Column comes first, matching the letter-then-number textual form.
/// Every `Address` value is in range: the only ways to build one are
/// [`Address::new`] and [`Address::parse`], both of which validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Address {
    col: u16,
    row: u32,
}

impl Address {
    /// Create an address from a column and row index
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::Address;
    ///
    /// let addr = Address::new(1, 12).unwrap();
    /// assert_eq!(addr.to_string(), "B12");
    ///
    /// assert!(Address::new(26, 0).is_err());
    /// assert!(Address::new(0, 100).is_err());
    /// ```
    pub fn new(col: u16, row: u32) -> Result<Self> {
        if Self::in_range(col, row) {
            Ok(Self { col, row })
        } else {
            Err(Error::OutOfBounds {
                col: col as u32,
                row,
                width: MAX_COLS,
                height: MAX_ROWS,
            })
        }
    }

    /// Validity predicate: `0 <= col < 26` and `0 <= row < 100`
    pub fn in_range(col: u16, row: u32) -> bool {
        col < MAX_COLS && row < MAX_ROWS
    }

    /// Parse an address from its textual form
    ///
    /// The first character must be an ASCII letter; the remainder must be a
    /// non-empty run of ASCII digits. Both components must be in range.
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::Address;
    ///
    /// let addr = Address::parse("c3").unwrap();
    /// assert_eq!((addr.col(), addr.row()), (2, 3));
    ///
    /// assert!(Address::parse("12").is_err());
    /// assert!(Address::parse("A-1").is_err());
    /// assert!(Address::parse("Z100").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| Error::InvalidAddress(format!("no column letter in '{}'", s)))?;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;
        let col = Self::letter_to_column(letter);

        Self::new(col, row).map_err(|_| Error::InvalidAddress(format!("'{}' is out of range", s)))
    }

    /// Column index (0-based, A=0 .. Z=25)
    pub fn col(&self) -> u16 {
        self.col
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Convert a column index to its letter (0 = A, 25 = Z)
    pub fn column_letter(col: u16) -> Option<char> {
        (col < MAX_COLS).then(|| (b'A' + col as u8) as char)
    }

    fn letter_to_column(letter: char) -> u16 {
        (letter.to_ascii_uppercase() as u8 - b'A') as u16
    }

    /// Iterate over every addressable cell of a `width` x `height` grid in
    /// row-major order, clamped to the addressable range
    pub fn all(width: u16, height: u32) -> impl Iterator<Item = Address> {
        let width = width.min(MAX_COLS);
        let height = height.min(MAX_ROWS);
        (0..height).flat_map(move |row| (0..width).map(move |col| Address { col, row }))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // col < MAX_COLS holds by construction
        let letter = (b'A' + self.col as u8) as char;
        write!(f, "{}{}", letter, self.row)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid() {
        let addr = Address::parse("C3").unwrap();
        assert_eq!(addr.col(), 2);
        assert_eq!(addr.row(), 3);
        assert_eq!(addr.to_string(), "C3");

        let addr = Address::parse("b5").unwrap();
        assert_eq!((addr.col(), addr.row()), (1, 5));
        assert_eq!(addr.to_string(), "B5");

        // leading zeros are accepted, formatting is canonical
        let addr = Address::parse("A07").unwrap();
        assert_eq!(addr.to_string(), "A7");
    }

    #[test]
    fn test_parse_bounds() {
        let lower = Address::parse("A0").unwrap();
        assert_eq!((lower.col(), lower.row()), (0, 0));

        let upper = Address::parse("Z99").unwrap();
        assert_eq!((upper.col(), upper.row()), (25, 99));
        assert_eq!(upper.to_string(), "Z99");

        assert!(Address::parse("Z100").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("A").is_err());
        assert!(Address::parse("12").is_err());
        assert!(Address::parse("[0").is_err());
        assert!(Address::parse("A-1").is_err());
        assert!(Address::parse("A+1").is_err());
        assert!(Address::parse("AA1").is_err());
        assert!(Address::parse("A1.5").is_err());
        assert!(Address::parse("A99999999999").is_err());
        assert!(Address::parse("é1").is_err());
    }

    #[test]
    fn test_new_validates() {
        assert!(Address::new(25, 99).is_ok());
        assert!(matches!(
            Address::new(26, 0),
            Err(Error::OutOfBounds { col: 26, .. })
        ));
        assert!(Address::new(0, 100).is_err());
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(Address::column_letter(0), Some('A'));
        assert_eq!(Address::column_letter(25), Some('Z'));
        assert_eq!(Address::column_letter(26), None);
    }

    #[test]
    fn test_all_is_row_major() {
        let cells: Vec<String> = Address::all(2, 2).map(|a| a.to_string()).collect();
        assert_eq!(cells, vec!["A0", "B0", "A1", "B1"]);
        assert_eq!(Address::all(30, 200).count(), 26 * 100);
    }

    proptest! {
        #[test]
        fn format_then_parse_round_trips(col in 0u16..MAX_COLS, row in 0u32..MAX_ROWS) {
            let addr = Address::new(col, row).unwrap();
            let parsed = Address::parse(&addr.to_string()).unwrap();
            prop_assert_eq!(parsed, addr);
        }

        #[test]
        fn parse_never_panics(s in "\\PC{0,6}") {
            let _ = Address::parse(&s);
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_as_text() {
        let addr = Address::parse("b12").unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"B12\"");

        let back: Address = serde_json::from_str("\"B12\"").unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_rejects_invalid_text() {
        assert!(serde_json::from_str::<Address>("\"Z100\"").is_err());
        assert!(serde_json::from_str::<Address>("\"12\"").is_err());
        assert!(serde_json::from_str::<Address>("42").is_err());
    }
}
