use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::parse_util;
use crate::parse_util::ParseError;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Whether a cell is alive in the next generation, given its current state and how many of
    /// its eight neighbors are alive.
    pub const fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let mask = 1 << neighbors;

        if alive {
            self.survivals() & mask == mask
        } else {
            self.births() & mask == mask
        }
    }
}

/// Formats as `B3/S23`
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |bits: u16| -> String {
            (0..=8)
                .filter(|&n| bits & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Expected a digit between 0 and 8, found '{got}'")]
    InvalidDigit { got: char },

    #[error("Missing rule")]
    Empty,
}

/// Accepts `b3s23`, `B3/S23` and the bare `23/3` survival/birth form.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rule, rest) = parse_rule(s.trim().as_bytes())?;

        match rest {
            [] => Ok(rule),
            [b, ..] => Err(RuleError::InvalidDigit { got: *b as char }),
        }
    }
}

/// Parse a rule at the start of `bytes`, stopping at the first whitespace.
///
/// Rules starting with `b` or `B` are read as births then survivals (`B3/S23`, `b3s23`). Anything
/// else is the older survivals/births notation found in RLE `#r` lines (`23/3`).
pub(crate) fn parse_rule(bytes: &[u8]) -> Result<(RuleSet, &[u8]), RuleError> {
    let (Some(rule), rest) = parse_util::take_until_ws(bytes) else {
        return Err(RuleError::Empty);
    };

    let rule = match rule {
        [b'b' | b'B', rule @ ..] => parse_named(rule)?,
        rule => parse_nameless(rule)?,
    };

    Ok((rule, rest))
}

// Everything after the leading `B` of `B3/S23` or `b3s23`
fn parse_named(bytes: &[u8]) -> Result<RuleSet, RuleError> {
    let (b, bytes) = parse_util::take_until_fn(|c| matches!(c, b'/' | b's' | b'S'), bytes);

    let bytes = match parse_util::take_1(bytes) {
        (Some(b'/'), rest) => rest,
        _ => bytes,
    };

    let s = match parse_util::take_1(bytes) {
        (Some(b's' | b'S'), rest) => rest,
        (Some(got), _) => {
            return Err(ParseError::UnexpectedToken {
                exp: 'S',
                got: got as char,
            }
            .into());
        }
        (None, _) => return Err(ParseError::UnexpectedEof { exp: 'S' }.into()),
    };

    let b = bytes_to_num(b.unwrap_or_default())?;
    let s = bytes_to_num(s)?;

    Ok(RuleSet::new(b, s))
}

fn parse_nameless(bytes: &[u8]) -> Result<RuleSet, RuleError> {
    let (s, bytes) = parse_util::take_until(b'/', bytes);
    let b = parse_util::expect(b'/', bytes)?;

    let s = bytes_to_num(s.unwrap_or_default())?;
    let b = bytes_to_num(b)?;

    Ok(RuleSet::new(b, s))
}

/// Convert the human readable birth/survival number to a packed bit representation
fn bytes_to_num(bytes: &[u8]) -> Result<u16, RuleError> {
    let mut n = 0;

    for &b in bytes {
        if !(b'0'..=b'8').contains(&b) {
            return Err(RuleError::InvalidDigit { got: b as char });
        }

        n |= 1 << (b - b'0');
    }

    Ok(n)
}
