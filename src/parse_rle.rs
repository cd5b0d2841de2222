use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::PatternOffset;
use crate::grid::COLUMNS;
use crate::grid::ROWS;
use crate::parse_util;
use crate::parse_util::ParseError;
use crate::rule_set;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Metadata of an RLE file. The cells themselves are handed to the callback of [`read_rle`].
#[derive(Default, Debug)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Top-left corner of the pattern, from `#P` or `#R`
    pub offset: Option<(PatternOffset, PatternOffset)>,

    /// Width and height, from the header line
    pub size: Option<(PatternOffset, PatternOffset)>,

    pub set: RuleSet,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Parse the RLE file format. Assumes the bytes are valid Ascii.
///
/// `f` is called with `(row, column)` for every live cell. Rows grow downward, as in the file.
/// Every live cell, offset included, must land on the grid.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(PatternOffset, PatternOffset),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws_lines(bytes);

        let res = read_line_comment(bytes)?;
        let (Some(line), rest) = res else { break };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y))
            }
            RleCommentLine::RuleSet { set } => {
                file.set = set;
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    let res = read_line_header(bytes)?;
    if let (Some(header), rest) = res {
        let RleHeaderLine { x, y, set } = header;

        file.size = Some((x, y));

        if let Some(set) = set {
            file.set = set;
        }

        bytes = rest;
    }

    let (dx, dy) = file.offset.unwrap_or_default();

    // Parse encoding
    read_encoding(bytes, dx, dy, f)?;

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Offset { x: PatternOffset, y: PatternOffset },
    RuleSet { set: RuleSet },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid offset: {0}")]
    InvalidOffset(#[source] ConvertError),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    match b {
        // Comment line
        b'C' | b'c' => {
            let (_, bytes) = parse_util::take_with(b'\n', bytes);

            Ok((Some(RleCommentLine::Comment), bytes))
        }

        // Pattern name
        b'N' => {
            let (name, bytes) = read_text(bytes);
            let Some(name) = name else {
                return Err(RleCommentLineError::EmptyName);
            };

            Ok((Some(RleCommentLine::Name { name }), bytes))
        }

        // Pattern author
        b'O' => {
            let (author, bytes) = read_text(bytes);
            let Some(author) = author else {
                return Err(RleCommentLineError::EmptyAuthor);
            };

            Ok((Some(RleCommentLine::Author { author }), bytes))
        }

        // Pattern offset, `#P x y`
        b'R' | b'P' => {
            let bytes = parse_util::take_ws(bytes);
            let (x, bytes) = parse_util::take_until_ws(bytes);
            let bytes = parse_util::take_ws(bytes);
            let (y, bytes) = parse_util::take_until_ws(bytes);

            let x = convert(x.unwrap_or_default()).map_err(RleCommentLineError::InvalidOffset)?;
            let y = convert(y.unwrap_or_default()).map_err(RleCommentLineError::InvalidOffset)?;

            let (_, bytes) = parse_util::take_with(b'\n', bytes);

            Ok((Some(RleCommentLine::Offset { x, y }), bytes))
        }

        // Pattern rules
        b'r' => {
            let bytes = parse_util::take_ws(bytes);
            let (rule, bytes) = rule_set::parse_rule(bytes)?;
            let (_, bytes) = parse_util::take_with(b'\n', bytes);

            Ok((Some(RleCommentLine::RuleSet { set: rule }), bytes))
        }

        b => Err(RleCommentLineError::InvalidType { got: b as char }),
    }
}

/// Rest of the line, trimmed, with the linebreak consumed
fn read_text(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let (line, bytes) = parse_util::take_with(b'\n', bytes);
    let line = line.map(<[u8]>::trim_ascii).filter(|line| !line.is_empty());

    (line, bytes)
}

struct RleHeaderLine {
    x: PatternOffset,
    y: PatternOffset,
    set: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid token: expected ',' or '\\n', found '{got}'")]
    InvalidToken { got: char },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Unexpected end of input after header")]
    UnexpectedEof,
}

/// Attempt to parse a header line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    let Ok(((x, y), bytes)) = read_coordinates(bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleHeaderLineError::UnexpectedEof);
    };

    match b {
        b',' => {
            let bytes = parse_util::take_ws(bytes);
            let bytes = parse_util::expect_slice(b"rule", bytes)?;
            let bytes = parse_util::take_ws(bytes);
            let bytes = parse_util::expect(b'=', bytes)?;
            let bytes = parse_util::take_ws(bytes);

            let (rule, bytes) = rule_set::parse_rule(bytes)?;
            let (_, bytes) = parse_util::take_ws_line(bytes);

            let line = RleHeaderLine {
                x,
                y,
                set: Some(rule),
            };

            Ok((Some(line), bytes))
        }
        b'\r' | b'\n' => {
            let line = RleHeaderLine { x, y, set: None };

            Ok((Some(line), bytes))
        }
        b => Err(RleHeaderLineError::InvalidToken { got: b as char }),
    }
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Pattern coordinates overflow")]
    Overflow,

    #[error("Run of {len} live cells at ({row}, {column}) does not fit on the grid")]
    OffGrid {
        row: PatternOffset,
        column: PatternOffset,
        len: PatternOffset,
    },
}

fn read_encoding<F>(
    mut bytes: &[u8],
    dx: PatternOffset,
    dy: PatternOffset,
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(PatternOffset, PatternOffset),
{
    let mut rep: PatternOffset = 1;

    let (mut x, mut y): (PatternOffset, PatternOffset) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            w if w.is_ascii_whitespace() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;
            }

            // End of input
            b'!' => break,

            // Dead cell, `.` in multi-state patterns
            b'b' | b'.' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;

                rep = 1;
            }

            // Live cell, `A` in multi-state patterns
            b'o' | b'A' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                let row = dy.checked_add(y).ok_or(RleEncodingError::Overflow)?;
                let column = dx.checked_add(x).ok_or(RleEncodingError::Overflow)?;
                let end = column.checked_add(rep).ok_or(RleEncodingError::Overflow)?;

                if !(0..ROWS as PatternOffset).contains(&row)
                    || column < 0
                    || end > COLUMNS as PatternOffset
                {
                    return Err(RleEncodingError::OffGrid {
                        row,
                        column,
                        len: rep,
                    });
                }

                for c in column..end {
                    f(row, c)
                }

                x = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;

                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y = y.checked_add(rep).ok_or(RleEncodingError::Overflow)?;
                x = 0;

                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };
                bytes = rest;

                rep = convert(n)?;
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(())
}

fn read_coordinates(
    bytes: &[u8],
) -> Result<((PatternOffset, PatternOffset), &[u8]), HeaderCoordError> {
    let bytes = parse_util::expect(b'x', bytes)?;
    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_ws(bytes);

    let (Some(x_bytes), bytes) = parse_util::take_with(b',', bytes) else {
        return Err(HeaderCoordError::NoX);
    };
    let x = convert(x_bytes).map_err(HeaderCoordError::ParseX)?;

    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'y', bytes)?;
    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_ws(bytes);

    // Coordinates can be terminated with either `,` or a linebreak.
    let p = |b| b == b',' || b == b'\n' || b == b'\r';
    let (Some(y_bytes), bytes) = parse_util::take_until_fn(p, bytes) else {
        return Err(HeaderCoordError::NoY);
    };
    let y = convert(y_bytes).map_err(HeaderCoordError::ParseY)?;

    Ok(((x, y), bytes))
}

#[derive(Debug, Error)]
enum HeaderCoordError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Expected x coordinate, found end of input")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of input")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Bytes are not valid UTF-8")]
    InvalidUTF8,

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`, ignoring surrounding whitespace.
fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let Ok(str) = std::str::from_utf8(bytes.trim_ascii()) else {
        return Err(ConvertError::InvalidUTF8);
    };

    let Ok(res) = str.parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}

#[cfg(test)]
mod test {
    use super::RleEncodingError;
    use super::RleError;
    use super::read_rle;
    use crate::rule_set::B3S23;
    use crate::rule_set::RuleSet;

    fn cells_of(bytes: &[u8]) -> Vec<(i64, i64)> {
        let mut cells = Vec::new();
        read_rle(bytes, |row, column| cells.push((row, column))).unwrap();

        cells
    }

    #[test]
    fn read_coordinates() {
        let bytes = b"x = 1, y = 1\n";
        let ((x, y), rest) = super::read_coordinates(bytes.as_slice()).unwrap();

        assert_eq!((x, y), (1, 1));
        assert_eq!(rest, b"\n");
    }

    #[test]
    fn glider() {
        let bytes = b"#N Glider\n#O Richard K. Guy\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";

        let mut cells = Vec::new();
        let file = read_rle(bytes, |row, column| cells.push((row, column))).unwrap();

        assert_eq!(file.name, Some(b"Glider".as_slice()));
        assert_eq!(file.author, Some(b"Richard K. Guy".as_slice()));
        assert_eq!(file.size, Some((3, 3)));
        assert_eq!(file.set, B3S23);
        assert_eq!(cells, [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn header_without_rule() {
        let cells = cells_of(b"x = 3, y = 1\r\n3o!");

        assert_eq!(cells, [(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn run_count_on_line_end() {
        let cells = cells_of(b"x = 1, y = 3\no2$o!");

        assert_eq!(cells, [(0, 0), (2, 0)]);
    }

    #[test]
    fn offset_comment() {
        let cells = cells_of(b"#P 2 1\nx = 2, y = 1\n2o!");

        assert_eq!(cells, [(1, 2), (1, 3)]);
    }

    #[test]
    fn latest_metadata_wins() {
        let bytes = b"#N First\n#N Second\n#P 1 1\n#P 3 2\nx = 1, y = 1\no!";

        let mut cells = Vec::new();
        let file = read_rle(bytes, |row, column| cells.push((row, column))).unwrap();

        assert_eq!(file.name, Some(b"Second".as_slice()));
        assert_eq!(file.offset, Some((3, 2)));
        assert_eq!(cells, [(2, 3)]);
    }

    fn encoding_error(bytes: &[u8]) -> RleEncodingError {
        let mut count = 0;
        let err = read_rle(bytes, |_, _| count += 1).unwrap_err();
        assert_eq!(count, 0, "no cell should be reported before the error");

        match err {
            RleError::Encoding(err) => err,
            err => panic!("expected an encoding error, got {err}"),
        }
    }

    #[test]
    fn huge_runs_overflow() {
        let err = encoding_error(b"x = 1, y = 1\n9223372036854775807b2bo!");
        assert!(matches!(err, RleEncodingError::Overflow));

        let err = encoding_error(b"x = 1, y = 1\n9223372036854775807$2$o!");
        assert!(matches!(err, RleEncodingError::Overflow));

        let err = encoding_error(b"#P 9223372036854775807 0\nx = 2, y = 1\n2o!");
        assert!(matches!(err, RleEncodingError::Overflow));
    }

    #[test]
    fn runs_must_fit_on_grid() {
        let err = encoding_error(b"x = 1, y = 1\n9999999999o!");
        assert!(matches!(
            err,
            RleEncodingError::OffGrid {
                row: 0,
                column: 0,
                len: 9999999999
            }
        ));

        let err = encoding_error(b"x = 11, y = 1\n11o!");
        assert!(matches!(err, RleEncodingError::OffGrid { len: 11, .. }));

        let err = encoding_error(b"x = 1, y = 11\n10$o!");
        assert!(matches!(err, RleEncodingError::OffGrid { row: 10, .. }));

        let err = encoding_error(b"#P 2 -1\nx = 2, y = 1\n2o!");
        assert!(matches!(err, RleEncodingError::OffGrid { row: -1, .. }));
    }

    #[test]
    fn run_ending_on_last_column() {
        let cells = cells_of(b"#P 8 9\nx = 2, y = 1\n2o!");

        assert_eq!(cells, [(9, 8), (9, 9)]);
    }

    #[test]
    fn rule_comment() {
        let file = read_rle(b"#r 23/36\nx = 1, y = 1\no!", |_, _| {}).unwrap();

        assert_eq!(file.set, RuleSet::new(0b100_1000, 0b1100));
    }

    #[test]
    fn body_split_across_lines() {
        let cells = cells_of(b"x = 3, y = 2\n3o$\nb\n2o!");

        assert_eq!(cells, [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn missing_terminator() {
        assert!(read_rle(b"x = 1, y = 1\no", |_, _| {}).is_err());
    }

    #[test]
    fn unknown_byte() {
        assert!(read_rle(b"x = 1, y = 1\noz!", |_, _| {}).is_err());
    }
}
