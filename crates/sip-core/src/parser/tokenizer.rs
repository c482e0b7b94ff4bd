//! List/parameter tokenizer for SIP header values
//!
//! Many headers share the shape
//!
//! ```text
//! value = element *( "," element )
//! element = head *( ";" param )
//! ```
//!
//! where the head may contain a quoted display name and an angle-bracketed
//! URI. Commas and semicolons inside `"..."` (with backslash escapes) or
//! inside `<...>` are not delimiters. This module finds the delimiters
//! once so every header parser works on pre-split, trimmed slices.
//!
//! Tokenizing is all-or-nothing: an unterminated quote or bracket fails the
//! whole value and no partial segment list is returned.

use crate::error::{Error, Result};

/// Delimiters of one list-valued header grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueGrammar {
    /// Separates list elements
    pub list_separator: u8,
    /// Separates an element's head from each of its parameters
    pub param_separator: u8,
}

impl ValueGrammar {
    /// Contact, Route, Record-Route, Accept and friends
    pub const COMMA_SEMI: ValueGrammar = ValueGrammar {
        list_separator: b',',
        param_separator: b';',
    };
}

impl Default for ValueGrammar {
    fn default() -> Self {
        Self::COMMA_SEMI
    }
}

/// One list element of a header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSegment<'a> {
    /// Byte offset of the element within the tokenized input
    pub offset: usize,
    /// Display name and address, trimmed
    pub head: &'a str,
    /// Parameter texts in order, trimmed, without the separator
    pub params: Vec<&'a str>,
}

/// Tokenize with the comma/semicolon grammar
pub fn tokenize(input: &str) -> Result<Vec<ValueSegment<'_>>> {
    tokenize_with(input, ValueGrammar::COMMA_SEMI)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Plain,
    Quoted { start: usize, escaped: bool },
    Angle { start: usize },
}

/// Split `input` into list elements and parameter segments.
///
/// Elements that are empty after trimming (`a,,b`, trailing commas,
/// whitespace-only input) are skipped; callers decide whether an empty
/// result is an error.
pub fn tokenize_with(input: &str, grammar: ValueGrammar) -> Result<Vec<ValueSegment<'_>>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();

    let mut state = Scan::Plain;
    let mut element_start = 0;
    // Start of the piece currently being collected (head or a parameter)
    let mut piece_start = 0;
    let mut head: Option<&str> = None;
    let mut params: Vec<&str> = Vec::new();

    for (i, &c) in bytes.iter().enumerate() {
        state = match state {
            Scan::Quoted { start, escaped: true } => Scan::Quoted { start, escaped: false },
            Scan::Quoted { start, escaped: false } => match c {
                b'\\' => Scan::Quoted { start, escaped: true },
                b'"' => Scan::Plain,
                _ => state,
            },
            Scan::Angle { start } => match c {
                b'>' => Scan::Plain,
                _ => Scan::Angle { start },
            },
            Scan::Plain => {
                if c == b'"' {
                    Scan::Quoted { start: i, escaped: false }
                } else if c == b'<' {
                    Scan::Angle { start: i }
                } else if c == grammar.param_separator {
                    finish_piece(input, &mut head, &mut params, piece_start, i);
                    piece_start = i + 1;
                    Scan::Plain
                } else if c == grammar.list_separator {
                    finish_piece(input, &mut head, &mut params, piece_start, i);
                    push_segment(&mut segments, input, element_start, head.take(), std::mem::take(&mut params));
                    element_start = i + 1;
                    piece_start = i + 1;
                    Scan::Plain
                } else {
                    Scan::Plain
                }
            }
        };
    }

    match state {
        Scan::Quoted { start, .. } => return Err(Error::UnterminatedQuote { position: start }),
        Scan::Angle { start } => return Err(Error::UnterminatedAngleBracket { position: start }),
        Scan::Plain => {}
    }

    finish_piece(input, &mut head, &mut params, piece_start, bytes.len());
    push_segment(&mut segments, input, element_start, head.take(), params);

    Ok(segments)
}

fn finish_piece<'a>(
    input: &'a str,
    head: &mut Option<&'a str>,
    params: &mut Vec<&'a str>,
    from: usize,
    to: usize,
) {
    let piece = input[from..to].trim();
    match head {
        None => *head = Some(piece),
        Some(_) => params.push(piece),
    }
}

fn push_segment<'a>(
    segments: &mut Vec<ValueSegment<'a>>,
    input: &'a str,
    element_start: usize,
    head: Option<&'a str>,
    params: Vec<&'a str>,
) {
    let head = head.unwrap_or("");
    if head.is_empty() && params.is_empty() {
        return;
    }
    let leading_ws = input[element_start..].len() - input[element_start..].trim_start().len();
    segments.push(ValueSegment {
        offset: element_start + leading_ws,
        head,
        params,
    });
}
