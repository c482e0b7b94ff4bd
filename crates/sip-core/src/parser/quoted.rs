// quoted-string = SWS DQUOTE *(qdtext / quoted-pair ) DQUOTE
// quoted-pair   = "\" (%x00-09 / %x0B-0C / %x0E-7F)

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while1},
    error::{Error as NomError, ErrorKind},
    multi::fold_many0,
    sequence::{delimited, preceded},
};

use super::separators::dquote;
use super::whitespace::sws;
use super::ParseResult;

fn qdtext_run(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(|c| c != b'"' && c != b'\\')(input)
}

fn quoted_pair(input: &[u8]) -> ParseResult<&[u8]> {
    preceded(tag(b"\\"), take(1usize))(input)
}

/// Parses a quoted string and returns its unescaped content
pub fn quoted_string(input: &[u8]) -> ParseResult<String> {
    let (rest, bytes) = preceded(
        sws,
        delimited(
            dquote,
            fold_many0(alt((quoted_pair, qdtext_run)), Vec::new, |mut acc: Vec<u8>, part: &[u8]| {
                acc.extend_from_slice(part);
                acc
            }),
            dquote,
        ),
    )(input)?;

    let text = String::from_utf8(bytes)
        .map_err(|_| nom::Err::Failure(NomError::new(input, ErrorKind::Char)))?;
    Ok((rest, text))
}

/// Quote `value`, escaping `"` and `\`
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
