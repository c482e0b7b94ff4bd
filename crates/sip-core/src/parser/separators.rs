// Separator rules of RFC 3261 Section 25.1, each absorbing surrounding SWS

use nom::{
    bytes::complete::tag,
    combinator::recognize,
    multi::many0,
    branch::alt,
    sequence::{pair, tuple},
};

use super::whitespace::sws;
use super::ParseResult;

/// HCOLON = *( SP / HTAB ) ":" SWS
pub fn hcolon(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(tuple((many0(alt((tag(b" "), tag(b"\t")))), tag(b":"), sws)))(input)
}

pub fn dquote(input: &[u8]) -> ParseResult<&[u8]> {
    tag(b"\"")(input)
}

/// EQUAL = SWS "=" SWS
pub fn equal(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(tuple((sws, tag(b"="), sws)))(input)
}

/// LAQUOT = SWS "<"
pub fn laquot(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(pair(sws, tag(b"<")))(input)
}

/// RAQUOT = ">" SWS
pub fn raquot(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(pair(tag(b">"), sws))(input)
}
