// Whitespace rules of RFC 3261 Section 25.1

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{opt, recognize},
    multi::{many0, many1},
    sequence::pair,
};

use super::ParseResult;

/// Parses a single whitespace character (SP or HTAB)
pub fn wsp(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(alt((tag(b" "), tag(b"\t"))))(input)
}

/// Parses optional whitespace (0 or more SP or HTAB)
pub fn owsp(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(many0(wsp))(input)
}

/// Parses CRLF, accepting a bare LF as well
pub fn crlf(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(alt((tag(b"\r\n"), tag(b"\n"))))(input)
}

/// LWS = [*WSP CRLF] 1*WSP
pub fn lws(input: &[u8]) -> ParseResult<&[u8]> {
    alt((
        recognize(pair(pair(owsp, crlf), many1(wsp))),
        recognize(many1(wsp)),
    ))(input)
}

/// SWS = [LWS]
pub fn sws(input: &[u8]) -> ParseResult<&[u8]> {
    opt(lws)(input).map(|(rem, val)| (rem, val.unwrap_or(&[])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lws_folding() {
        let (rem, val) = lws(b" \r\n\tnext").unwrap();
        assert_eq!(rem, b"next");
        assert_eq!(val, b" \r\n\t");

        // CRLF without continuation whitespace is not LWS
        assert!(lws(b"\r\nnext").is_err());
    }

    #[test]
    fn test_sws_is_optional() {
        let (rem, val) = sws(b"value").unwrap();
        assert_eq!(rem, b"value");
        assert!(val.is_empty());

        let (rem, _) = sws(b"  \tvalue").unwrap();
        assert_eq!(rem, b"value");
    }
}
