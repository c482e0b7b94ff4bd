// Parser for the Contact header (RFC 3261 Section 20.10)
// Contact = ("Contact" / "m") HCOLON ( STAR / (contact-param *(COMMA contact-param)))
// contact-param = (name-addr / addr-spec) *(SEMI contact-params)
// name-addr = [ display-name ] LAQUOT addr-spec RAQUOT
// display-name = *(token LWS) / quoted-string
// contact-params = c-p-q / c-p-expires / contact-extension
// c-p-expires = "expires" EQUAL delta-seconds

use std::str;

use nom::{
    branch::alt,
    bytes::complete::{take_until, take_while1},
    combinator::{all_consuming, map, map_res, opt},
    sequence::{delimited, pair, preceded, terminated},
};
use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::quoted::quoted_string;
use crate::parser::separators::{equal, laquot, raquot};
use crate::parser::token::{is_token, token};
use crate::parser::tokenizer::{tokenize, ValueSegment};
use crate::parser::utils::unfold_lws;
use crate::parser::whitespace::sws;
use crate::parser::ParseResult;
use crate::types::contact::{ContactAddress, ContactEntry, ContactHeader};
use crate::types::param::{is_gen_value_char, ContactParam, GenericValue};
use crate::types::uri::{AddressSpecParser, DefaultAddressSpecParser, Uri};

/// Largest accepted `expires` value, 2^31-1
pub const MAX_EXPIRES: u32 = i32::MAX as u32;

/// Parse a Contact header value using [`DefaultAddressSpecParser`]
pub fn parse_contact(text: &str) -> Result<ContactHeader> {
    parse_contact_with(text, &DefaultAddressSpecParser)
}

/// Parse a Contact header value, handing every addr-spec to `uri_parser`.
///
/// The parse is atomic: any malformed entry fails the whole header.
pub fn parse_contact_with(text: &str, uri_parser: &dyn AddressSpecParser) -> Result<ContactHeader> {
    let unfolded = unfold_lws(text);
    let value = unfolded.trim();

    if value == "*" {
        return Ok(ContactHeader::wildcard());
    }

    let segments = tokenize(value)?;
    if segments.is_empty() {
        return Err(Error::EmptyHeader);
    }

    let mut entries = Vec::with_capacity(segments.len());
    for segment in &segments {
        if segment.head == "*" {
            // A lone "*" was handled above, so this one has company
            return Err(Error::InvalidWildcard);
        }
        entries.push(ContactEntry::Address(parse_entry(segment, uri_parser)?));
    }

    trace!(entries = entries.len(), "parsed Contact header");
    ContactHeader::new(entries)
}

fn parse_entry(segment: &ValueSegment<'_>, uri_parser: &dyn AddressSpecParser) -> Result<ContactAddress> {
    let (display_name, addr_spec) = split_name_addr(segment.head)?;
    let uri = parse_addr_spec(addr_spec, uri_parser)?;

    let mut expires = None;
    let mut params = Vec::with_capacity(segment.params.len());
    for raw in &segment.params {
        let param = parse_param(raw)?;
        if param.is_named("expires") {
            let secs = validate_expires(param.value())?;
            expires.get_or_insert(secs);
        }
        params.push(param);
    }

    Ok(ContactAddress::from_parts(display_name, uri, expires, params))
}

/// Split an entry head into its display name and addr-spec text
fn split_name_addr(head: &str) -> Result<(Option<String>, &str)> {
    if head.starts_with('"') {
        let (rest, name) = quoted_string(head.as_bytes())
            .map_err(|_| Error::InvalidDisplayName(head.to_string()))?;
        // quoted_string only consumes ASCII delimiters, so the offset is a char boundary
        let rest = head[head.len() - rest.len()..].trim_start();
        if !rest.starts_with('<') {
            return Err(Error::InvalidAddress(format!(
                "expected '<' after display name in '{}'",
                head
            )));
        }
        return Ok((Some(name), bracketed(rest)?));
    }

    match head.find('<') {
        Some(0) => Ok((None, bracketed(head)?)),
        Some(pos) => {
            let words = head[..pos].split_whitespace().collect::<Vec<_>>();
            if let Some(bad) = words.iter().find(|w| !is_token(w)) {
                return Err(Error::InvalidDisplayName(format!("'{}' in '{}'", bad, head)));
            }
            Ok((Some(words.join(" ")), bracketed(&head[pos..])?))
        }
        None => {
            if head.contains(char::is_whitespace) {
                return Err(Error::InvalidAddress(format!(
                    "display name requires an angle-bracketed address: '{}'",
                    head
                )));
            }
            Ok((None, head))
        }
    }
}

/// Inner text of `<addr-spec>`; nothing may follow the closing bracket
fn bracketed(text: &str) -> Result<&str> {
    let (_, inner) = all_consuming(delimited(laquot, take_until(">"), raquot))(text.as_bytes())
        .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| {
            Error::InvalidAddress(format!("expected '<addr-spec>' in '{}'", text))
        })?;
    let inner = str::from_utf8(inner).map_err(|e| Error::InvalidAddress(e.to_string()))?;
    Ok(inner.trim())
}

fn parse_addr_spec(text: &str, uri_parser: &dyn AddressSpecParser) -> Result<Uri> {
    if text.is_empty() {
        return Err(Error::InvalidAddress("empty address".to_string()));
    }
    uri_parser.parse_addr_spec(text).map_err(|e| match e {
        Error::InvalidAddress(_) => e,
        other => Error::InvalidAddress(other.to_string()),
    })
}

fn gen_value(input: &[u8]) -> ParseResult<GenericValue> {
    alt((
        map(quoted_string, GenericValue::Quoted),
        map_res(take_while1(is_gen_value_char), |b: &[u8]| {
            str::from_utf8(b).map(|s| GenericValue::Token(s.to_string()))
        }),
    ))(input)
}

/// generic-param = token [ EQUAL gen-value ]
fn generic_param(input: &[u8]) -> ParseResult<(String, Option<GenericValue>)> {
    pair(
        map_res(preceded(sws, token), |b: &[u8]| str::from_utf8(b).map(str::to_string)),
        terminated(opt(preceded(equal, gen_value)), sws),
    )(input)
}

fn parse_param(raw: &str) -> Result<ContactParam> {
    if raw.is_empty() {
        return Err(Error::InvalidParameter("empty parameter".to_string()));
    }
    let (_, (name, value)) = all_consuming(generic_param)(raw.as_bytes())
        .map_err(|_| Error::InvalidParameter(raw.to_string()))?;
    Ok(ContactParam::from_parts(name, value))
}

/// Validate an `expires` value: delta-seconds no larger than 2^31-1
pub(crate) fn validate_expires(value: Option<&GenericValue>) -> Result<u32> {
    let raw = match value {
        Some(GenericValue::Token(raw)) => raw,
        Some(GenericValue::Quoted(raw)) => {
            return Err(Error::InvalidExpires(format!("\"{}\"", raw)));
        }
        None => return Err(Error::InvalidExpires("missing value".to_string())),
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidExpires(raw.clone()));
    }
    // Leading zeros are legal, so compare numerically rather than by length
    let trimmed = raw.trim_start_matches('0');
    if trimmed.len() > 10 {
        return Err(Error::InvalidExpires(raw.clone()));
    }
    match trimmed.parse::<u64>() {
        Ok(n) if n <= u64::from(MAX_EXPIRES) => Ok(n as u32),
        Ok(_) => Err(Error::InvalidExpires(raw.clone())),
        Err(_) if trimmed.is_empty() => Ok(0),
        Err(_) => Err(Error::InvalidExpires(raw.clone())),
    }
}
