use std::fmt;
use std::str::{self, FromStr};

use nom::{combinator::map_res, sequence::terminated};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::separators::hcolon;
use crate::parser::token::token;
use crate::parser::utils::unfold_lws;
use super::HeaderName;

/// An untyped header: a name and its raw value text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: HeaderName,
    pub value: String,
}

impl Header {
    pub fn new(name: HeaderName, value: impl Into<String>) -> Self {
        Header {
            name,
            value: value.into(),
        }
    }

    /// Parse a `Name: value` line, unfolding continuation lines of the value
    pub fn parse_line(line: &str) -> Result<Self> {
        let (rest, name) = terminated(
            map_res(token, str::from_utf8),
            hcolon,
        )(line.as_bytes())
        .map_err(|_| Error::ParseError(format!("invalid header line: '{}'", line)))?;

        let value = &line[line.len() - rest.len()..];
        let value = unfold_lws(value);
        Ok(Header {
            name: HeaderName::from_str(name)?,
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
