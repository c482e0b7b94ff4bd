//! Parsers for individual header values

pub mod contact;
