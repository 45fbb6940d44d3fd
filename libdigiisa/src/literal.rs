use std::num::IntErrorKind;

use crate::MAX_INT;

/// Parses a numeric token: decimal, `0x` hex, `0b` binary, or `"C` for the
/// code point of `C` modulo 256. Prefixes are matched in either case since the
/// assembler uppercases its input.
///
/// No range check happens here, values outside a byte are the caller's problem.
/// Numbers too large for an `i64` saturate, so they still read as out of range.
pub fn parse_literal(token: &str) -> Option<i64> {
    if let Some(hex) = strip_prefix_ignore_case(token, "0x") {
        parse_radix(hex, 16)
    } else if let Some(binary) = strip_prefix_ignore_case(token, "0b") {
        parse_radix(binary, 2)
    } else if let Some(quoted) = token.strip_prefix('"') {
        quoted
            .chars()
            .next()
            .map(|character| character as i64 % MAX_INT as i64)
    } else {
        parse_radix(token, 10)
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<i64> {
    match i64::from_str_radix(digits, radix) {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn strip_prefix_ignore_case<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let head = token.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &token[prefix.len()..])
}
