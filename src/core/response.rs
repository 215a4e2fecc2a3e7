//! Decoding of raw evaluator output into typed values.
//!
//! The evaluator prints loosely-typed text. Query results carry a single
//! payload line starting with [`PAYLOAD_MARKER`] whose remainder is a typed
//! literal; broadcast results wrap the program output in metadata lines.
//! This module recognizes both shapes and turns them into [`Literal`] values.
//!
//! # Literal grammar
//! - Byte slice: `slice[0x<hex>]`, `slice[]` or `(nil <elemtype>)`
//! - Integer: `(<digits> <typename>)`, negative values allowed
//! - String: `("<escaped-text>" <typename>)`
//!
//! # Public API
//! - [`Literal`]: closed set of decoded values
//! - [`payload_line`]: locate the payload of a query response
//! - [`decode_bytes`], [`decode_optional_bytes`], [`decode_integer`],
//!   [`decode_text`]: typed helpers
//! - [`extract_transaction_output`]: strip broadcast metadata

use crate::core::error::{GnitError, Result};

/// Leading token of the payload-bearing line in a query response
pub const PAYLOAD_MARKER: &str = "data: ";

/// Prefixes of the informational lines printed around a broadcast's output
const METADATA_PREFIXES: &[&str] = &[
    "GAS WANTED:",
    "GAS USED:",
    "HEIGHT:",
    "EVENTS:",
    "INFO:",
    "TX HASH:",
    "OK!",
];

/// A decoded evaluator value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    ByteSlice(Vec<u8>),
    Integer(i64),
    Text(Vec<u8>),
    TransactionOutput(String),
}

impl Literal {
    /// Recognize the payload of a query response.
    pub fn from_query(raw: &str) -> Result<Self> {
        recognize(payload_line(raw)?)
    }

    /// Reduce a broadcast response to the program's own output.
    pub fn from_transaction(raw: &str) -> Self {
        Literal::TransactionOutput(extract_transaction_output(raw))
    }

    /// Name of the literal form, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::ByteSlice(_) => "byte slice",
            Literal::Integer(_) => "integer",
            Literal::Text(_) => "string",
            Literal::TransactionOutput(_) => "transaction output",
        }
    }
}

/// Return the remainder of the first line that starts with the payload marker.
pub fn payload_line(raw: &str) -> Result<&str> {
    raw.lines()
        .find_map(|line| line.strip_prefix(PAYLOAD_MARKER))
        .ok_or_else(|| {
            GnitError::malformed_response(format!(
                "no '{}' line in output: {}",
                PAYLOAD_MARKER.trim_end(),
                first_line(raw)
            ))
        })
}

/// Recognize a single literal. Only the hex payload of a byte slice can
/// produce a [`GnitError::DecodeError`]; anything outside the grammar is a
/// [`GnitError::MalformedResponse`].
pub fn recognize(literal: &str) -> Result<Literal> {
    let lit = literal.trim();

    if lit.starts_with("(nil ") && lit.ends_with(')') {
        return Ok(Literal::ByteSlice(Vec::new()));
    }

    if let Some(inner) = lit.strip_prefix("(\"") {
        return parse_text(literal, inner);
    }

    if let Some(start) = lit.find("slice[") {
        return parse_slice(literal, &lit[start + "slice[".len()..]);
    }

    if let Some(inner) = lit.strip_prefix('(') {
        return parse_integer(literal, inner);
    }

    Err(GnitError::malformed_response(literal))
}

/// Decode a query response that must hold a byte slice
pub fn decode_bytes(raw: &str) -> Result<Vec<u8>> {
    match Literal::from_query(raw)? {
        Literal::ByteSlice(bytes) => Ok(bytes),
        other => Err(unexpected("byte slice", &other, raw)),
    }
}

/// Decode a byte-slice response where a nil slice means the value is
/// absent, as returned by a lookup of a missing key. An empty non-nil slice
/// is present and empty.
pub fn decode_optional_bytes(raw: &str) -> Result<Option<Vec<u8>>> {
    let payload = payload_line(raw)?.trim();
    if payload.starts_with("(nil ") && payload.ends_with(')') {
        return Ok(None);
    }
    decode_bytes(raw).map(Some)
}

/// Decode a query response that must hold an integer
pub fn decode_integer(raw: &str) -> Result<i64> {
    match Literal::from_query(raw)? {
        Literal::Integer(value) => Ok(value),
        other => Err(unexpected("integer", &other, raw)),
    }
}

/// Decode a query response that must hold a string
pub fn decode_text(raw: &str) -> Result<Vec<u8>> {
    match Literal::from_query(raw)? {
        Literal::Text(bytes) => Ok(bytes),
        other => Err(unexpected("string", &other, raw)),
    }
}

/// Extract the program output from a broadcast response.
///
/// Leading metadata and blank lines are skipped. From the first other line
/// on, everything up to the next metadata line is kept, including blank
/// lines in the middle. Trailing blank lines are dropped.
pub fn extract_transaction_output(raw: &str) -> String {
    let mut collected: Vec<&str> = raw
        .lines()
        .skip_while(|line| line.trim().is_empty() || is_metadata(line))
        .take_while(|line| !is_metadata(line))
        .collect();

    while collected.last().is_some_and(|line| line.trim().is_empty()) {
        collected.pop();
    }

    collected.join("\n")
}

fn is_metadata(line: &str) -> bool {
    let line = line.trim_start();
    METADATA_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

fn parse_slice(literal: &str, rest: &str) -> Result<Literal> {
    let end = rest
        .find(']')
        .ok_or_else(|| GnitError::malformed_response(literal))?;
    let body = &rest[..end];

    if body.is_empty() {
        return Ok(Literal::ByteSlice(Vec::new()));
    }

    let digits = body
        .strip_prefix("0x")
        .ok_or_else(|| GnitError::malformed_response(literal))?;

    hex::decode(digits)
        .map(Literal::ByteSlice)
        .map_err(|e| GnitError::decode_error(literal.trim(), e.to_string()))
}

fn parse_integer(literal: &str, inner: &str) -> Result<Literal> {
    let inner = inner
        .strip_suffix(')')
        .ok_or_else(|| GnitError::malformed_response(literal))?;
    let (digits, type_name) = inner
        .split_once(' ')
        .ok_or_else(|| GnitError::malformed_response(literal))?;

    if type_name.trim().is_empty() {
        return Err(GnitError::malformed_response(literal));
    }

    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GnitError::malformed_response(literal));
    }

    digits
        .parse::<i64>()
        .map(Literal::Integer)
        .map_err(|e| GnitError::decode_error(literal.trim(), e.to_string()))
}

/// `inner` starts right after the opening quote.
fn parse_text(literal: &str, inner: &str) -> Result<Literal> {
    let bytes = inner.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut escape_pending = false;
    let mut closing = None;

    for (i, &b) in bytes.iter().enumerate() {
        if escape_pending {
            escape_pending = false;
            match b {
                b'n' => decoded.push(b'\n'),
                b't' => decoded.push(b'\t'),
                b'r' => decoded.push(b'\r'),
                b'\\' => decoded.push(b'\\'),
                b'"' => decoded.push(b'"'),
                other => {
                    decoded.push(b'\\');
                    decoded.push(other);
                }
            }
            continue;
        }

        match b {
            b'\\' => escape_pending = true,
            b'"' => {
                closing = Some(i);
                break;
            }
            other => decoded.push(other),
        }
    }

    let closing = closing.ok_or_else(|| GnitError::malformed_response(literal))?;
    let suffix = &inner[closing + 1..];
    let type_name = suffix
        .strip_prefix(' ')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| GnitError::malformed_response(literal))?;

    if type_name.trim().is_empty() {
        return Err(GnitError::malformed_response(literal));
    }

    Ok(Literal::Text(decoded))
}

fn unexpected(expected: &str, found: &Literal, raw: &str) -> GnitError {
    GnitError::malformed_response(format!(
        "expected {expected}, found {}: {}",
        found.kind(),
        payload_line(raw).unwrap_or(raw).trim()
    ))
}

fn first_line(raw: &str) -> &str {
    raw.lines().find(|l| !l.trim().is_empty()).unwrap_or("<empty>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_slice_decodes_to_bytes() {
        let raw = "data: slice[0x48656c6c6f]\n";
        assert_eq!(decode_bytes(raw).unwrap(), b"Hello".to_vec());
    }

    #[test]
    fn test_wrapped_hex_slice() {
        let raw = "height: 0\ndata: (slice[0x0a7c5c] []uint8)\n";
        assert_eq!(decode_bytes(raw).unwrap(), vec![b'\n', b'|', b'\\']);
    }

    #[test]
    fn test_empty_and_nil_slices() {
        assert!(decode_bytes("data: slice[]").unwrap().is_empty());
        assert!(decode_bytes("data: (nil []uint8)").unwrap().is_empty());
    }

    #[test]
    fn test_optional_bytes_distinguishes_nil_from_empty() {
        assert_eq!(decode_optional_bytes("data: (nil []uint8)").unwrap(), None);
        assert_eq!(
            decode_optional_bytes("data: (slice[] []uint8)").unwrap(),
            Some(Vec::new())
        );
        assert_eq!(
            decode_optional_bytes("data: (slice[0x6869] []uint8)").unwrap(),
            Some(b"hi".to_vec())
        );
        assert!(decode_optional_bytes("data: (3 int)").is_err());
    }

    #[test]
    fn test_missing_payload_line() {
        let err = decode_bytes("height: 12\nsomething else\n").unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
        assert!(err.to_string().contains("height: 12"));
    }

    #[test]
    fn test_payload_marker_must_lead_the_line() {
        let err = payload_line("  data: (1 int)").unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
    }

    #[test]
    fn test_odd_length_hex_is_decode_error() {
        let err = decode_bytes("data: slice[0xabc]").unwrap_err();
        assert!(matches!(err, GnitError::DecodeError { .. }));
        assert!(err.to_string().contains("slice[0xabc]"));
    }

    #[test]
    fn test_invalid_hex_is_decode_error() {
        let err = decode_bytes("data: slice[0xzz]").unwrap_err();
        assert!(matches!(err, GnitError::DecodeError { .. }));
    }

    #[test]
    fn test_slice_without_hex_prefix_is_malformed() {
        let err = decode_bytes("data: slice[12 34]").unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
    }

    #[test]
    fn test_unknown_literal_is_malformed() {
        let err = Literal::from_query("data: true").unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
        let err = Literal::from_query("data: (true bool)").unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(decode_integer("data: (42 int)").unwrap(), 42);
        assert_eq!(decode_integer("data: (0 int)").unwrap(), 0);
        assert_eq!(decode_integer("data: (-1 int)").unwrap(), -1);
    }

    #[test]
    fn test_integer_overflow_is_decode_error() {
        let err = decode_integer("data: (99999999999999999999999 int)").unwrap_err();
        assert!(matches!(err, GnitError::DecodeError { .. }));
    }

    #[test]
    fn test_integer_without_type_is_malformed() {
        assert!(matches!(
            decode_integer("data: (42)").unwrap_err(),
            GnitError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn test_string_literal_escapes() {
        let raw = r#"data: ("line1\nline2\t\"q\"\\end\r" string)"#;
        assert_eq!(
            decode_text(raw).unwrap(),
            b"line1\nline2\t\"q\"\\end\r".to_vec()
        );
    }

    #[test]
    fn test_string_literal_unknown_escape_passes_backslash() {
        let raw = r#"data: ("a\qb\x41" string)"#;
        assert_eq!(decode_text(raw).unwrap(), br"a\qb\x41".to_vec());
    }

    #[test]
    fn test_string_literal_keeps_utf8_verbatim() {
        let raw = "data: (\"h\u{e9}llo | world\" string)";
        assert_eq!(decode_text(raw).unwrap(), "h\u{e9}llo | world".as_bytes().to_vec());
    }

    #[test]
    fn test_string_literal_mentioning_slice() {
        let raw = r#"data: ("slice[0x00]" string)"#;
        assert_eq!(decode_text(raw).unwrap(), b"slice[0x00]".to_vec());
    }

    #[test]
    fn test_empty_string_literal() {
        assert!(decode_text(r#"data: ("" string)"#).unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_string_is_malformed() {
        let err = decode_text(r#"data: ("abc string)"#).unwrap_err();
        assert!(matches!(err, GnitError::MalformedResponse { .. }));
    }

    #[test]
    fn test_type_mismatch_is_malformed() {
        let err = decode_integer(r#"data: ("12" string)"#).unwrap_err();
        assert!(err.to_string().contains("expected integer, found string"));
    }

    #[test]
    fn test_transaction_output_extraction() {
        let lines = ["", "GAS WANTED: 100", "Commit hash: abc123", "GAS USED: 50", "OK!"];
        assert_eq!(extract_transaction_output(&lines.join("\n")), "Commit hash: abc123");
    }

    #[test]
    fn test_transaction_output_keeps_inner_blank_lines() {
        let raw = "\nOK!\nfirst\n\nsecond\n\nGAS WANTED: 1\nGAS USED: 1\nHEIGHT: 9\n";
        assert_eq!(extract_transaction_output(raw), "first\n\nsecond");
    }

    #[test]
    fn test_transaction_output_stops_at_metadata() {
        let raw = "Commit hash: ff\nOK!\nGAS WANTED: 1\nlate output\n";
        assert_eq!(
            Literal::from_transaction(raw),
            Literal::TransactionOutput("Commit hash: ff".to_string())
        );
    }

    #[test]
    fn test_transaction_output_empty() {
        assert_eq!(extract_transaction_output("OK!\nGAS USED: 3\n"), "");
    }
}
