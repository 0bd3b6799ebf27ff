use memchr::memchr;

/// Field separator between the key and the measurement.
pub const SEPARATOR: u8 = b';';

/// One parsed `key;value` line, borrowed from the chunk it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub value: f64,
}

/// Parses a single line (without its terminator).
///
/// Returns `None` for anything that is not exactly two `;`-separated fields
/// with a finite floating point number in the second one. Nothing is
/// trimmed, so `"a; 1.0"` is rejected.
pub fn parse_line(line: &[u8]) -> Option<Record<'_>> {
    let pos = memchr(SEPARATOR, line)?;
    let (key, rest) = (&line[..pos], &line[pos + 1..]);
    if memchr(SEPARATOR, rest).is_some() {
        return None;
    }
    let value = parse_value(rest)?;
    let key = std::str::from_utf8(key).ok()?;
    Some(Record { key, value })
}

fn parse_value(field: &[u8]) -> Option<f64> {
    let value: f64 = lexical_core::parse(field).ok()?;
    value.is_finite().then_some(value)
}
