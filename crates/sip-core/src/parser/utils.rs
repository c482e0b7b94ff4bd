// Utility functions for parsing

/// Unfolds linear white space according to RFC 3261 §7.3.1.
///
/// A line break followed by SP/HTAB is a continuation: the break and the
/// whitespace that follows it become a single SP. Other whitespace is kept
/// byte for byte so quoted strings survive untouched, and line breaks that
/// are not followed by whitespace are kept as they are.
pub fn unfold_lws(input: &str) -> String {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out: Vec<u8> = Vec::with_capacity(len);
    let mut i = 0;

    let is_wsp = |c: u8| c == b' ' || c == b'\t';

    while i < len {
        let brk = if bytes[i] == b'\r' && i + 1 < len && bytes[i + 1] == b'\n' {
            2
        } else if bytes[i] == b'\n' {
            1
        } else {
            0
        };

        if brk > 0 && i + brk < len && is_wsp(bytes[i + brk]) {
            i += brk;
            while i < len && is_wsp(bytes[i]) {
                i += 1;
            }
            if !out.last().map_or(false, |&c| is_wsp(c)) {
                out.push(b' ');
            }
        } else if brk > 0 {
            out.extend_from_slice(&bytes[i..i + brk]);
            i += brk;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Only ASCII bytes were removed or replaced, so the result is still UTF-8
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
