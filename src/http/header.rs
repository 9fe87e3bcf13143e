//! Raw header block parsing

use indexmap::IndexMap;

/// Parse a raw response header block into an ordered name→value map.
///
/// Line endings are normalized, continuation lines (a line starting with a
/// space or tab) are folded into the previous header with a single space,
/// and the leading status line is discarded. Lines without a `:` separator
/// are skipped. Values are trimmed at the edges only; on duplicate names
/// the last occurrence wins.
pub fn parse_header(header: &str) -> IndexMap<String, String> {
    let mut parsed = IndexMap::new();
    if header.is_empty() {
        return parsed;
    }

    let normalized = header.replace("\r\n", "\n");
    let mut lines: Vec<String> = Vec::new();
    for line in normalized.split('\n') {
        match line.as_bytes().first() {
            // One folding whitespace char is consumed, the rest of the
            // continuation is kept as-is.
            Some(b' ') | Some(b'\t') if !lines.is_empty() => {
                if let Some(prev) = lines.last_mut() {
                    prev.push(' ');
                    prev.push_str(&line[1..]);
                }
            }
            _ => lines.push(line.to_string()),
        }
    }

    // The first line is the status line, e.g. `HTTP/1.1 200 OK`.
    for line in lines.iter().skip(1) {
        if line.is_empty() {
            continue;
        }
        let (name, value) = match line.split_once(':') {
            Some(split) => split,
            None => continue,
        };
        parsed.insert(name.to_string(), value.trim().to_string());
    }
    parsed
}
