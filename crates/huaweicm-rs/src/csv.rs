// crates/huaweicm-rs/src/csv.rs

//! CSV field escaping.

/// Turns a raw text value into a CSV-safe field.
///
/// A value containing a double quote has every quote doubled and is wrapped
/// in double quotes; a value containing a comma but no quote is wrapped
/// without doubling. Anything else is returned unchanged. No trimming is
/// performed and embedded newlines pass through.
pub fn escape_field(s: &str) -> String {
    if s.contains('"') {
        let mut out = String::with_capacity(s.len() + 4);
        out.push('"');
        for c in s.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
        out
    } else if s.contains(',') {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        out.push_str(s);
        out.push('"');
        out
    } else {
        s.to_string()
    }
}
