//! JSON arrays, matrix objects and workflow-command escaping

/// Escape for GitHub Actions safe output (percent-encoding special chars)
pub fn safe_output_escape(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a list of values as a JSON array string
pub fn format_json_array<S: AsRef<str>>(values: &[S]) -> String {
    let mut buf = String::with_capacity(values.len() * 16 + 2);
    buf.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        buf.push('"');
        escape_json_into(v.as_ref(), &mut buf);
        buf.push('"');
    }
    buf.push(']');
    buf
}

/// Format as a GitHub Actions matrix: `{"include":[{"<key>":"<value>"},...]}`
pub fn format_matrix<S: AsRef<str>>(values: &[S], key: &str) -> String {
    let mut buf = String::with_capacity(values.len() * 24 + 16);
    buf.push_str(r#"{"include":["#);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        buf.push_str(r#"{""#);
        escape_json_into(key, &mut buf);
        buf.push_str(r#"":""#);
        escape_json_into(v.as_ref(), &mut buf);
        buf.push_str(r#""}"#);
    }
    buf.push_str("]}");
    buf
}

/// Append `s` to `buf` as the inside of a JSON string literal
pub fn escape_json_into(s: &str, buf: &mut String) {
    use std::fmt::Write;

    for ch in s.chars() {
        let escaped = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if c.is_control() => {
                let _ = write!(buf, "\\u{:04x}", u32::from(c));
                continue;
            }
            c => {
                buf.push(c);
                continue;
            }
        };
        buf.push_str(escaped);
    }
}
