//! Small helpers for writing XML text.

use std::fmt::Write as _;

/// Appends `text` with the five XML special characters escaped.
pub fn append_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}

/// Returns `text` with XML special characters escaped.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    append_escaped(&mut out, text);
    out
}

/// Appends ` name="value"`.
pub fn append_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    append_escaped(out, value);
    out.push('"');
}

/// Appends ` name="value"` when `value` is present.
pub fn append_opt_attr(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        append_attr(out, name, value);
    }
}

/// Appends `<name>`.
pub fn append_start_tag(out: &mut String, name: &str) {
    let _ = write!(out, "<{name}>");
}

/// Appends `</name>` followed by a newline.
pub fn append_end_tag(out: &mut String, name: &str) {
    let _ = writeln!(out, "</{name}>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_specials() {
        assert_eq!(escape(r#"a<b>&"c"'d'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;d&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn attributes() {
        let mut out = String::from("<x");
        append_attr(&mut out, "name", "a&b");
        append_opt_attr(&mut out, "skip", None);
        append_opt_attr(&mut out, "keep", Some(""));
        assert_eq!(out, r#"<x name="a&amp;b" keep="""#);
    }

    #[test]
    fn tags() {
        let mut out = String::new();
        append_start_tag(&mut out, "group");
        append_end_tag(&mut out, "group");
        assert_eq!(out, "<group></group>\n");
    }
}
