/// Un-escapes the shared backslash escape set honoured everywhere in this
/// system (`SPEC_FULL.md` §4.4.1, §4.3 item 3): `\n \r \t \' \" \\`. An
/// unrecognised escape is left as-is (backslash and following char both
/// kept) rather than treated as an error — callers that care surface their
/// own diagnostics for that.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_known_sequences() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"\"q\'"#), "\"q'");
        assert_eq!(unescape(r"\\"), "\\");
    }

    #[test]
    fn unknown_escape_preserved() {
        assert_eq!(unescape(r"\q"), r"\q");
    }

    #[test]
    fn trailing_backslash_preserved() {
        assert_eq!(unescape("abc\\"), "abc\\");
    }
}
