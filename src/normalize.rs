//! Line-ending normalization applied before a message is handed to the parser

/// The SIP line terminator
pub const CRLF: &str = "\r\n";

/// Canonicalize line endings to CRLF and make sure the text ends with one.
///
/// Both `\n` and `\r\n` become `\r\n`. A `\r` that is not followed by `\n` is
/// kept as is. Nothing else is touched.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16 + 2);
    let mut rest = text;

    while let Some(lf) = rest.find('\n') {
        let line = &rest[..lf];
        out.push_str(line.strip_suffix('\r').unwrap_or(line));
        out.push_str(CRLF);
        rest = &rest[lf + 1..];
    }
    out.push_str(rest);

    if !out.ends_with(CRLF) {
        out.push_str(CRLF);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_lf_becomes_crlf() {
        assert_eq!(
            normalize("INVITE sip:bob@biloxi.com SIP/2.0\nVia: x\n"),
            "INVITE sip:bob@biloxi.com SIP/2.0\r\nVia: x\r\n"
        );
    }

    #[test]
    fn test_missing_terminator_appended() {
        assert_eq!(normalize("Call-ID: abc"), "Call-ID: abc\r\n");
        assert_eq!(normalize(""), "\r\n");
    }

    #[test]
    fn test_mixed_endings() {
        assert_eq!(normalize("a\r\nb\nc"), "a\r\nb\r\nc\r\n");
    }

    #[test]
    fn test_lone_cr_untouched() {
        assert_eq!(normalize("a\rb\n"), "a\rb\r\n");
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let samples = [
            "SIP/2.0 200 OK\r\nVia: SIP/2.0/UDP host\r\n\r\n",
            "Call-ID: a84b4c76e66710\r\n",
            "\r\n",
            "a\rb\r\n",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(once, sample);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(normalize("a\n\nbody\n"), "a\r\n\r\nbody\r\n");
    }
}
