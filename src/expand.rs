/// Resolve backslash escapes in a double-quoted value.
///
/// `\n` and `\r` become line feed and carriage return. Any other escaped
/// character loses its backslash, except `$`: `\$` is kept so that
/// [`expand_variables`] can emit the placeholder literally.
pub(crate) fn resolve_escapes(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_owned();
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('$') | None => out.push('\\'),
            Some(next) => {
                chars.next();
                out.push(next);
            }
        }
    }

    out
}

/// Substitute `$NAME` and `${NAME}` placeholders using `lookup`.
///
/// Names are `[A-Z0-9_]+`; unknown names expand to the empty string. A
/// placeholder preceded by a backslash is emitted without the backslash and
/// without expansion, and the `$(...)` form is never expanded.
pub(crate) fn expand_variables<'v, F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    if !input.contains('$') {
        return input.to_owned();
    }

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0usize;
    let mut idx = 0usize;

    while idx < bytes.len() {
        let escaped = bytes[idx] == b'\\' && bytes.get(idx + 1) == Some(&b'$');
        if !escaped && bytes[idx] != b'$' {
            idx += 1;
            continue;
        }

        let dollar = if escaped { idx + 1 } else { idx };
        let placeholder = Placeholder::scan(bytes, dollar);
        let token = &input[idx..placeholder.end];

        out.push_str(&input[cursor..idx]);
        if escaped || placeholder.parenthesized {
            out.push_str(&token[1..]);
        } else if let Some((start, end)) = placeholder.name {
            out.push_str(lookup(&input[start..end]).unwrap_or_default());
        } else {
            out.push_str(token);
        }

        cursor = placeholder.end;
        idx = placeholder.end;
    }

    out.push_str(&input[cursor..]);
    out
}

/// Extent of a `$` token: `$`, optional `(`, optional `{`, optional name,
/// optional `}`.
struct Placeholder {
    name: Option<(usize, usize)>,
    parenthesized: bool,
    end: usize,
}

impl Placeholder {
    fn scan(bytes: &[u8], dollar: usize) -> Self {
        let mut end = dollar + 1;

        let parenthesized = bytes.get(end) == Some(&b'(');
        if parenthesized {
            end += 1;
        }
        if bytes.get(end) == Some(&b'{') {
            end += 1;
        }

        let name_start = end;
        while end < bytes.len() && is_var_name_byte(bytes[end]) {
            end += 1;
        }
        let name = (end > name_start).then_some((name_start, end));

        if bytes.get(end) == Some(&b'}') {
            end += 1;
        }

        Self {
            name,
            parenthesized,
            end,
        }
    }
}

fn is_var_name_byte(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup(name: &str) -> Option<&'static str> {
        match name {
            "FOO" => Some("test"),
            "EMPTY" => Some(""),
            _ => None,
        }
    }

    #[rstest]
    #[case::plain("value", "value")]
    #[case::bare_name("$FOO", "test")]
    #[case::braced_name("${FOO}bar", "testbar")]
    #[case::embedded("quote $FOO here", "quote test here")]
    #[case::undefined("$NOPE", "")]
    #[case::defined_empty("a${EMPTY}b", "ab")]
    #[case::escaped_bare("foo\\$FOO", "foo$FOO")]
    #[case::escaped_braced("foo\\${FOO} ${FOO}", "foo${FOO} test")]
    #[case::parenthesized("$(FOO)", "(FOO)")]
    #[case::lone_dollar("cost: $", "cost: $")]
    #[case::lowercase_name_untouched("$foo", "$foo")]
    #[case::empty_braces("${}", "${}")]
    #[case::adjacent("$FOO$FOO", "testtest")]
    #[case::unicode_neighbours("ß$FOO→", "ßtest→")]
    fn expands_placeholders(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand_variables(input, lookup), expected);
    }

    #[rstest]
    #[case::newline("a\\nb", "a\nb")]
    #[case::carriage_return("a\\rb", "a\rb")]
    #[case::quote("say \\\"hi\\\"", "say \"hi\"")]
    #[case::backslash("C:\\\\Temp", "C:\\Temp")]
    #[case::escaped_backslash_then_n("\\\\n", "\\n")]
    #[case::other_letter("\\t", "t")]
    #[case::dollar_kept("\\$FOO", "\\$FOO")]
    #[case::trailing_backslash("end\\", "end\\")]
    #[case::backslash_line_feed("a\\\nb", "a\nb")]
    fn resolves_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_escapes(input), expected);
    }

    #[test]
    fn escapes_then_expansion_keeps_escaped_dollar_literal() {
        let resolved = resolve_escapes("foo\\$FOO \\n$FOO");
        assert_eq!(expand_variables(&resolved, lookup), "foo$FOO \ntest");
    }
}
