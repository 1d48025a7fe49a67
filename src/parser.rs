use std::borrow::Cow;
use std::io::Read;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::expand::{expand_variables, resolve_escapes};
use crate::model::{Entry, EnvMap, ParseOptions};

const COMMENT: char = '#';
const SINGLE_QUOTE: u8 = b'\'';
const DOUBLE_QUOTE: u8 = b'"';
const EXPORT_PREFIX: &str = "export";

/// Parse dotenv entries from UTF-8 text.
pub fn parse_str(input: &str) -> Result<EnvMap, Error> {
    parse_str_with_options(input, ParseOptions::default())
}

/// Parse dotenv entries from UTF-8 text using specific parse options.
pub fn parse_str_with_options(input: &str, options: ParseOptions) -> Result<EnvMap, Error> {
    let normalized = normalize_newlines(input);
    Parser::new(&normalized, options)
        .parse()
        .map_err(Error::from)
}

/// Parse dotenv entries from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<EnvMap, Error> {
    parse_bytes_with_options(input, ParseOptions::default())
}

/// Parse dotenv entries from UTF-8 bytes using specific parse options.
pub fn parse_bytes_with_options(input: &[u8], options: ParseOptions) -> Result<EnvMap, Error> {
    let text = std::str::from_utf8(input)?;
    parse_str_with_options(text, options)
}

/// Parse dotenv entries from a reader.
///
/// The reader is drained completely before parsing starts.
pub fn parse_reader<R: Read>(reader: R) -> Result<EnvMap, Error> {
    parse_reader_with_options(reader, ParseOptions::default())
}

/// Parse dotenv entries from a reader using specific parse options.
pub fn parse_reader_with_options<R: Read>(
    mut reader: R,
    options: ParseOptions,
) -> Result<EnvMap, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes_with_options(&buf, options)
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Whitespace that never ends a line.
fn is_inline_space(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{85}' | '\u{A0}'
    )
}

fn is_line_end(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

fn first_line(src: &str) -> &str {
    src.split_once('\n').map_or(src, |(line, _)| line)
}

/// One pass over a normalized buffer.
///
/// Every slice handed between steps is a suffix of `input`, so positions
/// are recovered from slice lengths alone.
struct Parser<'a> {
    input: &'a str,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, options: ParseOptions) -> Self {
        Self { input, options }
    }

    fn parse(&self) -> Result<EnvMap, ParseError> {
        let mut vars = EnvMap::new();
        let mut rest = self.input;
        let mut line = 1u32;
        let mut counted = 0usize;

        while let Some(statement) = self.statement_start(rest) {
            let offset = self.offset_of(statement);
            line += self.input[counted..offset].matches('\n').count() as u32;
            counted = offset;

            let (key, value_input) = self
                .extract_key(statement)
                .inspect_err(|err| tracing::debug!(%err, "dotenv key extraction failed"))?;
            let (value, remainder) = self
                .extract_value(value_input, &vars)
                .inspect_err(|err| tracing::debug!(%err, "dotenv value extraction failed"))?;

            tracing::trace!(key, line, "parsed dotenv entry");
            vars.insert(Entry {
                key: key.to_owned(),
                value,
                line,
            });
            rest = remainder;
        }

        tracing::debug!(
            entries = vars.len(),
            bytes = self.input.len(),
            "parsed dotenv input"
        );
        Ok(vars)
    }

    /// Skip whitespace and comment lines; `None` once nothing is left.
    fn statement_start(&self, mut src: &'a str) -> Option<&'a str> {
        loop {
            src = src.trim_start();
            if src.is_empty() {
                return None;
            }
            if !src.starts_with(COMMENT) {
                return Some(src);
            }

            let newline = src.find('\n')?;
            src = &src[newline..];
        }
    }

    /// Split a statement into its key and whatever follows the separator.
    fn extract_key(&self, statement: &'a str) -> Result<(&'a str, &'a str), ParseError> {
        let mut src = statement.trim_start_matches(is_inline_space);
        if let Some(rest) = src.strip_prefix(EXPORT_PREFIX)
            && rest.starts_with(is_inline_space)
        {
            src = rest.trim_start_matches(is_inline_space);
        }

        if src.is_empty() {
            return Err(self.error_at(src, ParseErrorKind::EmptyStatement));
        }

        let mut separator = None;
        for (idx, ch) in src.char_indices() {
            if is_inline_space(ch) {
                continue;
            }

            match ch {
                '=' | ':' => {
                    separator = Some(idx);
                    break;
                }
                '_' | '.' => {}
                ch if ch.is_alphanumeric() => {}
                character => {
                    return Err(self.error_at(
                        &src[idx..],
                        ParseErrorKind::MalformedKey {
                            character,
                            fragment: first_line(src).to_owned(),
                        },
                    ));
                }
            }
        }

        let Some(separator) = separator else {
            return Err(self.error_at(
                src,
                ParseErrorKind::MissingSeparator {
                    fragment: first_line(src).to_owned(),
                },
            ));
        };

        let key = src[..separator].trim_end();
        if key.is_empty() && self.options.is_strict_keys() {
            return Err(self.error_at(src, ParseErrorKind::MissingKey));
        }

        let rest = src[separator + 1..].trim_start_matches(is_inline_space);
        Ok((key, rest))
    }

    /// Extract the value at the start of `src` and return it along with
    /// the unconsumed input.
    fn extract_value(
        &self,
        src: &'a str,
        vars: &EnvMap,
    ) -> Result<(String, &'a str), ParseError> {
        let quote = match src.as_bytes().first() {
            Some(&quote) if quote == SINGLE_QUOTE || quote == DOUBLE_QUOTE => quote,
            _ => return Ok(self.extract_bare_value(src, vars)),
        };

        let bytes = src.as_bytes();
        let closing =
            (1..bytes.len()).find(|&idx| bytes[idx] == quote && bytes[idx - 1] != b'\\');
        let Some(closing) = closing else {
            return Err(self.error_at(
                src,
                ParseErrorKind::UnterminatedQuote {
                    fragment: first_line(src).to_owned(),
                },
            ));
        };

        let quote_char = char::from(quote);
        let raw = src[..closing]
            .trim_end_matches(quote_char)
            .trim_start_matches(quote_char);
        let rest = &src[closing + 1..];
        if self.options.is_reject_trailing_content() {
            self.check_trailing_content(rest)?;
        }

        let value = if quote == DOUBLE_QUOTE {
            expand_variables(&resolve_escapes(raw), |name| vars.get(name))
        } else {
            raw.to_owned()
        };
        Ok((value, rest))
    }

    fn extract_bare_value(&self, src: &'a str, vars: &EnvMap) -> (String, &'a str) {
        let line_end = src.find(is_line_end).unwrap_or(src.len());
        let line = &src[..line_end];

        // The last `#` preceded by whitespace starts a trailing comment.
        let mut value_end = line.len();
        for (idx, ch) in line.char_indices().rev() {
            if ch == COMMENT
                && idx > 0
                && line[..idx].chars().next_back().is_some_and(is_inline_space)
            {
                value_end = idx;
                break;
            }
        }

        let raw = line[..value_end].trim_matches(is_inline_space);
        let value = expand_variables(raw, |name| vars.get(name));
        (value, &src[line_end..])
    }

    fn check_trailing_content(&self, rest: &'a str) -> Result<(), ParseError> {
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let tail = rest[..line_end].trim_start();
        if tail.is_empty() || tail.starts_with(COMMENT) {
            return Ok(());
        }
        // `tail` is not a suffix of the input, so point at its start within `rest`.
        let tail_start = rest.len() - rest.trim_start().len();
        Err(self.error_at(&rest[tail_start..], ParseErrorKind::TrailingContent))
    }

    fn offset_of(&self, at: &str) -> usize {
        self.input.len() - at.len()
    }

    /// 1-based line and column of the start of `at`, a suffix of the input.
    fn position(&self, at: &str) -> (u32, u32) {
        let offset = self.offset_of(at);
        let consumed = &self.input[..offset];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |idx| idx + 1);
        let column = consumed[line_start..].chars().count() + 1;
        (line as u32, column as u32)
    }

    fn error_at(&self, at: &str, kind: ParseErrorKind) -> ParseError {
        let (line, column) = self.position(at);
        ParseError::new(line, column, kind)
    }
}
