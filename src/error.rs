use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// A parse failure with the 1-based position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ParseErrorKind {
    /// A character outside `[A-Za-z0-9_.]` appeared before the separator.
    #[error("unexpected character {character:?} in variable name near {fragment:?}")]
    MalformedKey { character: char, fragment: String },
    #[error("zero length statement")]
    EmptyStatement,
    /// The key ran to end-of-input without `=` or `:`.
    #[error("missing `=` or `:` after variable name near {fragment:?}")]
    MissingSeparator { fragment: String },
    #[error("unterminated quoted value {fragment}")]
    UnterminatedQuote { fragment: String },
    /// Empty key, only reported with [`ParseOptions::strict_keys`](crate::ParseOptions::strict_keys).
    #[error("missing key")]
    MissingKey,
    /// Text after a closing quote, only reported with
    /// [`ParseOptions::reject_trailing_content`](crate::ParseOptions::reject_trailing_content).
    #[error("unexpected content after quoted value")]
    TrailingContent,
}
