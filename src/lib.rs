//! Parse `.env` content into an ordered map.
//!
//! Values may be bare, single-quoted (literal) or double-quoted (escapes and
//! `$VAR` / `${VAR}` substitution). Substitution only sees keys defined
//! earlier in the same input; unknown names expand to the empty string.
//!
//! Parsing never touches the process environment or the filesystem; callers
//! decide what to do with the returned [`EnvMap`].

mod error;
mod expand;
mod model;
mod parser;

pub use error::{Error, ParseError, ParseErrorKind};
pub use model::{Entry, EnvMap, ParseOptions};
pub use parser::{
    parse_bytes, parse_bytes_with_options, parse_reader, parse_reader_with_options, parse_str,
    parse_str_with_options,
};
