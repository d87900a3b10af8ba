//! Parser for block-structured configuration files.
//!
//! Reads Apache/nginx-style configuration text, where each line is a named
//! directive with positional arguments and an optional brace-delimited
//! block of nested directives:
//!
//! ```text
//! distribution "debian" {
//!     suite stable
//!     component "main" "contrib" "non free"
//! }
//! ```
//!
//! [`parse`] turns such text into a forest of [`Directive`] nodes; the
//! [`Directives`] result offers path lookups over the finished tree.
//!
//! # Example
//!
//! ```
//! let config = blockconf::parse_str(
//!     "distribution \"debian\" {\n    suite stable\n}\n",
//! ).unwrap();
//!
//! let suite = config.first_match(&["distribution", "suite"]).unwrap();
//! assert_eq!(suite.arguments[0], "stable");
//! ```
//!
//! The grammar has no schema: directive names and argument values are
//! opaque strings, and structural rules (brace placement, one entry per
//! line inside a block) are the only thing the parser enforces.

pub mod directive;
pub mod parser;
pub mod tokenizer;

pub use directive::{Argument, Directive, Directives};
pub use parser::{ParseError, Parser};
pub use tokenizer::{Token, TokenKind, TokenizeError, Tokenizer};

use std::io::Read;
use std::path::Path;

/// Parses configuration text from any byte stream.
pub fn parse<R: Read>(reader: R) -> Result<Directives, ParseError> {
    let directives = Parser::new(reader).parse()?;
    tracing::debug!("parsed {} top-level directives", directives.len());
    Ok(directives)
}

/// Parses configuration text held in memory.
pub fn parse_str(source: &str) -> Result<Directives, ParseError> {
    parse(source.as_bytes())
}

/// Opens and parses a configuration file. Open and read failures surface
/// as [`ParseError::Io`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Directives, ParseError> {
    let file = std::fs::File::open(path)?;
    parse(file)
}
