//! Recursive descent parser for the directive grammar.
//!
//! Drives a [`Tokenizer`] through the grammar
//!
//! ```text
//! directives    := (directive | linebreak | blank)*
//! directive     := name argument* block?
//! block         := "{" (linebreak directive)* linebreak? "}"
//! ```
//!
//! enforcing two structural rules: braces may only appear where a block is
//! expected, and every entry inside a block must start on its own line.
//! There is no error recovery; the first violation aborts the parse.

use std::io::{self, Read};

use thiserror::Error;

use crate::directive::{Argument, Directive, Directives};
use crate::tokenizer::{Token, TokenKind, TokenizeError, Tokenizer};

/// Parser error types
#[derive(Debug, Error)]
pub enum ParseError {
    /// Grammar violation, carrying the offending token text and what the
    /// grammar required in its place.
    #[error("unexpected token: {found}; expected {expected}")]
    Unexpected { found: String, expected: String },

    /// A `{` block was still open when the input ran out.
    #[error("unexpected end of input in subdirectives block; closing brace missing")]
    MissingClosingBrace,

    /// Underlying stream failure, distinct from ordinary exhaustion.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

type ParseResult<T> = Result<T, ParseError>;

/// Parser state. Owns its tokenizer exclusively for the whole parse.
pub struct Parser<R: Read> {
    tokens: Tokenizer<R>,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            tokens: Tokenizer::new(reader),
        }
    }

    /// Wraps an already-configured tokenizer, e.g. one with custom
    /// separators or comment tokens enabled.
    pub fn from_tokenizer(tokens: Tokenizer<R>) -> Self {
        Self { tokens }
    }

    /// Pulls one token, folding benign exhaustion into `None` so callers
    /// can stop cleanly. I/O failures still propagate.
    fn next_token(&mut self) -> ParseResult<Option<Token>> {
        match self.tokens.next() {
            Ok(token) => Ok(Some(token)),
            Err(TokenizeError::EndOfInput) => Ok(None),
            Err(TokenizeError::Io(err)) => Err(err.into()),
        }
    }

    /// Parses the whole input into an ordered forest of directives.
    pub fn parse(&mut self) -> ParseResult<Directives> {
        self.parse_directives()
    }

    fn parse_directives(&mut self) -> ParseResult<Directives> {
        let mut directives = Vec::new();

        while let Some(token) = self.next_token()? {
            // bare braces are illegal at the top level
            if token.text == "{" || token.text == "}" {
                return Err(ParseError::Unexpected {
                    found: token.text,
                    expected: "start of directive".to_string(),
                });
            }

            if token.text.trim().is_empty() {
                continue;
            }

            self.tokens.put_back(token);
            directives.push(self.parse_directive()?);
        }

        Ok(Directives(directives))
    }

    fn parse_directive(&mut self) -> ParseResult<Directive> {
        // The name token may already sit in the pushback stack with nothing
        // left in the stream behind it, so exhaustion here is benign.
        match self.tokens.skip_to_next_token() {
            Ok(()) | Err(TokenizeError::EndOfInput) => {}
            Err(TokenizeError::Io(err)) => return Err(err.into()),
        }

        let Some(name) = self.next_token()? else {
            return Err(ParseError::Unexpected {
                found: "end of input".to_string(),
                expected: "directive name".to_string(),
            });
        };

        let arguments = self.parse_arguments()?;
        let subdirectives = self.parse_subdirectives()?;

        let directive = Directive {
            name: name.text,
            arguments,
            subdirectives,
        };
        tracing::trace!(
            "parsed directive {} ({} arguments, {} subdirectives)",
            directive.name,
            directive.arguments.len(),
            directive.subdirectives.len()
        );
        Ok(directive)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Argument>> {
        let mut arguments = Vec::new();

        while let Some(token) = self.next_token()? {
            // the line ends or a block begins; either way the token belongs
            // to the caller
            if token.kind == TokenKind::Linebreak || token.text == "{" {
                self.tokens.put_back(token);
                break;
            }

            // truncated input can surface an empty token; stop quietly
            if token.text.is_empty() {
                break;
            }

            arguments.push(Argument(token.text));
        }

        Ok(arguments)
    }

    fn parse_subdirectives(&mut self) -> ParseResult<Directives> {
        let mut subdirectives = Vec::new();

        let Some(token) = self.next_token()? else {
            return Ok(Directives(subdirectives));
        };

        // no sub directives
        if token.text != "{" {
            self.tokens.put_back(token);
            return Ok(Directives(subdirectives));
        }

        loop {
            let Some(token) = self.next_token()? else {
                return Err(ParseError::MissingClosingBrace);
            };

            // every entry in a block starts on a fresh line
            if token.kind != TokenKind::Linebreak {
                return Err(ParseError::Unexpected {
                    found: token.text,
                    expected: "newline before new subdirective entry".to_string(),
                });
            }

            // skip blank runs before the next entry
            match self.tokens.skip(&['\n', ' ', '\t']) {
                Ok(()) => {}
                Err(TokenizeError::EndOfInput) => return Err(ParseError::MissingClosingBrace),
                Err(TokenizeError::Io(err)) => return Err(err.into()),
            }

            let Some(token) = self.next_token()? else {
                return Err(ParseError::MissingClosingBrace);
            };

            // end of the block
            if token.text == "}" {
                break;
            }

            self.tokens.put_back(token);
            subdirectives.push(self.parse_directive()?);
        }

        Ok(Directives(subdirectives))
    }
}
