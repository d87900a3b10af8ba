//! Rune-level tokenizer for block-structured configuration text.
//!
//! Splits an input stream into [`Token`]s while tracking the absolute rune
//! offset of every token for diagnostics. The tokenizer is pull-based: the
//! parser asks for one token at a time and may return one with
//! [`put_back`](Tokenizer::put_back) to get one token of lookahead.
//!
//! Scanning rules:
//! - Runs of separator runes (space and tab by default) split tokens.
//! - `"..."` produces a single Quoted token with the delimiters stripped;
//!   there is no escape syntax, so a quoted value cannot contain `"`.
//! - `#` starts a comment running to the end of the line. Comments are
//!   dropped unless [`skip_comments`](Tokenizer::skip_comments) is disabled.
//! - A newline on its own becomes a Linebreak token; a newline ending a
//!   token is left in the stream so it can become one on the next call.

use std::io::{self, BufReader, Read};

use thiserror::Error;

/// Classification of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted run of non-separator runes.
    Literal,
    /// Content of a `"..."` string, delimiters stripped.
    Quoted,
    /// Content of a `# ...` comment, marker stripped.
    Comment,
    /// A newline standing on its own (`text` is `"\n"`).
    Linebreak,
}

/// A lexical unit with its 0-based rune offset in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: usize,
    pub kind: TokenKind,
}

/// Tokenizer failure. `EndOfInput` is a control signal ("no more tokens"),
/// not a hard error; callers match on it at their natural stopping points.
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("end of input")]
    EndOfInput,

    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Incremental UTF-8 decoder with a one-rune unread slot.
struct RuneReader<R: Read> {
    inner: R,
    unread: Option<char>,
}

impl<R: Read> RuneReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            unread: None,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads one rune, or `None` at end of input. Invalid UTF-8 decodes to
    /// U+FFFD one byte at a time rather than failing the read.
    fn read_rune(&mut self) -> io::Result<Option<char>> {
        if let Some(ch) = self.unread.take() {
            return Ok(Some(ch));
        }

        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        if first < 0x80 {
            return Ok(Some(first as char));
        }

        let len = match first {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            match self.next_byte()? {
                Some(b) => *slot = b,
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            }
        }

        match std::str::from_utf8(&buf[..len]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Ok(Some(char::REPLACEMENT_CHARACTER)),
        }
    }

    /// Makes `ch` the next rune returned by `read_rune`. Only one rune of
    /// unread is ever in flight; a second unread before a read is a bug in
    /// the scanner itself.
    fn unread_rune(&mut self, ch: char) {
        debug_assert!(self.unread.is_none(), "double rune unread");
        self.unread = Some(ch);
    }
}

/// Position-tracking tokenizer over any [`Read`] source.
pub struct Tokenizer<R: Read> {
    input: RuneReader<BufReader<R>>,

    /// Runes that split tokens. Space and tab by default.
    pub separators: Vec<char>,

    /// When set (the default), comment tokens are consumed and dropped
    /// instead of being handed to the caller.
    pub skip_comments: bool,

    pushed_back: Vec<Token>,

    /// Runes consumed so far, counting the read that discovers end of input.
    pos: usize,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: RuneReader::new(BufReader::new(reader)),
            separators: vec![' ', '\t'],
            skip_comments: true,
            pushed_back: Vec::new(),
            pos: 0,
        }
    }

    pub fn is_separator(&self, ch: char) -> bool {
        self.separators.contains(&ch)
    }

    fn read_rune(&mut self) -> io::Result<Option<char>> {
        let ru = self.input.read_rune()?;
        self.pos += 1;
        Ok(ru)
    }

    fn unread_rune(&mut self, ch: char) {
        self.input.unread_rune(ch);
        self.pos -= 1;
    }

    /// Re-queues `token` so the next call to [`next`](Self::next) returns it
    /// again, position intact. Tokens are replayed most-recently-pushed
    /// first; depth is unbounded.
    pub fn put_back(&mut self, token: Token) {
        self.pushed_back.push(token);
    }

    /// Skips leading separator runes, leaving the stream on the first rune
    /// of the next token.
    pub fn skip_to_next_token(&mut self) -> Result<(), TokenizeError> {
        let separators = self.separators.clone();
        self.skip(&separators)
    }

    /// Discards runes while they belong to `runes`, then unreads the first
    /// rune that does not. `EndOfInput` if the run extends to the end of
    /// the stream.
    pub fn skip(&mut self, runes: &[char]) -> Result<(), TokenizeError> {
        while let Some(ru) = self.read_rune()? {
            if runes.contains(&ru) {
                continue;
            }
            self.unread_rune(ru);
            return Ok(());
        }
        Err(TokenizeError::EndOfInput)
    }

    /// Produces the next token, replaying pushed-back tokens first.
    ///
    /// `EndOfInput` means the stream is exhausted and no token was started;
    /// a token cut short by end of input is still returned.
    pub fn next(&mut self) -> Result<Token, TokenizeError> {
        if let Some(token) = self.pushed_back.pop() {
            return Ok(token);
        }

        let mut text = String::new();
        let mut kind = None;
        // Correction applied to the position formula below: one per newline
        // consumed while the token was still open.
        let mut shift: isize = -1;

        while let Some(ru) = self.read_rune()? {
            // quoted string
            if ru == '"' && text.is_empty() {
                text = self.read_quoted(&mut shift)?;
                kind = Some(TokenKind::Quoted);
                break;
            }

            // comment until end of line
            if ru == '#' && text.is_empty() {
                let comment = self.read_comment()?;
                if self.skip_comments {
                    continue;
                }
                text = comment;
                kind = Some(TokenKind::Comment);
                break;
            }

            // separator
            if self.is_separator(ru) {
                if text.is_empty() {
                    continue;
                }
                break;
            }

            // end of line
            if ru == '\n' {
                shift += 1;

                if text.is_empty() {
                    text.push(ru);
                    kind = Some(TokenKind::Linebreak);
                    break;
                }

                // leave the newline for the next call
                self.unread_rune(ru);
                break;
            }

            // normal runes
            text.push(ru);
            kind = Some(TokenKind::Literal);
        }

        let Some(kind) = kind else {
            return Err(TokenizeError::EndOfInput);
        };

        let position = (self.pos as isize - text.chars().count() as isize + shift) as usize;
        Ok(Token {
            text,
            position,
            kind,
        })
    }

    /// Consumes up to the closing quote, which is discarded. End of input
    /// before the closing quote yields the partial content.
    fn read_quoted(&mut self, shift: &mut isize) -> io::Result<String> {
        let mut text = String::new();
        while let Some(ru) = self.read_rune()? {
            if ru == '"' {
                break;
            }
            if ru == '\n' {
                *shift += 1;
            }
            text.push(ru);
        }
        Ok(text)
    }

    /// Consumes up to (not including) the terminating newline, which stays
    /// in the stream.
    fn read_comment(&mut self) -> io::Result<String> {
        let mut text = String::new();
        while let Some(ru) = self.read_rune()? {
            if ru == '\n' {
                self.unread_rune(ru);
                break;
            }
            text.push(ru);
        }
        Ok(text)
    }
}
