//! The error type shared by the scanner and the parser.
//!
//! Both producers report through one taxonomy: a [`SyntaxError`] carries the
//! line and column of the failure and an [`ErrorKind`] describing it. Errors
//! propagate unchanged to the caller; there is no recovery, the first error
//! aborts the current read.
//!
//! [`SyntaxError`]: ./struct.SyntaxError.html
//! [`ErrorKind`]: ./enum.ErrorKind.html

use std::error::Error;
use std::fmt;

/// A type alias for results with possible `SyntaxError`s.
pub type Result<T> = ::std::result::Result<T, SyntaxError>;

/// The location and description of a lexical or syntax error.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq, Eq)]
pub struct SyntaxError {
    line: usize,
    col: usize,
    kind: ErrorKind,
}

/// What went wrong.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum ErrorKind {
    /// A character that cannot begin any token.
    UnrecognizedChar,
    /// A non-printable character inside a quoted atom.
    UnrecognizedQuoteChar,
    /// End of input inside a `/* … */` comment.
    UnterminatedComment,
    /// End of input before the closing quote of a quoted atom.
    UnterminatedQuote,
    /// A bad character after `\` in a quoted atom.
    IllegalEscape,
    /// A malformed or out-of-range octal escape sequence.
    IllegalOctEscape,
    /// A malformed or out-of-range hexadecimal escape sequence.
    IllegalHexEscape,
    /// The input buffer is not valid UTF-8.
    InvalidUtf8,
    /// The parser needed something that is not there.
    Expected(&'static str),
}

impl SyntaxError {
    fn new(line: usize, col: usize, kind: ErrorKind) -> SyntaxError {
        SyntaxError { line, col, kind }
    }

    pub fn unrecognized_char(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::UnrecognizedChar)
    }

    pub fn unrecognized_quote_char(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::UnrecognizedQuoteChar)
    }

    pub fn unterminated_comment(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::UnterminatedComment)
    }

    pub fn unterminated_quote(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::UnterminatedQuote)
    }

    pub fn illegal_escape(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::IllegalEscape)
    }

    pub fn illegal_oct_escape(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::IllegalOctEscape)
    }

    pub fn illegal_hex_escape(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::IllegalHexEscape)
    }

    pub fn invalid_utf8(line: usize, col: usize) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::InvalidUtf8)
    }

    /// A parser error: `what` completes the phrase "expected …".
    pub fn expected(line: usize, col: usize, what: &'static str) -> SyntaxError {
        SyntaxError::new(line, col, ErrorKind::Expected(what))
    }

    /// Returns the line at which the error occurs.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the column at which the error occurs.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: ", self.line, self.col)?;
        match self.kind {
            ErrorKind::UnrecognizedChar => f.write_str("unrecognized character"),
            ErrorKind::UnrecognizedQuoteChar => f.write_str("unrecognized quote character"),
            ErrorKind::UnterminatedComment => f.write_str("expected end of multi-line comment"),
            ErrorKind::UnterminatedQuote => f.write_str("expected closing quotation"),
            ErrorKind::IllegalEscape => f.write_str("illegal escape sequence character"),
            ErrorKind::IllegalOctEscape => {
                f.write_str("unrecognized octal escape sequence character")
            }
            ErrorKind::IllegalHexEscape => {
                f.write_str("unrecognized hexadecimal escape sequence character")
            }
            ErrorKind::InvalidUtf8 => f.write_str("invalid utf-8 sequence"),
            ErrorKind::Expected(what) => write!(f, "syntax error: expected {}", what),
        }
    }
}

impl Error for SyntaxError {}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = SyntaxError::unterminated_quote(2, 14);
        assert_eq!(err.to_string(), "2:14: expected closing quotation");
        assert_eq!(err.line(), 2);
        assert_eq!(err.col(), 14);
        assert_eq!(err.kind(), ErrorKind::UnterminatedQuote);

        let err = SyntaxError::expected(1, 9, "a closing parenthesis");
        assert_eq!(
            err.to_string(),
            "1:9: syntax error: expected a closing parenthesis"
        );
    }
}
