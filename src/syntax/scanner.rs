//! The lexer for logic programs.
//!
//! A [`Scanner`] turns a UTF-8 buffer into a stream of [`Token`]s. It is a
//! single explicit state machine that walks the buffer one code point at a
//! time, keeping two cursors into it: `beg`, where the current lexeme
//! starts, and `end`, where the current code point starts. The machine
//! commits to a token only once the lookahead proves that the next code
//! point must begin a different token, then rewinds onto the last consumed
//! code point; the rewind distances (1 for ordinary lookahead, 2 when a
//! radix prefix like `0b` turns out to be the integer zero, 3 when a float
//! exponent gives back both the `e` and its sign) are part of the lexical
//! contract.
//!
//! Buffers are normalized to NFKC when set, so equivalent source text
//! always lexes to equivalent tokens.
//!
//! If `next_token` fails, the scanner position is rolled back to its state
//! at entry, so a caller observing an error sees the position of the token
//! that could not be read.
//!
//! [`Scanner`]: ./struct.Scanner.html
//! [`Token`]: ../token/struct.Token.html

use std::mem;
use std::str;

use unicode_normalization::UnicodeNormalization;

use crate::syntax::error::{Result, SyntaxError};
use crate::syntax::token::{Token, TokenKind};
use crate::syntax::unicode;

/// A state-machine lexer over a UTF-8 buffer.
pub struct Scanner {
    buf: String,
    line: usize,
    col: usize,
    beg: usize,
    end: usize,
    cp: Option<char>,
    cp_len: usize,

    // Quoted-atom helpers: the accumulated content, the pending digits of a
    // numeric escape, and which radix those digits are in.
    quote: char,
    quoted: String,
    escape: String,
    esc_mode: EscMode,
}

#[derive(Clone, Copy)]
#[derive(PartialEq)]
enum EscMode {
    Off,
    Oct,
    Hex,
}

/// The states of the token recognizer.
enum State {
    Begin,
    MaybeEnd,

    LineComment,
    MaybeBlockCommentOpen,
    BlockComment,
    MaybeBlockCommentClose,

    AlphaName,
    GraphicName,
    Variable,

    QuotedOpen,
    MaybeQuotedClose,
    QuotedEscape,
    QuotedOctEscape,
    MaybeQuotedHexEscape,
    QuotedHexEscape,

    MaybeRadixInt,
    MaybeBinInt,
    MaybeOctInt,
    MaybeHexInt,
    MaybeDecInt,
    BinInt,
    OctInt,
    HexInt,

    MaybeFloatFrac,
    FloatFrac,
    MaybeFloatExp,
    MaybeFloatExpInt,
    FloatExpInt,
}

// Public API
// --------------------------------------------------

impl Scanner {
    /// Constructs a scanner with an empty buffer.
    pub fn new() -> Scanner {
        Scanner {
            buf: String::new(),
            line: 1,
            col: 1,
            beg: 0,
            end: 0,
            cp: None,
            cp_len: 0,
            quote: '\'',
            quoted: String::with_capacity(32),
            escape: String::with_capacity(8),
            esc_mode: EscMode::Off,
        }
    }

    /// Replaces the buffer and resets the position to its start.
    ///
    /// The input is normalized to NFKC; token spans refer to the
    /// normalized buffer.
    pub fn set_buffer(&mut self, src: &str) {
        self.buf.clear();
        self.buf.extend(src.nfkc());
        self.line = 1;
        self.col = 1;
        self.beg = 0;
        self.end = 0;
        self.decode_current();
    }

    /// Like [`set_buffer`](#method.set_buffer) for raw bytes; reports
    /// `InvalidUtf8` with the position of the first offending byte.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        match str::from_utf8(bytes) {
            Ok(src) => {
                self.set_buffer(src);
                Ok(())
            }
            Err(err) => {
                let prefix = &bytes[..err.valid_up_to()];
                let line = 1 + prefix.iter().filter(|&&b| b == b'\n').count();
                let start = match prefix.iter().rposition(|&b| b == b'\n') {
                    Some(i) => i + 1,
                    None => 0,
                };
                let col = 1 + prefix[start..]
                    .iter()
                    .filter(|&&b| !unicode::is_continuation_byte(b))
                    .count();
                Err(SyntaxError::invalid_utf8(line, col))
            }
        }
    }

    /// The normalized buffer that token spans index into.
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// The line of the next code point to be read, counted from 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of the next code point to be read, counted from 1 in
    /// code points.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Reads the next token.
    ///
    /// Layout and comments before the token are consumed. Returns
    /// `Ok(None)` at the end of the buffer. On a lexical error the scanner
    /// position is restored to its state at entry.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let (line, col, beg, end) = (self.line, self.col, self.beg, self.end);
        match self.scan() {
            Ok(tok) => Ok(tok),
            Err(err) => {
                self.line = line;
                self.col = col;
                self.beg = beg;
                self.end = end;
                self.decode_current();
                Err(err)
            }
        }
    }
}

impl Default for Scanner {
    fn default() -> Scanner {
        Scanner::new()
    }
}

// Position primitives
// --------------------------------------------------

impl Scanner {
    /// Decodes the code point starting at `end`.
    fn decode_current(&mut self) {
        match unicode::decode(self.buf.as_bytes(), self.end) {
            Some((ch, len)) => {
                self.cp = Some(ch);
                self.cp_len = len;
            }
            None => {
                self.cp = None;
                self.cp_len = 0;
            }
        }
    }

    /// Advances `end` by `n` code points.
    fn forward(&mut self, n: usize) {
        for _ in 0..n {
            if self.end >= self.buf.len() {
                break;
            }
            if self.cp == Some('\n') {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.end += self.cp_len;
            self.decode_current();
        }
    }

    /// Retreats `end` by `n` code points.
    fn rewind(&mut self, n: usize) {
        for _ in 0..n {
            if self.end == 0 {
                break;
            }
            self.end -= 1;
            while self.end > 0 && !unicode::is_first_byte(self.buf.as_bytes()[self.end]) {
                self.end -= 1;
            }
            self.decode_current();
            if self.cp == Some('\n') {
                self.line -= 1;
                self.col = self.col_at(self.end);
            } else {
                self.col -= 1;
            }
        }
    }

    /// Advances `beg` by `n` code points, consuming layout or comment
    /// content.
    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.beg >= self.buf.len() {
                break;
            }
            match unicode::decode(self.buf.as_bytes(), self.beg) {
                Some((_, len)) => self.beg += len,
                None => break,
            }
        }
    }

    /// Starts the next lexeme just past the current code point.
    fn next_lexeme(&mut self) {
        self.forward(1);
        self.beg = self.end;
    }

    /// The slice from the start of the lexeme through the current code
    /// point.
    fn current_lexeme(&self) -> &str {
        &self.buf[self.beg..self.end + self.cp_len]
    }

    /// The 1-based column of the code point starting at byte `pos`.
    fn col_at(&self, pos: usize) -> usize {
        let bytes = self.buf.as_bytes();
        let start = match bytes[..pos].iter().rposition(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => 0,
        };
        self.buf[start..pos].chars().count() + 1
    }
}

// Lexing logic
// --------------------------------------------------

impl Scanner {
    /// Builds a token over the current lexeme and advances past it.
    fn emit(&mut self, kind: TokenKind, line: usize, col: usize) -> Token {
        let span = self.beg..self.end + self.cp_len;
        let tok = Token::new(kind, line, col, span);
        self.next_lexeme();
        tok
    }

    /// Parses the current lexeme as an integer, skipping `prefix` bytes of
    /// radix marker. Saturates on overflow.
    fn int_lexeme(&self, prefix: usize, radix: u32) -> i64 {
        let lex = &self.current_lexeme()[prefix..];
        i64::from_str_radix(lex, radix).unwrap_or(i64::MAX)
    }

    /// Parses the current lexeme as a float.
    fn float_lexeme(&self) -> f64 {
        self.current_lexeme().parse().unwrap_or(f64::INFINITY)
    }

    /// Begins accumulating a quoted atom delimited by `quote`.
    fn open_quote(&mut self, quote: char) {
        self.quote = quote;
        self.quoted.clear();
        self.escape.clear();
        self.esc_mode = EscMode::Off;
    }

    /// Appends a code point to the quoted atom, or to the pending escape
    /// digits while a numeric escape is open. Leading zeros of an escape
    /// are dropped as they arrive.
    fn quoted_append(&mut self, ch: char) {
        match self.esc_mode {
            EscMode::Off => self.quoted.push(ch),
            EscMode::Oct | EscMode::Hex => {
                if self.escape == "0" {
                    self.escape.clear();
                }
                self.escape.push(ch);
            }
        }
    }

    /// Converts the pending escape digits to a code point and appends it.
    /// Fails on over-long digit runs (more than 7 octal or 6 hex digits)
    /// and on values that are not Unicode scalars.
    fn flush_escape(&mut self) -> bool {
        let (radix, max_digits) = match self.esc_mode {
            EscMode::Oct => (8, 7),
            EscMode::Hex => (16, 6),
            EscMode::Off => return false,
        };
        self.esc_mode = EscMode::Off;
        let digits = mem::take(&mut self.escape);
        if digits.len() > max_digits {
            return false;
        }
        match u32::from_str_radix(&digits, radix).ok().and_then(unicode::scalar) {
            Some(ch) => {
                self.quoted.push(ch);
                true
            }
            None => false,
        }
    }

    /// The main loop: one iteration per code point, driven by the state.
    fn scan(&mut self) -> Result<Option<Token>> {
        let mut state = State::Begin;
        let mut tok_line = self.line;
        let mut tok_col = self.col;
        loop {
            match state {
                State::Begin => {
                    tok_line = self.line;
                    tok_col = self.col;
                    match self.cp {
                        None => return Ok(None),

                        Some('%') => {
                            self.skip(1);
                            state = State::LineComment;
                        }
                        Some('/') => state = State::MaybeBlockCommentOpen,

                        Some('(') => {
                            return Ok(Some(self.emit(TokenKind::ParenOpen, tok_line, tok_col)))
                        }
                        Some(')') => {
                            return Ok(Some(self.emit(TokenKind::ParenClose, tok_line, tok_col)))
                        }
                        Some('[') => {
                            return Ok(Some(self.emit(TokenKind::BracketOpen, tok_line, tok_col)))
                        }
                        Some(']') => {
                            return Ok(Some(self.emit(TokenKind::BracketClose, tok_line, tok_col)))
                        }
                        Some('{') => {
                            return Ok(Some(self.emit(TokenKind::BraceOpen, tok_line, tok_col)))
                        }
                        Some('}') => {
                            return Ok(Some(self.emit(TokenKind::BraceClose, tok_line, tok_col)))
                        }
                        Some('|') => {
                            return Ok(Some(self.emit(TokenKind::Bar, tok_line, tok_col)))
                        }
                        Some(',') => {
                            return Ok(Some(self.emit(TokenKind::Comma, tok_line, tok_col)))
                        }

                        // Solo atoms.
                        Some(ch @ (';' | '!')) => {
                            let kind = TokenKind::Name(ch.to_string());
                            return Ok(Some(self.emit(kind, tok_line, tok_col)));
                        }

                        Some(ch) if unicode::is_quote(ch) => {
                            self.open_quote(ch);
                            state = State::QuotedOpen;
                        }

                        Some('.') => state = State::MaybeEnd,
                        Some('0') => state = State::MaybeRadixInt,

                        Some(ch) if unicode::is_layout(ch) => self.skip(1),
                        Some(ch) if unicode::is_lower(ch) => state = State::AlphaName,
                        Some(ch) if unicode::is_dec_digit(ch) => state = State::MaybeDecInt,
                        Some(ch) if unicode::is_graphic(ch) => state = State::GraphicName,
                        Some(ch) if unicode::is_alnum(ch) => state = State::Variable,

                        Some(_) => {
                            return Err(SyntaxError::unrecognized_char(self.line, self.col))
                        }
                    }
                }

                // A period ends the clause only when followed by layout,
                // end of input, or a line comment; any other graphic
                // character extends it into a graphic atom.
                State::MaybeEnd => match self.cp {
                    Some('%') => {
                        self.rewind(1);
                        return Ok(Some(self.emit(TokenKind::End, tok_line, tok_col)));
                    }
                    Some(ch) if unicode::is_graphic(ch) => state = State::GraphicName,
                    None => {
                        self.rewind(1);
                        return Ok(Some(self.emit(TokenKind::End, tok_line, tok_col)));
                    }
                    Some(ch) if unicode::is_layout(ch) => {
                        self.rewind(1);
                        return Ok(Some(self.emit(TokenKind::End, tok_line, tok_col)));
                    }
                    Some(_) => {
                        self.rewind(1);
                        let kind = TokenKind::Name(".".to_string());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::LineComment => {
                    match self.cp {
                        None => state = State::Begin,
                        Some(ch) if unicode::is_newline(ch) => state = State::Begin,
                        Some(_) => {}
                    }
                    self.skip(1);
                }

                State::MaybeBlockCommentOpen => match self.cp {
                    Some('*') => {
                        // Discard the '/' and '*' both.
                        self.skip(2);
                        state = State::BlockComment;
                    }
                    _ => {
                        self.rewind(1);
                        state = State::GraphicName;
                    }
                },

                State::BlockComment => {
                    match self.cp {
                        Some('*') => state = State::MaybeBlockCommentClose,
                        None => {
                            return Err(SyntaxError::unterminated_comment(self.line, self.col))
                        }
                        Some(_) => {}
                    }
                    self.skip(1);
                }

                State::MaybeBlockCommentClose => {
                    match self.cp {
                        Some('/') => state = State::Begin,
                        Some('*') => {}
                        None => {
                            return Err(SyntaxError::unterminated_comment(self.line, self.col))
                        }
                        Some(_) => state = State::BlockComment,
                    }
                    self.skip(1);
                }

                State::AlphaName => match self.cp {
                    Some(ch) if unicode::is_alnum(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Name(self.current_lexeme().to_string());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::GraphicName => match self.cp {
                    Some(ch) if unicode::is_graphic(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Name(self.current_lexeme().to_string());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::Variable => match self.cp {
                    Some(ch) if unicode::is_alnum(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Variable(self.current_lexeme().to_string());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::QuotedOpen => match self.cp {
                    Some(ch) if ch == self.quote => state = State::MaybeQuotedClose,
                    Some(ch) if unicode::is_quote(ch) => self.quoted_append(ch),
                    None => {
                        return Err(SyntaxError::unterminated_quote(self.line, self.col))
                    }
                    // Raw control characters with an escape spelling are
                    // accepted literally.
                    Some(ch @ ('\x07' | '\x08' | '\x0C' | '\n' | '\r' | '\t' | '\x0B')) => {
                        self.quoted_append(ch)
                    }
                    Some('\\') => state = State::QuotedEscape,
                    Some(ch) if unicode::is_quoted(ch) => self.quoted_append(ch),
                    Some(_) => {
                        return Err(SyntaxError::unrecognized_quote_char(self.line, self.col))
                    }
                },

                // A second quote in a row encodes one quote character;
                // anything else closes the atom.
                State::MaybeQuotedClose => match self.cp {
                    Some(ch) if ch == self.quote => {
                        self.quoted_append(ch);
                        state = State::QuotedOpen;
                    }
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Name(self.quoted.clone());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::QuotedEscape => match self.cp {
                    Some('a') => {
                        self.quoted_append('\x07');
                        state = State::QuotedOpen;
                    }
                    Some('b') => {
                        self.quoted_append('\x08');
                        state = State::QuotedOpen;
                    }
                    Some('f') => {
                        self.quoted_append('\x0C');
                        state = State::QuotedOpen;
                    }
                    Some('n') => {
                        self.quoted_append('\n');
                        state = State::QuotedOpen;
                    }
                    Some('r') => {
                        self.quoted_append('\r');
                        state = State::QuotedOpen;
                    }
                    Some('t') => {
                        self.quoted_append('\t');
                        state = State::QuotedOpen;
                    }
                    Some('v') => {
                        self.quoted_append('\x0B');
                        state = State::QuotedOpen;
                    }
                    Some(ch @ ('\\' | '\'' | '"' | '`')) => {
                        self.quoted_append(ch);
                        state = State::QuotedOpen;
                    }
                    Some('x') => state = State::MaybeQuotedHexEscape,
                    Some(ch) if unicode::is_oct_digit(ch) => {
                        self.esc_mode = EscMode::Oct;
                        self.quoted_append(ch);
                        state = State::QuotedOctEscape;
                    }
                    _ => return Err(SyntaxError::illegal_escape(self.line, self.col)),
                },

                // Besides the standard `\` terminator, a layout character
                // or the closing quote also ends the sequence; those are
                // given back to be read again as quote content.
                State::QuotedOctEscape => match self.cp {
                    Some('\\') => {
                        if self.flush_escape() {
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_oct_escape(self.line, self.col));
                        }
                    }
                    Some(' ' | '\x0C' | '\n' | '\r' | '\t' | '\x0B') => {
                        if self.flush_escape() {
                            self.rewind(1);
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_oct_escape(self.line, self.col));
                        }
                    }
                    Some(ch) if ch == self.quote => {
                        if self.flush_escape() {
                            self.rewind(1);
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_oct_escape(self.line, self.col));
                        }
                    }
                    Some(ch) if unicode::is_oct_digit(ch) => self.quoted_append(ch),
                    _ => return Err(SyntaxError::illegal_oct_escape(self.line, self.col)),
                },

                State::MaybeQuotedHexEscape => match self.cp {
                    Some(ch) if unicode::is_hex_digit(ch) => {
                        self.esc_mode = EscMode::Hex;
                        self.quoted_append(ch);
                        state = State::QuotedHexEscape;
                    }
                    _ => return Err(SyntaxError::illegal_hex_escape(self.line, self.col)),
                },

                State::QuotedHexEscape => match self.cp {
                    Some('\\') => {
                        if self.flush_escape() {
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_hex_escape(self.line, self.col));
                        }
                    }
                    Some(' ' | '\x0C' | '\n' | '\r' | '\t' | '\x0B') => {
                        if self.flush_escape() {
                            self.rewind(1);
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_hex_escape(self.line, self.col));
                        }
                    }
                    Some(ch) if ch == self.quote => {
                        if self.flush_escape() {
                            self.rewind(1);
                            state = State::QuotedOpen;
                        } else {
                            return Err(SyntaxError::illegal_hex_escape(self.line, self.col));
                        }
                    }
                    Some(ch) if unicode::is_hex_digit(ch) => self.quoted_append(ch),
                    _ => return Err(SyntaxError::illegal_hex_escape(self.line, self.col)),
                },

                // A leading zero may open a radix literal, a float, a
                // longer decimal, or stand alone.
                State::MaybeRadixInt => match self.cp {
                    Some('b') => state = State::MaybeBinInt,
                    Some('o') => state = State::MaybeOctInt,
                    Some('x') => state = State::MaybeHexInt,
                    Some('.') => state = State::MaybeFloatFrac,
                    Some(ch) if unicode::is_dec_digit(ch) => state = State::MaybeDecInt,
                    _ => {
                        self.rewind(1);
                        return Ok(Some(self.emit(TokenKind::Int(0), tok_line, tok_col)));
                    }
                },

                // Without a digit after the radix marker, the zero stands
                // alone and the marker begins the next token.
                State::MaybeBinInt => match self.cp {
                    Some(ch) if unicode::is_bin_digit(ch) => state = State::BinInt,
                    _ => {
                        self.rewind(2);
                        return Ok(Some(self.emit(TokenKind::Int(0), tok_line, tok_col)));
                    }
                },

                State::MaybeOctInt => match self.cp {
                    Some(ch) if unicode::is_oct_digit(ch) => state = State::OctInt,
                    _ => {
                        self.rewind(2);
                        return Ok(Some(self.emit(TokenKind::Int(0), tok_line, tok_col)));
                    }
                },

                State::MaybeHexInt => match self.cp {
                    Some(ch) if unicode::is_hex_digit(ch) => state = State::HexInt,
                    _ => {
                        self.rewind(2);
                        return Ok(Some(self.emit(TokenKind::Int(0), tok_line, tok_col)));
                    }
                },

                State::BinInt => match self.cp {
                    Some(ch) if unicode::is_bin_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Int(self.int_lexeme(2, 2));
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::OctInt => match self.cp {
                    Some(ch) if unicode::is_oct_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Int(self.int_lexeme(2, 8));
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::HexInt => match self.cp {
                    Some(ch) if unicode::is_hex_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Int(self.int_lexeme(2, 16));
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::MaybeDecInt => match self.cp {
                    Some('.') => state = State::MaybeFloatFrac,
                    Some(ch) if unicode::is_dec_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Int(self.int_lexeme(0, 10));
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                // The period belongs to the float only if a digit follows;
                // otherwise it is given back (it is likely the end token).
                State::MaybeFloatFrac => match self.cp {
                    Some(ch) if unicode::is_dec_digit(ch) => state = State::FloatFrac,
                    _ => {
                        self.rewind(2);
                        let kind = TokenKind::Int(self.int_lexeme(0, 10));
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::FloatFrac => match self.cp {
                    Some('e') | Some('E') => state = State::MaybeFloatExp,
                    Some(ch) if unicode::is_dec_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Float(self.float_lexeme());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                // `e` opens an exponent only if digits (or a signed digit
                // run) follow; otherwise the float ends before it.
                State::MaybeFloatExp => match self.cp {
                    Some('+') | Some('-') => state = State::MaybeFloatExpInt,
                    Some(ch) if unicode::is_dec_digit(ch) => state = State::FloatExpInt,
                    _ => {
                        self.rewind(2);
                        let kind = TokenKind::Float(self.float_lexeme());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::MaybeFloatExpInt => match self.cp {
                    Some(ch) if unicode::is_dec_digit(ch) => state = State::FloatExpInt,
                    _ => {
                        self.rewind(3);
                        let kind = TokenKind::Float(self.float_lexeme());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },

                State::FloatExpInt => match self.cp {
                    Some(ch) if unicode::is_dec_digit(ch) => {}
                    _ => {
                        self.rewind(1);
                        let kind = TokenKind::Float(self.float_lexeme());
                        return Ok(Some(self.emit(kind, tok_line, tok_col)));
                    }
                },
            }

            self.forward(1);
        }
    }
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn scan_all(src: &str) -> Vec<Token> {
        let mut scanner = Scanner::new();
        scanner.set_buffer(src);
        let mut toks = Vec::new();
        while let Some(tok) = scanner.next_token().unwrap() {
            toks.push(tok);
        }
        toks
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        scan_all(src).into_iter().map(Token::into_kind).collect()
    }

    fn name(s: &str) -> TokenKind {
        TokenKind::Name(s.to_string())
    }

    fn var(s: &str) -> TokenKind {
        TokenKind::Variable(s.to_string())
    }

    #[test]
    #[cfg_attr(rustfmt, rustfmt_skip)]
    fn basic() {
        let pl = "foo( X, 3.14 ).";
        let toks = scan_all(pl);
        assert_eq!(toks[0], Token::new(name("foo"), 1, 1, 0..3));
        assert_eq!(toks[1], Token::new(TokenKind::ParenOpen, 1, 4, 3..4));
        assert_eq!(toks[2], Token::new(var("X"), 1, 6, 5..6));
        assert_eq!(toks[3], Token::new(TokenKind::Comma, 1, 7, 6..7));
        assert_eq!(toks[4], Token::new(TokenKind::Float(3.14), 1, 9, 8..12));
        assert_eq!(toks[5], Token::new(TokenKind::ParenClose, 1, 14, 13..14));
        assert_eq!(toks[6], Token::new(TokenKind::End, 1, 15, 14..15));
        assert_eq!(toks.len(), 7);
    }

    #[test]
    fn atoms_and_variables() {
        assert_eq!(
            kinds("foo my_Atom123 + :- \\= ; ! _abc ABC _ λx Λx"),
            vec![
                name("foo"),
                name("my_Atom123"),
                name("+"),
                name(":-"),
                name("\\="),
                name(";"),
                name("!"),
                var("_abc"),
                var("ABC"),
                var("_"),
                name("λx"),
                var("Λx"),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("123 0 0b1101 0o644 0xDEADBEEF 456.789 8.765e43 1.0e-1 2.5E+2"),
            vec![
                TokenKind::Int(123),
                TokenKind::Int(0),
                TokenKind::Int(0b1101),
                TokenKind::Int(0o644),
                TokenKind::Int(0xDEADBEEF),
                TokenKind::Float(456.789),
                TokenKind::Float(8.765e43),
                TokenKind::Float(1.0e-1),
                TokenKind::Float(2.5e2),
            ]
        );
    }

    #[test]
    fn radix_marker_rewinds() {
        // Without a digit the marker letter starts the next token.
        assert_eq!(kinds("0b"), vec![TokenKind::Int(0), name("b")]);
        assert_eq!(kinds("0o("), vec![TokenKind::Int(0), name("o"), TokenKind::ParenOpen]);
        assert_eq!(kinds("0x"), vec![TokenKind::Int(0), name("x")]);
        assert_eq!(kinds("0 "), vec![TokenKind::Int(0)]);
    }

    #[test]
    fn float_exponent_rewinds() {
        // `e` with no exponent digits is given back.
        assert_eq!(kinds("1.5e "), vec![TokenKind::Float(1.5), name("e")]);
        // `e+` with no digits gives back both.
        assert_eq!(
            kinds("1.5e+x"),
            vec![TokenKind::Float(1.5), name("e"), name("+"), name("x")]
        );
        assert_eq!(kinds("1.5e2"), vec![TokenKind::Float(1.5e2)]);
    }

    #[test]
    fn end_token_recognition() {
        // A trailing period is END only before layout, EOF, or a comment.
        assert_eq!(kinds("1."), vec![TokenKind::Int(1), TokenKind::End]);
        assert_eq!(kinds("a. b"), vec![name("a"), TokenKind::End, name("b")]);
        assert_eq!(kinds("a.% c"), vec![name("a"), TokenKind::End]);
        // Period glued to a graphic character is a graphic atom.
        assert_eq!(kinds("a .< b"), vec![name("a"), name(".<"), name("b")]);
        // Period glued to anything else is the atom `.`.
        assert_eq!(kinds("a .b"), vec![name("a"), name("."), name("b")]);
        assert_eq!(kinds("1.x"), vec![TokenKind::Int(1), name("."), name("x")]);
    }

    #[test]
    fn comments() {
        assert_eq!(kinds("a % rest\nb"), vec![name("a"), name("b")]);
        assert_eq!(kinds("/* x */ a"), vec![name("a")]);
        assert_eq!(kinds("/* * ** */ a"), vec![name("a")]);
        assert_eq!(kinds("/**/a"), vec![name("a")]);
        // A '/' not followed by '*' is a graphic atom.
        assert_eq!(kinds("a / b"), vec![name("a"), name("/"), name("b")]);
        assert_eq!(kinds("//"), vec![name("//")]);
    }

    #[test]
    fn unterminated_comment() {
        let mut scanner = Scanner::new();
        scanner.set_buffer("/* no end");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::unterminated_comment(1, 10));
        // The position was rolled back, so the next read fails the same way.
        assert_eq!(scanner.line(), 1);
        assert_eq!(scanner.col(), 1);
        assert_eq!(scanner.next_token().unwrap_err(), err);
    }

    #[test]
    fn quoted_atoms() {
        assert_eq!(kinds("'hello world'"), vec![name("hello world")]);
        assert_eq!(kinds("\"double\""), vec![name("double")]);
        assert_eq!(kinds("`back`"), vec![name("back")]);
        // A doubled quote encodes one quote.
        assert_eq!(kinds("'it''s'"), vec![name("it's")]);
        assert_eq!(kinds("\"a\"\"b\""), vec![name("a\"b")]);
        // Non-delimiting quotes pass through.
        assert_eq!(kinds("'a\"b'"), vec![name("a\"b")]);
    }

    #[test]
    fn quoted_escapes() {
        assert_eq!(kinds(r"'a\nb'"), vec![name("a\nb")]);
        assert_eq!(kinds(r"'\a\b\f\r\t\v'"), vec![name("\x07\x08\x0C\r\t\x0B")]);
        assert_eq!(kinds(r"'q\\q'"), vec![name("q\\q")]);
        assert_eq!(kinds(r"'\''"), vec![name("'")]);
        // Octal and hex sequences, backslash-terminated.
        assert_eq!(kinds(r"'\101\'"), vec![name("A")]);
        assert_eq!(kinds(r"'\x41\'"), vec![name("A")]);
        assert_eq!(kinds(r"'\x1F600\'"), vec![name("\u{1F600}")]);
        // Leading zeros are dropped.
        assert_eq!(kinds(r"'\000101\'"), vec![name("A")]);
        // A layout character or the closing quote also terminates, and is
        // read again.
        assert_eq!(kinds("'\\101 b'"), vec![name("A b")]);
        assert_eq!(kinds(r"'\x41'"), vec![name("A")]);
    }

    #[test]
    fn quoted_errors() {
        let mut scanner = Scanner::new();

        scanner.set_buffer("'unterminated");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::unterminated_quote(1, 14));

        scanner.set_buffer(r"'\q'");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::illegal_escape(1, 3));

        scanner.set_buffer(r"'\xZ'");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::illegal_hex_escape(1, 4));

        // Eight octal digits overflow the sequence.
        scanner.set_buffer(r"'\12345670\'");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::illegal_oct_escape(1, 11));

        // Above the last code point.
        scanner.set_buffer(r"'\x110000\'");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::illegal_hex_escape(1, 10));
    }

    #[test]
    fn unrecognized_character() {
        let mut scanner = Scanner::new();
        scanner.set_buffer("\u{7}");
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err, SyntaxError::unrecognized_char(1, 1));
    }

    #[test]
    fn positions_across_lines() {
        let toks = scan_all("foo.\n  bar.\n");
        assert_eq!(toks[0].line(), 1);
        assert_eq!(toks[0].col(), 1);
        assert_eq!(toks[1].line(), 1);
        assert_eq!(toks[1].col(), 4);
        assert_eq!(toks[2].line(), 2);
        assert_eq!(toks[2].col(), 3);
        assert_eq!(toks[3].line(), 2);
        assert_eq!(toks[3].col(), 6);
    }

    #[test]
    fn forward_rewind_round_trip() {
        // Five code points remain after forward(3), so every k here moves
        // the full distance both ways.
        let mut scanner = Scanner::new();
        for k in 0..=5 {
            scanner.set_buffer("ab\ncδe\nf");
            scanner.forward(3);
            let snap = (scanner.line, scanner.col, scanner.beg, scanner.end, scanner.cp);
            scanner.forward(k);
            scanner.rewind(k);
            assert_eq!(
                (scanner.line, scanner.col, scanner.beg, scanner.end, scanner.cp),
                snap,
                "forward({k}) then rewind({k})"
            );
        }
    }

    #[test]
    fn lexeme_coverage() {
        // Token spans tile the buffer in order, with only layout and
        // comment text in the gaps, and each span slices its lexeme.
        let src = "foo(X) :- bar. % t\n1.5e2.";
        let lexemes = ["foo", "(", "X", ")", ":-", "bar", ".", "1.5e2", "."];
        let mut scanner = Scanner::new();
        scanner.set_buffer(src);
        let mut covered = 0;
        for expect in lexemes {
            let tok = scanner.next_token().unwrap().unwrap();
            let span = tok.span();
            assert!(span.start >= covered, "spans are in order");
            assert_eq!(&src[span.clone()], expect);
            covered = span.end;
        }
        assert!(scanner.next_token().unwrap().is_none());
    }

    #[test]
    fn nfkc_normalization() {
        // U+FB01 LATIN SMALL LIGATURE FI normalizes to "fi".
        assert_eq!(kinds("ﬁx"), vec![name("fix")]);
    }

    #[test]
    fn set_bytes() {
        let mut scanner = Scanner::new();
        assert!(scanner.set_bytes("foo.".as_bytes()).is_ok());
        assert_eq!(
            scanner.next_token().unwrap().unwrap().into_kind(),
            name("foo")
        );

        let err = scanner.set_bytes(b"ab\nc\xFF").unwrap_err();
        assert_eq!(err, SyntaxError::invalid_utf8(2, 2));
    }

    #[test]
    fn numeric_literals_round_trip() {
        // Rendering a numeric token and rescanning it yields the same
        // value.
        for src in ["42", "0xFF", "3.14", "0.5", "123456789.0", "1.0e-7"] {
            let toks = scan_all(src);
            assert_eq!(toks.len(), 1, "{} is one token", src);
            let again = scan_all(&toks[0].to_string());
            assert_eq!(toks[0].kind(), again[0].kind(), "{} round-trips", src);
        }
    }

    #[test]
    fn saturating_overflow() {
        assert_eq!(
            kinds("99999999999999999999999999"),
            vec![TokenKind::Int(i64::MAX)]
        );
    }
}
