//! The term parser.
//!
//! A [`Parser`] pulls tokens from a [`Scanner`] one at a time and builds
//! the read terms of the buffer, resolving operators through an
//! [`OpTable`]: the parser itself hard-codes no operator names. Operator
//! priority is enforced with the usual x/y discipline — an `x` operand
//! must have strictly lower priority than its operator, a `y` operand may
//! be equal — and a parenthesized term re-enters the grammar at priority 0.
//!
//! A single token of lookahead disambiguates the four readings of a name:
//! an atom, a functor applied to an argument list, a prefix operator
//! applied to a right operand, and an operator standing as an argument
//! (which is admitted at priority 1201).
//!
//! The first failure aborts the read; errors from the scanner propagate
//! unchanged.
//!
//! [`Parser`]: ./struct.Parser.html
//! [`Scanner`]: ../scanner/struct.Scanner.html
//! [`OpTable`]: ../operators/struct.OpTable.html

use crate::syntax::error::{Result, SyntaxError};
use crate::syntax::operators::{Op, OpSpec, OpTable};
use crate::syntax::scanner::Scanner;
use crate::syntax::term::{Term, TermKind};
use crate::syntax::token::{Token, TokenKind};
use crate::syntax::tree::SyntaxTree;

/// A parser over one scanner, resolving operators through a table.
pub struct Parser<'ops> {
    scanner: Scanner,
    ops: &'ops OpTable,
    tok: Option<Token>,
}

// Public API
// --------------------------------------------------

impl<'ops> Parser<'ops> {
    /// Constructs a parser reading from the given scanner.
    pub fn new(scanner: Scanner, ops: &'ops OpTable) -> Parser<'ops> {
        Parser {
            scanner,
            ops,
            tok: None,
        }
    }

    /// Reads every term in the buffer.
    ///
    /// Each term must close with an END token. An empty buffer yields an
    /// empty tree.
    pub fn parse(&mut self) -> Result<SyntaxTree> {
        self.advance()?;
        let mut tree = SyntaxTree::new();
        while self.tok.is_some() {
            let term = self.term(1200)?;
            match self.tok.as_ref().map(Token::kind) {
                Some(TokenKind::End) => self.advance()?,
                _ => return Err(self.expected("an end token")),
            }
            tree.push(term);
        }
        Ok(tree)
    }
}

// Token plumbing
// --------------------------------------------------

impl<'ops> Parser<'ops> {
    /// Refills the lookahead from the scanner.
    fn advance(&mut self) -> Result<()> {
        self.tok = self.scanner.next_token()?;
        Ok(())
    }

    /// Consumes the lookahead, refilling it.
    fn take(&mut self) -> Result<Option<Token>> {
        let tok = self.tok.take();
        self.advance()?;
        Ok(tok)
    }

    /// The position of the lookahead, or of the end of input.
    fn here(&self) -> (usize, usize) {
        match &self.tok {
            Some(tok) => (tok.line(), tok.col()),
            None => (self.scanner.line(), self.scanner.col()),
        }
    }

    fn expected(&self, what: &'static str) -> SyntaxError {
        let (line, col) = self.here();
        SyntaxError::expected(line, col, what)
    }

    /// Consumes a punctuation token or fails with "expected `what`".
    fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<()> {
        match &self.tok {
            Some(tok) if *tok.kind() == kind => self.advance(),
            _ => Err(self.expected(what)),
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        matches!(&self.tok, Some(tok) if tok.kind() == kind)
    }
}

// Parsing logic
// --------------------------------------------------

impl<'ops> Parser<'ops> {
    /// Reads one term whose priority may not exceed `max_prec`.
    fn term(&mut self, max_prec: u16) -> Result<Term> {
        let left = self.primary(max_prec)?;
        self.infix_tail(left, max_prec, true)
    }

    /// Extends `left` with infix and postfix applications while the
    /// lookahead names a compatible operator.
    ///
    /// With `comma_ok` false a top-level comma is not an operator; this is
    /// how the prefix-operator paren decision keeps the comma visible.
    fn infix_tail(&mut self, mut left: Term, max_prec: u16, comma_ok: bool) -> Result<Term> {
        loop {
            let name = match self.tok.as_ref().map(Token::kind) {
                Some(TokenKind::Name(name)) => name.clone(),
                Some(TokenKind::Comma) if comma_ok => ",".to_string(),
                _ => break,
            };
            let op = match self.ops.get_compatible(&name, left.priority, max_prec) {
                Some(op) => op.clone(),
                None => break,
            };
            self.advance()?;
            left = match op.spec() {
                // The right operand of an xfy operator may match its
                // priority; every other right operand must come under it.
                OpSpec::Xfy => {
                    let right = self.term(op.prec())?;
                    Term::binary(name, op.spec(), op.prec(), left, right)
                }
                OpSpec::Xfx | OpSpec::Yfx => {
                    let right = self.term(op.prec() - 1)?;
                    Term::binary(name, op.spec(), op.prec(), left, right)
                }
                OpSpec::Xf | OpSpec::Yf => Term::unary(name, op.spec(), op.prec(), left),
                OpSpec::Fx | OpSpec::Fy => {
                    unreachable!("get_compatible never selects a prefix operator")
                }
            };
        }
        Ok(left)
    }

    /// Reads a primary: a constant, variable, list, curly term,
    /// parenthesized term, or anything beginning with a name.
    fn primary(&mut self, max_prec: u16) -> Result<Term> {
        let tok = match self.take()? {
            Some(tok) => tok,
            None => return Err(self.expected("a term")),
        };
        let (line, col) = (tok.line(), tok.col());
        match tok.into_kind() {
            TokenKind::Int(val) => Ok(Term::int(val)),
            TokenKind::Float(val) => Ok(Term::float(val)),
            TokenKind::Variable(name) => Ok(Term::var(name)),
            TokenKind::Name(name) => self.name_primary(name, max_prec),
            TokenKind::ParenOpen => {
                let mut term = self.term(1201)?;
                self.expect(TokenKind::ParenClose, "a closing parenthesis")?;
                // Parentheses neutralize the priority of what they wrap.
                term.priority = 0;
                Ok(term)
            }
            TokenKind::BracketOpen => self.list_rest(),
            TokenKind::BraceOpen => self.curly_rest(),
            _ => Err(SyntaxError::expected(line, col, "a term")),
        }
    }

    /// Reads the term introduced by a name: a prefix application, a
    /// functor application, or the atom by itself.
    fn name_primary(&mut self, name: String, max_prec: u16) -> Result<Term> {
        if let Some(op) = self.ops.get_prefix(&name, max_prec).cloned() {
            return self.prefix_application(name, op);
        }

        if self.at(&TokenKind::ParenOpen) {
            self.advance()?;
            let args = self.arg_list()?;
            self.expect(TokenKind::ParenClose, "a closing parenthesis")?;
            return Ok(Term::functor(name, args));
        }

        if self.ops.is_any_operator(&name) {
            Ok(Term::operator_atom(name))
        } else {
            Ok(Term::atom(name))
        }
    }

    /// The name is a prefix operator; the lookahead decides between a
    /// right operand, a parenthesized operand or argument list, and the
    /// operator standing alone as an atom.
    fn prefix_application(&mut self, name: String, op: Op) -> Result<Term> {
        let arg_max = match op.spec() {
            OpSpec::Fx => op.prec() - 1,
            _ => op.prec(),
        };
        match self.tok.as_ref().map(Token::kind) {
            Some(TokenKind::ParenOpen) => self.operand_or_args(name, op),
            Some(
                TokenKind::Name(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Variable(_)
                | TokenKind::BracketOpen
                | TokenKind::BraceOpen,
            ) => {
                let operand = self.term(arg_max)?;
                Ok(apply_prefix(name, op, operand))
            }
            _ => Ok(Term::operator_atom(name)),
        }
    }

    /// After `<prefix-op> (`: parse one enclosed term with the top-level
    /// comma masked, then let the next token decide. A comma means the
    /// term was the first argument of a functor call; anything else means
    /// it was a parenthesized right operand.
    fn operand_or_args(&mut self, name: String, op: Op) -> Result<Term> {
        self.advance()?;
        let first = self.primary(1201)?;
        let mut first = self.infix_tail(first, 1201, false)?;

        if self.at(&TokenKind::Comma) {
            first.priority = 999;
            let mut args = vec![first];
            while self.at(&TokenKind::Comma) {
                self.advance()?;
                args.push(self.arg()?);
            }
            self.expect(TokenKind::ParenClose, "a closing parenthesis")?;
            Ok(Term::functor(name, args))
        } else {
            self.expect(TokenKind::ParenClose, "a closing parenthesis")?;
            first.priority = 0;
            Ok(apply_prefix(name, op, first))
        }
    }

    /// Reads the argument list of a functor application.
    fn arg_list(&mut self) -> Result<Vec<Term>> {
        let mut args = vec![self.arg()?];
        while self.at(&TokenKind::Comma) {
            self.advance()?;
            args.push(self.arg()?);
        }
        Ok(args)
    }

    /// Reads one argument of a functor or list.
    ///
    /// An operator name standing alone before an argument terminator is
    /// admitted directly as an atom at priority 1201; everything else
    /// parses as a term under the comma's priority.
    fn arg(&mut self) -> Result<Term> {
        let op_name = match self.tok.as_ref().map(Token::kind) {
            None => return Err(self.expected("an argument")),
            Some(TokenKind::Name(name)) if self.ops.is_any_operator(name) => Some(name.clone()),
            _ => None,
        };
        match op_name {
            None => self.term(999),
            Some(name) => {
                self.advance()?;
                match self.tok.as_ref().map(Token::kind) {
                    None
                    | Some(
                        TokenKind::Comma
                        | TokenKind::ParenClose
                        | TokenKind::BracketClose
                        | TokenKind::Bar,
                    ) => Ok(Term::operator_atom(name)),
                    _ => {
                        let left = self.name_primary(name, 999)?;
                        self.infix_tail(left, 999, true)
                    }
                }
            }
        }
    }

    /// After `[`: the empty list, or items with an optional `|` tail.
    fn list_rest(&mut self) -> Result<Term> {
        match self.tok.as_ref().map(Token::kind) {
            None => Err(self.expected("the end of the list")),
            Some(TokenKind::BracketClose) => {
                self.advance()?;
                Ok(Term::list(Vec::new(), None))
            }
            _ => {
                let (items, tail) = self.items()?;
                self.expect(TokenKind::BracketClose, "the end of the list")?;
                Ok(Term::list(items, tail))
            }
        }
    }

    /// Reads list items: `arg (, arg)* (| arg)?`.
    fn items(&mut self) -> Result<(Vec<Term>, Option<Term>)> {
        let mut items = vec![self.arg()?];
        loop {
            match self.tok.as_ref().map(Token::kind) {
                Some(TokenKind::Comma) => {
                    self.advance()?;
                    items.push(self.arg()?);
                }
                Some(TokenKind::Bar) => {
                    self.advance()?;
                    let tail = self.arg()?;
                    return Ok((items, Some(tail)));
                }
                _ => return Ok((items, None)),
            }
        }
    }

    /// After `{`: the atom `{}`, or the functor `{}/1` over one term.
    fn curly_rest(&mut self) -> Result<Term> {
        match self.tok.as_ref().map(Token::kind) {
            None => Err(self.expected("a closing curly bracket")),
            Some(TokenKind::BraceClose) => {
                self.advance()?;
                Ok(Term::atom("{}"))
            }
            _ => {
                let term = self.term(1201)?;
                self.expect(TokenKind::BraceClose, "a closing curly bracket")?;
                Ok(Term::functor("{}", vec![term]))
            }
        }
    }
}

/// Applies a prefix operator, folding `-` into a numeric literal.
fn apply_prefix(name: String, op: Op, operand: Term) -> Term {
    if name == "-" {
        match &operand.kind {
            TermKind::Int(val) => return Term::int(-*val),
            TermKind::Float(val) => return Term::float(-val.into_inner()),
            _ => {}
        }
    }
    Term::unary(name, op.spec(), op.prec(), operand)
}

// Tests
// --------------------------------------------------
