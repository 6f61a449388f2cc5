//! Reading terms from UTF-8 text.
//!
//! This module is the front-end of the interpreter: a [`Scanner`] turns a
//! buffer into tokens, a [`Parser`] turns tokens into [`Term`]s collected
//! in a [`SyntaxTree`], and an [`OpTable`] tells the parser which atoms
//! are operators. A [`Reader`] wires the pieces together for the common
//! case.
//!
//! [`Scanner`]: ./scanner/struct.Scanner.html
//! [`Parser`]: ./parser/struct.Parser.html
//! [`Term`]: ./term/struct.Term.html
//! [`SyntaxTree`]: ./tree/struct.SyntaxTree.html
//! [`OpTable`]: ./operators/struct.OpTable.html
//! [`Reader`]: ./struct.Reader.html

pub mod error;
pub mod operators;
pub mod parser;
pub mod scanner;
pub mod term;
pub mod token;
pub mod tree;
pub mod unicode;

pub use self::error::{ErrorKind, Result, SyntaxError};
pub use self::operators::{Op, OpClass, OpSpec, OpTable};
pub use self::parser::Parser;
pub use self::scanner::Scanner;
pub use self::term::{Term, TermKind, TypeFlags};
pub use self::token::{Token, TokenKind};
pub use self::tree::SyntaxTree;

/// Everything you need to read terms from a buffer.
///
/// A `Reader` owns an operator table, initially the built-in set, and
/// constructs a fresh scanner and parser for each buffer handed to it.
/// The table can be extended through the [`ops`](#method.ops) method, the
/// seam where a future `op/3` directive plugs in.
pub struct Reader {
    ops: OpTable,
}

impl Reader {
    /// Constructs a `Reader` with the built-in operators.
    pub fn new() -> Reader {
        Reader {
            ops: OpTable::core(),
        }
    }

    /// Constructs a `Reader` over a custom operator table.
    pub fn with_ops(ops: OpTable) -> Reader {
        Reader { ops }
    }

    /// Manipulate the underlying `OpTable`.
    pub fn ops(&mut self) -> &mut OpTable {
        &mut self.ops
    }

    /// Reads every term in the given text.
    pub fn parse_str(&self, src: &str) -> Result<SyntaxTree> {
        let mut scanner = Scanner::new();
        scanner.set_buffer(src);
        Parser::new(scanner, &self.ops).parse()
    }

    /// Reads every term in the given bytes, which must be UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<SyntaxTree> {
        let mut scanner = Scanner::new();
        scanner.set_bytes(bytes)?;
        Parser::new(scanner, &self.ops).parse()
    }
}

impl Default for Reader {
    fn default() -> Reader {
        Reader::new()
    }
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn realistic_program() {
        let reader = Reader::new();
        let pl = "member(H, [H|T]).\n\
                  member(X, [_|T]) :- member(X, T).\n";
        let tree = reader.parse_str(pl).unwrap();
        assert_eq!(tree.len(), 2);

        let first = Term::functor(
            "member",
            vec![
                Term::var("H"),
                Term::list(vec![Term::var("H")], Some(Term::var("T"))),
            ],
        );
        assert_eq!(tree[0], first);

        let second = Term::binary(
            ":-",
            OpSpec::Xfx,
            1200,
            Term::functor(
                "member",
                vec![
                    Term::var("X"),
                    Term::list(vec![Term::var("_")], Some(Term::var("T"))),
                ],
            ),
            Term::functor("member", vec![Term::var("X"), Term::var("T")]),
        );
        assert_eq!(tree[1], second);
    }

    #[test]
    fn rendering_re_reads() {
        // Rendering is stable under a parse round trip. (The trees
        // themselves differ in priority fields, since the renderer
        // parenthesizes operands and parentheses reset priority.)
        let reader = Reader::new();
        let tree = reader.parse_str("f(X) :- 1 + 2 * 3 < X, g([a, b|T]).").unwrap();
        let text = tree.to_string();
        let again = reader.parse_str(&text).unwrap();
        assert_eq!(again.to_string(), text);
        assert_eq!(again.len(), tree.len());
    }

    #[test]
    fn bytes_entry_point() {
        let reader = Reader::new();
        let tree = reader.parse_bytes(b"foo.").unwrap();
        assert_eq!(tree[0], Term::atom("foo"));

        let err = reader.parse_bytes(b"foo\x80.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUtf8);
    }

    #[test]
    fn user_declared_operators() {
        let mut reader = Reader::new();
        reader.ops().insert(Op::new(700, OpSpec::Xfx, "===>"));
        let tree = reader.parse_str("a ===> b.").unwrap();
        assert_eq!(
            tree[0],
            Term::binary("===>", OpSpec::Xfx, 700, Term::atom("a"), Term::atom("b"))
        );
    }
}
