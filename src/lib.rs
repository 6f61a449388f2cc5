//! The reader front-end of a Prolog-dialect interpreter.
//!
//! This crate lexes UTF-8 source text into tokens and parses the tokens
//! into read terms under operator-priority rules. Evaluation, unification,
//! and clause storage live elsewhere; the result of a parse is a purely
//! syntactic [`SyntaxTree`] of [`Term`]s.
//!
//! The easiest entry point is [`syntax::Reader`]:
//!
//! ```
//! use prequel::syntax::Reader;
//!
//! let reader = Reader::new();
//! let tree = reader.parse_str("path(X, Z) :- edge(X, Y), path(Y, Z).").unwrap();
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! [`SyntaxTree`]: ./syntax/tree/struct.SyntaxTree.html
//! [`Term`]: ./syntax/term/struct.Term.html
//! [`syntax::Reader`]: ./syntax/struct.Reader.html

#[macro_use]
extern crate lazy_static;

pub mod syntax;
