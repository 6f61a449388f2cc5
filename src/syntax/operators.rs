//! Operator declarations and the operator table.
//!
//! An [`Op`] tells the parser how to handle an atom that has been declared
//! as an operator. It has three components:
//!
//! - The [`OpSpec`] specifies whether the operator is prefix, infix, or
//!   postfix and how it associates. The `f` marks the position of the
//!   functor while `x` and `y` mark the operands: a `y` operand may have
//!   priority equal to the operator's, an `x` operand must have strictly
//!   lower priority.
//! - The priority, an integer in `1..=1200`. Lower priority binds tighter,
//!   so multiplicative operators have *lower* priority than additive ones.
//! - The name of the atom.
//!
//! The [`OpTable`] is the parser's only source of operator knowledge; the
//! parser hard-codes no names. The table is a sorted vector searched by
//! name, so a future `op/3` directive can extend it at runtime through
//! [`OpTable::insert`] without touching the parser.
//!
//! [`Op`]: ./struct.Op.html
//! [`OpSpec`]: ./enum.OpSpec.html
//! [`OpTable`]: ./struct.OpTable.html

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// The fixity and associativity of an operator.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
pub enum OpSpec {
    Xfx,
    Xfy,
    Yfx,
    Fx,
    Fy,
    Xf,
    Yf,
}

/// The general categories of operators.
///
/// - `Fx` and `Fy` operators are `Prefix`.
/// - `Xfx`, `Xfy`, and `Yfx` operators are `Infix`.
/// - `Xf` and `Yf` operators are `Postfix`.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq, Eq)]
#[derive(PartialOrd, Ord)]
pub enum OpClass {
    Prefix,
    Infix,
    Postfix,
}

/// A single operator declaration.
#[derive(Debug)]
#[derive(Clone)]
#[derive(PartialEq, Eq)]
pub struct Op {
    prec: u16,
    spec: OpSpec,
    name: String,
}

/// A table of operators to be used by a `Parser`.
///
/// Operators are kept sorted first by name, then by class, and finally by
/// priority, so all declarations for one name form a contiguous slice.
#[derive(Debug)]
#[derive(Clone)]
pub struct OpTable(Vec<Op>);

// OpSpec
// --------------------------------------------------

impl OpSpec {
    /// The class implied by the specifier.
    #[inline]
    pub fn class(self) -> OpClass {
        match self {
            OpSpec::Fx | OpSpec::Fy => OpClass::Prefix,
            OpSpec::Xfx | OpSpec::Xfy | OpSpec::Yfx => OpClass::Infix,
            OpSpec::Xf | OpSpec::Yf => OpClass::Postfix,
        }
    }

    /// The specifier written the way `op/3` writes it.
    pub fn as_str(self) -> &'static str {
        match self {
            OpSpec::Xfx => "xfx",
            OpSpec::Xfy => "xfy",
            OpSpec::Yfx => "yfx",
            OpSpec::Fx => "fx",
            OpSpec::Fy => "fy",
            OpSpec::Xf => "xf",
            OpSpec::Yf => "yf",
        }
    }
}

impl fmt::Display for OpSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Op
// --------------------------------------------------

impl Op {
    /// Constructs a declaration, `op(Prec, Spec, Name)` style.
    pub fn new<S: Into<String>>(prec: u16, spec: OpSpec, name: S) -> Op {
        Op {
            prec,
            spec,
            name: name.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn prec(&self) -> u16 {
        self.prec
    }

    #[inline]
    pub fn spec(&self) -> OpSpec {
        self.spec
    }

    #[inline]
    pub fn class(&self) -> OpClass {
        self.spec.class()
    }
}

impl PartialOrd for Op {
    fn partial_cmp(&self, other: &Op) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Op {
    fn cmp(&self, other: &Op) -> Ordering {
        self.name()
            .cmp(other.name())
            .then(self.class().cmp(&other.class()))
            .then(self.prec().cmp(&other.prec()))
    }
}

// OpTable
// --------------------------------------------------

impl OpTable {
    /// Constructs a new, empty operator table.
    pub fn new() -> OpTable {
        OpTable(Vec::new())
    }

    /// Views the table as a sorted slice of `Op`s.
    pub fn as_slice(&self) -> &[Op] {
        &self.0
    }

    /// Inserts a declaration, replacing any previous declaration of the
    /// same name and class. A name may hold at most one operator per class.
    pub fn insert(&mut self, op: Op) {
        let probe = self
            .0
            .binary_search_by(|o| {
                o.name()
                    .cmp(op.name())
                    .then(o.class().cmp(&op.class()))
            });
        match probe {
            Ok(i) => self.0[i] = op,
            Err(i) => self.0.insert(i, op),
        }
    }

    /// Gets the slice of all declarations for the given name, in class
    /// order.
    pub fn get(&self, name: &str) -> &[Op] {
        let i = self.0.partition_point(|op| op.name() < name);
        let mut j = i;
        while j < self.0.len() && self.0[j].name() == name {
            j += 1;
        }
        &self.0[i..j]
    }

    /// Whether the name is declared with exactly this specifier.
    pub fn is_operator(&self, name: &str, spec: OpSpec) -> bool {
        self.get(name).iter().any(|op| op.spec() == spec)
    }

    /// Whether the name is declared as a prefix operator.
    pub fn is_prefix_operator(&self, name: &str) -> bool {
        self.get(name).iter().any(|op| op.class() == OpClass::Prefix)
    }

    /// Whether the name is declared as an operator of any kind.
    pub fn is_any_operator(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    /// Gets the prefix declaration for this name if its priority fits
    /// under `max_prec`.
    pub fn get_prefix(&self, name: &str, max_prec: u16) -> Option<&Op> {
        self.get(name)
            .iter()
            .find(|op| op.class() == OpClass::Prefix && op.prec() <= max_prec)
    }

    /// Gets the first infix or postfix declaration for this name that is
    /// compatible with a left operand of priority `lhs_prec` under a
    /// priority ceiling of `max_prec`.
    ///
    /// Prefix declarations never take a left operand. For the others, the
    /// left specifier decides whether the operand priority must be lower
    /// (`x`) or may be equal (`y`) to the operator's.
    pub fn get_compatible(&self, name: &str, lhs_prec: u16, max_prec: u16) -> Option<&Op> {
        self.get(name).iter().find(|op| {
            let prec = op.prec();
            if prec > max_prec {
                return false;
            }
            match op.spec() {
                OpSpec::Yfx | OpSpec::Yf => lhs_prec <= prec,
                OpSpec::Xfx | OpSpec::Xfy | OpSpec::Xf => lhs_prec < prec,
                OpSpec::Fx | OpSpec::Fy => false,
            }
        })
    }
}

impl Default for OpTable {
    fn default() -> OpTable {
        OpTable::new()
    }
}

impl From<Vec<Op>> for OpTable {
    fn from(ops: Vec<Op>) -> OpTable {
        let mut table = OpTable::new();
        for op in ops {
            table.insert(op);
        }
        table
    }
}

impl Deref for OpTable {
    type Target = [Op];
    fn deref(&self) -> &[Op] {
        self.as_slice()
    }
}

impl AsRef<[Op]> for OpTable {
    fn as_ref(&self) -> &[Op] {
        self.as_slice()
    }
}

// Core operators
// --------------------------------------------------

#[cfg_attr(rustfmt, rustfmt_skip)]
impl OpTable {
    /// Returns the built-in operator set.
    pub fn core() -> OpTable {
        use self::OpSpec::*;
        OpTable::from(vec![
            Op::new(1200, Xfx, ":-"),
            Op::new(1200, Xfx, "-->"),
            Op::new(1200, Fx, ":-"),
            Op::new(1200, Fx, "?-"),
            Op::new(1100, Xfy, ";"),
            Op::new(1050, Xfy, "->"),
            Op::new(1000, Xfy, ","),
            Op::new(900, Fy, "\\+"),
            Op::new(700, Xfx, "="),
            Op::new(700, Xfx, "\\="),
            Op::new(700, Xfx, "=="),
            Op::new(700, Xfx, "\\=="),
            Op::new(700, Xfx, "@<"),
            Op::new(700, Xfx, "@=<"),
            Op::new(700, Xfx, "@>"),
            Op::new(700, Xfx, "@>="),
            Op::new(700, Xfx, "=.."),
            Op::new(700, Xfx, "is"),
            Op::new(700, Xfx, "=:="),
            Op::new(700, Xfx, "=\\="),
            Op::new(700, Xfx, "<"),
            Op::new(700, Xfx, "=<"),
            Op::new(700, Xfx, ">"),
            Op::new(700, Xfx, ">="),
            Op::new(500, Yfx, "+"),
            Op::new(500, Yfx, "-"),
            Op::new(500, Yfx, "/\\"),
            Op::new(500, Yfx, "\\/"),
            Op::new(400, Yfx, "*"),
            Op::new(400, Yfx, "/"),
            Op::new(400, Yfx, "//"),
            Op::new(400, Yfx, "rem"),
            Op::new(400, Yfx, "mod"),
            Op::new(400, Yfx, "<<"),
            Op::new(400, Yfx, ">>"),
            Op::new(200, Xfx, "**"),
            Op::new(200, Xfy, "^"),
            Op::new(200, Fy, "-"),
            Op::new(200, Fy, "\\"),
        ])
    }
}

// Tests
// --------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get() {
        let ops = OpTable::core();
        let minus = ops.get("-");
        assert_eq!(minus.len(), 2);
        assert_eq!(minus[0], Op::new(200, OpSpec::Fy, "-"));
        assert_eq!(minus[1], Op::new(500, OpSpec::Yfx, "-"));
        assert!(ops.get("member").is_empty());
    }

    #[test]
    fn insert_replaces_per_class() {
        let mut ops = OpTable::new();
        ops.insert(Op::new(500, OpSpec::Yfx, "+"));
        ops.insert(Op::new(200, OpSpec::Fy, "+"));
        ops.insert(Op::new(700, OpSpec::Xfx, "+"));
        assert_eq!(ops.len(), 2); // the xfx replaced the yfx
        assert_eq!(ops.get("+")[1], Op::new(700, OpSpec::Xfx, "+"));
    }

    #[test]
    fn predicates() {
        let ops = OpTable::core();
        assert!(ops.is_operator(":-", OpSpec::Xfx));
        assert!(ops.is_operator(":-", OpSpec::Fx));
        assert!(!ops.is_operator(":-", OpSpec::Xfy));
        assert!(ops.is_prefix_operator("\\+"));
        assert!(!ops.is_prefix_operator("+"));
        assert!(ops.is_any_operator(","));
        assert!(!ops.is_any_operator("foo"));
    }

    #[test]
    fn prefix_bounded_by_priority() {
        let ops = OpTable::core();
        assert_eq!(ops.get_prefix("-", 999), Some(&Op::new(200, OpSpec::Fy, "-")));
        assert_eq!(ops.get_prefix(":-", 999), None);
        assert_eq!(ops.get_prefix(":-", 1200), Some(&Op::new(1200, OpSpec::Fx, ":-")));
    }

    #[test]
    fn compatible() {
        let ops = OpTable::core();

        // yfx admits an equal-priority left operand, xfx does not.
        assert!(ops.get_compatible("+", 500, 1200).is_some());
        assert!(ops.get_compatible("=", 700, 1200).is_none());
        assert!(ops.get_compatible("=", 699, 1200).is_some());

        // The ceiling cuts the operator off entirely.
        assert!(ops.get_compatible("+", 0, 499).is_none());

        // Prefix-only names never bind a left operand.
        assert!(ops.get_compatible("\\+", 0, 1200).is_none());
    }

    #[test]
    fn postfix_through_insert() {
        let mut ops = OpTable::core();
        ops.insert(Op::new(300, OpSpec::Xf, "squared"));
        let op = ops.get_compatible("squared", 0, 1200).cloned();
        assert_eq!(op, Some(Op::new(300, OpSpec::Xf, "squared")));
        // x: a left operand of equal priority is rejected.
        assert!(ops.get_compatible("squared", 300, 1200).is_none());
    }
}
