// Expression tree for compiled formulas.

use std::fmt;

/// Binary arithmetic operators. Nothing else is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// A node in a formula's expression tree. `F` is the record type's resolved
/// field handle, so unresolved names cannot appear in a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<F> {
    Number(f64),
    Field(F),
    Neg(Box<Expr<F>>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr<F>>,
        rhs: Box<Expr<F>>,
    },
}

impl<F: Copy> Expr<F> {
    /// Evaluate the tree, reading fields through `lookup`.
    pub fn eval(&self, lookup: &dyn Fn(F) -> f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Field(f) => lookup(*f),
            Expr::Neg(inner) => -inner.eval(lookup),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(lookup), rhs.eval(lookup)),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Field(_) => 1,
            Expr::Neg(inner) => 1 + inner.node_count(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
        }
    }

    /// Every field referenced by the tree, left to right, duplicates included.
    pub fn fields(&self) -> Vec<F> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<F>) {
        match self {
            Expr::Number(_) => {}
            Expr::Field(f) => out.push(*f),
            Expr::Neg(inner) => inner.collect_fields(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_fields(out);
                rhs.collect_fields(out);
            }
        }
    }
}

impl<F: fmt::Debug> fmt::Display for Expr<F> {
    /// Fully parenthesized rendering, used in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Field(field) => write!(f, "{field:?}"),
            Expr::Neg(inner) => write!(f, "(-{inner})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr<u8>> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn eval_reads_fields_through_lookup() {
        let tree = Expr::Binary {
            op: BinaryOp::Mul,
            lhs: Box::new(Expr::Field(1u8)),
            rhs: num(3.0),
        };
        assert_eq!(tree.eval(&|f| f as f64 * 10.0), 30.0);
        assert_eq!(tree.fields(), vec![1]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let tree = Expr::Binary {
            op: BinaryOp::Sub,
            lhs: Box::new(Expr::Neg(num(2.0))),
            rhs: Box::new(Expr::Field(7u8)),
        };
        assert_eq!(tree.to_string(), "((-2) - 7)");
    }
}
