// Restricted arithmetic formulas over a record's named stat fields.
//
// A formula is tokenized, parsed into an expression tree and checked against
// the record type's field registry up front. Evaluation never touches
// anything except the numbers a record exposes through `StatRecord`.

pub mod expr;
pub mod lexer;
pub mod parser;

use std::fmt;

use thiserror::Error;
use tracing::debug;

pub use expr::{BinaryOp, Expr};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("unknown field `{0}`")]
    UnknownField(String),
}

impl EvalError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        EvalError::SyntaxError {
            position,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Field registry seam
// ---------------------------------------------------------------------------

/// A record whose numeric fields can be referenced by name from a formula.
///
/// `resolve_field` is the whitelist: any identifier it rejects is reported as
/// `EvalError::UnknownField` at compile time, so evaluation only ever sees
/// fields the registry declared.
pub trait StatRecord {
    type Field: Copy + fmt::Debug + PartialEq;

    /// Look up a field by the name used in a formula.
    fn resolve_field(name: &str) -> Option<Self::Field>;

    /// The record's value for a resolved field.
    fn field_value(&self, field: Self::Field) -> f64;
}

// ---------------------------------------------------------------------------
// Compiled formula
// ---------------------------------------------------------------------------

/// A parsed, registry-checked formula ready to be evaluated against records.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula<F> {
    source: String,
    expr: Expr<F>,
}

impl<F: Copy + fmt::Debug + PartialEq> Formula<F> {
    /// Parse `source` and resolve every field reference through `R`'s registry.
    pub fn compile<R>(source: &str) -> Result<Self, EvalError>
    where
        R: StatRecord<Field = F>,
    {
        let tokens = lexer::tokenize(source)?;
        let expr = parser::parse(&tokens, R::resolve_field)?;
        debug!("compiled formula `{}` ({} nodes)", source.trim(), expr.node_count());
        Ok(Formula {
            source: source.to_string(),
            expr,
        })
    }

    /// The formula text as supplied by the caller.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr<F> {
        &self.expr
    }

    /// Evaluate against a single record. IEEE semantics apply: division by
    /// zero yields an infinity or NaN rather than an error.
    pub fn eval<R>(&self, record: &R) -> f64
    where
        R: StatRecord<Field = F>,
    {
        self.expr.eval(&|field| record.field_value(field))
    }

    /// Evaluate against every record, preserving input order.
    pub fn eval_all<R>(&self, records: &[R]) -> Vec<f64>
    where
        R: StatRecord<Field = F>,
    {
        records.iter().map(|r| self.eval(r)).collect()
    }
}

/// Compile `formula` against `R`'s registry and evaluate it for each record.
///
/// Returns one value per record in input order.
pub fn evaluate<R: StatRecord>(formula: &str, records: &[R]) -> Result<Vec<f64>, EvalError> {
    let compiled = Formula::<R::Field>::compile::<R>(formula)?;
    Ok(compiled.eval_all(records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Field {
        Points,
        Assists,
        Turnovers,
        TrueShooting,
    }

    struct Line {
        points: f64,
        assists: f64,
        turnovers: f64,
        ts: f64,
    }

    impl StatRecord for Line {
        type Field = Field;

        fn resolve_field(name: &str) -> Option<Field> {
            match name.to_ascii_lowercase().as_str() {
                "points" | "pts" => Some(Field::Points),
                "assists" => Some(Field::Assists),
                "turnovers" => Some(Field::Turnovers),
                "ts%" => Some(Field::TrueShooting),
                _ => None,
            }
        }

        fn field_value(&self, field: Field) -> f64 {
            match field {
                Field::Points => self.points,
                Field::Assists => self.assists,
                Field::Turnovers => self.turnovers,
                Field::TrueShooting => self.ts,
            }
        }
    }

    fn line(points: f64, assists: f64, turnovers: f64) -> Line {
        Line {
            points,
            assists,
            turnovers,
            ts: 0.5,
        }
    }

    #[test]
    fn points_plus_assists_minus_turnovers() {
        let out = evaluate("points + assists - turnovers", &[line(20.0, 5.0, 3.0)]).unwrap();
        assert_eq!(out, vec![22.0]);
    }

    #[test]
    fn one_value_per_record_in_order() {
        let records = [line(10.0, 0.0, 0.0), line(30.0, 0.0, 0.0), line(20.0, 0.0, 0.0)];
        let out = evaluate("points * 2", &records).unwrap();
        assert_eq!(out, vec![20.0, 60.0, 40.0]);
    }

    #[test]
    fn precedence_and_left_associativity() {
        let r = [line(20.0, 5.0, 3.0)];
        assert_eq!(evaluate("points - assists - turnovers", &r).unwrap(), vec![12.0]);
        assert_eq!(evaluate("points / assists / 2", &r).unwrap(), vec![2.0]);
        assert_eq!(evaluate("points + assists * turnovers", &r).unwrap(), vec![35.0]);
        assert_eq!(evaluate("(points + assists) * turnovers", &r).unwrap(), vec![75.0]);
    }

    #[test]
    fn unary_minus() {
        let r = [line(20.0, 5.0, 3.0)];
        assert_eq!(evaluate("-points + 1", &r).unwrap(), vec![-19.0]);
        assert_eq!(evaluate("--points", &r).unwrap(), vec![20.0]);
        assert_eq!(evaluate("assists * -2", &r).unwrap(), vec![-10.0]);
    }

    #[test]
    fn aliases_with_percent_resolve() {
        let r = [line(20.0, 5.0, 3.0)];
        assert_eq!(evaluate("TS% * 100", &r).unwrap(), vec![50.0]);
        assert_eq!(evaluate("[TS%] * PTS", &r).unwrap(), vec![10.0]);
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        let r = [line(20.0, 0.0, 0.0)];
        let out = evaluate("points / assists", &r).unwrap();
        assert!(out[0].is_infinite() && out[0] > 0.0);

        let out = evaluate("-points / assists", &r).unwrap();
        assert!(out[0].is_infinite() && out[0] < 0.0);

        let out = evaluate("assists / turnovers", &r).unwrap();
        assert!(out[0].is_nan());
    }

    #[test]
    fn unknown_field_is_reported() {
        let err = evaluate("points + steals", &[line(1.0, 1.0, 1.0)]).unwrap_err();
        assert_eq!(err, EvalError::UnknownField("steals".into()));
    }

    #[test]
    fn syntax_error_reports_position() {
        match evaluate("points + * assists", &[line(1.0, 1.0, 1.0)]).unwrap_err() {
            EvalError::SyntaxError { position, .. } => assert_eq!(position, 9),
            other => panic!("expected SyntaxError, got: {other}"),
        }
    }

    #[test]
    fn very_long_formula_is_a_syntax_error() {
        let flat = vec!["1"; 20_000].join("+");
        assert!(matches!(
            evaluate(&flat, &[line(1.0, 1.0, 1.0)]),
            Err(EvalError::SyntaxError { .. })
        ));

        let sum = vec!["points"; 200].join(" + ");
        assert_eq!(evaluate(&sum, &[line(1.0, 0.0, 0.0)]).unwrap(), vec![200.0]);
    }

    #[test]
    fn no_code_execution_surface() {
        // Anything outside the arithmetic grammar is rejected before evaluation.
        for src in ["__import__('os')", "points; assists", "points ** 2", "df['PTS']"] {
            assert!(evaluate(src, &[line(1.0, 1.0, 1.0)]).is_err(), "accepted: {src}");
        }
    }

    #[test]
    fn compiled_formula_is_reusable() {
        let f = Formula::compile::<Line>("points + 1").unwrap();
        assert_eq!(f.source(), "points + 1");
        assert_eq!(f.eval(&line(1.0, 0.0, 0.0)), 2.0);
        assert_eq!(f.eval(&line(9.0, 0.0, 0.0)), 10.0);
    }

    #[test]
    fn empty_records_yield_empty_output() {
        let out = evaluate::<Line>("points", &[]).unwrap();
        assert!(out.is_empty());
    }
}
