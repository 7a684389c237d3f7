// Recursive-descent parser producing an `Expr` tree.
//
// Grammar (standard precedence, left-associative binary operators):
//   expr    := term (('+' | '-') term)*
//   term    := unary (('*' | '/') unary)*
//   unary   := ('-' | '+') unary | primary
//   primary := NUMBER | IDENT | '(' expr ')'

use super::expr::{BinaryOp, Expr};
use super::lexer::{Token, TokenKind};
use super::EvalError;

/// Maximum nesting of parentheses and unary operators.
pub const MAX_DEPTH: usize = 64;

/// Maximum number of tokens in one formula, not counting the end marker.
/// Bounds the height of left-deep operator chains such as `a + a + ...`.
pub const MAX_TOKENS: usize = 1024;

struct Parser<'a, F, R> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    resolve: R,
    _field: std::marker::PhantomData<F>,
}

/// Parse a token stream into an expression tree, resolving each identifier
/// through `resolve`. The stream must end with `TokenKind::End`.
pub fn parse<F, R>(tokens: &[Token], resolve: R) -> Result<Expr<F>, EvalError>
where
    R: Fn(&str) -> Option<F>,
{
    if tokens.is_empty() {
        return Err(EvalError::syntax(0, "expected an expression"));
    }
    if tokens.len() > MAX_TOKENS + 1 {
        return Err(EvalError::syntax(
            tokens[MAX_TOKENS].position,
            format!("formula is too long (more than {MAX_TOKENS} tokens)"),
        ));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        resolve,
        _field: std::marker::PhantomData,
    };
    let expr = parser.expr()?;
    let next = parser.peek();
    match next.kind {
        TokenKind::End => Ok(expr),
        TokenKind::RParen => Err(EvalError::syntax(next.position, "unmatched `)`")),
        _ => Err(EvalError::syntax(next.position, "expected an operator")),
    }
}

impl<F, R> Parser<'_, F, R>
where
    R: Fn(&str) -> Option<F>,
{
    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with `End`, and `advance`
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self, position: usize) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax(position, "formula is nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Expr<F>, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr<F>, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr<F>, EvalError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Minus | TokenKind::Plus => {
                self.advance();
                self.enter(token.position)?;
                let operand = self.unary();
                self.leave();
                let operand = operand?;
                if token.kind == TokenKind::Minus {
                    Ok(Expr::Neg(Box::new(operand)))
                } else {
                    Ok(operand)
                }
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr<F>, EvalError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Ident(name) => (self.resolve)(&name)
                .map(Expr::Field)
                .ok_or(EvalError::UnknownField(name)),
            TokenKind::LParen => {
                self.enter(token.position)?;
                let inner = self.expr();
                self.leave();
                let inner = inner?;
                let close = self.advance();
                if close.kind != TokenKind::RParen {
                    return Err(EvalError::syntax(
                        close.position,
                        format!("expected `)` to close `(` at position {}", token.position),
                    ));
                }
                Ok(inner)
            }
            TokenKind::End => Err(EvalError::syntax(token.position, "expected an expression")),
            _ => Err(EvalError::syntax(token.position, "expected a number, field or `(`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::lexer::tokenize;

    fn resolve(name: &str) -> Option<char> {
        match name {
            "a" | "b" | "c" => name.chars().next(),
            _ => None,
        }
    }

    fn parse_str(src: &str) -> Result<Expr<char>, EvalError> {
        parse(&tokenize(src)?, resolve)
    }

    fn position_of(err: EvalError) -> usize {
        match err {
            EvalError::SyntaxError { position, .. } => position,
            other => panic!("expected SyntaxError, got: {other}"),
        }
    }

    #[test]
    fn builds_left_associative_tree() {
        let tree = parse_str("a - b - c").unwrap();
        assert_eq!(tree.to_string(), "(('a' - 'b') - 'c')");
    }

    #[test]
    fn multiplication_binds_tighter() {
        let tree = parse_str("a + b * c").unwrap();
        assert_eq!(tree.to_string(), "('a' + ('b' * 'c'))");
    }

    #[test]
    fn unary_plus_is_identity() {
        assert_eq!(parse_str("+a").unwrap(), Expr::Field('a'));
    }

    #[test]
    fn empty_formula() {
        assert_eq!(position_of(parse_str("").unwrap_err()), 0);
        assert_eq!(position_of(parse_str("   ").unwrap_err()), 3);
    }

    #[test]
    fn trailing_operator() {
        assert_eq!(position_of(parse_str("a +").unwrap_err()), 3);
    }

    #[test]
    fn missing_operator_between_operands() {
        assert_eq!(position_of(parse_str("a b").unwrap_err()), 2);
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(position_of(parse_str("(a + b").unwrap_err()), 6);
        assert_eq!(position_of(parse_str("a + b)").unwrap_err()), 5);
        assert_eq!(position_of(parse_str("()").unwrap_err()), 1);
    }

    #[test]
    fn unknown_identifier() {
        assert_eq!(parse_str("a + zz").unwrap_err(), EvalError::UnknownField("zz".into()));
    }

    #[test]
    fn nesting_limit() {
        let ok = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_str(&ok).is_ok());

        let deep = format!("{}a{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_str(&deep), Err(EvalError::SyntaxError { .. })));

        let negs = format!("{}a", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_str(&negs), Err(EvalError::SyntaxError { .. })));
    }

    #[test]
    fn long_operator_chain_is_rejected() {
        // 512 operands and 511 operators: exactly at the limit.
        let at_limit = vec!["a"; MAX_TOKENS / 2].join("+");
        assert!(parse_str(&at_limit).is_ok());

        let flat = vec!["a"; 20_000].join("+");
        let err = parse_str(&flat).unwrap_err();
        // Token MAX_TOKENS is the `a` starting at byte offset MAX_TOKENS.
        assert_eq!(position_of(err), MAX_TOKENS);
    }
}
