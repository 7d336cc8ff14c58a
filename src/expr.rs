use crate::lexer::{Op, Token, TokenKind};
use std::fmt;

/// An ordered token sequence produced by the lexer.
///
/// The sequence itself is never rewritten; evaluation takes the tokens out
/// as its own private working buffer.
#[derive(Debug, Clone)]
pub struct Expression {
    tokens: Vec<Token>,
}

impl Expression {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Assign every token its bracket-nesting depth.
    ///
    /// The counter moves *before* assignment: an open bracket is recorded at
    /// the new, deeper level and a close bracket at the new, shallower one,
    /// so `(1)` annotates as `1, 1, 0`.
    pub fn annotate_depths(&mut self) {
        let mut depth = 0;
        for token in &mut self.tokens {
            match token.kind {
                TokenKind::Operator(Op::LeftParen) => depth += 1,
                TokenKind::Operator(Op::RightParen) => depth -= 1,
                _ => {}
            }
            token.depth = depth;
        }
    }

    /// Brackets balance iff the final token came back down to depth 0.
    ///
    /// Only the last token is inspected: `")("` annotates to `-1, 0` and
    /// passes, leaving the rule engine to reject it. An empty expression is
    /// vacuously balanced.
    pub fn nesting_is_valid(&self) -> bool {
        self.tokens.last().map_or(true, |t| t.depth == 0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// Space-separated rendering of a token sequence, for trace logging and
/// stuck-state diagnostics.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn annotated(source: &str) -> Expression {
        let mut expr = Lexer::new(source.to_string())
            .scan_expression()
            .unwrap();
        expr.annotate_depths();
        expr
    }

    fn depths(expr: &Expression) -> Vec<i32> {
        expr.tokens().iter().map(|t| t.depth).collect()
    }

    #[test]
    fn brackets_shift_depth_before_assignment() {
        let expr = annotated("1*(2+(3))");
        assert_eq!(depths(&expr), vec![0, 0, 1, 1, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn flat_expression_sits_at_depth_zero() {
        let expr = annotated("1+2*3");
        assert_eq!(depths(&expr), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn unclosed_bracket_is_invalid() {
        let expr = annotated("(1+2");
        assert!(!expr.nesting_is_valid());
    }

    #[test]
    fn balanced_brackets_are_valid() {
        let expr = annotated("(1+2)");
        assert!(expr.nesting_is_valid());
    }

    #[test]
    fn validity_only_inspects_the_final_depth() {
        // ")(" annotates to -1, 0 and slips through; the rule engine is the
        // one that rejects it.
        let expr = annotated(")(");
        assert_eq!(depths(&expr), vec![-1, 0]);
        assert!(expr.nesting_is_valid());
    }

    #[test]
    fn empty_expression_is_vacuously_valid() {
        let expr = annotated("");
        assert!(expr.nesting_is_valid());
    }

    #[test]
    fn display_round_trips_the_source() {
        let source = "1+20-30*4(5+4/2)+5";
        let expr = annotated(source);
        assert_eq!(expr.to_string(), source);
    }

    #[test]
    fn render_tokens_separates_lexemes() {
        let expr = annotated("12+3");
        assert_eq!(render_tokens(expr.tokens()), "12 + 3");
    }
}
