use crate::error::{CalcError, Span};
use crate::expr::{render_tokens, Expression};
use crate::lexer::{Op, Token};
use crate::rules::{Rule, RuleKind, RULES};
use log::{debug, trace};

/// Rewrite applications allowed before evaluation is declared stuck. Guards
/// against a rule application that fails to shrink the token sequence.
pub const MAX_REWRITES: usize = 35;

pub struct Evaluator {
    rules: &'static [Rule],
}

impl Evaluator {
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    /// Reduce an expression to a single number by fixed-point rewriting.
    ///
    /// Each pass matches the highest-priority rule at the deepest bracket
    /// level still present, leftmost position first, and splices the result
    /// back in. The expression is consumed; the token vector becomes the
    /// private working buffer.
    pub fn evaluate(&self, mut expr: Expression) -> Result<f64, CalcError> {
        expr.annotate_depths();
        if !expr.nesting_is_valid() {
            let span = expr
                .tokens()
                .last()
                .map(|t| t.span.clone())
                .unwrap_or_else(|| Span::single(0));
            return Err(CalcError::nesting_error(
                span,
                "Bracket depth is invalid".to_string(),
            ));
        }

        let mut tokens = expr.into_tokens();
        let mut rewrites = 0;

        while tokens.len() > 1 {
            trace!("{}", render_tokens(&tokens));
            let deepest = tokens.iter().map(|t| t.depth).max().unwrap_or(0);

            let hit = self
                .rules
                .iter()
                .find_map(|rule| rule.find_match(&tokens, deepest).map(|pos| (rule.kind, pos)));

            match hit {
                Some((kind, pos)) => {
                    debug!("applying {:?} at position {}", kind, pos);
                    apply_rule(&mut tokens, kind, pos);
                }
                None => {
                    return Err(CalcError::no_match_with_help(
                        covering_span(&tokens),
                        "Couldn't parse expression".to_string(),
                        format!("evaluation is stuck at: {}", render_tokens(&tokens)),
                    ));
                }
            }

            rewrites += 1;
            if rewrites > MAX_REWRITES {
                return Err(CalcError::iteration_limit(
                    covering_span(&tokens),
                    "Maximum loop length reached".to_string(),
                    format!(
                        "stopped after {} rewrites at: {}",
                        MAX_REWRITES,
                        render_tokens(&tokens)
                    ),
                ));
            }
        }

        match tokens.first() {
            Some(token) => token.as_number().ok_or_else(|| {
                CalcError::no_match(
                    token.span.clone(),
                    format!("Expression reduced to '{}' instead of a number", token),
                )
            }),
            None => Err(CalcError::no_match(
                Span::single(0),
                "Expression reduced to nothing".to_string(),
            )),
        }
    }
}

fn covering_span(tokens: &[Token]) -> Span {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.merge(&last.span),
        _ => Span::single(0),
    }
}

/// The matcher guarantees a number at every position a rule binds one.
fn number_at(tokens: &[Token], pos: usize) -> f64 {
    tokens[pos].as_number().unwrap_or(f64::NAN)
}

/// Replace `len` tokens at `pos` with a single number inheriting the first
/// replaced token's depth and covering its span.
fn splice_number(tokens: &mut Vec<Token>, pos: usize, len: usize, value: f64) {
    let depth = tokens[pos].depth;
    let span = tokens[pos].span.merge(&tokens[pos + len - 1].span);
    let mut result = Token::number(value, span);
    result.depth = depth;
    tokens.splice(pos..pos + len, std::iter::once(result));
}

fn apply_rule(tokens: &mut Vec<Token>, kind: RuleKind, pos: usize) {
    match kind {
        RuleKind::Exponent => {
            let (a, b) = (number_at(tokens, pos), number_at(tokens, pos + 3));
            splice_number(tokens, pos, 4, a.powf(b));
        }
        RuleKind::ImpliedMultiply => {
            let (a, b) = (number_at(tokens, pos), number_at(tokens, pos + 1));
            splice_number(tokens, pos, 2, a * b);
        }
        RuleKind::SingleNumber => {
            // The brackets come off and the number pops up one level.
            let mut inner = tokens[pos + 1].clone();
            inner.depth -= 1;
            inner.span = tokens[pos].span.merge(&tokens[pos + 2].span);
            tokens.splice(pos..pos + 3, std::iter::once(inner));
        }
        RuleKind::EmptyBrackets => {
            tokens.drain(pos..pos + 2);
        }
        RuleKind::Divide => {
            let (a, b) = (number_at(tokens, pos), number_at(tokens, pos + 2));
            splice_number(tokens, pos, 3, a / b);
        }
        RuleKind::Multiply => {
            let (a, b) = (number_at(tokens, pos), number_at(tokens, pos + 2));
            splice_number(tokens, pos, 3, a * b);
        }
        RuleKind::AddSub => {
            let (a, b) = (number_at(tokens, pos), number_at(tokens, pos + 2));
            let value = if tokens[pos + 1].is_operator(Op::Plus) {
                a + b
            } else {
                a - b
            };
            splice_number(tokens, pos, 3, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lexer::Lexer;

    fn eval(source: &str) -> Result<f64, CalcError> {
        let expr = Lexer::new(source.to_string()).scan_expression()?;
        Evaluator::new().evaluate(expr)
    }

    #[test]
    fn single_number_evaluates_to_itself() {
        assert_eq!(eval("42").unwrap(), 42.0);
    }

    #[test]
    fn each_binary_rule_computes() {
        assert_eq!(eval("6+2").unwrap(), 8.0);
        assert_eq!(eval("6-2").unwrap(), 4.0);
        assert_eq!(eval("6*2").unwrap(), 12.0);
        assert_eq!(eval("6/2").unwrap(), 3.0);
    }

    #[test]
    fn adjacent_stars_exponentiate() {
        assert_eq!(eval("2**3").unwrap(), 8.0);
        assert_eq!(eval("2**3**2").unwrap(), 64.0);
    }

    #[test]
    fn eliminated_brackets_leave_an_implied_multiplication() {
        assert_eq!(eval("4(5)").unwrap(), 20.0);
        assert_eq!(eval("2(3)(4)").unwrap(), 24.0);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(eval("1+2*3").unwrap(), 7.0);
    }

    #[test]
    fn brackets_override_precedence() {
        assert_eq!(eval("(1+2)*3").unwrap(), 9.0);
    }

    #[test]
    fn same_priority_resolves_left_to_right() {
        assert_eq!(eval("8-2+1").unwrap(), 7.0);
        assert_eq!(eval("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn the_worked_example_comes_out_negative() {
        let _ = pretty_env_logger::try_init();
        assert_eq!(eval("1+20-30*4(5+4/2)+5").unwrap(), -814.0);
    }

    #[test]
    fn division_by_zero_follows_float_semantics() {
        assert_eq!(eval("1/0").unwrap(), f64::INFINITY);
        assert!(eval("0/0").unwrap().is_nan());
    }

    #[test]
    fn unbalanced_brackets_are_a_nesting_error() {
        assert_eq!(eval("(1+2").unwrap_err().kind, ErrorKind::Nesting);
    }

    #[test]
    fn stray_close_before_open_is_stuck_not_invalid() {
        assert_eq!(eval(")(").unwrap_err().kind, ErrorKind::NoMatch);
    }

    #[test]
    fn consecutive_operators_cannot_be_rewritten() {
        assert_eq!(eval("1++2").unwrap_err().kind, ErrorKind::NoMatch);
    }

    #[test]
    fn empty_brackets_reduce_to_nothing() {
        assert_eq!(eval("()").unwrap_err().kind, ErrorKind::NoMatch);
    }

    #[test]
    fn empty_input_has_nothing_to_reduce() {
        assert_eq!(eval("").unwrap_err().kind, ErrorKind::NoMatch);
    }

    #[test]
    fn a_lone_operator_is_not_an_answer() {
        assert_eq!(eval("+").unwrap_err().kind, ErrorKind::NoMatch);
    }

    #[test]
    fn rewrite_limit_allows_thirty_five_applications() {
        // "1" plus 35 "+1" terms needs exactly 35 rewrites.
        let source = format!("1{}", "+1".repeat(35));
        assert_eq!(eval(&source).unwrap(), 36.0);
    }

    #[test]
    fn rewrite_limit_is_exceeded_on_the_thirty_sixth() {
        // The bound is checked right after each application, so the 36th
        // rewrite errors even though it would have finished the job.
        let source = format!("1{}", "+1".repeat(36));
        assert_eq!(eval(&source).unwrap_err().kind, ErrorKind::IterationLimit);
    }

    #[test]
    fn deep_nesting_stays_within_the_limit() {
        assert_eq!(eval("((((((1))))))").unwrap(), 1.0);
    }
}
