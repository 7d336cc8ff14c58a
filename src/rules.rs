use crate::lexer::{Op, Token, TokenKind};

/// Pattern alphabet for rewrite rules. Patterns live only in the rule
/// table; lexed expressions never contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pat {
    /// Any number token, regardless of value.
    Number,
    /// Exactly this operator.
    Op(Op),
    /// Either `+` or `-`.
    AddOrSub,
}

impl Pat {
    pub fn matches(&self, token: &Token) -> bool {
        match (self, token.kind) {
            (Pat::Number, TokenKind::Number(_)) => true,
            (Pat::Op(op), TokenKind::Operator(actual)) => *op == actual,
            (Pat::AddOrSub, TokenKind::Operator(actual)) => {
                actual == Op::Plus || actual == Op::Minus
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Exponent,
    ImpliedMultiply,
    SingleNumber,
    EmptyBrackets,
    Divide,
    Multiply,
    AddSub,
}

#[derive(Debug)]
pub struct Rule {
    pub kind: RuleKind,
    pub pattern: &'static [Pat],
}

/// The rewrite rules, in priority order. Exponentiation is spelled as two
/// adjacent `*` tokens; implied multiplication mops up number pairs left
/// behind by bracket elimination.
pub const RULES: [Rule; 7] = [
    Rule {
        kind: RuleKind::Exponent,
        pattern: &[Pat::Number, Pat::Op(Op::Star), Pat::Op(Op::Star), Pat::Number],
    },
    Rule {
        kind: RuleKind::ImpliedMultiply,
        pattern: &[Pat::Number, Pat::Number],
    },
    Rule {
        kind: RuleKind::SingleNumber,
        pattern: &[Pat::Op(Op::LeftParen), Pat::Number, Pat::Op(Op::RightParen)],
    },
    Rule {
        kind: RuleKind::EmptyBrackets,
        pattern: &[Pat::Op(Op::LeftParen), Pat::Op(Op::RightParen)],
    },
    Rule {
        kind: RuleKind::Divide,
        pattern: &[Pat::Number, Pat::Op(Op::Slash), Pat::Number],
    },
    Rule {
        kind: RuleKind::Multiply,
        pattern: &[Pat::Number, Pat::Op(Op::Star), Pat::Number],
    },
    Rule {
        kind: RuleKind::AddSub,
        pattern: &[Pat::Number, Pat::AddOrSub, Pat::Number],
    },
];

impl Rule {
    /// First position where the start token sits at `depth` and the whole
    /// fixed-length pattern matches consecutively. Only the start token's
    /// depth is gated; rule spans never straddle depths in practice.
    pub fn find_match(&self, tokens: &[Token], depth: i32) -> Option<usize> {
        let last_start = tokens.len().checked_sub(self.pattern.len())?;
        (0..=last_start).find(|&i| {
            tokens[i].depth == depth
                && self
                    .pattern
                    .iter()
                    .zip(&tokens[i..])
                    .all(|(pat, token)| pat.matches(token))
        })
    }
}
