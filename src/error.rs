use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character, or a digit run that failed to parse.
    Lex,
    /// Bracket depth did not return to zero by the end of the expression.
    Nesting,
    /// No rewrite rule applied anywhere at the deepest bracket level.
    NoMatch,
    /// Rewriting did not converge within the safety bound.
    IterationLimit,
}

#[derive(Debug, Clone)]
pub struct CalcError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl CalcError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Lex, span, message)
    }

    pub fn nesting_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Nesting, span, message)
    }

    pub fn no_match(span: Span, message: String) -> Self {
        Self::new(ErrorKind::NoMatch, span, message)
    }

    pub fn no_match_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::NoMatch, span, message, help)
    }

    pub fn iteration_limit(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::IterationLimit, span, message, help)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::Lex => Color::Red,
            ErrorKind::Nesting => Color::Yellow,
            ErrorKind::NoMatch => Color::Magenta,
            ErrorKind::IterationLimit => Color::Cyan,
        };

        let kind_str = match self.kind {
            ErrorKind::Lex => "Lexical Error",
            ErrorKind::Nesting => "Nesting Error",
            ErrorKind::NoMatch => "Evaluation Error",
            ErrorKind::IterationLimit => "Evaluation Error",
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CalcError {}
