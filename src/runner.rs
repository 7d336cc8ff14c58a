use crate::error::CalcError;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;

/// Evaluate one expression string to a number.
///
/// This is the crate's single core operation: lex, then rewrite to a fixed
/// point. Everything around it is presentation.
pub fn process(input: &str) -> Result<f64, CalcError> {
    let mut lexer = Lexer::new(input.to_string());
    let expr = lexer.scan_expression()?;

    let evaluator = Evaluator::new();
    evaluator.evaluate(expr)
}

/// Evaluate a file of expressions, one per line. Blank lines are skipped.
/// Returns whether every line evaluated cleanly.
pub fn run(source: &str, filename: Option<&str>) -> bool {
    let mut all_ok = true;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match process(line) {
            Ok(value) => println!("{} = {}", line, value),
            Err(error) => {
                error.report(line, filename);
                all_ok = false;
            }
        }
    }

    all_ok
}
