use crate::runner::process;
use std::io::{self, Write};

/// Interactive calculator loop: one expression per line, the answer or an
/// error report per entry.

pub fn start() {
    println!("recalc v0.1.0");
    println!("Type an expression, or 'exit' to quit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                match process(line) {
                    Ok(value) => println!("{}", value),
                    Err(error) => error.report(line, None),
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}
