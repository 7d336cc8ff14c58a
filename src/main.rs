mod error;
mod evaluator;
mod expr;
mod lexer;
mod repl;
mod rules;
mod runner;

use clap::{Arg, Command};
use std::fs;
use std::path::Path;

fn main() {
    pretty_env_logger::init();

    let matches = Command::new("recalc")
        .about("A rewrite-rule arithmetic calculator")
        .arg(
            Arg::new("file")
                .help("File of expressions to evaluate, one per line")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive mode")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path);
    } else if matches.get_flag("interactive") || matches.get_one::<String>("file").is_none() {
        repl::start();
    }
}

fn run_file(path: &str) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            if !runner::run(&source, path.to_str()) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
