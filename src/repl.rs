use crate::environment::Environment;
use crate::runner::{execute, RunOptions};
use log::info;
use std::io::{self, BufRead, Write};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interactive loop over stdin. Declarations persist across lines.
pub fn start(options: RunOptions) {
    println!("Quill v{}", VERSION);
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let env = Environment::global();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
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

                match execute(line, &env, options) {
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

    info!("session ended");
}
