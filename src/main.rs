use clap::{Arg, ArgAction, Command};
use quill::{repl, runner, RunOptions};
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let matches = Command::new("quill")
        .about("Interpreter for the Quill expression language")
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token stream before evaluating")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed program before evaluating")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let options = RunOptions {
        show_tokens: matches.get_flag("tokens"),
        show_ast: matches.get_flag("ast"),
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, options),
        _ => repl::start(options),
    }
}

fn run_file(path: &str, options: RunOptions) {
    let path = Path::new(path);

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    };

    let filename = path.display().to_string();
    match runner::run(&source, Some(&filename), options) {
        Some(value) => println!("{}", value),
        None => process::exit(1),
    }
}
