use std::{fs, path::PathBuf, process};

use clap::{Parser, Subcommand};

use tansy::{Interpreter, Repl, TansyError};

#[derive(Parser)]
#[command(author, version, about = "Tansy language interpreter")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a tansy script file
    Run { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
    /// Evaluate a snippet of tansy code and print the result
    Eval { source: String },
}

fn main() -> Result<(), TansyError> {
    let result = match Args::parse().command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(script),
        Command::Repl => {
            let mut repl = Repl::new();
            repl.run()
        }
        Command::Eval { source } => {
            let mut interpreter = Interpreter::new();
            interpreter
                .eval_source(&source)
                .map(|value| println!("{value}"))
        }
    };
    match result {
        Err(TansyError::Exit(code)) => process::exit(code),
        other => other,
    }
}

fn run_script(path: PathBuf) -> Result<(), TansyError> {
    let source = fs::read_to_string(&path)?;
    let mut interpreter = Interpreter::new();
    interpreter.eval_source(&source)?;
    Ok(())
}
