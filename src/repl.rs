use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    diagnostics::{Result, TansyError},
    runtime::{Interpreter, LineOutcome},
};

/// Interactive session driver. Lines are fed to the interpreter one at
/// a time; while a list is still open the prompt switches to `...> `
/// and further input extends the pending form instead of starting a
/// new one.
pub struct Repl {
    interpreter: Interpreter,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Runs over a host-extended session instead of a plain one.
    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(|err| {
            TansyError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
        })?;
        loop {
            let prompt = if self.interpreter.has_pending() {
                "...> "
            } else {
                "> "
            };
            match editor.readline(prompt) {
                Ok(line) => {
                    if line.trim().is_empty() && !self.interpreter.has_pending() {
                        continue;
                    }
                    editor.add_history_entry(line.trim_end()).ok();
                    match self.interpreter.eval_line(&line) {
                        Ok(LineOutcome::Complete(value)) => println!("{value}"),
                        Ok(LineOutcome::Incomplete) => {}
                        Err(TansyError::Exit(code)) => std::process::exit(code),
                        Err(err) => eprintln!("error: {err}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    if self.interpreter.has_pending() {
                        self.interpreter.clear_pending();
                        continue;
                    }
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    return Err(TansyError::from(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        err,
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
