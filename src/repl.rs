use std::path::PathBuf;

use clap::Args;
use log::{debug, warn};
use miette::{Error, IntoDiagnostic, WrapErr};
use rustyline::{DefaultEditor, error::ReadlineError};

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Prompt shown before each line
    #[arg(long, default_value = "scream> ")]
    pub prompt: String,

    /// File to load line history from at start and save it to on exit
    #[arg(long)]
    pub history: Option<PathBuf>,
}

/// What the loop does with one line of input.
#[derive(Debug)]
pub enum Response {
    Quit,
    Skip,
    Output(String),
    Rejected(Error),
}

pub fn respond(line: &str) -> Response {
    let line = line.trim();
    if line.is_empty() {
        return Response::Skip;
    }
    if matches!(line, "exit" | "(exit)") {
        return Response::Quit;
    }

    match crate::interpret(Some("<stdin>"), line) {
        Ok(output) => Response::Output(output),
        Err(e) => Response::Rejected(e),
    }
}

pub struct Repl {
    editor: DefaultEditor,
    config: Config,
}

impl Repl {
    pub fn new(config: Config) -> Result<Self, Error> {
        let mut editor = DefaultEditor::new()
            .into_diagnostic()
            .wrap_err("starting the line editor failed")?;

        if let Some(path) = &config.history {
            match editor.load_history(path) {
                Ok(()) => debug!("loaded history from `{}`", path.display()),
                Err(e) => warn!("could not load history from `{}`: {e}", path.display()),
            }
        }

        Ok(Repl { editor, config })
    }

    pub fn run(mut self) -> Result<(), Error> {
        println!("scream - ctrl-c to exit\n");

        loop {
            let line = match self.editor.readline(&self.config.prompt) {
                Ok(line) => line,
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
                Err(e) => return Err(e).into_diagnostic().wrap_err("reading a line failed"),
            };

            if !line.trim().is_empty() {
                if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                    warn!("could not record history entry: {e}");
                }
            }

            match respond(&line) {
                Response::Quit => break,
                Response::Skip => continue,
                Response::Output(output) => println!("{output}"),
                Response::Rejected(e) => eprintln!("{e:?}"),
            }
        }

        debug!("leaving the loop");
        if let Some(path) = &self.config.history {
            if let Err(e) = self.editor.save_history(path) {
                warn!("could not save history to `{}`: {e}", path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert!(matches!(respond(""), Response::Skip));
        assert!(matches!(respond("  \t "), Response::Skip));
    }

    #[test]
    fn exit_commands_quit() {
        assert!(matches!(respond("exit"), Response::Quit));
        assert!(matches!(respond(" (exit) "), Response::Quit));
    }

    #[test]
    fn results_and_failures_are_output() {
        match respond("+ 1 2") {
            Response::Output(output) => assert_eq!(output, "3"),
            other => panic!("unexpected response: {other:?}"),
        }
        match respond("/ 10 0") {
            Response::Output(output) => assert_eq!(output, "error: division by zero"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn syntax_errors_are_rejected_not_fatal() {
        assert!(matches!(respond("+ 1 ("), Response::Rejected(_)));
        match respond("* 6 7") {
            Response::Output(output) => assert_eq!(output, "42"),
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
