// src/cli/shell.rs

use std::io::{self, BufRead, Write};

use crate::{
    cli::{
        dispatcher::{Dispatch, Dispatcher},
        output,
    },
    constants::PROMPT,
};

/// The interactive read-eval loop around the line dispatcher.
///
/// The shell owns its reader and writer for its lifetime. It processes one
/// line at a time to completion: end-of-input ends the session normally,
/// and any dispatch error is written to the operator stream before the loop
/// resumes; a single bad command never terminates the session.
pub struct Shell<'a, R, W> {
    dispatcher: Dispatcher<'a>,
    input: R,
    output: W,
    prompt: &'static str,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(dispatcher: Dispatcher<'a>, input: R, output: W) -> Self {
        Self {
            dispatcher,
            input,
            output,
            prompt: PROMPT,
        }
    }

    /// Runs the loop until end-of-input. Only I/O failures on the shell's
    /// own streams abort it; dispatch errors are reported and swallowed.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                // Operator closed the session.
                writeln!(self.output)?;
                return Ok(());
            }

            match self.dispatcher.dispatch_line(&line) {
                Ok(Dispatch::Skipped) => {}
                Ok(Dispatch::Completed(payload)) => output::render(&mut self.output, &payload)?,
                Err(err) => output::report(&mut self.output, &err)?,
            }
        }
    }
}
