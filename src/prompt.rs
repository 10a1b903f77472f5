//! Line input for the interactive loops
//!
//! A terminal gets a rustyline editor with history. Pipes and tests read
//! plain lines through `Piped`.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, IsTerminal, Write};

/// What came back from one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line, without its terminator
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or end of input
    Eof,
}

pub trait LineSource {
    /// Show `prompt` and read one line
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        (**self).read_line(prompt)
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        (**self).read_line(prompt)
    }
}

/// Interactive terminal input with line editing and history
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_to_io)?;
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(readline_to_io(e)),
        }
    }
}

fn readline_to_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

/// Plain line reader. The prompt is written to `echo` before each read.
pub struct Piped<R, W> {
    input: R,
    echo: W,
}

impl<R: BufRead, W: Write> Piped<R, W> {
    pub fn new(input: R, echo: W) -> Self {
        Self { input, echo }
    }
}

impl<R: BufRead, W: Write> LineSource for Piped<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        write!(self.echo, "{}", prompt)?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        Ok(ReadOutcome::Line(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Line source for stdin: rustyline on a terminal, plain reads otherwise
pub fn stdin_source() -> io::Result<Box<dyn LineSource>> {
    if io::stdin().is_terminal() {
        log::debug!("stdin is a terminal, using line editor");
        Ok(Box::new(Terminal::new()?))
    } else {
        Ok(Box::new(Piped::new(io::stdin().lock(), io::stdout())))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_piped_strips_terminators() {
        let mut echo = Vec::new();
        let mut source = Piped::new(Cursor::new("hello\r\nworld\n"), &mut echo);

        assert_eq!(source.read_line("> ").unwrap(), ReadOutcome::Line("hello".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), ReadOutcome::Line("world".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), ReadOutcome::Eof);
        drop(source);
        assert_eq!(echo, b"> > > ");
    }

    #[test]
    fn test_piped_keeps_blank_lines() {
        let mut source = Piped::new(Cursor::new("\nlast"), io::sink());
        assert_eq!(source.read_line("").unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(source.read_line("").unwrap(), ReadOutcome::Line("last".to_string()));
    }

    #[test]
    fn test_scripted_lines_end_with_eof() {
        let mut source = testing::ScriptedLines::new().line("a").interrupt();
        assert_eq!(source.read_line("p").unwrap(), ReadOutcome::Line("a".to_string()));
        assert_eq!(source.read_line("p").unwrap(), ReadOutcome::Interrupted);
        assert_eq!(source.read_line("p").unwrap(), ReadOutcome::Eof);
        assert_eq!(source.prompts, vec!["p", "p", "p"]);
    }
}
