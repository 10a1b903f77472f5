//! Interactive paper-chat session
//!
//! States: awaiting input -> (exit | dispatch) -> awaiting input, until ended.

use lazy_regex::regex_captures;
use std::io::Write;

use crate::display::{PanelStyle, render_panel, separator};
use crate::document::Document;
use crate::error::GenerationError;
use crate::llm::{Message, TextGenerator};
use crate::mode::Mode;
use crate::orchestrator::Orchestrator;
use crate::prompt::{LineSource, ReadOutcome};
use crate::transcript::Transcript;

pub const EXIT_KEYWORD: &str = "exit";

/// Mode tag used for the opening request when none is configured
pub const DEFAULT_OPENING_MODE: &str = "summary";

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    Sections,
    Help,
    Ask { mode: Mode, query: String },
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Input::Empty;
        }
        if trimmed.eq_ignore_ascii_case(EXIT_KEYWORD) {
            return Input::Exit;
        }

        if let Some((_, tag, rest)) = regex_captures!(r"^/(\S+)(.*)$", trimmed) {
            match tag.to_lowercase().as_str() {
                "sections" => return Input::Sections,
                "help" => return Input::Help,
                _ => {}
            }
            if let Some(mode) = Mode::parse(tag) {
                return Input::Ask {
                    mode,
                    query: rest.split_whitespace().collect::<Vec<_>>().join(" "),
                };
            }
        }

        Input::Ask {
            mode: Mode::Chat,
            query: line.trim_end_matches(['\r', '\n']).to_string(),
        }
    }
}

/// Lifecycle of the read-dispatch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Ended,
}

pub struct Session<G> {
    orchestrator: Orchestrator<G>,
    document: Document,
    transcript: Transcript,
    opening: Option<String>,
    opening_mode: String,
    state: SessionState,
    width: usize,
}

impl<G: TextGenerator> Session<G> {
    pub fn new(orchestrator: Orchestrator<G>, document: Document, width: usize) -> Self {
        Self {
            orchestrator,
            document,
            transcript: Transcript::new(),
            opening: None,
            opening_mode: DEFAULT_OPENING_MODE.to_string(),
            state: SessionState::AwaitingInput,
            width,
        }
    }

    /// Mode tag for the opening request. Unknown tags fall back to the summary stance.
    pub fn with_opening_mode(mut self, tag: impl Into<String>) -> Self {
        self.opening_mode = tag.into();
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator<G> {
        &self.orchestrator
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Summary produced when the session opened, if it succeeded
    pub fn opening(&self) -> Option<&str> {
        self.opening.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one turn. The request and reply are recorded only on success.
    pub fn turn(&mut self, mode: Mode, query: &str) -> Result<&Message, GenerationError> {
        let request = Message::user(query);
        let history = self.transcript.with_pending(&request);
        let reply = self.orchestrator.respond(mode, &history, &self.document)?;
        self.transcript.record(request, reply);
        Ok(&self.transcript.messages()[self.transcript.len() - 1])
    }

    /// Request the opening summary over an empty history
    pub fn open<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        write!(
            out,
            "{}",
            render_panel(
                "Welcome! I'll help you read this paper. Here's a quick summary:",
                PanelStyle::Chat,
                self.width
            )
        )?;

        let mode = Mode::resolve(&self.opening_mode);
        if Mode::parse(&self.opening_mode).is_none() {
            log::warn!("Unknown opening mode '{}', using {}", self.opening_mode, mode);
        }

        match self.orchestrator.respond_to_tag(&self.opening_mode, &[], &self.document) {
            Ok(summary) => {
                write!(out, "{}", render_panel(summary.content(), PanelStyle::for_mode(mode), self.width))?;
                self.opening = Some(summary.content().to_string());
            }
            Err(e) => {
                log::warn!("Opening summary failed: {}", e);
                write!(out, "{}", render_panel(&e.to_string(), PanelStyle::Error, self.width))?;
            }
        }
        Ok(())
    }

    /// Read and dispatch lines until `exit`, Ctrl-C or end of input
    pub fn run<L, W>(&mut self, input: &mut L, out: &mut W) -> std::io::Result<()>
    where
        L: LineSource + ?Sized,
        W: Write,
    {
        while self.state == SessionState::AwaitingInput {
            writeln!(out, "{}", separator(self.width))?;
            writeln!(out, "Available modes: {}", stance_list())?;
            out.flush()?;

            let line = match input.read_line(&format!("You: (type '{}' to quit) ", EXIT_KEYWORD))? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted | ReadOutcome::Eof => {
                    writeln!(out)?;
                    self.dispatch(Input::Exit, out)?;
                    break;
                }
            };

            self.dispatch(Input::parse(&line), out)?;
        }
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, input: Input, out: &mut W) -> std::io::Result<()> {
        match input {
            Input::Exit => {
                log::info!("Session ended after {} turns", self.transcript.turns());
                self.state = SessionState::Ended;
            }
            Input::Empty => {}
            Input::Help => {
                writeln!(out, "{}", help_text())?;
            }
            Input::Sections => {
                writeln!(out, "Sections of {}:", self.document.title())?;
                for (i, section) in self.document.outline().iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, section)?;
                }
            }
            Input::Ask { mode, query } => {
                writeln!(out, "{}", separator(self.width))?;
                if mode.is_stance() {
                    writeln!(out, "Thinking... (Mode: {})", mode)?;
                } else {
                    writeln!(out, "Thinking...")?;
                }
                out.flush()?;

                let width = self.width;
                match self.turn(mode, &query) {
                    Ok(reply) => {
                        write!(out, "{}", render_panel(reply.content(), PanelStyle::for_mode(mode), width))?;
                    }
                    Err(e) => {
                        log::warn!("{} turn failed: {}", mode, e);
                        write!(out, "{}", render_panel(&e.to_string(), PanelStyle::Error, width))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn stance_list() -> String {
    Mode::STANCES.iter().map(Mode::tag).collect::<Vec<_>>().join(", ")
}

fn help_text() -> String {
    let mut text = String::from("Ask anything about the paper, or prefix a question with a mode:\n");
    for mode in Mode::STANCES {
        text.push_str(&format!("  /{} <question>\n", mode.tag()));
    }
    text.push_str("  /sections   list the paper's sections\n");
    text.push_str(&format!("  {}        end the session", EXIT_KEYWORD));
    text
}
