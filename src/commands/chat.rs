use chrono::Local;
use colored::*;
use eyre::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use crate::config::{Config, NotesConfig};
use crate::display::{PanelStyle, render_panel, separator, terminal_width};
use crate::document::Document;
use crate::llm::{OpenAiCompatibleClient, TextGenerator};
use crate::notes;
use crate::orchestrator::Orchestrator;
use crate::prompt::{self, LineSource, ReadOutcome};
use crate::session::{Session, SessionState};

pub fn run(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let input = Config::expand_path(input);
    let output = Config::expand_path(output);

    // Both reads happen before any interaction
    let document = Document::load(&input).context("Failed to load paper")?;
    let prior_notes = notes::read_prior(&output).context("Failed to read prior notes")?;

    let client = OpenAiCompatibleClient::new(&config.endpoint);
    log::info!("Chatting about {} with {}", document.path().display(), client.model());
    let orchestrator = Orchestrator::new(client, config.generation.clone());
    let session =
        Session::new(orchestrator, document, terminal_width()).with_opening_mode(config.session.opening_mode.clone());

    let mut lines = prompt::stdin_source().context("Failed to open terminal input")?;
    let stdout = io::stdout();
    interact(session, &prior_notes, &output, &config.notes, &mut *lines, &mut stdout.lock())
}

/// Drive a whole session: opening summary, the chat loop, then the save prompt
pub fn interact<G, L, W>(
    mut session: Session<G>,
    prior_notes: &str,
    output: &Path,
    notes_config: &NotesConfig,
    input: &mut L,
    out: &mut W,
) -> Result<()>
where
    G: TextGenerator,
    L: LineSource + ?Sized,
    W: Write,
{
    session.open(out)?;
    session.run(input, out)?;
    debug_assert_eq!(session.state(), SessionState::Ended);

    writeln!(out, "{}", separator(terminal_width()))?;
    if confirm(input, out, "Save conversation? (y/N): ")? {
        writeln!(out, "Thinking...")?;
        out.flush()?;
        save(&session, prior_notes, output, notes_config, out)?;
    }

    writeln!(out, "Exiting...")?;
    Ok(())
}

/// Ask a yes/no question. Anything but y/yes, Ctrl-C included, means no.
fn confirm<L, W>(input: &mut L, out: &mut W, question: &str) -> Result<bool>
where
    L: LineSource + ?Sized,
    W: Write,
{
    out.flush()?;
    match input.read_line(question).context("Failed to read answer")? {
        ReadOutcome::Line(answer) => Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")),
        ReadOutcome::Interrupted | ReadOutcome::Eof => {
            writeln!(out)?;
            Ok(false)
        }
    }
}

fn save<G: TextGenerator, W: Write>(
    session: &Session<G>,
    prior_notes: &str,
    output: &Path,
    notes_config: &NotesConfig,
    out: &mut W,
) -> Result<()> {
    if session.transcript().is_empty() {
        log::info!("No completed turns, reconciling with the opening summary only");
    }

    let prior = if notes_config.frontmatter {
        notes::strip_frontmatter(prior_notes)
    } else {
        prior_notes
    };

    let reconciled = match session
        .orchestrator()
        .reconcile_notes(session.transcript(), session.opening(), prior)
    {
        Ok(text) => text,
        Err(e) => {
            write!(out, "{}", render_panel(&e.to_string(), PanelStyle::Error, terminal_width()))?;
            return Err(e).context("Failed to reconcile notes, nothing was saved");
        }
    };

    let content = if notes_config.frontmatter {
        let header = notes::frontmatter(&session.document().title(), Local::now().date_naive(), &notes_config.tags);
        format!("{}{}", header, reconciled)
    } else {
        reconciled
    };

    notes::write(output, &content).context("Failed to save notes")?;
    writeln!(out, "{} Conversation saved to {}", "✓".green(), output.display())?;
    Ok(())
}
