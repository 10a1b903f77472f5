use eyre::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use std::io::{self, Write};

use crate::config::Config;
use crate::display::{PanelStyle, render_panel, separator, terminal_width};
use crate::llm::{GenerationParams, Message, OpenAiCompatibleClient, TextGenerator};
use crate::prompt::{self, LineSource, ReadOutcome};
use crate::session::EXIT_KEYWORD;

pub const GREETER_PERSONA: &str = "You are a helpful and expressive assistant.";

const ADJECTIVES: [&str; 6] = ["enthusiastic", "cheerful", "warm", "friendly", "heartfelt", "sincere"];

const FAREWELLS: [&str; 6] = [
    "Good night",
    "Goodbye",
    "See you soon",
    "Take care",
    "Have a great day",
    "Catch you later",
];

/// Build the user prompt for one greeting
pub fn greeting_prompt<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or(ADJECTIVES[0]);
    let farewell = FAREWELLS.choose(rng).copied().unwrap_or(FAREWELLS[0]);
    format!(
        "Introduce your model version, and say a {} {} to {}",
        adjective, farewell, name
    )
}

pub fn run(config: &Config) -> Result<()> {
    let client = OpenAiCompatibleClient::new(&config.endpoint);
    log::info!("Greeter using model {}", client.model());

    let mut lines = prompt::stdin_source().context("Failed to open terminal input")?;
    let stdout = io::stdout();
    greet_loop(
        &client,
        &config.generation,
        &mut rand::thread_rng(),
        &mut *lines,
        &mut stdout.lock(),
        terminal_width(),
    )
}

pub fn greet_loop<G, X, L, W>(
    generator: &G,
    params: &GenerationParams,
    rng: &mut X,
    input: &mut L,
    out: &mut W,
    width: usize,
) -> Result<()>
where
    G: TextGenerator,
    X: Rng,
    L: LineSource + ?Sized,
    W: Write,
{
    loop {
        writeln!(out, "{}", separator(width))?;
        out.flush()?;

        let line = match input
            .read_line(&format!("Your name: (type '{}' to quit) ", EXIT_KEYWORD))
            .context("Failed to read name")?
        {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted | ReadOutcome::Eof => {
                writeln!(out)?;
                break;
            }
        };

        let name = line.trim();
        if name.eq_ignore_ascii_case(EXIT_KEYWORD) {
            break;
        }
        if name.is_empty() {
            continue;
        }

        let prompt = greeting_prompt(name, rng);
        log::debug!("Greeting prompt: {}", prompt);

        match generator.generate(GREETER_PERSONA, &[Message::user(prompt)], params) {
            Ok(text) => write!(out, "{}", render_panel(&text, PanelStyle::Chat, width))?,
            Err(e) => {
                log::warn!("Greeting failed: {}", e);
                write!(out, "{}", render_panel(&e.to_string(), PanelStyle::Error, width))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::llm::testing::ScriptedGenerator;
    use crate::prompt::Piped;
    use crate::prompt::testing::ScriptedLines;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;

    fn run_lines(generator: &ScriptedGenerator, lines: &str) -> String {
        colored::control::set_override(false);
        let mut rng = StdRng::seed_from_u64(7);
        let mut input = Piped::new(Cursor::new(lines.as_bytes().to_vec()), io::sink());
        let mut out = Vec::new();
        greet_loop(
            generator,
            &GenerationParams::default(),
            &mut rng,
            &mut input,
            &mut out,
            60,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_greeting_prompt_uses_fixed_vocabulary() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let prompt = greeting_prompt("Ada", &mut rng);
            assert!(prompt.starts_with("Introduce your model version, and say a "));
            assert!(prompt.ends_with(" to Ada"));
            assert!(ADJECTIVES.iter().any(|a| prompt.contains(a)));
            assert!(FAREWELLS.iter().any(|f| prompt.contains(f)));
        }
    }

    #[test]
    fn test_greeting_prompt_is_deterministic_for_a_seed() {
        let a = greeting_prompt("Ada", &mut StdRng::seed_from_u64(1));
        let b = greeting_prompt("Ada", &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_greet_loop_sends_persona_and_prompt() {
        let generator = ScriptedGenerator::new().reply("Hello Ada, I am llama.");
        let out = run_lines(&generator, "Ada\nexit\n");

        assert!(out.contains("Hello Ada, I am llama."));
        let call = generator.last_call();
        assert_eq!(call.system, GREETER_PERSONA);
        assert_eq!(call.history.len(), 1);
        assert!(call.history[0].content().ends_with(" to Ada"));
    }

    #[test]
    fn test_greet_loop_skips_blank_names_and_stops_at_eof() {
        let generator = ScriptedGenerator::new().reply("hi");
        run_lines(&generator, "\n  \nGrace");
        assert_eq!(generator.calls.borrow().len(), 1);
    }

    #[test]
    fn test_greet_loop_reports_errors_and_continues() {
        let generator = ScriptedGenerator::new()
            .fail(GenerationError::Transport("connection refused".to_string()))
            .reply("Hi Linus");
        let out = run_lines(&generator, "Ken\nLinus\nEXIT\n");

        assert!(out.contains("connection refused"));
        assert!(out.contains("Hi Linus"));
        assert_eq!(generator.calls.borrow().len(), 2);
    }

    #[test]
    fn test_greet_loop_stops_on_interrupt() {
        colored::control::set_override(false);
        let generator = ScriptedGenerator::new().reply("hi");
        let mut input = ScriptedLines::new().line("Ada").interrupt().line("Grace");
        let mut out = Vec::new();

        greet_loop(
            &generator,
            &GenerationParams::default(),
            &mut StdRng::seed_from_u64(3),
            &mut input,
            &mut out,
            60,
        )
        .unwrap();

        assert_eq!(generator.calls.borrow().len(), 1);
        assert_eq!(input.prompts.len(), 2);
        assert!(input.prompts[0].starts_with("Your name:"));
    }
}
