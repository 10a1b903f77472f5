//! Terminal panels for model replies

use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::mode::Mode;

const DEFAULT_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;
const PAD_X: usize = 2;

/// Visual style of a panel, one per mode plus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Chat,
    Summary,
    Deep,
    Critique,
    Connect,
    Explain,
    Error,
}

impl PanelStyle {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Chat => PanelStyle::Chat,
            Mode::Summary => PanelStyle::Summary,
            Mode::Deep => PanelStyle::Deep,
            Mode::Critique => PanelStyle::Critique,
            Mode::Connect => PanelStyle::Connect,
            Mode::Explain => PanelStyle::Explain,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelStyle::Chat => "AI Response",
            PanelStyle::Summary => "📝 Summary",
            PanelStyle::Deep => "🔍 Deep Analysis",
            PanelStyle::Critique => "⚖️ Critical Review",
            PanelStyle::Connect => "🔗 Connections",
            PanelStyle::Explain => "📚 Explanation",
            PanelStyle::Error => "❌ Error",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PanelStyle::Chat => Color::Blue,
            PanelStyle::Summary => Color::Green,
            PanelStyle::Deep => Color::Magenta,
            PanelStyle::Critique => Color::Yellow,
            PanelStyle::Connect => Color::Cyan,
            PanelStyle::Explain => Color::BrightBlue,
            PanelStyle::Error => Color::Red,
        }
    }
}

/// Current terminal width, or 80 columns when not attached to a terminal
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_WIDTH)
        .max(MIN_WIDTH)
}

/// Horizontal rule printed between turns
pub fn separator(width: usize) -> String {
    "-".repeat(width.saturating_sub(1).max(1))
}

/// Terminal columns taken by `text`. Wide glyphs such as emoji count twice.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Word-wrap `text` to `width` terminal columns. Existing line breaks are kept
/// and words wider than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(2);
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw.split_whitespace() {
            let mut word = word.to_string();
            let mut word_width = display_width(&word);

            while word_width > width {
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                let (head, rest) = split_at_width(&word, width);
                lines.push(head.to_string());
                word = rest.to_string();
                word_width = display_width(&word);
            }

            let needed = if current_width == 0 { word_width } else { current_width + 1 + word_width };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&word);
            current_width += word_width;
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split `word` so the head fills at most `width` columns
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return word.split_at(i);
        }
        used += w;
    }
    (word, "")
}

/// Render `text` inside a titled, bordered panel `width` columns wide
pub fn render_panel(text: &str, style: PanelStyle, width: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let inner = width - 2;
    let color = style.color();
    let title = format!(" {} ", style.title());
    let title_width = display_width(&title);

    let mut out = String::new();

    let fill = inner.saturating_sub(title_width + 1);
    out.push_str(&format!(
        "{}{}{}\n",
        "╭─".color(color),
        title.bold(),
        format!("{}╮", "─".repeat(fill)).color(color)
    ));

    let blank = format!("{}{}{}\n", "│".color(color), " ".repeat(inner), "│".color(color));
    out.push_str(&blank);

    for line in wrap(text, inner - 2 * PAD_X) {
        let pad = inner.saturating_sub(display_width(&line) + PAD_X);
        out.push_str(&format!(
            "{}{}{}{}{}\n",
            "│".color(color),
            " ".repeat(PAD_X),
            line,
            " ".repeat(pad),
            "│".color(color)
        ));
    }

    out.push_str(&blank);
    out.push_str(&format!("{}\n", format!("╰{}╯", "─".repeat(inner)).color(color)));
    out
}
