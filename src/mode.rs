//! Conversation modes
//!
//! A mode is the stance the assistant takes for one turn. Every stance mode
//! contributes a prompt fragment that is appended to the base persona.

use serde::{Deserialize, Serialize};

/// Base persona shared by every paper-chat request
pub const PERSONA: &str = "\
You are a highly specialized assistant trained to help users quickly and efficiently comprehend academic papers. \
Your primary function is to:

1. **Extract Key Information**: Provide summaries, key findings, and critical insights from academic papers, \
including abstracts, introductions, conclusions, and important figures or formulas.

2. **Clarify Terminology**: Define complex or unfamiliar terms in simple and concise language, with appropriate \
contextual understanding from the field of study.

3. **Explain Concepts**: Offer clear and detailed explanations of complex concepts, methodologies, and theoretical \
frameworks found in the academic text.

4. **Identify Citations**: Highlight important references and citations that are crucial for understanding the \
background or context of the paper.

5. **Answer Questions**: Respond to user queries about the paper, providing precise and accurate information from \
the text.

6. **Make Connections**: Help users connect ideas from one paper to broader research trends or other relevant works \
in the field.

7. **Stay Focused on Content**: Stick to the content of the paper and assist the user with academic understanding. \
Do not provide unrelated information unless asked directly.

You will receive academic papers in markdown format and must respond accordingly to help the user comprehend the \
material as efficiently as possible.";

/// Conversational stance for a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free-form question answering, carries the prior turns
    #[default]
    Chat,
    Summary,
    Deep,
    Critique,
    Connect,
    Explain,
}

impl Mode {
    /// Modes that can be selected with a `/tag` prefix
    pub const STANCES: [Mode; 5] = [Mode::Summary, Mode::Deep, Mode::Critique, Mode::Connect, Mode::Explain];

    /// Strict lookup of a stance tag. `chat` is not selectable by tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "summary" => Some(Mode::Summary),
            "deep" => Some(Mode::Deep),
            "critique" => Some(Mode::Critique),
            "connect" => Some(Mode::Connect),
            "explain" => Some(Mode::Explain),
            _ => None,
        }
    }

    /// Lenient lookup: anything unrecognized becomes `Summary`
    pub fn resolve(tag: &str) -> Self {
        Self::parse(tag).unwrap_or(Mode::Summary)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Summary => "summary",
            Mode::Deep => "deep",
            Mode::Critique => "critique",
            Mode::Connect => "connect",
            Mode::Explain => "explain",
        }
    }

    pub fn is_stance(&self) -> bool {
        !matches!(self, Mode::Chat)
    }

    /// Get the prompt fragment for this mode
    pub fn prompt_fragment(&self) -> Option<&'static str> {
        match self {
            Mode::Chat => None,
            Mode::Summary => Some(
                "You are a research assistant helping to summarize academic papers.
Provide a concise summary focusing on:
- Key findings and contributions
- Main methodology
- Important conclusions
Keep the summary clear and focused on the most important points.",
            ),
            Mode::Deep => Some(
                "You are a research expert conducting in-depth analysis of academic papers.
Focus on:
- Detailed methodology analysis
- Assumptions and their validity
- Experimental design and results
- Theoretical foundations
Provide thorough explanations and insights.",
            ),
            Mode::Critique => Some(
                "You are a peer reviewer critically analyzing this paper.
Focus on:
- Methodological strengths and weaknesses
- Potential limitations and biases
- Validity of conclusions
- Suggestions for improvement
Be constructive but thorough in your critique.",
            ),
            Mode::Connect => Some(
                "You are a research coordinator identifying connections between papers.
Focus on:
- Related work and references
- Similar methodologies or findings
- Potential applications in other fields
- Future research directions
Help build connections to the broader research landscape.",
            ),
            Mode::Explain => Some(
                "You are a teacher explaining complex academic concepts.
Focus on:
- Breaking down complex terms and ideas
- Using simple analogies and examples
- Providing clear, step-by-step explanations
- Answering common questions
Make the content accessible while maintaining accuracy.",
            ),
        }
    }

    /// Full system prompt: persona, then the stance fragment if any
    pub fn system_prompt(&self) -> String {
        match self.prompt_fragment() {
            Some(fragment) => format!("{}\n\n{}", PERSONA, fragment),
            None => PERSONA.to_string(),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
