//! Conversation orchestrator
//!
//! Turns a mode, a message history and the document into a request for the
//! text generation endpoint. It never touches the transcript: callers record
//! the request and the reply once the call has succeeded.

use crate::document::Document;
use crate::error::GenerationError;
use crate::llm::{GenerationParams, Message, Role, TextGenerator};
use crate::mode::Mode;
use crate::transcript::{Transcript, render_messages};

/// System prompt for merging a conversation into existing notes
pub const NOTES_ORGANIZER: &str = "\
You are an organizational assistant tasked with maintaining, updating, and improving notes based on the interaction \
history of another LLM and its user. Your primary function is to:

1. **Read and Analyze Input**:
   - **Input 1**: Existing markdown notes, which may include sections such as summaries, explanations, citations, \
and observations.
   - **Input 2**: Recent conversation history between the user and another LLM. This will include insights, \
clarifications, questions, and new information.

2. **Update and Organize Notes**:
   - **Combine Information**: Integrate the new insights, explanations, and responses from the conversation history \
with the existing notes.
   - **Organize Clearly**: Reorganize the content in a clear, logical, and structured way. Use appropriate markdown \
features such as:
     - **Headings**: For key sections or newly added topics (e.g., # Summary, ## Key Concepts, ### Questions Answered).
     - **Lists and Bullets**: For bullet points, explanations, or points of interest.
     - **Tables**: For organizing data, citations, or comparisons where relevant.
   - **Improve Clarity**: Ensure that the updated notes are concise, well-structured, and easy to read.

3. **Maintain Markdown Format**:
   - Format the output using markdown syntax for proper structuring. Use appropriate tags like `#` for headings, `*` \
or `-` for bullet points, and `|` for tables if necessary.
   - Add new content under relevant headings, and create new sections as needed based on the conversation history.

4. **Enhance Notes**:
   - **Summarize New Insights**: Synthesize the conversation history to create concise summaries.
   - **Highlight Important Details**: Add key points from the conversation history into the notes, ensuring that \
they align with the existing content.
   - **Organize Logically**: Ensure that the notes flow logically and are easy to navigate. Reorder sections, if \
needed, to improve understanding.

5. **Preserve Context**:
   - Keep any critical information from the original markdown notes intact unless the conversation history provides \
a better, more updated version.
   - Cross-reference new additions with existing content to avoid duplication and ensure consistency.";

/// A request ready to send to the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub system: String,
    pub messages: Vec<Message>,
}

/// Text of the most recent user message, or "" if there is none
pub fn last_question(history: &[Message]) -> &str {
    history
        .iter()
        .rev()
        .find(|m| m.role() == Role::User)
        .map(Message::content)
        .unwrap_or("")
}

/// Build the request for one turn.
///
/// Stance modes send only the latest question with the document. Chat mode
/// also replays every turn before it.
pub fn build_request(mode: Mode, history: &[Message], document: &Document) -> Request {
    let question = last_question(history);

    let messages = if mode.is_stance() {
        vec![Message::user(format!(
            "Mode: {}\n\nPaper content:\n{}\n\nQuestion: {}",
            mode.tag(),
            document.content(),
            question
        ))]
    } else {
        let prior = history
            .iter()
            .rposition(|m| m.role() == Role::User)
            .map(|i| &history[..i])
            .unwrap_or(history);

        let mut messages = prior.to_vec();
        messages.push(Message::user(format!(
            "Paper content:\n{}\n\nQuestion: {}",
            document.content(),
            question
        )));
        messages
    };

    Request {
        system: mode.system_prompt(),
        messages,
    }
}

/// Build the one-shot notes reconciliation request
pub fn build_reconcile_request(conversation: &[Message], prior_notes: &str) -> Request {
    Request {
        system: NOTES_ORGANIZER.to_string(),
        messages: vec![Message::user(format!(
            "Original notes:\n{}\n\nConversation history:\n{}",
            prior_notes,
            render_messages(conversation)
        ))],
    }
}

pub struct Orchestrator<G> {
    generator: G,
    params: GenerationParams,
}

impl<G: TextGenerator> Orchestrator<G> {
    pub fn new(generator: G, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    /// Ask the endpoint for the reply to the latest user message in `history`
    pub fn respond(&self, mode: Mode, history: &[Message], document: &Document) -> Result<Message, GenerationError> {
        let request = build_request(mode, history, document);
        log::info!("Requesting {} reply ({} messages)", mode, request.messages.len());
        let text = self.generator.generate(&request.system, &request.messages, &self.params)?;
        Ok(Message::assistant(text))
    }

    /// Same as `respond`, but for a raw mode tag. Unknown tags use the summary stance.
    pub fn respond_to_tag(
        &self,
        tag: &str,
        history: &[Message],
        document: &Document,
    ) -> Result<Message, GenerationError> {
        self.respond(Mode::resolve(tag), history, document)
    }

    /// Merge the conversation into the prior notes and return the new notes
    pub fn reconcile_notes(
        &self,
        transcript: &Transcript,
        opening: Option<&str>,
        prior_notes: &str,
    ) -> Result<String, GenerationError> {
        let mut conversation = Vec::with_capacity(transcript.len() + 1);
        if let Some(summary) = opening {
            conversation.push(Message::assistant(summary));
        }
        conversation.extend_from_slice(transcript.messages());

        let request = build_reconcile_request(&conversation, prior_notes);
        log::info!("Reconciling {} messages into notes", conversation.len());
        self.generator.generate(&request.system, &request.messages, &self.params)
    }
}
