//! Text generation endpoint boundary
//!
//! The orchestrator only ever sees `TextGenerator`. The HTTP client for
//! OpenAI-compatible servers lives in `openai`.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub mod openai;

pub use openai::OpenAiCompatibleClient;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: None,
        }
    }
}

/// Anything that turns a system prompt plus a message history into text.
pub trait TextGenerator {
    fn generate(
        &self,
        system: &str,
        history: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(
        &self,
        system: &str,
        history: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        (**self).generate(system, history, params)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(
        &self,
        system: &str,
        history: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        (**self).generate(system, history, params)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// One recorded call to a `ScriptedGenerator`
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub system: String,
        pub history: Vec<Message>,
        pub params: GenerationParams,
    }

    /// Replays canned replies in order and records every request.
    /// Once the script runs out it answers with a transport error.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: RefCell<VecDeque<Result<String, GenerationError>>>,
        pub calls: RefCell<Vec<RecordedCall>>,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, err: GenerationError) -> Self {
            self.replies.borrow_mut().push_back(Err(err));
            self
        }

        pub fn last_call(&self) -> RecordedCall {
            self.calls.borrow().last().cloned().expect("no calls recorded")
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(
            &self,
            system: &str,
            history: &[Message],
            params: &GenerationParams,
        ) -> Result<String, GenerationError> {
            self.calls.borrow_mut().push(RecordedCall {
                system: system.to_string(),
                history: history.to_vec(),
                params: params.clone(),
            });
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".to_string())))
        }
    }
}
