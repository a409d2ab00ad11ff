//! Prompt content types.

use serde::{Deserialize, Serialize};

/// Author role of one prompt message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation
    System,
    /// Human turn
    User,
    /// Model turn
    Assistant,
}

/// One step of a function-model prompt.
///
/// # Examples
///
/// ```
/// use palimpsest_core::{PromptMessage, Role};
///
/// let prompt = PromptMessage::new(Role::System, 1, "You are terse.");
/// assert_eq!(prompt.step, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Who speaks this step
    pub role: Role,
    /// Position of the step within the prompt (1-based)
    pub step: u32,
    /// Template text
    pub content: String,
}

impl PromptMessage {
    /// Create a prompt step.
    pub fn new(role: Role, step: u32, content: impl Into<String>) -> Self {
        Self {
            role,
            step,
            content: content.into(),
        }
    }
}

/// Which kind of entity a version belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    /// Multi-step prompt template
    FunctionModel,
    /// Chat bot defined by a single system prompt
    ChatModel,
}

/// The prompt part of a version.
///
/// Serialized externally tagged, so a version record carries either a
/// `prompts` array or a `system_prompt` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptBody {
    /// Ordered prompt steps of a function model
    Prompts(Vec<PromptMessage>),
    /// System prompt of a chat model
    SystemPrompt(String),
}

impl PromptBody {
    /// The entity kind this body belongs to.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Prompts(_) => EntityKind::FunctionModel,
            Self::SystemPrompt(_) => EntityKind::ChatModel,
        }
    }

    /// Prompt steps sorted by step number, or `None` for a chat body.
    pub fn ordered_prompts(&self) -> Option<Vec<&PromptMessage>> {
        match self {
            Self::Prompts(prompts) => {
                let mut ordered: Vec<&PromptMessage> = prompts.iter().collect();
                ordered.sort_by_key(|p| p.step);
                Some(ordered)
            }
            Self::SystemPrompt(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_serializes_externally_tagged() {
        let body = PromptBody::SystemPrompt("hi".to_string());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"system_prompt": "hi"}));
    }

    #[test]
    fn ordered_prompts_sorts_by_step() {
        let body = PromptBody::Prompts(vec![
            PromptMessage::new(Role::User, 2, "b"),
            PromptMessage::new(Role::System, 1, "a"),
        ]);
        let ordered = body.ordered_prompts().unwrap();
        assert_eq!(ordered[0].content, "a");
        assert_eq!(ordered[1].content, "b");
    }
}
