//! The editable fields of a version.

use crate::{EntityKind, ParsingType, PromptBody};
use serde::{Deserialize, Serialize};

/// Everything a user can change before saving a new version.
///
/// The same struct is used for the persisted fields of a saved version, the
/// in-memory draft, and the fields echoed into the new-version cache.
///
/// # Examples
///
/// ```
/// use palimpsest_core::{PromptBody, VersionFields};
///
/// let fields = VersionFields::new(PromptBody::SystemPrompt("Be brief.".into()), "gpt-3.5-turbo");
/// assert!(fields.parsing_type.is_none());
/// assert!(fields.output_keys.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFields {
    /// Prompt steps or system prompt
    #[serde(flatten)]
    pub body: PromptBody,
    /// Model name, e.g. `gpt-3.5-turbo`
    pub model: String,
    /// Output parser, if any
    #[serde(default)]
    pub parsing_type: Option<ParsingType>,
    /// Keys the parser extracts
    #[serde(default)]
    pub output_keys: Vec<String>,
    /// Names of functions the model may call
    #[serde(default)]
    pub functions: Vec<String>,
}

impl VersionFields {
    /// Fields with the given body and model and nothing else configured.
    pub fn new(body: PromptBody, model: impl Into<String>) -> Self {
        Self {
            body,
            model: model.into(),
            parsing_type: None,
            output_keys: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Entity kind implied by the prompt body.
    pub fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    /// Copy suitable for seeding a draft.
    ///
    /// Output keys only mean something with a parser, so they are dropped
    /// when no parser is configured.
    pub fn seeded(&self) -> Self {
        let mut seeded = self.clone();
        if seeded.parsing_type.is_none() {
            seeded.output_keys.clear();
        }
        seeded
    }
}
