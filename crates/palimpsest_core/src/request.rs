//! Requests sent to backend collaborators.

use crate::{ParsingType, PromptBody, VersionFields, VersionId};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload of the streaming run-and-create call.
///
/// `version_id` is `None` when the backend should create a new version from
/// the submitted fields before running it.
///
/// # Examples
///
/// ```
/// use palimpsest_core::{PromptBody, RunRequestBuilder};
///
/// let request = RunRequestBuilder::default()
///     .body(PromptBody::SystemPrompt("Hi".into()))
///     .model("gpt-3.5-turbo")
///     .build()
///     .unwrap();
/// assert!(request.version_id.is_none());
/// assert!(request.sample_input.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct RunRequest {
    /// Prompt steps or system prompt
    #[serde(flatten)]
    pub body: PromptBody,
    /// Model name
    pub model: String,
    /// Parent of the version to be created
    #[builder(default)]
    pub from_version: Option<VersionId>,
    /// Existing version to run, or `None` to create one
    #[builder(default)]
    pub version_id: Option<VersionId>,
    /// Output parser
    #[builder(default)]
    pub parsing_type: Option<ParsingType>,
    /// Keys the parser extracts
    #[builder(default)]
    pub output_keys: Vec<String>,
    /// Function names offered to the model
    #[builder(default)]
    pub functions: Vec<String>,
    /// User-supplied template inputs
    #[builder(default)]
    pub sample_input: BTreeMap<String, String>,
}

impl RunRequest {
    /// Build a request that runs `fields`.
    pub fn from_fields(
        fields: &VersionFields,
        version_id: Option<VersionId>,
        from_version: Option<VersionId>,
        sample_input: BTreeMap<String, String>,
    ) -> Self {
        Self {
            body: fields.body.clone(),
            model: fields.model.clone(),
            from_version,
            version_id,
            parsing_type: fields.parsing_type,
            output_keys: fields.output_keys.clone(),
            functions: fields.functions.clone(),
            sample_input,
        }
    }

    /// The version fields this request submits.
    pub fn fields(&self) -> VersionFields {
        VersionFields {
            body: self.body.clone(),
            model: self.model.clone(),
            parsing_type: self.parsing_type,
            output_keys: self.output_keys.clone(),
            functions: self.functions.clone(),
        }
    }
}

/// Payload of a plain (non-running) version creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    /// Fields of the new version
    pub fields: VersionFields,
    /// Parent version
    pub from_version: Option<VersionId>,
}

/// Project the published version belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project id
    pub id: String,
    /// Project display name
    pub name: String,
}

/// Payload of the publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Version to mark published
    pub version_id: VersionId,
    /// Currently published version, unmarked by the backend
    pub previous_published_version_id: Option<VersionId>,
    /// Owning project
    pub project: ProjectRef,
}

/// What an external change notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeScope {
    /// The version list (insert, publish toggle)
    Versions,
    /// Persisted run logs
    RunLogs,
}

/// One message from the realtime change channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotice {
    /// Kind of record that changed
    pub scope: ChangeScope,
    /// Affected version, when the backend names one
    #[serde(default)]
    pub version_id: Option<VersionId>,
}
