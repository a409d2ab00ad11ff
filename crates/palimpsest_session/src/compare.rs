//! Equality and staleness between a draft, its original and the cache.
//!
//! Prompt steps compare in step order. Function names and output keys are
//! names, so they compare as sets. Everything else compares by value.

use palimpsest_core::{CachedVersion, PromptBody, VersionFields};
use serde::Serialize;
use std::collections::BTreeSet;

/// Whether two field sets describe the same version.
pub fn fields_equal(a: &VersionFields, b: &VersionFields) -> bool {
    bodies_equal(&a.body, &b.body)
        && a.model == b.model
        && a.parsing_type == b.parsing_type
        && same_names(&a.output_keys, &b.output_keys)
        && same_names(&a.functions, &b.functions)
}

fn bodies_equal(a: &PromptBody, b: &PromptBody) -> bool {
    match (a, b) {
        (PromptBody::SystemPrompt(a), PromptBody::SystemPrompt(b)) => a == b,
        (PromptBody::Prompts(_), PromptBody::Prompts(_)) => {
            a.ordered_prompts() == b.ordered_prompts()
        }
        _ => false,
    }
}

fn same_names(a: &[String], b: &[String]) -> bool {
    a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
}

/// True iff every tracked draft field equals the original's.
pub fn is_equal_to_original(draft: &VersionFields, original: &VersionFields) -> bool {
    fields_equal(draft, original)
}

/// True iff the draft equals the cached version's fields, or there is no cache.
pub fn is_equal_to_cache(draft: &VersionFields, cache: Option<&CachedVersion>) -> bool {
    cache.is_none_or(|cached| fields_equal(draft, &cached.fields))
}

/// Save policy: the draft differs from the original and from the cache, if any.
///
/// Unlike [`is_equal_to_cache`], a missing cache never blocks saving.
pub fn is_new_version_ready(
    draft: &VersionFields,
    original: &VersionFields,
    cache: Option<&CachedVersion>,
) -> bool {
    !is_equal_to_original(draft, original)
        && cache.is_none_or(|cached| !fields_equal(draft, &cached.fields))
}

/// Reasons a draft may not be saved or run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "issue")]
pub enum DraftIssue {
    /// A function model without prompt steps
    NoPrompts,
    /// A prompt step with blank content
    EmptyPrompt {
        /// The offending step
        step: u32,
    },
    /// A chat model with a blank system prompt
    EmptySystemPrompt,
    /// No model chosen
    EmptyModel,
    /// A parser is configured but extracts nothing
    ParserWithoutOutputKeys,
    /// Output keys are listed but no parser would produce them
    OutputKeysWithoutParser,
}

/// Every problem that should disable Save and Run for this draft.
pub fn validate_draft(draft: &VersionFields) -> Vec<DraftIssue> {
    let mut issues = Vec::new();
    match &draft.body {
        PromptBody::Prompts(prompts) => {
            if prompts.is_empty() {
                issues.push(DraftIssue::NoPrompts);
            }
            let mut blank: Vec<u32> = prompts
                .iter()
                .filter(|p| p.content.trim().is_empty())
                .map(|p| p.step)
                .collect();
            blank.sort_unstable();
            issues.extend(blank.into_iter().map(|step| DraftIssue::EmptyPrompt { step }));
        }
        PromptBody::SystemPrompt(text) => {
            if text.trim().is_empty() {
                issues.push(DraftIssue::EmptySystemPrompt);
            }
        }
    }
    if draft.model.trim().is_empty() {
        issues.push(DraftIssue::EmptyModel);
    }
    match (draft.parsing_type, draft.output_keys.is_empty()) {
        (Some(_), true) => issues.push(DraftIssue::ParserWithoutOutputKeys),
        (None, false) => issues.push(DraftIssue::OutputKeysWithoutParser),
        _ => {}
    }
    issues
}

/// All derived draft booleans, computed once per edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftStatus {
    /// Draft equals the selected version
    pub is_equal_to_original: bool,
    /// Draft equals the cached version (vacuously true without one)
    pub is_equal_to_cache: bool,
    /// A new-version cache exists
    pub has_cache: bool,
    /// The save policy holds, ignoring validation
    pub is_new_version_ready: bool,
    /// Save button enabled
    pub can_save: bool,
    /// Run button enabled; an unchanged draft runs the saved version as is
    pub can_run: bool,
    /// Validation problems
    pub issues: Vec<DraftIssue>,
}

impl DraftStatus {
    /// Compute the status of `draft` against `original` and `cache`.
    pub fn compute(
        draft: &VersionFields,
        original: &VersionFields,
        cache: Option<&CachedVersion>,
    ) -> Self {
        let issues = validate_draft(draft);
        let ready = is_new_version_ready(draft, original, cache);
        let unchanged = is_equal_to_original(draft, original);
        Self {
            is_equal_to_original: unchanged,
            is_equal_to_cache: is_equal_to_cache(draft, cache),
            has_cache: cache.is_some(),
            is_new_version_ready: ready,
            can_save: ready && issues.is_empty(),
            can_run: unchanged || issues.is_empty(),
            issues,
        }
    }
}
