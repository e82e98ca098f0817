//! Entry domain model.
//!
//! # Responsibility
//! - Define the canonical experiment record shown by every view.
//! - Own the lenient status vocabulary and tag-list parsing rules.
//!
//! # Invariants
//! - `id` is stable and never reassigned to another entry.
//! - `title` is non-empty after trimming.
//! - Entries are immutable after creation; the only mutation is deletion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;
use thiserror::Error;

/// Stable identifier for one logged experiment (`exp-NNN`).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = String;

/// Lifecycle state of one experiment.
///
/// Unknown labels never fail: they fall back to [`EntryStatus::Planned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum EntryStatus {
    /// Designed but not started.
    #[default]
    Planned,
    /// Data collection or analysis is running.
    InProgress,
    /// Finished and written up.
    Complete,
}

impl EntryStatus {
    /// Every status in display order.
    pub const ALL: [EntryStatus; 3] = [Self::Planned, Self::InProgress, Self::Complete];

    /// Stable wire label (`planned`, `in-progress`, `complete`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }

    /// Parses one of the three known labels, rejecting anything else.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim() {
            "planned" => Some(Self::Planned),
            "in-progress" => Some(Self::InProgress),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }

    /// Parses a status label with the `planned` fallback policy.
    pub fn from_label(value: &str) -> Self {
        Self::parse_strict(value).unwrap_or_default()
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntryStatus {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

/// One uploaded static report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original filename; not guaranteed unique within an entry.
    pub name: String,
    /// Raw file content, stored verbatim.
    pub content: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Returns whether the filename carries an `.html`/`.htm` extension.
    pub fn is_report_file(&self) -> bool {
        is_report_file_name(&self.name)
    }
}

/// Canonical record for one logged experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    /// Creation date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Ordered labels; duplicates are allowed here.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: EntryStatus,
    /// Markdown-like body text.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Opaque image payloads referenced from `body` as `img-<N>`.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Entry {
    /// Validates invariants that must hold before an entry is stored.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(EntryValidationError::EmptyTitle(self.id.clone()));
        }
        Ok(())
    }

    /// Finds an attachment by exact filename, first match wins.
    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|item| item.name == name)
    }
}

/// Invariant violations detected by [`Entry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryValidationError {
    #[error("entry id must not be empty")]
    EmptyId,
    #[error("entry `{0}` has an empty title")]
    EmptyTitle(EntryId),
}

/// Creation input collected by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    /// Comma-separated tag list as typed by the user.
    pub tags: String,
    pub status: EntryStatus,
    pub body: String,
    pub attachments: Vec<Attachment>,
    pub images: Vec<String>,
}

/// Splits a comma-separated tag string, trimming pieces and dropping empties.
pub fn parse_tag_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns whether `name` looks like a static HTML report.
pub fn is_report_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}
