//! Entry use-case service.
//!
//! # Responsibility
//! - Own the in-memory entry collection and keep storage in sync with it.
//! - Build new entries from shell input (id, date, tags, default body).
//! - Expose the query pipeline over the owned collection.
//!
//! # Invariants
//! - New entries are inserted at the front of the collection.
//! - Ids follow `exp-NNN` and are never reissued by one service instance,
//!   even after deletion.
//! - Storage is written before the in-memory collection changes, so a failed
//!   write leaves both untouched.

use crate::model::entry::{parse_tag_list, Attachment, Entry, EntryId, NewEntry};
use crate::query::{entry_stats, run_query, EntryQuery, EntryStats, QueryView};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use crate::repo::seed::sample_entries;
use chrono::{Local, NaiveDate};
use log::info;
use thiserror::Error;

const ENTRY_ID_PREFIX: &str = "exp-";

/// Body used when an entry is created without one.
pub const DEFAULT_ENTRY_BODY: &str = "## Objective\n\n## Methods\n\n## Results\n\n## Conclusions\n";

/// Service error for entry use-cases.
#[derive(Debug, Error)]
pub enum EntryServiceError {
    #[error("entry title must not be empty")]
    EmptyTitle,
    /// Only `.html`/`.htm` reports are accepted.
    #[error("unsupported attachment `{0}`: only .html/.htm reports are accepted")]
    UnsupportedAttachment(String),
    #[error("entry not found: {0}")]
    NotFound(EntryId),
    #[error("entry `{id}` has no attachment named `{name}`")]
    AttachmentNotFound { id: EntryId, name: String },
    #[error("entry `{0}` has no attachments")]
    NoAttachments(EntryId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Entry service facade over a repository implementation.
pub struct EntryService<R: EntryRepository> {
    repo: R,
    entries: Vec<Entry>,
    last_issued: u32,
    today: fn() -> NaiveDate,
}

impl<R: EntryRepository> EntryService<R> {
    /// Loads the stored collection, seeding sample entries into empty storage.
    pub fn open(repo: R) -> Result<Self, EntryServiceError> {
        Self::load(repo, true)
    }

    /// Loads the stored collection, starting empty when nothing is stored.
    pub fn open_empty(repo: R) -> Result<Self, EntryServiceError> {
        Self::load(repo, false)
    }

    fn load(mut repo: R, seed: bool) -> Result<Self, EntryServiceError> {
        let entries = match repo.load_entries()? {
            Some(entries) => entries,
            None if seed => {
                let samples = sample_entries();
                repo.save_entries(&samples)?;
                info!(
                    "event=entries_seed module=service status=ok count={}",
                    samples.len()
                );
                samples
            }
            None => Vec::new(),
        };

        Ok(Self {
            repo,
            last_issued: highest_entry_number(&entries),
            entries,
            today: local_today,
        })
    }

    /// Replaces the date source used for new entries.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Returns the collection in storage order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Gets one entry by stable id.
    pub fn get_entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Creates, stores and returns one entry.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `UnsupportedAttachment` for any non-HTML attachment.
    pub fn create_entry(&mut self, input: NewEntry) -> Result<&Entry, EntryServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(EntryServiceError::EmptyTitle);
        }
        if let Some(rejected) = input.attachments.iter().find(|item| !item.is_report_file()) {
            return Err(EntryServiceError::UnsupportedAttachment(
                rejected.name.clone(),
            ));
        }

        let body = if input.body.trim().is_empty() {
            DEFAULT_ENTRY_BODY.to_string()
        } else {
            input.body
        };
        let number = self
            .last_issued
            .max(highest_entry_number(&self.entries))
            .saturating_add(1);
        let entry = Entry {
            id: format_entry_id(number),
            title: title.to_string(),
            date: (self.today)(),
            tags: parse_tag_list(&input.tags),
            status: input.status,
            body,
            attachments: input.attachments,
            images: input.images,
        };

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry);
        next.extend(self.entries.iter().cloned());
        self.repo.save_entries(&next)?;
        self.entries = next;
        self.last_issued = number;

        let created = &self.entries[0];
        info!(
            "event=entry_create module=service status=ok id={} tags={} attachments={} images={}",
            created.id,
            created.tags.len(),
            created.attachments.len(),
            created.images.len()
        );
        Ok(created)
    }

    /// Deletes one entry and returns it.
    pub fn delete_entry(&mut self, id: &str) -> Result<Entry, EntryServiceError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| EntryServiceError::NotFound(id.to_string()))?;

        let mut next = self.entries.clone();
        let removed = next.remove(index);
        self.repo.save_entries(&next)?;
        self.entries = next;

        info!("event=entry_delete module=service status=ok id={id}");
        Ok(removed)
    }

    /// Runs the query pipeline over the owned collection.
    pub fn query(&self, query: &EntryQuery) -> QueryView<'_> {
        run_query(&self.entries, query)
    }

    /// Counts entries per status.
    pub fn stats(&self) -> EntryStats {
        entry_stats(&self.entries)
    }

    /// Returns one attachment, or the first one when `name` is `None`.
    pub fn attachment(&self, id: &str, name: Option<&str>) -> Result<&Attachment, EntryServiceError> {
        let entry = self
            .get_entry(id)
            .ok_or_else(|| EntryServiceError::NotFound(id.to_string()))?;
        match name {
            Some(name) => {
                entry
                    .attachment(name)
                    .ok_or_else(|| EntryServiceError::AttachmentNotFound {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
            }
            None => entry
                .attachments
                .first()
                .ok_or_else(|| EntryServiceError::NoAttachments(id.to_string())),
        }
    }
}

/// Returns the next `exp-NNN` id above every numeric suffix in use.
pub fn next_entry_id(entries: &[Entry]) -> EntryId {
    format_entry_id(highest_entry_number(entries).saturating_add(1))
}

fn highest_entry_number(entries: &[Entry]) -> u32 {
    entries
        .iter()
        .filter_map(|entry| entry.id.strip_prefix(ENTRY_ID_PREFIX))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

fn format_entry_id(number: u32) -> EntryId {
    format!("{ENTRY_ID_PREFIX}{number:03}")
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::next_entry_id;
    use crate::repo::seed::sample_entries;

    #[test]
    fn next_id_skips_past_highest_suffix() {
        assert_eq!(next_entry_id(&[]), "exp-001");
        assert_eq!(next_entry_id(&sample_entries()), "exp-006");
    }

    #[test]
    fn next_id_ignores_foreign_ids() {
        let mut entries = sample_entries();
        entries[0].id = "imported-42".to_string();
        entries[4].id = "exp-1000".to_string();
        assert_eq!(next_entry_id(&entries), "exp-1001");
    }
}
