//! Core domain logic for LabNote, a local research log for bioinformatics
//! experiments.
//! This crate is the single source of truth for business invariants; shells
//! only collect input and display derived views.

pub mod config;
pub mod db;
pub mod logging;
pub mod markdown;
pub mod media;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;
pub mod summary;
pub mod view;

pub use config::{ConfigError, LabConfig, SummaryConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use markdown::{card_preview, render};
pub use media::image_data_url;
pub use model::entry::{
    Attachment, Entry, EntryId, EntryStatus, EntryValidationError, NewEntry,
};
pub use query::{run_query, EntryQuery, EntryStats, QueryView};
pub use repo::entry_repo::{EntryRepository, KvEntryRepository, RepoError, RepoResult};
pub use service::entry_service::{EntryService, EntryServiceError};
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError};
pub use summary::{
    ChatCompletionClient, SummaryError, SummaryService, SummarySettings, UreqChatClient,
};
pub use view::{reduce, view_model, Action, Layout, ViewModel, ViewState};
