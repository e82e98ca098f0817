//! Subcommand handlers.
//!
//! # Responsibility
//! - Translate parsed arguments into core service calls.
//! - Print human-readable results to stdout.
//!
//! # Invariants
//! - Handlers never print report text or the stored API key.

use crate::cli::{AddArgs, Cli, Command, KeyCommand, ListArgs};
use labnote_core::markdown::{card_preview, preview::is_truncated};
use labnote_core::{
    image_data_url, reduce, view_model, Action, Attachment, ConfigError, Entry, EntryQuery,
    EntryService, EntryServiceError, KvEntryRepository, LabConfig, Layout, NewEntry,
    SqliteKeyValueStore, StoreError, SummaryError, SummaryService, UreqChatClient, ViewState,
};
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Entry(#[from] EntryServiceError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error("failed to read `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("refusing to delete `{0}` without --yes")]
    DeleteNotConfirmed(String),
}

type Summarizer<'a> = SummaryService<UreqChatClient, &'a mut SqliteKeyValueStore>;

/// Resolves configuration from the config file and global overrides.
pub fn load_config(cli: &Cli) -> Result<LabConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => LabConfig::load(path)?,
        None => LabConfig::load_default()?,
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

pub fn run(cli: &Cli, config: &LabConfig) -> Result<(), CliError> {
    let mut store = SqliteKeyValueStore::open(&config.data_path)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match &cli.command {
        Command::Add(args) => add(&mut store, args),
        Command::List(args) => list(&mut store, args),
        Command::Show { id, raw } => show(&mut store, id, *raw),
        Command::Delete { id, yes } => delete(&mut store, id, *yes),
        Command::Tags => tags(&mut store),
        Command::Stats => stats(&mut store),
        Command::Summarize { id, file } => summarize(&mut store, config, id, file.as_deref()),
        Command::Key { action } => key(&mut store, config, action),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add(_) => "add",
        Command::List(_) => "list",
        Command::Show { .. } => "show",
        Command::Delete { .. } => "delete",
        Command::Tags => "tags",
        Command::Stats => "stats",
        Command::Summarize { .. } => "summarize",
        Command::Key { .. } => "key",
    }
}

fn open_entries(
    store: &mut SqliteKeyValueStore,
) -> Result<EntryService<KvEntryRepository<&mut SqliteKeyValueStore>>, CliError> {
    Ok(EntryService::open(KvEntryRepository::new(store))?)
}

fn summarizer<'a>(store: &'a mut SqliteKeyValueStore, config: &LabConfig) -> Summarizer<'a> {
    let client = UreqChatClient::new(config.summary.endpoint.clone(), config.summary.timeout());
    SummaryService::new(client, store, config.summary.settings())
}

fn add(store: &mut SqliteKeyValueStore, args: &AddArgs) -> Result<(), CliError> {
    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => String::new(),
    };
    let attachments = args
        .attachments
        .iter()
        .map(|path| Ok(Attachment::new(file_name(path), read_text(path)?)))
        .collect::<Result<Vec<_>, CliError>>()?;
    let images = args
        .images
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
                path: path.clone(),
                source,
            })?;
            Ok(image_data_url(&bytes, path))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let mut service = open_entries(store)?;
    let created = service.create_entry(NewEntry {
        title: args.title.clone(),
        tags: args.tags.clone(),
        status: args.status,
        body,
        attachments,
        images,
    })?;
    println!("created {} ({})", created.id, created.title);
    Ok(())
}

fn list(store: &mut SqliteKeyValueStore, args: &ListArgs) -> Result<(), CliError> {
    let service = open_entries(store)?;

    let mut state = reduce(&ViewState::default(), Action::SetSearch(args.search.clone()));
    if let Some(tag) = &args.tag {
        state = reduce(&state, Action::ToggleTag(tag.clone()));
    }
    state = reduce(&state, Action::SetStatus(args.status));
    if args.grid {
        state = reduce(&state, Action::SetLayout(Layout::Grid));
    }

    let model = view_model(&state, service.entries());
    for entry in &model.visible {
        match state.layout {
            Layout::Timeline => println!("{}", timeline_line(entry)),
            Layout::Grid => println!("{}\n", grid_card(entry)),
        }
    }
    println!("{} of {} entries", model.visible.len(), model.stats.total);
    Ok(())
}

fn show(store: &mut SqliteKeyValueStore, id: &str, raw: bool) -> Result<(), CliError> {
    let service = open_entries(store)?;
    let state = reduce(&ViewState::default(), Action::Select(id.to_string()));
    let model = view_model(&state, service.entries());
    let (Some(entry), Some(markup)) = (model.selected, model.selected_markup) else {
        return Err(CliError::NotFound(id.to_string()));
    };

    println!("{}  {}", entry.id, entry.title);
    println!("date: {}  status: {}", entry.date, entry.status);
    if !entry.tags.is_empty() {
        println!("tags: {}", entry.tags.join(", "));
    }
    for attachment in &entry.attachments {
        println!("attachment: {}", attachment.name);
    }
    println!();
    if raw {
        println!("{}", entry.body);
    } else {
        println!("{markup}");
    }
    Ok(())
}

fn delete(store: &mut SqliteKeyValueStore, id: &str, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::DeleteNotConfirmed(id.to_string()));
    }

    let mut service = open_entries(store)?;
    let removed = service.delete_entry(id)?;
    println!("deleted {} ({})", removed.id, removed.title);
    Ok(())
}

fn tags(store: &mut SqliteKeyValueStore) -> Result<(), CliError> {
    let service = open_entries(store)?;
    for tag in service.query(&EntryQuery::default()).vocabulary {
        println!("{tag}");
    }
    Ok(())
}

fn stats(store: &mut SqliteKeyValueStore) -> Result<(), CliError> {
    let service = open_entries(store)?;
    let stats = service.stats();
    println!("total: {}", stats.total);
    println!("planned: {}", stats.planned);
    println!("in-progress: {}", stats.in_progress);
    println!("complete: {}", stats.complete);
    Ok(())
}

fn summarize(
    store: &mut SqliteKeyValueStore,
    config: &LabConfig,
    id: &str,
    file: Option<&str>,
) -> Result<(), CliError> {
    let report = {
        let service = open_entries(store)?;
        service.attachment(id, file)?.clone()
    };

    let summary = summarizer(store, config).summarize(&report.content)?;
    println!("{summary}");
    Ok(())
}

fn key(
    store: &mut SqliteKeyValueStore,
    config: &LabConfig,
    action: &KeyCommand,
) -> Result<(), CliError> {
    let mut service = summarizer(store, config);
    match action {
        KeyCommand::Set { key } => {
            service.save_api_key(key)?;
            if service.api_key()?.is_some() {
                println!("api key saved");
            } else {
                println!("api key cleared");
            }
        }
        KeyCommand::Show => match service.api_key()? {
            Some(key) => println!("api key configured ({})", mask_key(&key)),
            None => println!("api key not configured"),
        },
        KeyCommand::Clear => {
            if service.clear_api_key()? {
                println!("api key cleared");
            } else {
                println!("api key not configured");
            }
        }
    }
    Ok(())
}

fn timeline_line(entry: &Entry) -> String {
    let mut line = format!(
        "{}  {}  [{}]  {}",
        entry.id, entry.date, entry.status, entry.title
    );
    if !entry.tags.is_empty() {
        let tags = entry
            .tags
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        line.push_str("  ");
        line.push_str(&tags);
    }
    line
}

fn grid_card(entry: &Entry) -> String {
    let mut preview = card_preview(&entry.body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if is_truncated(&entry.body) {
        preview.push_str("...");
    }
    format!(
        "[{}] {}\n  {} | {}\n  {}",
        entry.status, entry.title, entry.id, entry.date, preview
    )
}

/// Keeps only the last four characters visible.
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    let tail = key.chars().skip(count.saturating_sub(4)).collect::<String>();
    format!("...{tail}")
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
