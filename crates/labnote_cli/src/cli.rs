//! Command-line surface definitions.

use clap::{Args, Parser, Subcommand};
use labnote_core::EntryStatus;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "labnote",
    version,
    about = "Local research log for bioinformatics experiments"
)]
pub struct Cli {
    /// Config file (defaults to <config_dir>/labnote/config.toml).
    #[arg(long, global = true, env = "LABNOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite data file, overriding `data_path` from the config.
    #[arg(long, global = true, env = "LABNOTE_DATA")]
    pub data: Option<PathBuf>,

    /// Log level, overriding `log_level` from the config.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log a new experiment.
    Add(AddArgs),
    /// List experiments, newest first.
    List(ListArgs),
    /// Show one experiment with its rendered body.
    Show {
        id: String,
        /// Print the markdown body instead of rendered markup.
        #[arg(long)]
        raw: bool,
    },
    /// Delete one experiment.
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List every tag in use.
    Tags,
    /// Count experiments per status.
    Stats,
    /// Summarize an attached HTML report.
    Summarize {
        id: String,
        /// Attachment name; defaults to the first attachment.
        #[arg(long)]
        file: Option<String>,
    },
    /// Manage the stored summary API key.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub title: String,

    /// Comma-separated tags.
    #[arg(long, default_value = "")]
    pub tags: String,

    /// planned | in-progress | complete
    #[arg(long, value_parser = parse_status, default_value = "planned")]
    pub status: EntryStatus,

    /// Markdown body text.
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the markdown body from a file.
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Attach an .html/.htm report (repeatable).
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Attach an image, referenced in the body as `![alt](img-N)` (repeatable).
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against title, body and tags.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Exact tag filter.
    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, value_parser = parse_status)]
    pub status: Option<EntryStatus>,

    /// Card layout with body previews.
    #[arg(long)]
    pub grid: bool,
}

#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Store the API key.
    Set { key: String },
    /// Report whether a key is configured.
    Show,
    /// Remove the stored key.
    Clear,
}

fn parse_status(value: &str) -> Result<EntryStatus, String> {
    EntryStatus::parse_strict(value).ok_or_else(|| {
        let known = EntryStatus::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown status `{value}`; expected one of: {known}")
    })
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use labnote_core::EntryStatus;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_parses_filters() {
        let cli = Cli::parse_from(["labnote", "list", "--tag", "GATK", "--status", "complete"]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.tag.as_deref(), Some("GATK"));
                assert_eq!(args.status, Some(EntryStatus::Complete));
                assert!(!args.grid);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_rejected_at_the_boundary() {
        assert!(Cli::try_parse_from(["labnote", "list", "--status", "archived"]).is_err());
    }

    #[test]
    fn status_error_lists_every_known_status() {
        let message = super::parse_status("archived").unwrap_err();
        for status in EntryStatus::ALL {
            assert!(message.contains(status.as_str()), "{message}");
        }
    }
}
