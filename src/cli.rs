use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::criterion::Criterion;

/// emx-timeline - chronological timelines from a folder of markdown notes
///
/// # Quick Reference
///
/// ## Viewing
///
/// ```bash
/// emx-timeline view folder journal          # Timeline of every note under journal/
/// emx-timeline view tag "#project"          # Notes tagged #project or #project/...
/// emx-timeline view meta "author: Alice"    # Notes whose frontmatter matches
/// emx-timeline view links "Index.md"        # Notes linked from Index.md
/// emx-timeline view --html out.html tag work  # Styled HTML page instead of text
/// ```
///
/// ## Generating files
///
/// ```bash
/// emx-timeline generate folder journal      # Writes timelines/journal.md
/// emx-timeline generate tag project/alpha   # Writes timelines/project/alpha.md
/// emx-timeline reopen timelines/journal.md  # Show the timeline a file came from
/// emx-timeline reopen timelines/journal.md --regenerate
/// ```
///
/// ## Suggestions and notes
///
/// ```bash
/// emx-timeline tags                         # Every tag in the vault
/// emx-timeline folders                      # Every folder in the vault
/// emx-timeline open journal/day.md          # Print a note
/// ```
///
/// ## Settings
///
/// ```bash
/// emx-timeline config show
/// emx-timeline config set dateAttribute date
/// emx-timeline config set language zh-CN
/// emx-timeline config reset
/// ```
///
/// ## Environment Variables
///
/// - `EMX_TIMELINE_VAULT`: Vault directory (default: current directory)
/// - `EMX_TIMELINE_CONFIG`: Settings file (default: `<vault>/.emx-timeline.yaml`,
///   then the user config directory)
/// - `RUST_LOG`: Log filter (default: warn)
///
/// Generated files live in `timelines/` and are never part of a timeline.
#[derive(Parser, Debug)]
#[command(name = "emx-timeline")]
#[command(version)]
#[command(about = "Chronological timelines from a folder of markdown notes")]
pub struct Cli {
    /// Vault directory (default: $EMX_TIMELINE_VAULT or the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub vault: Option<PathBuf>,

    /// Settings file (default: $EMX_TIMELINE_CONFIG, <vault>/.emx-timeline.yaml, user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for scripting)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a timeline without writing any file
    #[command(alias = "v")]
    View {
        /// Write a standalone HTML page to FILE instead of printing text
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        #[command(subcommand)]
        source: Source,
    },

    /// Write a timeline file under timelines/
    #[command(alias = "g")]
    Generate {
        #[command(subcommand)]
        source: Source,
    },

    /// Show the timeline a generated file was built from
    Reopen {
        /// Generated file (vault path under timelines/)
        file: String,

        /// Rewrite the file from the current notes
        #[arg(long)]
        regenerate: bool,
    },

    /// Print a note's content to stdout
    #[command(alias = "p")]
    Open {
        /// Note path or link target (e.g. "journal/day" or "day")
        note: String,
    },

    /// List every tag used in the vault
    Tags,

    /// List every folder in the vault
    Folders,

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// What a timeline is built from
#[derive(Subcommand, Debug, Clone)]
pub enum Source {
    /// Every note under a folder (vault root when omitted)
    Folder {
        /// Vault-relative folder path
        path: Option<String>,
    },

    /// Notes carrying a tag or one of its sub-tags
    Tag {
        /// Tag name, with or without '#'
        name: String,
    },

    /// Notes whose frontmatter matches "key" or "key: value"
    Meta {
        /// Query such as "status" or "author: Alice"
        query: String,
    },

    /// Notes linked from a note
    Links {
        /// Note path or link target
        note: String,
    },
}

impl Source {
    pub fn to_criterion(&self) -> io::Result<Criterion> {
        Ok(match self {
            Source::Folder { path } => Criterion::folder(path.as_deref().unwrap_or("")),
            Source::Tag { name } => Criterion::tag(name),
            Source::Meta { query } => Criterion::metadata(query)?,
            Source::Links { note } => Criterion::file_links(note),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Restore default settings
    Reset,

    /// Change one setting (camelCase key, e.g. dateAttribute)
    Set {
        /// Setting name
        key: String,

        /// New value
        value: String,
    },
}
