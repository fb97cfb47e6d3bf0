pub mod cli;
pub mod constants;
pub mod criterion;
pub mod frontmatter;
pub mod gather;
pub mod locale;
pub mod markdown;
pub mod output;
pub mod render;
pub mod resolve;
pub mod settings;
pub mod storage;
pub mod tags;
pub mod timeline;
pub mod util;
pub mod vault;

pub use cli::{Cli, Command, ConfigCommand, Source};
pub use criterion::{Criterion, MetadataQuery, Provenance, SourceKind};
pub use locale::Messages;
pub use output::GeneratedTimeline;
pub use resolve::ResolveContext;
pub use settings::{Language, Settings};
pub use storage::{FsStorage, MemoryStorage, Storage, VaultEntry};
pub use timeline::{Timeline, TimelineEntry};
pub use vault::{Note, Vault};
