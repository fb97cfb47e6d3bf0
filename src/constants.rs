//! Constants for emx-timeline
//!
//! This module contains the reserved names, format strings, and limits
//! shared across the codebase.

// === Reserved Paths ===

/// Root folder for generated timeline files (always excluded from scans)
pub const OUTPUT_ROOT: &str = "timelines";

/// Subfolder of the output root for timelines built from a note's links
pub const LINKED_FILES_SUBDIR: &str = "linked-files";

/// Subfolder of the output root for timelines built from metadata queries
pub const METADATA_SUBDIR: &str = "metadata";

/// Default file extension for notes
pub const MARKDOWN_EXTENSION: &str = "md";

// === Frontmatter ===

/// Frontmatter key recording where a generated timeline came from
pub const GENERATED_FROM_KEY: &str = "generated_from";

/// Frontmatter keys that may hold tags
pub const FRONTMATTER_TAG_KEYS: &[&str] = &["tags", "tag"];

/// Maximum size of frontmatter to parse (prevents DoS on malformed files)
pub const MAX_FRONTMATTER_SIZE: usize = 64 * 1024; // 64KB

// === Previews ===

/// Maximum characters kept from a line that carries the queried tag
pub const TAG_PREVIEW_LENGTH: usize = 100;

/// Maximum characters kept from the start of a note body
pub const BODY_PREVIEW_LENGTH: usize = 50;

/// Marker appended when a preview was cut
pub const ELLIPSIS: &str = "...";

// === Titles ===

/// Title prefix for generated documents
pub const TITLE_PREFIX: &str = "Timeline - ";

/// Title prefix for timelines built from a note's links
pub const LINKS_TITLE_PREFIX: &str = "Timeline - Links in ";

// === Configuration ===

/// Settings file looked up at the vault root
pub const VAULT_CONFIG_FILENAME: &str = ".emx-timeline.yaml";

/// Directory under the user config dir holding the fallback settings file
pub const USER_CONFIG_DIR: &str = "emx-timeline";

/// Settings file name inside the user config dir
pub const USER_CONFIG_FILENAME: &str = "config.yaml";

/// Environment variable: vault root directory
pub const ENV_VAULT: &str = "EMX_TIMELINE_VAULT";

/// Environment variable: settings file path
pub const ENV_CONFIG: &str = "EMX_TIMELINE_CONFIG";
