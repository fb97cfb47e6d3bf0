//! Utility functions for vault path handling and text helpers

use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::constants as C;

// Characters escaped inside a URL path segment; `/` separators are kept
const URL_PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Normalize a user-supplied vault path: forward slashes, no leading `./`
/// or `/`, no trailing slash, no empty segments.
pub fn normalize_vault_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a vault-relative parent and child name
pub fn join_vault_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Percent-encode a slash-separated path for use in a URL
pub fn encode_url_path(path: &str) -> String {
    utf8_percent_encode(path, URL_PATH_SET).to_string()
}

/// Parent folder of a vault path ("" for the root)
pub fn parent_of(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
}

/// Last segment of a vault path
pub fn file_name_of(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[idx + 1..]).unwrap_or(path)
}

/// File name without its extension
pub fn basename_of(path: &str) -> &str {
    let name = file_name_of(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Extension of a vault path, without the dot
pub fn extension_of(path: &str) -> Option<&str> {
    let name = file_name_of(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(&name[idx + 1..]),
        _ => None,
    }
}

/// Whether a vault path points at a markdown note
pub fn is_markdown(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| ext.eq_ignore_ascii_case(C::MARKDOWN_EXTENSION))
}

/// Whether a path lies inside the reserved output folder.
///
/// Every candidate strategy filters through this single check so generated
/// timelines never feed back into new ones.
pub fn is_excluded(path: &str) -> bool {
    let path = normalize_vault_path(path);
    path == C::OUTPUT_ROOT || path.starts_with(&format!("{}/", C::OUTPUT_ROOT))
}

/// Cut `text` to at most `max` characters, appending an ellipsis when cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], C::ELLIPSIS),
        None => text.to_string(),
    }
}

/// Validate and resolve a vault path, ensuring it stays within the vault directory
/// Returns an error if the path attempts to escape the base directory
pub fn secure_path(base: &Path, relative: &str) -> io::Result<PathBuf> {
    let mut result = base.to_path_buf();

    for component in relative.split(|c| c == '/' || c == '\\') {
        match component {
            "" | "." => continue,
            ".." => {
                if result == base {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Path traversal detected: cannot escape vault directory",
                    ));
                }
                result.pop();
            }
            _ => {
                // Windows drive prefix, e.g. "C:"
                if component.len() >= 2 && component.as_bytes()[1] == b':' {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Absolute paths are not allowed",
                    ));
                }
                result.push(component);
            }
        }
    }

    // Use dunce::canonicalize to avoid UNC prefix on Windows
    if base.exists() && result.exists() {
        let canonical_base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        let canonical_result = dunce::canonicalize(&result).unwrap_or_else(|_| result.clone());
        if !canonical_result.starts_with(&canonical_base) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Path traversal detected: resolved path escapes vault directory",
            ));
        }
    } else if !result.starts_with(base) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Path traversal detected: resolved path escapes vault directory",
        ));
    }

    Ok(result)
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    println!("{}", json);
    Ok(())
}
