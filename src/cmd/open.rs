use std::io;

use emx_timeline::util;
use emx_timeline::{ResolveContext, Storage};

/// Print a note, given its vault path or a link target
pub fn run(ctx: &ResolveContext, note: &str) -> io::Result<()> {
    let vault = ctx.open_vault()?;

    let path = if vault.is_file(note) {
        util::normalize_vault_path(note)
    } else {
        vault.resolve_link(note, "")?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Note not found: {}", note))
        })?
    };

    if ctx.json {
        return util::print_json(&vault.load_note(&path)?);
    }

    let content = vault.storage().read(&path)?;
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}
