use std::fs;
use std::io;
use std::path::Path;

use emx_timeline::output;
use emx_timeline::render::{self, Panel};
use emx_timeline::util;
use emx_timeline::{
    Criterion, FsStorage, Messages, ResolveContext, Settings, Source, Timeline, TimelineEntry,
    Vault,
};

pub fn run(
    ctx: &ResolveContext,
    settings: &Settings,
    source: &Source,
    html: Option<&Path>,
) -> io::Result<()> {
    let criterion = source.to_criterion()?;
    let vault = ctx.open_vault()?;
    let entries = Timeline::new(&vault, settings).generate(&criterion)?;
    show(ctx, settings, &vault, &criterion, &entries, html)
}

/// `file://` prefix for links into the vault
fn file_url_base(root: &Path) -> String {
    let root = util::display_path(root).replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.starts_with('/') {
        format!("file://{}/", util::encode_url_path(root))
    } else {
        format!("file:///{}/", util::encode_url_path(root))
    }
}

/// Present a timeline as text, JSON or an HTML page
pub fn show(
    ctx: &ResolveContext,
    settings: &Settings,
    vault: &Vault<FsStorage>,
    criterion: &Criterion,
    entries: &[TimelineEntry],
    html: Option<&Path>,
) -> io::Result<()> {
    if entries.is_empty() {
        if let Some(notice) = Messages::for_language(settings.language).empty_result(criterion) {
            eprintln!("{}", notice);
        }
    }

    let panel = Panel::build(&output::title_for(criterion), entries);

    if let Some(path) = html {
        let link_base = file_url_base(vault.storage().root());
        fs::write(path, render::render_html(&panel, settings, &link_base))?;
        tracing::info!(path = %path.display(), "wrote panel page");
        if ctx.json {
            return util::print_json(&serde_json::json!({ "html": util::display_path(path) }));
        }
        println!("{}", util::display_path(path));
        return Ok(());
    }

    if ctx.json {
        return util::print_json(&panel);
    }

    print!("{}", render::render_text(&panel, settings.language));
    Ok(())
}
