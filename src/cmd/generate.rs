use std::io;

use emx_timeline::locale;
use emx_timeline::output;
use emx_timeline::util;
use emx_timeline::{Criterion, FsStorage, Messages, ResolveContext, Settings, Source, Vault};

pub fn run(ctx: &ResolveContext, settings: &Settings, source: &Source) -> io::Result<()> {
    let criterion = source.to_criterion()?;
    let vault = ctx.open_vault()?;
    write(ctx, settings, &vault, &criterion)
}

/// Write the timeline file for `criterion` and report where it went
pub fn write(
    ctx: &ResolveContext,
    settings: &Settings,
    vault: &Vault<FsStorage>,
    criterion: &Criterion,
) -> io::Result<()> {
    let generated = output::generate_file(vault, settings, criterion)?;
    let messages = Messages::for_language(settings.language);

    if generated.entries.is_empty() {
        if let Some(notice) = messages.empty_result(criterion) {
            eprintln!("{}", notice);
        }
    }

    if ctx.json {
        return util::print_json(&generated);
    }

    println!("{}", locale::fill(messages.generated, "path", &generated.path));
    Ok(())
}
