use std::io;

use emx_timeline::locale;
use emx_timeline::output;
use emx_timeline::{Messages, ResolveContext, Settings, Timeline};

pub fn run(ctx: &ResolveContext, settings: &Settings, file: &str, regenerate: bool) -> io::Result<()> {
    let vault = ctx.open_vault()?;
    let messages = Messages::for_language(settings.language);

    let provenance = output::read_generated(&vault, file)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            locale::fill(messages.not_generated_timeline, "path", file),
        )
    })?;
    let criterion = provenance.to_criterion()?;
    tracing::debug!(file = %file, generated_from = %provenance.encode(), "reopening timeline");

    if regenerate {
        return super::generate::write(ctx, settings, &vault, &criterion);
    }

    let entries = Timeline::new(&vault, settings).generate(&criterion)?;
    super::view::show(ctx, settings, &vault, &criterion, &entries, None)
}
