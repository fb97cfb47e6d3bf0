use std::io;

use emx_timeline::util;
use emx_timeline::{ConfigCommand, Messages, ResolveContext, Settings};

pub fn run(ctx: &ResolveContext, cmd: ConfigCommand) -> io::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let settings = ctx.load_settings()?;
            if ctx.json {
                return util::print_json(&settings);
            }
            print!("{}", settings.to_yaml()?);
        }
        ConfigCommand::Path => {
            let path = ctx.settings_save_path();
            if ctx.json {
                return util::print_json(&serde_json::json!({
                    "path": util::display_path(&path),
                    "exists": path.is_file(),
                }));
            }
            println!("{}", util::display_path(&path));
        }
        ConfigCommand::Reset => {
            let settings = Settings::default();
            settings.save(&ctx.settings_save_path())?;
            eprintln!("{}", Messages::for_language(settings.language).settings_reset);
        }
        ConfigCommand::Set { key, value } => {
            let settings = ctx.load_settings()?.with_value(&key, &value)?;
            let path = ctx.settings_save_path();
            settings.save(&path)?;
            tracing::debug!(path = %path.display(), key = %key, "saved settings");
            eprintln!("{}", Messages::for_language(settings.language).settings_saved);
        }
    }
    Ok(())
}
