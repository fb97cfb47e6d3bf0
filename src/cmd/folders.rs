use std::io;

use emx_timeline::util;
use emx_timeline::ResolveContext;

pub fn run(ctx: &ResolveContext) -> io::Result<()> {
    let folders = ctx.open_vault()?.folders()?;

    if ctx.json {
        return util::print_json(&folders);
    }
    if folders.is_empty() {
        println!("  (none)");
    }
    for folder in folders {
        println!("{}", folder);
    }
    Ok(())
}
