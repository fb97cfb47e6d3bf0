use std::io;

use emx_timeline::util;
use emx_timeline::ResolveContext;

pub fn run(ctx: &ResolveContext) -> io::Result<()> {
    let tags = ctx.open_vault()?.tags()?;

    if ctx.json {
        return util::print_json(&tags);
    }
    for tag in tags {
        println!("#{}", tag);
    }
    Ok(())
}
