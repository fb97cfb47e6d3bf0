//! Timeline renderers

mod markdown;
mod panel;

pub use markdown::render_markdown;
pub use panel::{render_html, render_text, Card, Era, Panel};
