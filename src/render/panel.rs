//! Panel view: entries grouped into yearly eras of cards
//!
//! [`Panel::build`] does the grouping; [`render_text`] draws it for the
//! terminal and [`render_html`] produces a standalone page styled from the
//! panel settings.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::locale::{self, Messages};
use crate::settings::{Language, Position, Settings};
use crate::timeline::TimelineEntry;
use crate::util;

/// One entry as shown on the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub date: NaiveDateTime,
    pub title: String,
    pub path: String,
    pub preview: String,
    pub milestone: bool,
    /// First card of its era
    pub first: bool,
    /// Last card of its era
    pub last: bool,
}

/// All cards of one calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Era {
    pub year: i32,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub eras: Vec<Era>,
}

impl Panel {
    /// Group entries by year, most recent year first.
    ///
    /// Cards keep the order of `entries` within each era.
    pub fn build(title: &str, entries: &[TimelineEntry]) -> Self {
        let mut eras: Vec<Era> = Vec::new();
        for entry in entries {
            let year = entry.date.year();
            let card = Card {
                date: entry.date,
                title: entry.title.clone(),
                path: entry.path.clone(),
                preview: entry.preview.clone(),
                milestone: entry.is_milestone,
                first: false,
                last: false,
            };
            match eras.iter_mut().find(|era| era.year == year) {
                Some(era) => era.cards.push(card),
                None => eras.push(Era { year, cards: vec![card] }),
            }
        }

        eras.sort_by(|a, b| b.year.cmp(&a.year));
        for era in &mut eras {
            let count = era.cards.len();
            for (i, card) in era.cards.iter_mut().enumerate() {
                card.first = i == 0;
                card.last = i + 1 == count;
            }
        }

        Self { title: title.to_string(), eras }
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }

    /// Every card, era by era
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.eras.iter().flat_map(|era| era.cards.iter())
    }
}

/// Plain-text rendering for the terminal
pub fn render_text(panel: &Panel, language: Language) -> String {
    let messages = Messages::for_language(language);
    let mut out = String::new();
    let _ = writeln!(out, "{}", panel.title);

    if panel.is_empty() {
        let _ = writeln!(out, "\n  {}", messages.empty_timeline);
        return out;
    }

    for era in &panel.eras {
        let _ = writeln!(out, "\n{}", era.year);
        for card in &era.cards {
            let marker = if card.milestone { '◆' } else { '●' };
            let _ = write!(
                out,
                "  {} {}  {}",
                marker,
                locale::format_date(&card.date, language),
                card.title
            );
            if card.milestone {
                let _ = write!(out, "  [{}]", messages.milestone);
            }
            out.push('\n');
            let _ = writeln!(out, "      {}", card.path);
            if !card.preview.is_empty() {
                let _ = writeln!(out, "      {}", card.preview.replace('\n', " "));
            }
        }
    }
    out
}

/// Standalone HTML page for the panel.
///
/// Card titles link to `link_base` joined with the percent-encoded note
/// path. `link_base` is used as given, so it must already be a URL prefix
/// ending in `/`.
pub fn render_html(panel: &Panel, settings: &Settings, link_base: &str) -> String {
    let messages = Messages::for_language(settings.language);
    let lang = match settings.language {
        Language::EnUs => "en",
        Language::ZhCn => "zh",
    };

    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"{}\">", lang);
    let _ = writeln!(out, "<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&panel.title));
    let _ = writeln!(out, "<style>\n{}</style>", stylesheet(settings));
    let _ = writeln!(out, "</head>\n<body>");
    let _ = writeln!(
        out,
        "<div class=\"timeline-header\"><h2>{}</h2></div>",
        escape_html(&panel.title)
    );
    let _ = writeln!(out, "<div class=\"timeline-container\">");
    let _ = writeln!(out, "<div class=\"timeline-line\"></div>");

    if panel.is_empty() {
        let _ = writeln!(
            out,
            "<div class=\"timeline-empty\">{}</div>",
            escape_html(messages.empty_timeline)
        );
    }

    for era in &panel.eras {
        let _ = writeln!(out, "<div class=\"timeline-era\">");
        let _ = writeln!(out, "<div class=\"timeline-era-title\">{}</div>", era.year);
        for card in &era.cards {
            let mut class = String::from("timeline-item");
            if card.first {
                class.push_str(" first-item");
            }
            if card.last {
                class.push_str(" last-item");
            }
            if card.milestone {
                class.push_str(" timeline-item-milestone");
            }

            let _ = writeln!(out, "<div class=\"{}\">", class);
            let _ = writeln!(out, "<div class=\"timeline-card\">");
            let _ = writeln!(
                out,
                "<div class=\"timeline-date\">{}</div>",
                escape_html(&locale::format_date(&card.date, settings.language))
            );
            let _ = writeln!(
                out,
                "<div class=\"timeline-title\"><a href=\"{}\">{}</a></div>",
                escape_html(&format!("{}{}", link_base, util::encode_url_path(&card.path))),
                escape_html(&card.title)
            );
            if !card.preview.is_empty() {
                let _ = writeln!(
                    out,
                    "<div class=\"timeline-preview\">{}</div>",
                    escape_html(&card.preview)
                );
            }
            let _ = writeln!(out, "</div>\n</div>");
        }
        let _ = writeln!(out, "</div>");
    }

    let _ = writeln!(out, "</div>\n</body>\n</html>");
    out
}

/// CSS for the panel, derived from the style settings
fn stylesheet(s: &Settings) -> String {
    let (side, padding) = match s.default_position {
        Position::Left => ("left", "padding-left"),
        Position::Right => ("right", "padding-right"),
    };

    format!(
        r#"body {{ font-family: sans-serif; margin: 2em; }}
.timeline-container {{ position: relative; {padding}: 2em; }}
.timeline-line {{ position: absolute; top: 0; bottom: 0; {side}: 0.5em; width: {line_width}px; background: {line_color}; }}
.timeline-era-title {{ font-size: 1.4em; font-weight: bold; color: {line_color}; margin-top: 1em; }}
.timeline-item {{ margin: {item_spacing}px 0; }}
.timeline-card {{ background: {card_bg}; color: {card_fg}; border: 1px solid {card_border}; border-radius: 6px; padding: 0.6em 0.9em; transition: transform {duration}ms; }}
.timeline-card:hover {{ transform: translateY(-2px); }}
.timeline-item-milestone .timeline-card {{ background: {ms_bg}; color: {ms_fg}; border: 1px solid {ms_border}; }}
.timeline-date {{ color: {card_fg}; font-size: 0.85em; }}
.timeline-item-milestone .timeline-date {{ color: {ms_fg}; }}
.timeline-title a {{ color: inherit; font-weight: bold; text-decoration: none; }}
.timeline-preview {{ margin-top: 0.3em; opacity: 0.8; }}
"#,
        side = side,
        padding = padding,
        line_width = s.line_width,
        line_color = css_value(&s.line_color),
        item_spacing = s.item_spacing,
        card_bg = css_value(&s.card_background),
        card_fg = css_value(&s.card_text_color),
        card_border = css_value(&s.card_border_color),
        ms_bg = css_value(&s.milestone_card_background),
        ms_fg = css_value(&s.milestone_card_text_color),
        ms_border = css_value(&s.milestone_card_border_color),
        duration = s.animation_duration,
    )
}

/// Keep a settings value from breaking out of its CSS declaration
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
