//! Generated timeline documents

use std::io;

use chrono::Datelike;

use crate::constants as C;
use crate::criterion::Provenance;
use crate::frontmatter;
use crate::locale;
use crate::settings::Language;
use crate::timeline::TimelineEntry;

/// Render sorted entries as a markdown document.
///
/// The document starts with a `generated_from` frontmatter block and an H1
/// title; year (H2) and month (H3) headings are emitted whenever the value
/// changes from the previous entry, so entries must already be sorted.
pub fn render_markdown(
    entries: &[TimelineEntry],
    title: &str,
    provenance: &Provenance,
    language: Language,
) -> io::Result<String> {
    let mut out = frontmatter::render_block(C::GENERATED_FROM_KEY, &provenance.encode())?;
    out.push('\n');
    out.push_str(&format!("# {}\n\n", title));

    let mut current_year = None;
    let mut current_month = None;

    for entry in entries {
        let year = entry.date.year();
        let month = entry.date.month();

        if current_year != Some(year) {
            out.push_str(&format!("\n## {}\n\n", year));
            current_year = Some(year);
            current_month = None;
        }

        if current_month != Some(month) {
            out.push_str(&format!("\n### {}\n\n", locale::month_name(&entry.date, language)));
            current_month = Some(month);
        }

        out.push_str(&format!(
            "#### {} - [[{}]]\n\n",
            locale::format_date(&entry.date, language),
            entry.title
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::SourceKind;
    use chrono::NaiveDate;

    fn entry(title: &str, y: i32, m: u32, d: u32) -> TimelineEntry {
        TimelineEntry {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            title: title.to_string(),
            path: format!("journal/{}.md", title),
            preview: String::new(),
            is_milestone: false,
        }
    }

    fn headings(doc: &str) -> Vec<&str> {
        doc.lines().filter(|line| line.starts_with('#')).collect()
    }

    #[test]
    fn test_journal_document() {
        let entries = vec![
            entry("launch", 2024, 2, 10),
            entry("summer", 2023, 6, 1),
            entry("start", 2023, 1, 5),
        ];
        let provenance = Provenance::new(SourceKind::Folder, "journal");
        let doc = render_markdown(&entries, "Timeline - journal", &provenance, Language::EnUs).unwrap();

        assert!(doc.starts_with("---\ngenerated_from: folder:journal\n---\n\n# Timeline - journal\n\n"));
        assert_eq!(
            headings(&doc),
            vec![
                "# Timeline - journal",
                "## 2024",
                "### February",
                "#### 2/10/2024 - [[launch]]",
                "## 2023",
                "### June",
                "#### 6/1/2023 - [[summer]]",
                "### January",
                "#### 1/5/2023 - [[start]]",
            ]
        );
    }

    #[test]
    fn test_same_month_in_different_years() {
        let entries = vec![entry("b", 2024, 1, 3), entry("a", 2023, 1, 3)];
        let provenance = Provenance::new(SourceKind::Tag, "work");
        let doc = render_markdown(&entries, "Timeline - work", &provenance, Language::EnUs).unwrap();
        assert_eq!(doc.matches("### January").count(), 2);
    }

    #[test]
    fn test_same_month_single_heading() {
        let entries = vec![entry("b", 2024, 3, 20), entry("a", 2024, 3, 2)];
        let provenance = Provenance::new(SourceKind::Tag, "work");
        let doc = render_markdown(&entries, "t", &provenance, Language::EnUs).unwrap();
        assert_eq!(doc.matches("### March").count(), 1);
        assert_eq!(doc.matches("## 2024").count(), 1);
    }

    #[test]
    fn test_chinese_locale() {
        let entries = vec![entry("a", 2023, 1, 5)];
        let provenance = Provenance::new(SourceKind::Metadata, "status:");
        let doc = render_markdown(&entries, "t", &provenance, Language::ZhCn).unwrap();
        let fm = frontmatter::parse_frontmatter(&doc);
        assert_eq!(
            frontmatter::get(&fm, C::GENERATED_FROM_KEY).map(frontmatter::to_plain_string),
            Some("metadata:status:".to_string())
        );
        assert!(doc.contains("### 一月\n"));
        assert!(doc.contains("#### 2023/1/5 - [[a]]\n"));
    }

    #[test]
    fn test_empty_entries() {
        let provenance = Provenance::new(SourceKind::File, "index.md");
        let doc = render_markdown(&[], "Timeline - Links in index", &provenance, Language::EnUs).unwrap();
        assert_eq!(
            doc,
            "---\ngenerated_from: file:index.md\n---\n\n# Timeline - Links in index\n\n"
        );
    }
}
