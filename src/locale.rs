//! Localized date formatting and user-facing messages

use chrono::{Datelike, NaiveDateTime};

use crate::criterion::Criterion;
use crate::settings::Language;
use crate::util;

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_ZH: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月",
    "七月", "八月", "九月", "十月", "十一月", "十二月",
];

/// Full month name of `date` in the given language
pub fn month_name(date: &NaiveDateTime, language: Language) -> &'static str {
    let idx = date.month0() as usize;
    match language {
        Language::EnUs => MONTHS_EN[idx],
        Language::ZhCn => MONTHS_ZH[idx],
    }
}

/// Short numeric date: `1/5/2023` (en-US) or `2023/1/5` (zh-CN)
pub fn format_date(date: &NaiveDateTime, language: Language) -> String {
    match language {
        Language::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Language::ZhCn => format!("{}/{}/{}", date.year(), date.month(), date.day()),
    }
}

/// Notice and label strings
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub no_tagged_files: &'static str,
    pub no_metadata_matches: &'static str,
    pub no_file_links: &'static str,
    pub empty_timeline: &'static str,
    pub milestone: &'static str,
    pub generated: &'static str,
    pub not_generated_timeline: &'static str,
    pub command_failed: &'static str,
    pub settings_reset: &'static str,
    pub settings_saved: &'static str,
}

const EN_US: Messages = Messages {
    no_tagged_files: "No files found with tag #{tag} or its subtags",
    no_metadata_matches: "No dated notes match metadata query {query}",
    no_file_links: "No usable links or date information found in file {filename}",
    empty_timeline: "(no dated notes)",
    milestone: "milestone",
    generated: "Generated timeline: {path}",
    not_generated_timeline: "{path} is not a generated timeline file",
    command_failed: "Timeline command failed: {error}",
    settings_reset: "Settings restored to defaults",
    settings_saved: "Settings saved",
};

const ZH_CN: Messages = Messages {
    no_tagged_files: "没有找到包含标签 #{tag} 及其子标签的文件",
    no_metadata_matches: "没有找到匹配元数据 {query} 的带日期笔记",
    no_file_links: "文件 {filename} 中没有找到可用的链接或日期信息",
    empty_timeline: "（没有带日期的笔记）",
    milestone: "里程碑",
    generated: "已生成时间轴文件：{path}",
    not_generated_timeline: "{path} 不是生成的时间轴文件",
    command_failed: "时间轴命令执行失败：{error}",
    settings_reset: "设置已恢复为默认值",
    settings_saved: "设置已保存",
};

impl Messages {
    /// Message table for a language
    pub fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::EnUs => &EN_US,
            Language::ZhCn => &ZH_CN,
        }
    }

    /// Notice for a timeline with no entries.
    ///
    /// Folder timelines stay silent; the other criteria explain what was
    /// searched for.
    pub fn empty_result(&self, criterion: &Criterion) -> Option<String> {
        match criterion {
            Criterion::Folder(_) => None,
            Criterion::Tag(name) => Some(fill(self.no_tagged_files, "tag", name)),
            Criterion::Metadata(query) => {
                Some(fill(self.no_metadata_matches, "query", &query.to_string()))
            }
            Criterion::FileLinks(path) => {
                Some(fill(self.no_file_links, "filename", util::file_name_of(path)))
            }
        }
    }
}

/// Fill a `{name}` placeholder in a message
pub fn fill(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{}}}", name), value)
}
