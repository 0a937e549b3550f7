//! Statement extraction - business capability layer.
//!
//! The site's problem bodies carry broken paragraph markup: statements open a
//! new `<p>` without closing the previous one, and some pages embed an
//! answer-key block between the last statement paragraph and the final close.
//! The extractor repairs the markup, walks the resulting paragraphs and
//! produces plain text plus the set of attachment links.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{AttachmentRef, Statement};
use crate::utils::text;

/// Extracts a clean [`Statement`] from one problem's `pbody` fragment.
pub struct StatementExtractor;

impl StatementExtractor {
    pub fn extract(body_html: &str) -> Statement {
        let repaired = excise_trailing_block(&repair_paragraphs(body_html));
        Statement {
            text: collect_text(&repaired),
            attachments: collect_attachments(body_html),
        }
    }
}

/// Closes every paragraph that is still open when the next one starts.
fn repair_paragraphs(html: &str) -> String {
    let tag = Regex::new(r"(?i)</?p\b[^>]*>").unwrap();
    let mut repaired = String::with_capacity(html.len() + 16);
    let mut last = 0;
    let mut open = false;

    for m in tag.find_iter(html) {
        repaired.push_str(&html[last..m.start()]);
        if m.as_str().starts_with("</") {
            open = false;
        } else {
            if open {
                repaired.push_str("</p>");
            }
            open = true;
        }
        repaired.push_str(m.as_str());
        last = m.end();
    }
    repaired.push_str(&html[last..]);
    repaired
}

/// Cuts everything between the close of the last opened paragraph and the
/// final paragraph close. Pages that inline an answer-key block put it
/// exactly there; well-formed bodies are left untouched.
fn excise_trailing_block(html: &str) -> String {
    let last_open = match html.rfind("<p") {
        Some(i) => i,
        None => return html.to_string(),
    };
    let close = match html[last_open..].find("</p") {
        Some(i) => last_open + i,
        None => return html.to_string(),
    };
    let final_close = match html.rfind("</p") {
        Some(i) => i,
        None => return html.to_string(),
    };
    if final_close <= close {
        return html.to_string();
    }
    format!("{}{}", &html[..close], &html[final_close..])
}

/// Walks repaired paragraphs and accumulates statement text.
///
/// An empty paragraph defers a blank line until the next non-empty one. Only
/// plain `<p>` and `<p class="left_margin">` paragraphs are statement body;
/// anything else (captions, asides) forces a deferred blank line unless the
/// text already ends with one.
fn collect_text(repaired_html: &str) -> String {
    let fragment = Html::parse_fragment(repaired_html);
    let paragraph = Selector::parse("p").unwrap();

    let mut description = String::new();
    let mut blank_pending = false;

    for item in fragment.select(&paragraph) {
        let item_text: String = item.text().collect();
        if item_text.is_empty() {
            blank_pending = true;
            continue;
        }

        if blank_pending {
            blank_pending = false;
            description.push('\n');
        }

        let raw = item.html();
        if raw.starts_with("<p>") || raw.starts_with("<p class=\"left_margin\">") {
            description.push_str(&item_text);
            description.push(' ');
        } else {
            blank_pending = !description.ends_with('\n');
        }
    }

    let tidy = text::collapse_spaces(&text::sanitize(&description));
    let breaks = Regex::new(r" *\n *").unwrap();
    breaks
        .replace_all(&tidy, "\n")
        .trim_matches(|c| c == '\n' || c == ' ')
        .to_string()
}

/// Attachment discovery: all `target="_blank"` elements plus every element
/// whose `src` goes through the site's file-serving endpoint, de-duplicated
/// by link.
fn collect_attachments(body_html: &str) -> Vec<AttachmentRef> {
    let fragment = Html::parse_fragment(body_html);
    let new_tab = Selector::parse(r#"[target="_blank"]"#).unwrap();
    let served = Selector::parse(r#"[src*="/get_file"]"#).unwrap();

    let mut attachments: Vec<AttachmentRef> = Vec::new();
    let mut push = |element: ElementRef<'_>| {
        let link = element
            .value()
            .attr("href")
            .or_else(|| element.value().attr("src"));
        if let Some(link) = link {
            if !attachments.iter().any(|a| a.link == link) {
                attachments.push(AttachmentRef {
                    link: link.to_string(),
                    label: element.text().collect::<String>().trim().to_string(),
                });
            }
        }
    };

    for element in fragment.select(&new_tab) {
        push(element);
    }
    for element in fragment.select(&served) {
        push(element);
    }
    attachments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_closes_reopened_paragraphs() {
        let fixed = repair_paragraphs("<p>Первый <p>Второй</p>");
        assert_eq!(fixed, "<p>Первый </p><p>Второй</p>");
    }

    #[test]
    fn repair_leaves_wellformed_markup_alone() {
        let html = "<p>a</p><p>b</p>";
        assert_eq!(repair_paragraphs(html), html);
    }

    #[test]
    fn excise_drops_inline_answer_key() {
        let html = "<p>a </p><p>b</p><img src=\"key.png\"> ключ </p>";
        assert_eq!(excise_trailing_block(html), "<p>a </p><p>b</p>");
    }

    #[test]
    fn extract_merges_paragraphs_with_spaces() {
        let body = r#"<div class="pbody"><p>Сколько будет <p>два плюс два?</p></div>"#;
        let statement = StatementExtractor::extract(body);
        assert_eq!(statement.text, "Сколько будет два плюс два?");
    }

    #[test]
    fn empty_paragraph_becomes_single_blank_line() {
        let body = "<div><p>Первый абзац.</p><p></p><p>Второй абзац.</p></div>";
        let statement = StatementExtractor::extract(body);
        assert_eq!(statement.text, "Первый абзац.\nВторой абзац.");
    }

    #[test]
    fn non_body_paragraph_forces_break() {
        let body = r#"<div><p>Текст задачи.</p><p class="caption">подпись</p><p>Продолжение.</p></div>"#;
        let statement = StatementExtractor::extract(body);
        assert_eq!(statement.text, "Текст задачи.\nПродолжение.");
    }

    #[test]
    fn left_margin_paragraphs_are_body_text() {
        let body = r#"<div><p class="left_margin">Дано число.</p></div>"#;
        let statement = StatementExtractor::extract(body);
        assert_eq!(statement.text, "Дано число.");
    }

    #[test]
    fn output_has_no_tags_and_only_allowed_characters() {
        let body = "<div><p>Найдите <b>сумму</b> &lt;x, y&gt; = «число» 12 + 3?</p></div>";
        let statement = StatementExtractor::extract(body);
        assert!(!statement.text.contains('<'));
        assert!(!statement.text.contains('»'));
        for c in statement.text.chars() {
            assert!(
                c.is_ascii_alphanumeric()
                    || ('а'..='я').contains(&c.to_ascii_lowercase())
                    || "ёЁ.-+=?!/\\ \n".contains(c)
                    || (c as u32) >= 0x400 && (c as u32) <= 0x4FF,
                "запрещённый символ: {c:?}"
            );
        }
    }

    #[test]
    fn attachments_union_and_dedupe() {
        let body = r#"<div>
            <a href="/get_file?id=1" target="_blank">Таблица к задаче</a>
            <img src="/get_file?id=1">
            <img src="/get_file?id=2">
            <a href="/doc/3" target="_blank"></a>
        </div>"#;
        let attachments = collect_attachments(body);
        let links: Vec<&str> = attachments.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["/get_file?id=1", "/doc/3", "/get_file?id=2"]);
        assert_eq!(attachments[0].label, "Таблица к задаче");
        assert_eq!(attachments[1].label, "");
    }
}
