//! Listing-page parser - business capability layer.
//!
//! The listing page holds every problem of a generated test: a
//! `div.prob_list` container with one `div.prob_num` per problem, followed by
//! a block holding the statement body (`div.pbody`) and the answer-page link
//! (`span.prob_nums a`).

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::ProblemEntry;

/// Parser for the problem listing page.
pub struct ProblemListParser;

impl ProblemListParser {
    /// Number of problems on the listing page.
    ///
    /// A missing `prob_list` container means the configured URL points at a
    /// single problem instead of a listing; that is fatal for the whole run.
    pub fn problem_count(html: &str) -> Result<usize> {
        let document = Html::parse_document(html);
        let list = prob_list(&document)?;
        Ok(list
            .select(&Selector::parse("div.prob_num").unwrap())
            .count())
    }

    /// Outer HTML of the statement body (`div.pbody`) for one problem.
    pub fn problem_body_html(html: &str, number: u32) -> Result<String> {
        let document = Html::parse_document(html);
        let list = prob_list(&document)?;
        let block = problem_block(list, number)
            .ok_or_else(|| AppError::not_found(format!("задача номер {number} на сайте")))?;
        let body = block
            .select(&Selector::parse("div.pbody").unwrap())
            .next()
            .ok_or_else(|| AppError::not_found(format!("тело задачи {number}")))?;
        Ok(body.html())
    }

    /// Ordered problem entries with absolute answer links.
    ///
    /// Numbers are unique within a page; should the site ever repeat one, the
    /// first entry wins.
    pub fn entries(html: &str, origin: &str) -> Result<Vec<ProblemEntry>> {
        let document = Html::parse_document(html);
        let list = prob_list(&document)?;
        let num_selector = Selector::parse("div.prob_num").unwrap();
        let link_selector = Selector::parse("span.prob_nums a").unwrap();

        let mut entries: Vec<ProblemEntry> = Vec::new();
        for item in list.select(&num_selector) {
            let number: u32 = match item.text().collect::<String>().trim().parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            if entries.iter().any(|e| e.number == number) {
                continue;
            }
            let block = match next_element(item) {
                Some(block) => block,
                None => continue,
            };
            let href = block
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"));
            if let Some(href) = href {
                entries.push(ProblemEntry {
                    number,
                    answer_link: format!("{origin}{href}"),
                });
            }
        }
        Ok(entries)
    }

    /// Answer link for a single problem number.
    pub fn answer_link(html: &str, origin: &str, number: u32) -> Result<String> {
        Self::entries(html, origin)?
            .into_iter()
            .find(|e| e.number == number)
            .map(|e| e.answer_link)
            .ok_or_else(|| AppError::not_found(format!("ссылка на ответ задачи {number}")))
    }
}

fn prob_list<'a>(document: &'a Html) -> Result<ElementRef<'a>> {
    document
        .select(&Selector::parse("div.prob_list").unwrap())
        .next()
        .ok_or_else(|| {
            AppError::not_found("список задач (укажите ссылку на СПИСОК, а не на одну задачу)")
        })
}

fn problem_block<'a>(list: ElementRef<'a>, number: u32) -> Option<ElementRef<'a>> {
    let num_selector = Selector::parse("div.prob_num").unwrap();
    let wanted = number.to_string();
    list.select(&num_selector)
        .find(|item| item.text().collect::<String>().trim() == wanted)
        .and_then(next_element)
}

/// Next sibling element in document order.
fn next_element(item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    item.next_siblings().find_map(ElementRef::wrap)
}
