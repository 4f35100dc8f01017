use chrono::NaiveDate;
use clap::ValueEnum;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Date format of the first column on the wiki table.
pub const WIKI_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format of the `h2` headings on the main site listing.
pub const HEADING_DATE_FORMAT: &str = "%A, %B %d, %Y";

const WIKI_COLUMNS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CancellationRecord {
    pub name: String,
    pub reason: String,
    pub date: NaiveDate,
}

/// Which page structure to read cancellations from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum PageLayout {
    /// Table rows of date, event, country, region, reason
    WikiTable,
    /// Date headings each followed by a list of linked events
    DateHeadings,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseReport {
    pub records: Vec<CancellationRecord>,
    /// Rows or entries dropped because they were malformed.
    pub skipped: usize,
}

pub fn parse_cancellations(html: &str, layout: PageLayout) -> ParseReport {
    let document = Html::parse_document(html);
    match layout {
        PageLayout::WikiTable => parse_wiki_table(&document),
        PageLayout::DateHeadings => parse_date_headings(&document),
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_wiki_table(document: &Html) -> ParseReport {
    let row_selector = Selector::parse("table tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let mut report = ParseReport::default();

    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| element_text(&cell))
            .collect();

        // Header rows only carry th cells.
        if cells.is_empty() {
            continue;
        }

        if cells.len() < WIKI_COLUMNS {
            warn!(
                columns = cells.len(),
                expected = WIKI_COLUMNS,
                "skipping row with too few columns"
            );
            report.skipped += 1;
            continue;
        }

        let (date_text, name, reason) = (&cells[0], &cells[1], &cells[4]);
        let date = match NaiveDate::parse_from_str(date_text, WIKI_DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                warn!(date = %date_text, error = %e, "date format issue, skipping row");
                report.skipped += 1;
                continue;
            }
        };

        report.records.push(CancellationRecord {
            name: name.clone(),
            reason: reason.clone(),
            date,
        });
    }

    debug!(
        parsed = report.records.len(),
        skipped = report.skipped,
        "parsed cancellations table"
    );
    report
}

fn parse_date_headings(document: &Html) -> ParseReport {
    let section_selector = Selector::parse("section.clearfix").unwrap();
    let h2_selector = Selector::parse("h2").unwrap();
    let li_selector = Selector::parse("li").unwrap();
    let a_selector = Selector::parse("a").unwrap();
    let mut report = ParseReport::default();

    let section = match document.select(&section_selector).next() {
        Some(section) => section,
        None => {
            warn!("no cancellations section found on page");
            return report;
        }
    };

    for heading in section.select(&h2_selector) {
        let date_text = element_text(&heading);
        let date = match NaiveDate::parse_from_str(&date_text, HEADING_DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                warn!(date = %date_text, error = %e, "date format issue, skipping heading");
                report.skipped += 1;
                continue;
            }
        };

        let list = match following_list(&heading) {
            Some(list) => list,
            None => {
                debug!(%date, "no event list after date heading");
                continue;
            }
        };

        for li in list.select(&li_selector) {
            let link = match li.select(&a_selector).next() {
                Some(link) => link,
                None => {
                    debug!(%date, "list entry without event link, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let name = element_text(&link);
            let reason = element_text(&li)
                .replace(&name, "")
                .trim_matches(|c: char| c.is_whitespace() || c == ':')
                .to_string();

            report.records.push(CancellationRecord { name, reason, date });
        }
    }

    debug!(
        parsed = report.records.len(),
        skipped = report.skipped,
        "parsed cancellations listing"
    );
    report
}

/// The first `ul` sibling after a heading, stopping at the next heading.
fn following_list<'a>(heading: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut next_element = heading.next_sibling();
    while let Some(node) = next_element {
        if let Some(el) = node.value().as_element() {
            match el.name() {
                "ul" => return ElementRef::wrap(node),
                "h2" => return None,
                _ => {}
            }
        }
        next_element = node.next_sibling();
    }
    None
}
