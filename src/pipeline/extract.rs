//! Departure table extraction.
//!
//! The upstream page is not under our control, so the extractor only relies on
//! a fixed path of selectors and degrades to "no rows" when that path is missing.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::models::DepartureRow;

/// Literal left behind when the upstream page double-encodes a blank cell.
const ENCODED_BLANK: &str = "&nbsp;";

/// CSS selectors locating the departures table and its cells.
///
/// `rows` is matched against the whole document; `destination` and `time`
/// are matched inside each row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableLayout {
    pub rows: String,
    pub destination: String,
    pub time: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            rows: "table#table_main_box table#table_main tr".to_string(),
            destination: "td.tdEst".to_string(),
            time: "td.tdEst.tdEstr.tdflecha".to_string(),
        }
    }
}

/// A [`TableLayout`] with its selectors compiled.
#[derive(Debug, Clone)]
pub struct Extractor {
    rows: Selector,
    destination: Selector,
    time: Selector,
}

fn compile(which: &str, selector: &str) -> Result<Selector, BoardError> {
    Selector::parse(selector).map_err(|e| {
        BoardError::ParseFailure(format!("{} selector {:?}: {}", which, selector, e))
    })
}

impl Extractor {
    pub fn new(layout: &TableLayout) -> Result<Self, BoardError> {
        Ok(Self {
            rows: compile("rows", &layout.rows)?,
            destination: compile("destination", &layout.destination)?,
            time: compile("time", &layout.time)?,
        })
    }

    /// Scrape departure rows in document order.
    ///
    /// Rows without a usable destination are skipped. A missing time cell
    /// yields an empty time. Returns an empty vec when the table path is absent.
    pub fn extract(&self, html: &str) -> Vec<DepartureRow> {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            tracing::debug!("Recovered from {} markup errors", document.errors.len());
        }

        let mut rows = Vec::new();
        for (row_index, row) in document.select(&self.rows).enumerate() {
            let Some(destination) = row.select(&self.destination).next().map(cell_text) else {
                continue;
            };
            if is_blank(&destination) {
                continue;
            }

            let estimated_time = row
                .select(&self.time)
                .next()
                .map(cell_text)
                .unwrap_or_default();

            rows.push(DepartureRow {
                destination,
                estimated_time,
                row_index,
            });
        }

        tracing::debug!("Extracted {} departure rows", rows.len());
        rows
    }
}

/// Text content of a cell with whitespace runs (including `&nbsp;`) collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_blank(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case(ENCODED_BLANK)
}

/// Compile `layout` and extract rows from `html` in one step.
pub fn extract_rows(html: &str, layout: &TableLayout) -> Result<Vec<DepartureRow>, BoardError> {
    Ok(Extractor::new(layout)?.extract(html))
}
