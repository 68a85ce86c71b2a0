//! Pagination: the flat wrapped-line stream → fixed-capacity pages.
//!
//! Pages are consecutive, non-overlapping chunks of the input in order.
//! Every page but the last holds exactly `capacity` lines; the last holds
//! between 1 and `capacity`. An empty stream produces no pages at all.

use serde::{Deserialize, Serialize};

/// One page of wrapped lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    pub lines: Vec<String>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split `lines` into pages of at most `capacity` lines.
///
/// `capacity` comes from [`crate::ConversionConfig::lines_per_page`] and is
/// never zero for a validated config; a zero capacity is treated as 1.
pub fn paginate(lines: Vec<String>, capacity: usize) -> Vec<Page> {
    let capacity = capacity.max(1);
    let mut pages = Vec::with_capacity(lines.len().div_ceil(capacity));
    let mut lines = lines.into_iter().peekable();

    while lines.peek().is_some() {
        let chunk: Vec<String> = lines.by_ref().take(capacity).collect();
        pages.push(Page {
            number: pages.len() + 1,
            lines: chunk,
        });
    }
    pages
}
