//! Page range expression parsing
//!
//! Turns user-facing expressions like `"1-3,5,7-9"` (1-based, inclusive) into
//! a [`PageSelection`] of zero-based page indices.
//!
//! Parsing is permissive: tokens that are not numbers or `start-end` pairs are
//! dropped, reversed ranges select nothing, and page numbers outside the
//! document are left out rather than clamped.

use std::collections::BTreeSet;
use log::debug;

/// Zero-based page indices in strictly increasing order, without duplicates
///
/// A selection remembers the page count it was parsed against so it can't be
/// applied to a different document by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
    page_count: usize,
}

impl PageSelection {
    /// Every page of a document with `page_count` pages
    pub fn all(page_count: usize) -> Self {
        Self {
            indices: (0..page_count).collect(),
            page_count,
        }
    }

    /// Selected indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Page count of the document this selection was derived from
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl<'a> IntoIterator for &'a PageSelection {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Parse a page range expression against a document of `page_count` pages
///
/// Supported tokens, separated by commas:
/// - `"5"` → page 5
/// - `"1-3"` → pages 1, 2 and 3
///
/// The result is always in document order, whatever order the tokens were
/// written in: `"5,1-3"` selects indices `[0, 1, 2, 4]`.
///
/// # Example
///
/// ```
/// use pdf_tools::range::parse_page_ranges;
///
/// let selection = parse_page_ranges("1-3,5,7-9", 10);
/// assert_eq!(selection.indices(), &[0, 1, 2, 4, 6, 7, 8]);
/// ```
pub fn parse_page_ranges(expr: &str, page_count: usize) -> PageSelection {
    let mut pages = BTreeSet::new();

    for token in expr.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let Some((start, end)) = parse_token(token) else {
            debug!("Ignoring malformed page range token {:?}", token);
            continue;
        };

        // Only walk the part of the range that overlaps the document
        let first = start.max(1);
        let last = end.min(page_count as i64);
        for page in first..=last {
            pages.insert((page - 1) as usize);
        }
    }

    PageSelection {
        indices: pages.into_iter().collect(),
        page_count,
    }
}

/// Parse one token into an inclusive 1-based `(start, end)` pair
///
/// A single page `n` becomes `(n, n)`. Ranges split on the first `-` only, so
/// `"-3"` and `"1-3-5"` are rejected. Each side must be a whole integer:
/// lenient numeric prefixes such as `"5abc"` are not accepted.
fn parse_token(token: &str) -> Option<(i64, i64)> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = start.trim().parse::<i64>().ok()?;
            let end = end.trim().parse::<i64>().ok()?;
            Some((start, end))
        }
        None => {
            let page = token.parse::<i64>().ok()?;
            Some((page, page))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_ranges_and_singles() {
        let selection = parse_page_ranges("1-3,5,7-9", 10);
        assert_eq!(selection.indices(), &[0, 1, 2, 4, 6, 7, 8]);
        assert_eq!(selection.page_count(), 10);
    }

    #[test]
    fn test_token_order_does_not_affect_output() {
        let selection = parse_page_ranges("5,1-3", 10);
        assert_eq!(selection.indices(), &[0, 1, 2, 4]);
    }

    #[test]
    fn test_empty_expression() {
        assert!(parse_page_ranges("", 0).is_empty());
        assert!(parse_page_ranges("", 7).is_empty());
        assert!(parse_page_ranges(" , ,", 7).is_empty());
    }

    #[test]
    fn test_zero_pages_selects_nothing() {
        assert!(parse_page_ranges("1-5,2", 0).is_empty());
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        assert!(parse_page_ranges("abc", 5).is_empty());
        assert_eq!(parse_page_ranges("abc, 2, x-4, 4-y", 5).indices(), &[1]);
        assert!(parse_page_ranges("-3", 5).is_empty());
        assert!(parse_page_ranges("1-3-5", 5).is_empty());
        assert_eq!(parse_page_ranges("5abc, 2", 5).indices(), &[1]);
        assert!(parse_page_ranges("1x-3", 5).is_empty());
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert!(parse_page_ranges("3-1", 5).is_empty());
    }

    #[test]
    fn test_out_of_range_clipped_not_clamped() {
        assert_eq!(parse_page_ranges("2-100", 5).indices(), &[1, 2, 3, 4]);
        assert!(parse_page_ranges("0", 5).is_empty());
        assert!(parse_page_ranges("6", 5).is_empty());
        assert_eq!(parse_page_ranges("0-2", 5).indices(), &[0, 1]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(parse_page_ranges("1-3, 2-4, 3", 10).indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_whitespace_inside_tokens() {
        assert_eq!(parse_page_ranges(" 2 - 3 ,  5 ", 10).indices(), &[1, 2, 4]);
    }

    #[test]
    fn test_huge_range_is_bounded_by_document() {
        let selection = parse_page_ranges("1-9223372036854775807", 3);
        assert_eq!(selection.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_all() {
        let selection = PageSelection::all(3);
        assert_eq!(selection.indices(), &[0, 1, 2]);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
