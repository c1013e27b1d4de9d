//! Splits taxed lines into fixed-size pages.

use crate::models::document::Page;
use crate::models::line::TaxedLine;

/// Split `lines` into consecutive pages of at most `page_size` lines.
///
/// An empty input yields one empty last page so renderers can still draw
/// the table. A `page_size` of 0 puts every line on a single page.
pub fn paginate(lines: &[TaxedLine], page_size: usize) -> Vec<Page> {
    if lines.is_empty() {
        return vec![Page {
            page_number: 1,
            page_count: 1,
            first_serial: 1,
            is_last_page: true,
            lines: Vec::new(),
        }];
    }

    let size = if page_size == 0 { lines.len() } else { page_size };
    let page_count = lines.len().div_ceil(size);

    lines
        .chunks(size)
        .enumerate()
        .map(|(i, chunk)| Page {
            page_number: i + 1,
            page_count,
            first_serial: i * size + 1,
            is_last_page: i + 1 == page_count,
            lines: chunk.to_vec(),
        })
        .collect()
}
