//! Series position derivation.

use crate::model::{BookRecord, NO_POSITION};

/// Position of a book within its series, never empty.
///
/// Tried in order:
/// 1. the book-level sequence
/// 2. the metadata sequence
/// 3. whatever follows the last `#` in the metadata series name
/// 4. `"N/A"`
///
/// Blank values fall through to the next rule.
pub fn series_position(book: &BookRecord) -> String {
    non_blank(book.sequence.as_deref())
        .or_else(|| non_blank(book.metadata_sequence.as_deref()))
        .or_else(|| position_from_series_name(book.series_name_or_default()))
        .unwrap_or(NO_POSITION)
        .to_string()
}

/// `"Mystery #7"` → `"7"`
fn position_from_series_name(series_name: &str) -> Option<&str> {
    let (_, after) = series_name.rsplit_once('#')?;
    non_blank(Some(after.trim()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
