//! Detection match predicate for live search.

use crate::Detection;

/// Case-insensitive substring match over class name, OCR text, and number
/// plate. Empty (or all-whitespace) queries match everything.
///
/// Pure function: reapplying the same query to the same detections yields the
/// same result every time, which is what makes re-filtering on every
/// keystroke safe.
pub fn matches(det: &Detection, query: &str) -> bool {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    if det.class_name.to_lowercase().contains(&term) {
        return true;
    }
    if let Some(ocr) = &det.ocr_text {
        if ocr.to_lowercase().contains(&term) {
            return true;
        }
    }
    if let Some(plate) = &det.number_plate {
        if plate.to_lowercase().contains(&term) {
            return true;
        }
    }
    false
}
