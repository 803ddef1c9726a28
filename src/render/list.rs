//! Result list rows with derived display fields.

use crate::store::Entry;

/// Color tag sentinel the detection service emits when it could not name a
/// color; suppressed rather than shown.
const UNKNOWN_COLOR: &str = "Unknown Color";

/// One result row, keyed by the same detection index as its overlay box.
#[derive(Clone, Debug)]
pub struct ListRow {
    pub index: usize,
    pub class_name: String,
    pub confidence_percent: u32,
    pub color_tag: Option<String>,
    pub plate_badge: Option<String>,
    /// Standalone OCR text; suppressed when a plate badge is already shown,
    /// since the plate was extracted from the same text.
    pub ocr_line: Option<String>,
    pub description: String,
    pub active: bool,
}

/// Build the complete row list for the current view, preserving filtered
/// order.
pub fn build_rows(view: &[&Entry]) -> Vec<ListRow> {
    view.iter()
        .map(|entry| {
            let det = &entry.detection;
            let color_tag = det
                .color
                .as_ref()
                .filter(|color| color.as_str() != UNKNOWN_COLOR)
                .cloned();
            let plate_badge = det.number_plate.clone();
            let ocr_line = if plate_badge.is_some() {
                None
            } else {
                det.ocr_text.clone()
            };
            ListRow {
                index: entry.index,
                class_name: det.class_name.clone(),
                confidence_percent: det.confidence_percent(),
                color_tag,
                plate_badge,
                ocr_line,
                description: det.description.clone(),
                active: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detection;

    fn entry(index: usize, det: Detection) -> Entry {
        Entry {
            index,
            detection: det,
        }
    }

    fn det(class: &str) -> Detection {
        Detection {
            box_source: [0.0, 0.0, 10.0, 10.0],
            class_name: class.to_string(),
            confidence: 0.87,
            description: format!("detected a {class}"),
            color: None,
            ocr_text: None,
            number_plate: None,
        }
    }

    #[test]
    fn builds_row_with_derived_fields() {
        let entries = vec![entry(3, det("car"))];
        let view: Vec<&Entry> = entries.iter().collect();
        let rows = build_rows(&view);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 3);
        assert_eq!(rows[0].class_name, "car");
        assert_eq!(rows[0].confidence_percent, 87);
        assert_eq!(rows[0].description, "detected a car");
        assert!(!rows[0].active);
    }

    #[test]
    fn plate_badge_suppresses_ocr_line() {
        let mut d = det("car");
        d.ocr_text = Some("XYZ626 rear bumper".to_string());
        d.number_plate = Some("XYZ626".to_string());
        let entries = vec![entry(0, d)];
        let view: Vec<&Entry> = entries.iter().collect();
        let rows = build_rows(&view);
        assert_eq!(rows[0].plate_badge.as_deref(), Some("XYZ626"));
        assert!(rows[0].ocr_line.is_none());
    }

    #[test]
    fn ocr_line_shown_without_plate() {
        let mut d = det("sign");
        d.ocr_text = Some("STOP".to_string());
        let entries = vec![entry(0, d)];
        let view: Vec<&Entry> = entries.iter().collect();
        let rows = build_rows(&view);
        assert_eq!(rows[0].ocr_line.as_deref(), Some("STOP"));
        assert!(rows[0].plate_badge.is_none());
    }

    #[test]
    fn unknown_color_sentinel_is_suppressed() {
        let mut named = det("car");
        named.color = Some("Red".to_string());
        let mut unknown = det("car");
        unknown.color = Some("Unknown Color".to_string());
        let entries = vec![entry(0, named), entry(1, unknown)];
        let view: Vec<&Entry> = entries.iter().collect();
        let rows = build_rows(&view);
        assert_eq!(rows[0].color_tag.as_deref(), Some("Red"));
        assert!(rows[1].color_tag.is_none());
    }
}
