//! Overlay boxes drawn over the displayed image.

use crate::geometry::{DisplayTransform, MappedBox};
use crate::store::Entry;

/// One bounding box positioned in display coordinates.
///
/// `index` is the detection's stable ordinal; hover/activation events carry
/// it back through the session dispatcher.
#[derive(Clone, Debug)]
pub struct OverlayBox {
    pub index: usize,
    pub rect: MappedBox,
    /// "class NN%"
    pub label: String,
    pub color: Option<String>,
    pub active: bool,
}

/// Build the complete overlay for the current view.
///
/// Requires a ready transform; the session defers rendering until the
/// image's natural dimensions are known.
pub fn build_overlay(view: &[&Entry], transform: &DisplayTransform) -> Vec<OverlayBox> {
    view.iter()
        .map(|entry| {
            let det = &entry.detection;
            OverlayBox {
                index: entry.index,
                rect: transform.map_box(det.box_source),
                label: format!("{} {}%", det.class_name, det.confidence_percent()),
                color: det.color.clone(),
                active: false,
            }
        })
        .collect()
}
