//! Detection overlay viewer engine.
//!
//! This crate implements the client-side core of an object-detection viewer:
//! it submits an image to a remote detection service and maintains the
//! interactive view over the returned detections.
//!
//! # Architecture
//!
//! The engine is headless. All mutation flows through a single per-session
//! dispatcher ([`session::Session::dispatch`]); renderers produce plain
//! element descriptions (overlay boxes, list rows, panels) that a front end
//! draws however it likes.
//!
//! - `geometry`: source-pixel to display-pixel box mapping
//! - `filter`: detection match predicate
//! - `store`: detection entries + filtered view (single source of truth)
//! - `render`: overlay / list / panel element builders
//! - `select`: active-pair coordination and scroll intent
//! - `session`: state machine, stale-response guard, debounced relayout
//! - `transport`: upload validation, multipart POST, response parsing
//!
//! Overlay boxes and list rows are two projections of the same detection,
//! correlated only by the detection's stable `index`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod filter;
pub mod geometry;
pub mod render;
pub mod select;
pub mod session;
pub mod store;
pub mod transport;
pub mod ui;

pub use geometry::{DisplayRect, DisplayTransform, MappedBox, Offset, SourceSize};
pub use render::{BillPanel, ListRow, OverlayBox, SummaryPanel};
pub use select::{ScrollAlign, ScrollBehavior, ScrollRequest};
pub use session::{Generation, Phase, Session, SessionEvent};
pub use store::{DetectionStore, Entry};
pub use transport::{validate_upload_mime, DetectClient, UploadFile, ACCEPTED_MIME_TYPES};

// -------------------- Wire Types --------------------

/// One detected object, as returned by the detection service.
///
/// Immutable once admitted. Optional fields are normal absence, not errors;
/// rendering degrades field by field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box `[x1, y1, x2, y2]` in source-image pixels (x1<x2, y1<y2).
    #[serde(rename = "box")]
    pub box_source: [f64; 4],
    #[serde(rename = "class")]
    pub class_name: String,
    /// 0..=1
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_plate: Option<String>,
}

impl Detection {
    /// Confidence rounded to the nearest integer percent, as shown in
    /// overlay labels and list rows.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Parsed receipt data, present when the service recognized a shop bill.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BillData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// Full detection response from the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub results: Vec<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_data: Option<BillData>,
}

// -------------------- Admission --------------------

/// Validate a detection at the response boundary.
///
/// Rejects out-of-bounds confidence and degenerate boxes so that downstream
/// geometry never sees an inverted or zero-area rectangle.
pub fn validate_detection(det: &Detection) -> Result<()> {
    if !(0.0..=1.0).contains(&det.confidence) {
        return Err(anyhow!(
            "detection '{}': confidence {} out of bounds",
            det.class_name,
            det.confidence
        ));
    }
    let [x1, y1, x2, y2] = det.box_source;
    if !det.box_source.iter().all(|v| v.is_finite()) {
        return Err(anyhow!("detection '{}': non-finite box", det.class_name));
    }
    if !(x1 < x2 && y1 < y2) {
        return Err(anyhow!(
            "detection '{}': degenerate box [{}, {}, {}, {}]",
            det.class_name,
            x1,
            y1,
            x2,
            y2
        ));
    }
    Ok(())
}

/// Validate every detection in a response, failing on the first bad one.
pub fn validate_response(response: &DetectionResponse) -> Result<()> {
    for det in &response.results {
        validate_detection(det)?;
    }
    Ok(())
}
