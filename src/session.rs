//! Per-session state machine and event dispatcher.
//!
//! One `Session` owns all mutable view state for a single upload/detect
//! cycle. Every mutation arrives as a discrete event through
//! [`Session::dispatch`] (or the corresponding method), so there is no
//! ambient global state and sessions can run independently in tests.
//!
//! Phases: `Empty -> Loading -> Rendered -> Empty` on reset, with
//! `Loading -> Error` on transport failure (upload prompt restored, partial
//! data discarded). Filtering toggles within `Rendered`.
//!
//! Each upload takes a generation number. A response is applied only if its
//! generation is still current: a second file submitted mid-flight
//! supersedes the first, and the first's response is dropped whenever it
//! arrives.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::geometry::{DisplayRect, DisplayTransform, Offset, SourceSize};
use crate::render::{build_overlay, build_rows, BillPanel, ListRow, OverlayBox, SummaryPanel};
use crate::select::{self, ScrollRequest};
use crate::store::DetectionStore;
use crate::transport::validate_upload_mime;
use crate::DetectionResponse;

/// Placeholder text for the initial upload-ready display.
pub const UPLOAD_PROMPT: &str = "Upload an image to see detection results.";
/// Empty-state text when the service returned no detections.
pub const NO_OBJECTS: &str = "No objects detected.";

const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Tag for one upload attempt; responses carry it back for staleness checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Rendered,
    Error,
}

/// Input events routed through the session dispatcher.
#[derive(Debug)]
pub enum SessionEvent {
    /// Detection response (or transport failure) for a tagged upload.
    ResponseArrived {
        generation: Generation,
        outcome: Result<DetectionResponse>,
    },
    /// The displayed image's natural dimensions became available.
    ImageReady { source: SourceSize },
    /// The rendered image size or container position changed.
    LayoutChanged {
        display: DisplayRect,
        offset: Offset,
        at: Instant,
    },
    /// Search input changed; re-filter locally.
    FilterChanged { query: String },
    /// Hover or click on the box/row carrying `index`.
    Activate { index: usize },
    /// Discard everything and return to the upload-ready display.
    Reset,
}

pub struct Session {
    phase: Phase,
    generation: u64,
    store: DetectionStore,
    summary: Option<SummaryPanel>,
    bill: Option<BillPanel>,
    source: Option<SourceSize>,
    layout: Option<(DisplayRect, Offset)>,
    pending_layout: Option<(DisplayRect, Offset, Instant)>,
    transform: Option<DisplayTransform>,
    overlay: Vec<OverlayBox>,
    rows: Vec<ListRow>,
    last_error: Option<String>,
    resize_debounce: Duration,
}

impl Session {
    pub fn new() -> Self {
        Self::with_resize_debounce(DEFAULT_RESIZE_DEBOUNCE)
    }

    pub fn with_resize_debounce(resize_debounce: Duration) -> Self {
        Self {
            phase: Phase::Empty,
            generation: 0,
            store: DetectionStore::new(),
            summary: None,
            bill: None,
            source: None,
            layout: None,
            pending_layout: None,
            transform: None,
            overlay: Vec::new(),
            rows: Vec::new(),
            last_error: None,
            resize_debounce,
        }
    }

    // -------------------- Upload --------------------

    /// Start a new upload cycle for a file with the given MIME type.
    ///
    /// Rejected types fail synchronously with no state change and no request
    /// issued. On success all previous results are discarded, the session
    /// enters `Loading`, and the returned generation must tag the response.
    pub fn begin_upload(&mut self, mime: &str) -> Result<Generation> {
        validate_upload_mime(mime)?;

        self.store.clear();
        self.summary = None;
        self.bill = None;
        self.source = None;
        self.transform = None;
        self.overlay.clear();
        self.rows.clear();
        self.last_error = None;
        self.phase = Phase::Loading;
        self.generation += 1;
        log::info!("upload started (generation {})", self.generation);
        Ok(Generation(self.generation))
    }

    /// Route one input event.
    pub fn dispatch(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ResponseArrived {
                generation,
                outcome,
            } => self.apply_response(generation, outcome),
            SessionEvent::ImageReady { source } => self.image_ready(source),
            SessionEvent::LayoutChanged {
                display,
                offset,
                at,
            } => self.layout_changed(display, offset, at),
            SessionEvent::FilterChanged { query } => self.set_filter(&query),
            SessionEvent::Activate { index } => {
                self.select(index);
            }
            SessionEvent::Reset => self.reset(),
        }
    }

    /// Apply a detection response, unless a later upload superseded it.
    pub fn apply_response(&mut self, generation: Generation, outcome: Result<DetectionResponse>) {
        if generation.0 != self.generation {
            log::info!(
                "dropping stale response (generation {} != current {})",
                generation.0,
                self.generation
            );
            return;
        }

        match outcome.and_then(|response| {
            crate::validate_response(&response)?;
            Ok(response)
        }) {
            Ok(response) => {
                self.store.load(response.results);
                self.summary = SummaryPanel::from_summary(response.summary.as_deref());
                self.bill = BillPanel::from_bill(response.bill_data.as_ref());
                self.phase = Phase::Rendered;
                self.last_error = None;
                self.render();
                log::info!("rendered {} detections", self.store.len());
            }
            Err(err) => {
                log::warn!("detection request failed: {err:#}");
                self.store.clear();
                self.summary = None;
                self.bill = None;
                self.overlay.clear();
                self.rows.clear();
                self.last_error = Some(format!("{err:#}"));
                self.phase = Phase::Error;
            }
        }
    }

    // -------------------- Geometry --------------------

    /// Supply the image's natural dimensions. Fires once per load; repeats
    /// are ignored so deferred boxes are drawn exactly once.
    pub fn image_ready(&mut self, source: SourceSize) {
        if self.source.is_some() {
            log::debug!("image already measured for this load");
            return;
        }
        self.source = Some(source);
        self.recompute_transform();
        self.render();
    }

    /// Record a layout change to be applied after the debounce window.
    /// Intermediate changes within the window are coalesced; only the last
    /// one is applied.
    pub fn layout_changed(&mut self, display: DisplayRect, offset: Offset, at: Instant) {
        self.pending_layout = Some((display, offset, at));
    }

    /// Apply the pending layout if the quiet period has elapsed. Recomputes
    /// the transform and fully regenerates overlay and list; no partial
    /// patching. Returns whether a relayout happened.
    pub fn flush_layout(&mut self, now: Instant) -> bool {
        let Some((display, offset, at)) = self.pending_layout else {
            return false;
        };
        if now.duration_since(at) < self.resize_debounce {
            return false;
        }
        self.pending_layout = None;
        self.apply_layout(display, offset);
        true
    }

    /// Apply a layout immediately (initial load path).
    pub fn apply_layout(&mut self, display: DisplayRect, offset: Offset) {
        self.layout = Some((display, offset));
        self.recompute_transform();
        self.render();
    }

    fn recompute_transform(&mut self) {
        self.transform = match (self.source, self.layout) {
            (Some(source), Some((display, offset))) => {
                DisplayTransform::compute(source, display, offset)
            }
            _ => None,
        };
    }

    // -------------------- Filtering / selection --------------------

    /// Re-filter the loaded result set; no network involved.
    pub fn set_filter(&mut self, query: &str) {
        self.store.set_filter_query(query);
        self.render();
    }

    /// Activate the overlay/list pair carrying `index`.
    pub fn select(&mut self, index: usize) -> Option<ScrollRequest> {
        let scroll = select::select(&mut self.overlay, &mut self.rows, index);
        self.store
            .set_active_index(scroll.map(|request| request.index));
        scroll
    }

    /// Discard all session state and return to the upload-ready display.
    pub fn reset(&mut self) {
        self.store.clear();
        self.summary = None;
        self.bill = None;
        self.source = None;
        self.layout = None;
        self.pending_layout = None;
        self.transform = None;
        self.overlay.clear();
        self.rows.clear();
        self.last_error = None;
        self.phase = Phase::Empty;
    }

    /// Rebuild overlay and list from the current view. Always a full
    /// rebuild: prior boxes and rows are discarded wholesale, so nothing
    /// from an earlier detection set or filter state survives.
    fn render(&mut self) {
        let view = self.store.current_view();
        self.rows = build_rows(&view);
        self.overlay = match &self.transform {
            // Boxes wait for real geometry; never NaN placeholders.
            Some(transform) => build_overlay(&view, transform),
            None => Vec::new(),
        };
        if let Some(active) = self.store.active_index() {
            if select::select(&mut self.overlay, &mut self.rows, active).is_none() {
                self.store.set_active_index(None);
            }
        }
    }

    // -------------------- Accessors --------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn overlay(&self) -> &[OverlayBox] {
        &self.overlay
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn summary(&self) -> Option<&SummaryPanel> {
        self.summary.as_ref()
    }

    pub fn bill(&self) -> Option<&BillPanel> {
        self.bill.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.store.active_index()
    }

    pub fn filter_query(&self) -> &str {
        self.store.filter_query()
    }

    pub fn detection_count(&self) -> usize {
        self.store.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while boxes can be drawn (image measured and layout known).
    pub fn geometry_ready(&self) -> bool {
        self.transform.is_some()
    }

    /// The upload zone is shown when there is nothing rendered, including
    /// after a transport failure.
    pub fn upload_prompt_visible(&self) -> bool {
        matches!(self.phase, Phase::Empty | Phase::Error)
    }

    /// The search box is shown only once results are rendered.
    pub fn search_visible(&self) -> bool {
        self.phase == Phase::Rendered
    }

    /// Placeholder text for the list area, if any applies.
    pub fn placeholder_text(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Empty | Phase::Error => Some(UPLOAD_PROMPT),
            Phase::Rendered if self.rows.is_empty() => Some(NO_OBJECTS),
            _ => None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
