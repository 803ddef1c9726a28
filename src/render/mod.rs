//! Renderable element builders.
//!
//! Renderers consume the store's current view and produce plain element
//! descriptions for a front end to draw:
//! - overlay boxes positioned over the displayed image
//! - list rows with derived display fields
//! - summary / bill panels from the response's optional extras
//!
//! Every render is a full rebuild: the previous element set is discarded
//! wholesale, so no box or row from an earlier detection set or filter state
//! can survive a redraw.

mod list;
mod overlay;
mod panel;

pub use list::{build_rows, ListRow};
pub use overlay::{build_overlay, OverlayBox};
pub use panel::{BillPanel, SummaryPanel};
