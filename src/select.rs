//! Active-pair coordination between overlay boxes and list rows.
//!
//! At most one overlay/list pair is active at a time: last interaction wins.
//! Activation is all-or-nothing per index; because boxes and rows are built
//! from the same filtered view, an index either has both projections or
//! neither, and this module keeps it that way.

use crate::render::{ListRow, OverlayBox};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Scroll only as far as needed to bring the row into view.
    Nearest,
}

/// Request to bring the activated list row into the visible viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
    pub behavior: ScrollBehavior,
    pub align: ScrollAlign,
}

/// Deactivate everything, then activate the box and row carrying `index`.
///
/// Returns a scroll request when the pair was found. An absent index (e.g.
/// filtered out) is a no-op, not an error: nothing stays active and no
/// half-updated state is left behind.
pub fn select(
    boxes: &mut [OverlayBox],
    rows: &mut [ListRow],
    index: usize,
) -> Option<ScrollRequest> {
    for b in boxes.iter_mut() {
        b.active = false;
    }
    for r in rows.iter_mut() {
        r.active = false;
    }

    let target_box = boxes.iter_mut().find(|b| b.index == index);
    let target_row = rows.iter_mut().find(|r| r.index == index);

    match (target_box, target_row) {
        (Some(b), Some(r)) => {
            b.active = true;
            r.active = true;
            Some(ScrollRequest {
                index,
                behavior: ScrollBehavior::Smooth,
                align: ScrollAlign::Nearest,
            })
        }
        _ => None,
    }
}
