//! Source-pixel to display-pixel box mapping.
//!
//! Detection boxes arrive in the coordinate space of the original image. The
//! image is shown resized inside a container, possibly centered or padded, so
//! a box must be scaled per axis and shifted by the image's position within
//! its container before it can be drawn.
//!
//! Scale factors are independent per axis: CSS-style sizing may distort width
//! and height differently, and a uniform factor would misplace every box the
//! moment the aspect ratios diverge.

/// Natural (intrinsic) pixel dimensions of the source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceSize {
    pub w: f64,
    pub h: f64,
}

/// Rendered size of the displayed image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRect {
    pub width: f64,
    pub height: f64,
}

/// Displayed image's top-left corner relative to its container.
///
/// Computed from the image's rendered bounding rectangle minus the
/// container's, never assumed to be the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// A box in display coordinates, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MappedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Derived mapping from source space to display space.
///
/// Recomputed whenever the rendered size or position of the image changes
/// (load, resize, container layout change).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayTransform {
    /// Build a transform, or `None` while the image's natural dimensions are
    /// not yet known (either axis zero). Deferring here is what keeps
    /// NaN/Infinity geometry out of the renderers.
    pub fn compute(source: SourceSize, display: DisplayRect, offset: Offset) -> Option<Self> {
        if source.w <= 0.0 || source.h <= 0.0 {
            return None;
        }
        Some(Self {
            scale_x: display.width / source.w,
            scale_y: display.height / source.h,
            offset_x: offset.x,
            offset_y: offset.y,
        })
    }

    /// Map a `[x1, y1, x2, y2]` source-pixel box into display coordinates.
    pub fn map_box(&self, box_source: [f64; 4]) -> MappedBox {
        let [x1, y1, x2, y2] = box_source;
        MappedBox {
            left: x1 * self.scale_x + self.offset_x,
            top: y1 * self.scale_y + self.offset_y,
            width: (x2 - x1) * self.scale_x,
            height: (y2 - y1) * self.scale_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_half_scale_with_zero_offset() {
        let t = DisplayTransform::compute(
            SourceSize { w: 500.0, h: 500.0 },
            DisplayRect {
                width: 250.0,
                height: 250.0,
            },
            Offset::default(),
        )
        .expect("transform ready");
        let mapped = t.map_box([10.0, 10.0, 50.0, 50.0]);
        assert_eq!(
            mapped,
            MappedBox {
                left: 5.0,
                top: 5.0,
                width: 20.0,
                height: 20.0,
            }
        );
    }

    #[test]
    fn applies_container_offset() {
        let t = DisplayTransform::compute(
            SourceSize { w: 100.0, h: 100.0 },
            DisplayRect {
                width: 100.0,
                height: 100.0,
            },
            Offset { x: 12.0, y: 7.5 },
        )
        .expect("transform ready");
        let mapped = t.map_box([0.0, 0.0, 10.0, 10.0]);
        assert_eq!(mapped.left, 12.0);
        assert_eq!(mapped.top, 7.5);
        assert_eq!(mapped.width, 10.0);
        assert_eq!(mapped.height, 10.0);
    }

    #[test]
    fn axes_scale_independently() {
        // 2x horizontal, 0.5x vertical: a distorted display must distort
        // boxes the same way.
        let t = DisplayTransform::compute(
            SourceSize { w: 100.0, h: 200.0 },
            DisplayRect {
                width: 200.0,
                height: 100.0,
            },
            Offset::default(),
        )
        .expect("transform ready");
        let mapped = t.map_box([10.0, 20.0, 30.0, 60.0]);
        assert_eq!(mapped.left, 20.0);
        assert_eq!(mapped.top, 10.0);
        assert_eq!(mapped.width, 40.0);
        assert_eq!(mapped.height, 20.0);
    }

    #[test]
    fn defers_when_source_metrics_unavailable() {
        let display = DisplayRect {
            width: 250.0,
            height: 250.0,
        };
        assert!(
            DisplayTransform::compute(SourceSize { w: 0.0, h: 500.0 }, display, Offset::default())
                .is_none()
        );
        assert!(
            DisplayTransform::compute(SourceSize { w: 500.0, h: 0.0 }, display, Offset::default())
                .is_none()
        );
    }

    #[test]
    fn mapping_is_affine_per_axis() {
        // Doubling source size while holding display fixed halves mapped
        // extents.
        let display = DisplayRect {
            width: 300.0,
            height: 300.0,
        };
        let base = DisplayTransform::compute(SourceSize { w: 100.0, h: 100.0 }, display, Offset::default())
            .expect("transform ready");
        let doubled =
            DisplayTransform::compute(SourceSize { w: 200.0, h: 200.0 }, display, Offset::default())
                .expect("transform ready");
        let b = [10.0, 10.0, 50.0, 30.0];
        let m1 = base.map_box(b);
        let m2 = doubled.map_box(b);
        assert!((m1.width - 2.0 * m2.width).abs() < 1e-9);
        assert!((m1.height - 2.0 * m2.height).abs() < 1e-9);
        assert!((m1.left - 2.0 * m2.left).abs() < 1e-9);
        assert!((m1.top - 2.0 * m2.top).abs() < 1e-9);
    }
}
