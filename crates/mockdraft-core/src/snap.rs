//! Drag-time alignment of a widget against the other widgets.
//!
//! While a single widget is dragged, its edges and center are compared with
//! every other top-level widget. A match within the threshold produces a
//! [`SnapGuide`]: the offset to apply on release plus the guide line to draw.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Distance under which an edge or center snaps.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Offsets at or below this are treated as already aligned.
const ALIGNED_EPSILON: f64 = 1e-9;

/// How to choose between several candidates within the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// Smallest absolute offset across every candidate widget.
    #[default]
    Nearest,
    /// Scan widgets in z order; within a widget the last matching check
    /// wins, and the scan stops at the first widget that matched.
    LastMatch,
}

/// Axis along which a snap offset applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal shift; the guide is a vertical line at `x = line`.
    X,
    /// Vertical shift; the guide is a horizontal line at `y = line`.
    Y,
}

/// Result of a snap computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: Axis,
    /// Signed distance to move the dragged widget along `axis`.
    pub offset: f64,
    /// Guide line coordinate along `axis`.
    pub line: f64,
}

impl SnapGuide {
    fn new(axis: Axis, offset: f64, line: f64) -> Self {
        Self { axis, offset, line }
    }

    /// Apply the offset to a position.
    pub fn apply(&self, pos: Point) -> Point {
        match self.axis {
            Axis::X => Point::new(pos.x + self.offset, pos.y),
            Axis::Y => Point::new(pos.x, pos.y + self.offset),
        }
    }

    fn is_aligned(&self) -> bool {
        self.offset.abs() <= ALIGNED_EPSILON
    }
}

/// Alignment candidates of `moving` against `target`, in check order.
///
/// Order: centers (x then y), then the four x edge pairings, then the four
/// y edge pairings.
pub fn candidates(moving: Rect, target: Rect, threshold: f64) -> Vec<SnapGuide> {
    let (x, y, x1, y1) = (moving.x0, moving.y0, moving.x1, moving.y1);
    let (tx, ty, tx1, ty1) = (target.x0, target.y0, target.x1, target.y1);
    let center_x = (tx + tx1) / 2.0;
    let center_y = (ty + ty1) / 2.0;

    let checks = [
        SnapGuide::new(Axis::X, center_x - (x + x1) / 2.0, center_x),
        SnapGuide::new(Axis::Y, center_y - (y + y1) / 2.0, center_y),
        SnapGuide::new(Axis::X, tx - x, tx),
        SnapGuide::new(Axis::X, tx1 - x, tx1),
        SnapGuide::new(Axis::X, tx - x1, tx),
        SnapGuide::new(Axis::X, tx1 - x1, tx1),
        SnapGuide::new(Axis::Y, ty - y, ty),
        SnapGuide::new(Axis::Y, ty1 - y, ty1),
        SnapGuide::new(Axis::Y, ty - y1, ty),
        SnapGuide::new(Axis::Y, ty1 - y1, ty1),
    ];
    checks
        .into_iter()
        .filter(|c| c.offset.abs() < threshold)
        .collect()
}

/// Compute the snap for `moving` against `targets` (in z-ascending order).
///
/// Returns `None` when nothing is within the threshold or the best
/// candidate is already aligned.
pub fn compute_snap<I>(moving: Rect, targets: I, threshold: f64, policy: SnapPolicy) -> Option<SnapGuide>
where
    I: IntoIterator<Item = Rect>,
{
    match policy {
        SnapPolicy::LastMatch => {
            for target in targets {
                if let Some(last) = candidates(moving, target, threshold).pop() {
                    if !last.is_aligned() {
                        return Some(last);
                    }
                }
            }
            None
        }
        SnapPolicy::Nearest => {
            let best = targets
                .into_iter()
                .flat_map(|target| candidates(moving, target, threshold))
                .fold(None::<SnapGuide>, |best, c| match best {
                    Some(b) if b.offset.abs() <= c.offset.abs() => Some(b),
                    _ => Some(c),
                })?;
            (!best.is_aligned()).then_some(best)
        }
    }
}
