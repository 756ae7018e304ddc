//! Screen ↔ graph coordinate conversion and pointer hit radii.
//!
//! Graph space is independent of pan and zoom: a block keeps its graph
//! position while the user scrolls or zooms the canvas. Screen space is
//! what pointer events report.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ─── Points ──────────────────────────────────────────────────────────────

/// A position in graph space. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f32,
    pub y: f32,
}

impl GraphPoint {
    pub const ORIGIN: GraphPoint = GraphPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance; compared against a squared radius to
    /// avoid the square root.
    pub fn distance_sq(self, other: GraphPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for GraphPoint {
    type Output = GraphPoint;

    fn add(self, rhs: GraphPoint) -> GraphPoint {
        GraphPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GraphPoint {
    type Output = GraphPoint;

    fn sub(self, rhs: GraphPoint) -> GraphPoint {
        GraphPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A position in screen pixels, as reported by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ─── Viewport ────────────────────────────────────────────────────────────

/// The visible canvas: pan offset, zoom, and on-screen size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the graph origin.
    pub pan_offset: ScreenPoint,
    /// Screen pixels per graph unit. Must be positive.
    pub zoom_scale: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_offset: ScreenPoint::default(),
            zoom_scale: 1.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Fail fast on a viewport the host should never produce.
    ///
    /// # Panics
    /// If the zoom is not a positive finite number or the pan offset is not finite.
    pub fn assert_valid(&self) {
        assert!(
            self.zoom_scale.is_finite() && self.zoom_scale > 0.0,
            "viewport zoom must be positive and finite, got {}",
            self.zoom_scale
        );
        assert!(
            self.pan_offset.x.is_finite() && self.pan_offset.y.is_finite(),
            "viewport pan offset must be finite, got {:?}",
            self.pan_offset
        );
    }

    /// Screen position of the middle of the visible canvas.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Convert a screen position into graph space: `(screen - pan) / zoom`.
pub fn to_graph_space(screen: ScreenPoint, viewport: &Viewport) -> GraphPoint {
    GraphPoint::new(
        (screen.x - viewport.pan_offset.x) / viewport.zoom_scale,
        (screen.y - viewport.pan_offset.y) / viewport.zoom_scale,
    )
}

/// Convert a graph position back into screen pixels.
pub fn to_screen_space(point: GraphPoint, viewport: &Viewport) -> ScreenPoint {
    ScreenPoint::new(
        point.x * viewport.zoom_scale + viewport.pan_offset.x,
        point.y * viewport.zoom_scale + viewport.pan_offset.y,
    )
}

// ─── Hit radius ──────────────────────────────────────────────────────────

/// Input modality of the gesture that triggered a paste or drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// On-screen snap radii per pointer kind, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub mouse_radius: f32,
    pub pen_radius: f32,
    /// Fingers are imprecise, so touch gets the widest radius.
    pub touch_radius: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            mouse_radius: 18.0,
            pen_radius: 18.0,
            touch_radius: 36.0,
        }
    }
}

impl SnapConfig {
    pub fn screen_radius(&self, kind: PointerKind) -> f32 {
        match kind {
            PointerKind::Mouse => self.mouse_radius,
            PointerKind::Pen => self.pen_radius,
            PointerKind::Touch => self.touch_radius,
        }
    }
}

/// Graph-space hit radius for `kind` at `zoom_scale`.
///
/// The on-screen radius stays constant: zooming in shrinks the graph-space
/// tolerance by the same factor. `zoom_scale` must be positive.
pub fn hit_radius(kind: PointerKind, zoom_scale: f32, config: &SnapConfig) -> f32 {
    debug_assert!(zoom_scale > 0.0, "hit radius needs a positive zoom");
    config.screen_radius(kind) / zoom_scale
}
