//! Strokes - one continuous pointer-down to pointer-up gesture.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Color, Point};

/// Unique identifier for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(Uuid);

impl StrokeId {
    /// Create a new unique stroke ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StrokeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded point within a stroke, carrying its resolved width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Vertex position.
    pub point: Point,
    /// Resolved stroke width at this vertex.
    pub width: f32,
}

impl Vertex {
    /// Create a new vertex.
    #[must_use]
    pub const fn new(point: Point, width: f32) -> Self {
        Self { point, width }
    }
}

/// A drawable piece of stroke geometry.
///
/// A segment without a control point is a straight line; otherwise it is a
/// quadratic Bezier from `from` to `to` bent towards `control`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    /// Start of the segment.
    pub from: Point,
    /// Quadratic control point, if curved.
    pub control: Option<Point>,
    /// End of the segment.
    pub to: Point,
    /// Stroke width for this segment.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
}

/// An ordered run of vertices drawn as one smoothed curve.
///
/// The color is fixed when the stroke begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Unique identifier.
    pub id: StrokeId,
    /// Color the stroke was started with.
    pub color: Color,
    vertices: Vec<Vertex>,
}

impl Stroke {
    /// Start a stroke with a single vertex.
    #[must_use]
    pub fn new(origin: Vertex, color: Color) -> Self {
        Self {
            id: StrokeId::new(),
            color,
            vertices: vec![origin],
        }
    }

    /// All recorded vertices, in arrival order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of recorded vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the stroke has no vertices.
    ///
    /// A stroke always starts with its origin vertex, so this only holds for
    /// strokes built through deserialization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Last recorded vertex.
    #[must_use]
    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    pub(crate) fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Whether the stroke produces any visible geometry.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.vertices.len() >= 2
    }

    /// Curve geometry through the stroke's vertices.
    ///
    /// Each vertex is the control point of a quadratic curve ending at the
    /// midpoint to the next vertex; the final segment ends on the last vertex.
    /// Two vertices give a single line, fewer give nothing.
    #[must_use]
    pub fn segments(&self) -> Vec<StrokeSegment> {
        let vertices = &self.vertices;
        match vertices.len() {
            0 | 1 => Vec::new(),
            2 => vec![StrokeSegment {
                from: vertices[0].point,
                control: None,
                to: vertices[1].point,
                width: vertices[1].width,
                color: self.color,
            }],
            n => {
                let mut segments = Vec::with_capacity(n - 1);
                let mut cursor = vertices[0].point;
                for (i, pair) in vertices.windows(2).enumerate() {
                    let (current, next) = (pair[0], pair[1]);
                    let to = if i == n - 2 {
                        next.point
                    } else {
                        current.point.midpoint(next.point)
                    };
                    segments.push(StrokeSegment {
                        from: cursor,
                        control: Some(current.point),
                        to,
                        width: next.width,
                        color: self.color,
                    });
                    cursor = to;
                }
                segments
            }
        }
    }
}
