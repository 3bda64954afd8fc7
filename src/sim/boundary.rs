//! Static boundary geometry (cushions and pocket jaws)
//!
//! Each boundary is described once by a collider outline in local space plus
//! a placement transform. [`BoundaryIndex::build`] flattens those outlines into
//! world-space segments grouped by boundary; the index never changes after
//! that.

use std::collections::BTreeMap;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use super::collision::{Impact, time_to_segment_collision};
use super::table::PocketLocation;

/// Cushion positions on a six-pocket table
///
/// The long cushions are split by the side pockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RailLocation {
    /// Short cushion at -x
    Head,
    /// Short cushion at +x
    Foot,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which side of a pocket mouth a jaw sits on, looking into the pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JawSide {
    Left,
    Right,
}

/// Boundary identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoundaryId {
    Rail(RailLocation),
    Jaw { pocket: PocketLocation, side: JawSide },
}

/// Coarse boundary category (selects restitution)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    Rail,
    Jaw,
}

impl BoundaryId {
    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryId::Rail(_) => BoundaryKind::Rail,
            BoundaryId::Jaw { .. } => BoundaryKind::Jaw,
        }
    }
}

/// A world-space boundary segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundarySegment {
    pub start: DVec2,
    pub end: DVec2,
    pub owner: BoundaryId,
}

impl BoundarySegment {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }
}

/// Collider outline in the boundary's local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderOutline {
    /// Closed loop: the last vertex connects back to the first
    Polygon(Vec<DVec2>),
    /// Open chain of edges
    EdgeChain(Vec<DVec2>),
    /// Axis-aligned box centered on the local origin
    Box { half_extents: DVec2 },
}

impl ColliderOutline {
    /// Consecutive vertex pairs in local space
    fn local_edges(&self) -> Vec<(DVec2, DVec2)> {
        match self {
            ColliderOutline::Polygon(points) => match points.len() {
                0 => Vec::new(),
                // A single vertex still collides as a point
                1 => vec![(points[0], points[0])],
                2 => vec![(points[0], points[1])],
                n => (0..n).map(|i| (points[i], points[(i + 1) % n])).collect(),
            },
            ColliderOutline::EdgeChain(points) => match points.len() {
                0 => Vec::new(),
                1 => vec![(points[0], points[0])],
                _ => points.windows(2).map(|w| (w[0], w[1])).collect(),
            },
            ColliderOutline::Box { half_extents: h } => {
                let corners = [
                    DVec2::new(-h.x, -h.y),
                    DVec2::new(h.x, -h.y),
                    DVec2::new(h.x, h.y),
                    DVec2::new(-h.x, h.y),
                ];
                (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect()
            }
        }
    }
}

/// A static boundary as supplied by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBoundary {
    pub id: BoundaryId,
    pub outline: ColliderOutline,
    /// Local → world placement
    pub transform: DAffine2,
}

impl StaticBoundary {
    pub fn new(id: BoundaryId, outline: ColliderOutline, transform: DAffine2) -> Self {
        Self {
            id,
            outline,
            transform,
        }
    }

    /// Outline already expressed in world space
    pub fn world(id: BoundaryId, outline: ColliderOutline) -> Self {
        Self::new(id, outline, DAffine2::IDENTITY)
    }
}

/// Earliest predicted boundary contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub boundary: BoundaryId,
    pub impact: Impact,
}

/// Immutable boundary id → world segments map
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    segments: BTreeMap<BoundaryId, Vec<BoundarySegment>>,
}

impl BoundaryIndex {
    /// Flatten every outline into world-space segments
    ///
    /// Boundaries sharing an id are merged in the order given.
    pub fn build(boundaries: &[StaticBoundary]) -> Self {
        let mut segments: BTreeMap<BoundaryId, Vec<BoundarySegment>> = BTreeMap::new();

        for boundary in boundaries {
            let list = segments.entry(boundary.id).or_default();
            for (a, b) in boundary.outline.local_edges() {
                let segment = BoundarySegment {
                    start: boundary.transform.transform_point2(a),
                    end: boundary.transform.transform_point2(b),
                    owner: boundary.id,
                };
                if segment.length() == 0.0 {
                    log::debug!("Boundary {:?}: zero-length segment at {}", boundary.id, segment.start);
                }
                list.push(segment);
            }
        }

        let index = Self { segments };
        log::info!(
            "Boundary index built: {} boundaries, {} segments",
            index.len(),
            index.segment_count()
        );
        index
    }

    pub fn segments(&self, id: BoundaryId) -> &[BoundarySegment] {
        self.segments.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Boundaries in id order
    pub fn iter(&self) -> impl Iterator<Item = (BoundaryId, &[BoundarySegment])> {
        self.segments.iter().map(|(id, list)| (*id, list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    /// Earliest contact of a moving ball with any boundary within `[0, max_t]`
    ///
    /// Scans boundaries in id order and segments in outline order; ties keep
    /// the first found.
    pub fn earliest_hit(&self, p0: DVec2, vel: DVec2, radius: f64, max_t: f64) -> Option<BoundaryHit> {
        let mut best: Option<BoundaryHit> = None;
        let mut horizon = max_t;

        for segment in self.segments.values().flatten() {
            let Some(impact) =
                time_to_segment_collision(p0, vel, radius, segment.start, segment.end, horizon)
            else {
                continue;
            };
            if best.is_none_or(|b| impact.time < b.impact.time) {
                horizon = impact.time;
                best = Some(BoundaryHit {
                    boundary: segment.owner,
                    impact,
                });
            }
        }

        best
    }
}
