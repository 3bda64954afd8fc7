//! Pockets and standard table layout
//!
//! The scene supplies static geometry exactly once, as a [`TableGeometry`].
//! [`TableLayout`] builds the geometry of a regulation six-pocket table:
//! cushions as boxes, jaws as short edge chains, and six circular pockets.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use super::boundary::{BoundaryId, ColliderOutline, JawSide, RailLocation, StaticBoundary};

/// Pocket positions on a six-pocket table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PocketLocation {
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl PocketLocation {
    pub const ALL: [PocketLocation; 6] = [
        PocketLocation::TopLeft,
        PocketLocation::TopMiddle,
        PocketLocation::TopRight,
        PocketLocation::BottomLeft,
        PocketLocation::BottomMiddle,
        PocketLocation::BottomRight,
    ];

    /// Sign of the pocket's x and y coordinates (x is 0 for side pockets)
    fn signs(&self) -> (f64, f64) {
        match self {
            PocketLocation::TopLeft => (-1.0, 1.0),
            PocketLocation::TopMiddle => (0.0, 1.0),
            PocketLocation::TopRight => (1.0, 1.0),
            PocketLocation::BottomLeft => (-1.0, -1.0),
            PocketLocation::BottomMiddle => (0.0, -1.0),
            PocketLocation::BottomRight => (1.0, -1.0),
        }
    }

    pub fn is_corner(&self) -> bool {
        self.signs().0 != 0.0
    }
}

/// Pocket identifier (index into the world's pocket list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PocketId(pub u32);

/// Circular absorption zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub id: PocketId,
    pub center: DVec2,
    /// Should exceed every pocketable ball's radius
    pub radius: f64,
}

impl Pocket {
    pub fn new(id: PocketId, center: DVec2, radius: f64) -> Self {
        Self { id, center, radius }
    }

    /// Whether a ball centered at `pos` has dropped into the pocket
    #[inline]
    pub fn absorbs(&self, pos: DVec2, ball_radius: f64) -> bool {
        let reach = self.radius - ball_radius;
        reach >= 0.0 && pos.distance_squared(self.center) <= reach * reach
    }
}

/// Static geometry supplied once at world construction
#[derive(Debug, Clone, Default)]
pub struct TableGeometry {
    pub boundaries: Vec<StaticBoundary>,
    pub pockets: Vec<Pocket>,
}

/// Dimensions of a six-pocket table (meters, centered on the origin, long
/// axis along x). Measured at the cushion noses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub half_length: f64,
    pub half_width: f64,
    /// Thickness of the cushion boxes behind the nose line
    pub cushion_depth: f64,
    /// Distance from a corner at which the cushions stop
    pub corner_mouth: f64,
    /// Half opening of a side pocket
    pub side_mouth: f64,
    pub jaw_length: f64,
    pub corner_pocket_radius: f64,
    pub side_pocket_radius: f64,
    /// Side pockets sit this far behind the cushion line
    pub side_pocket_setback: f64,
}

impl Default for TableLayout {
    /// Nine-foot table
    fn default() -> Self {
        Self {
            half_length: 1.27,
            half_width: 0.635,
            cushion_depth: 0.05,
            corner_mouth: 0.08,
            side_mouth: 0.065,
            jaw_length: 0.06,
            corner_pocket_radius: 0.075,
            side_pocket_radius: 0.07,
            side_pocket_setback: 0.02,
        }
    }
}

impl TableLayout {
    /// Where the rack's apex ball sits
    pub fn foot_spot(&self) -> DVec2 {
        DVec2::new(self.half_length / 2.0, 0.0)
    }

    /// Where the cue ball is placed for the break
    pub fn head_spot(&self) -> DVec2 {
        DVec2::new(-self.half_length / 2.0, 0.0)
    }

    /// Whether a point lies on the playing surface (inside the cushion line)
    pub fn contains(&self, pos: DVec2) -> bool {
        pos.x.abs() <= self.half_length && pos.y.abs() <= self.half_width
    }

    fn pocket_center(&self, location: PocketLocation) -> DVec2 {
        let (sx, sy) = location.signs();
        if location.is_corner() {
            DVec2::new(sx * self.half_length, sy * self.half_width)
        } else {
            DVec2::new(0.0, sy * (self.half_width + self.side_pocket_setback))
        }
    }

    fn pocket_radius(&self, location: PocketLocation) -> f64 {
        if location.is_corner() {
            self.corner_pocket_radius
        } else {
            self.side_pocket_radius
        }
    }

    fn rail(&self, location: RailLocation) -> StaticBoundary {
        let (l, h, depth) = (self.half_length, self.half_width, self.cushion_depth);
        let long_len = l - self.corner_mouth - self.side_mouth;
        let long_mid = (self.side_mouth + l - self.corner_mouth) / 2.0;
        let short_len = 2.0 * (h - self.corner_mouth);

        let (center, length, angle) = match location {
            RailLocation::Head => (DVec2::new(-l - depth / 2.0, 0.0), short_len, std::f64::consts::FRAC_PI_2),
            RailLocation::Foot => (DVec2::new(l + depth / 2.0, 0.0), short_len, std::f64::consts::FRAC_PI_2),
            RailLocation::TopLeft => (DVec2::new(-long_mid, h + depth / 2.0), long_len, 0.0),
            RailLocation::TopRight => (DVec2::new(long_mid, h + depth / 2.0), long_len, 0.0),
            RailLocation::BottomLeft => (DVec2::new(-long_mid, -h - depth / 2.0), long_len, 0.0),
            RailLocation::BottomRight => (DVec2::new(long_mid, -h - depth / 2.0), long_len, 0.0),
        };

        StaticBoundary::new(
            BoundaryId::Rail(location),
            ColliderOutline::Box {
                half_extents: DVec2::new(length / 2.0, depth / 2.0),
            },
            DAffine2::from_angle_translation(angle, center),
        )
    }

    /// The two jaws guarding a pocket mouth
    ///
    /// Each jaw runs from its cushion end into the pocket and then turns to
    /// meet the other behind the pocket, so a ball that misses the drop zone
    /// rattles around the cup instead of leaving the table.
    fn jaws(&self, pocket: PocketLocation) -> [StaticBoundary; 2] {
        let (sx, sy) = pocket.signs();
        let (l, h, j) = (self.half_length, self.half_width, self.jaw_length);

        // (start at the cushion end, direction into the pocket)
        let (first, second, look) = if pocket.is_corner() {
            let dir = DVec2::new(sx, sy).normalize();
            (
                (DVec2::new(sx * (l - self.corner_mouth), sy * h), dir),
                (DVec2::new(sx * l, sy * (h - self.corner_mouth)), dir),
                dir,
            )
        } else {
            let m = self.side_mouth;
            let taper = 0.25 * j;
            (
                (DVec2::new(-m, sy * h), DVec2::new(taper, sy * j).normalize()),
                (DVec2::new(m, sy * h), DVec2::new(-taper, sy * j).normalize()),
                DVec2::new(0.0, sy),
            )
        };

        let mouth = self.pocket_center(pocket);
        let back = mouth + look * self.pocket_radius(pocket);
        [first, second].map(|(start, dir)| {
            let side = if (start - mouth).dot(look.perp()) > 0.0 {
                JawSide::Left
            } else {
                JawSide::Right
            };
            StaticBoundary::world(
                BoundaryId::Jaw { pocket, side },
                ColliderOutline::EdgeChain(vec![start, start + dir * j, back]),
            )
        })
    }

    /// Full static geometry: six cushions, twelve jaws, six pockets
    ///
    /// Pocket ids follow [`PocketLocation::ALL`] order.
    pub fn build(&self) -> TableGeometry {
        let rails = [
            RailLocation::Head,
            RailLocation::Foot,
            RailLocation::TopLeft,
            RailLocation::TopRight,
            RailLocation::BottomLeft,
            RailLocation::BottomRight,
        ];

        let mut boundaries: Vec<StaticBoundary> = rails.iter().map(|&r| self.rail(r)).collect();
        for pocket in PocketLocation::ALL {
            boundaries.extend(self.jaws(pocket));
        }

        let pockets = PocketLocation::ALL
            .iter()
            .enumerate()
            .map(|(i, &location)| {
                Pocket::new(
                    PocketId(i as u32),
                    self.pocket_center(location),
                    self.pocket_radius(location),
                )
            })
            .collect();

        TableGeometry {
            boundaries,
            pockets,
        }
    }
}
