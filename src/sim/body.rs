//! Ball bodies

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::BALL_RADIUS;

/// Stable body identifier (allocated by the world, ordered for determinism)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Fixed after creation
    radius: f64,
    /// Inactive bodies are skipped by every collision and pocket test
    pub active: bool,
    /// Can be absorbed by pockets
    pub pocketable: bool,
    /// Can be struck by the cue (the cue ball)
    pub shootable: bool,
}

impl Body {
    /// A resting, active, pocketable object ball
    ///
    /// Non-positive or non-finite radii fall back to the standard ball radius.
    pub fn new(id: BodyId, pos: DVec2, radius: f64) -> Self {
        let radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            log::debug!("Body {id}: invalid radius {radius}, using {BALL_RADIUS}");
            BALL_RADIUS
        };
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            radius,
            active: true,
            pocketable: true,
            shootable: false,
        }
    }

    /// A standard-size cue ball
    pub fn cue(id: BodyId, pos: DVec2) -> Self {
        Self {
            shootable: true,
            ..Self::new(id, pos, BALL_RADIUS)
        }
    }

    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_pocketable(mut self, pocketable: bool) -> Self {
        self.pocketable = pocketable;
        self
    }

    pub fn with_shootable(mut self, shootable: bool) -> Self {
        self.shootable = shootable;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Whether the body takes part in collision detection this iteration
    #[inline]
    pub fn is_awake(&self, sleep_speed: f64) -> bool {
        self.active && self.vel.length_squared() >= sleep_speed * sleep_speed
    }

    /// Strike the body (cue impulse expressed as a velocity)
    pub fn strike(&mut self, vel: DVec2) {
        self.vel = vel;
    }
}
