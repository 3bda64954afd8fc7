//! Cue Sim - deterministic continuous-collision billiards physics
//!
//! Core modules:
//! - `sim`: Event-driven simulation (bodies, boundaries, collision math, tick loop)
//! - `settings`: Physics tunables (JSON-serializable)
//! - `time_scale`: Slow-motion / freeze easing applied to the host frame delta
//! - `rack`: Seeded rack layouts for spawning object balls
//! - `error`: Recoverable error outcomes surfaced to callers

pub mod error;
pub mod rack;
pub mod settings;
pub mod sim;
pub mod time_scale;

pub use error::SimError;
pub use settings::{DampingSettings, PhysicsSettings};
pub use time_scale::TimeScale;

/// Simulation configuration constants
pub mod consts {
    /// Host frame step used by the demo runner (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;

    /// Rejects near-zero denominators in the segment/line algebra
    pub const DIRECTION_EPSILON: f64 = 1e-9;
    /// Relative speeds below this are treated as no motion
    pub const VELOCITY_EPSILON: f64 = 1e-12;

    /// Standard pool ball (57.15 mm diameter), in meters
    pub const BALL_RADIUS: f64 = 0.028575;

    /// Ball-ball restitution
    pub const BALL_RESTITUTION: f64 = 0.95;
    /// Cushion restitution
    pub const RAIL_RESTITUTION: f64 = 0.8;
    /// Pocket jaws are deader than the cushions
    pub const JAW_RESTITUTION: f64 = 0.6;

    /// Base exponential drag, per second
    pub const BASE_DRAG: f64 = 0.25;
    /// Bodies slower than this (m/s) are asleep and skip collision detection
    pub const SLEEP_SPEED: f64 = 1e-3;
    /// Positional push applied after resolving a contact (m)
    pub const SEPARATION_NUDGE: f64 = 1e-6;
    /// Hard cap on resolved events per tick
    pub const MAX_EVENTS_PER_TICK: u32 = 64;

    /// Damping regime: below this speed the strong damping kicks in
    pub const LOW_SPEED_CUTOFF: f64 = 0.05;
    pub const LOW_SPEED_DAMPING: f64 = 3.0;
    /// Speeds under this floor snap to exact rest
    pub const REST_SPEED: f64 = 2e-3;
    /// Damping regime: between the low cutoff and this speed
    pub const MID_SPEED_CUTOFF: f64 = 0.3;
    pub const MID_SPEED_DAMPING: f64 = 0.8;
}
