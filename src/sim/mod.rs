//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Exact time-of-impact, no fixed-step overlap correction
//! - Stable iteration order (bodies by id, boundaries by id)
//! - At most one contact resolved per loop iteration
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod events;
pub mod table;
pub mod tick;
pub mod world;

pub use body::{Body, BodyId};
pub use boundary::{
    BoundaryHit, BoundaryId, BoundaryIndex, BoundaryKind, BoundarySegment, ColliderOutline,
    JawSide, RailLocation, StaticBoundary,
};
pub use collision::{
    Impact, reflect_off_boundary, resolve_equal_mass_collision, time_to_circle_collision,
    time_to_point_collision, time_to_segment_collision,
};
pub use events::{EventSink, NullSink, SimEvent};
pub use table::{Pocket, PocketId, PocketLocation, TableGeometry, TableLayout};
pub use tick::{TickReport, advance, apply_damping};
pub use world::SimulationWorld;
