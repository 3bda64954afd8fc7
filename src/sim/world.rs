//! Simulation world: registered bodies plus immutable table geometry
//!
//! Bodies are only added, removed or edited between ticks. Geometry is fixed
//! at construction.

use glam::DVec2;

use super::body::{Body, BodyId};
use super::boundary::BoundaryIndex;
use super::events::EventSink;
use super::table::{Pocket, PocketId, TableGeometry};
use super::tick::{TickReport, advance};
use crate::error::SimError;
use crate::settings::PhysicsSettings;

/// Owns everything the tick loop touches
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    pub(crate) settings: PhysicsSettings,
    pub(crate) boundaries: BoundaryIndex,
    pub(crate) pockets: Vec<Pocket>,
    /// Sorted by id for deterministic iteration
    pub(crate) bodies: Vec<Body>,
    next_id: Option<u32>,
}

impl SimulationWorld {
    /// Build the world from the table's static geometry
    pub fn new(settings: PhysicsSettings, geometry: TableGeometry) -> Self {
        let boundaries = BoundaryIndex::build(&geometry.boundaries);
        log::info!(
            "World created: {} boundaries, {} pockets",
            boundaries.len(),
            geometry.pockets.len()
        );
        Self {
            settings,
            boundaries,
            pockets: geometry.pockets,
            bodies: Vec::new(),
            next_id: Some(1),
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn boundaries(&self) -> &BoundaryIndex {
        &self.boundaries
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    /// Allocate a fresh body id, never one already registered
    pub fn allocate_body_id(&mut self) -> Result<BodyId, SimError> {
        let id = self.next_id.ok_or(SimError::BodyIdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(BodyId(id))
    }

    /// Add a spawned body
    pub fn register_body(&mut self, body: Body) -> Result<BodyId, SimError> {
        let id = body.id;
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(_) => Err(SimError::DuplicateBody(id)),
            Err(slot) => {
                if self.next_id.is_some_and(|next| id.0 >= next) {
                    self.next_id = id.0.checked_add(1);
                }
                self.bodies.insert(slot, body);
                Ok(id)
            }
        }
    }

    /// Remove a body (pocketed and collected, or destroyed)
    pub fn deregister_body(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(self.bodies.remove(slot))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        let slot = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(&self.bodies[slot])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let slot = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(&mut self.bodies[slot])
    }

    /// All registered bodies in id order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn active_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.active)
    }

    /// Put an inactive body back on the table at rest
    ///
    /// Returns false if the id is unknown.
    pub fn reactivate(&mut self, id: BodyId, pos: DVec2) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        body.pos = pos;
        body.vel = DVec2::ZERO;
        body.active = true;
        true
    }

    /// Whether any active body is still above the sleep threshold
    pub fn any_moving(&self) -> bool {
        let sleep = self.settings.sleep_speed;
        self.bodies.iter().any(|b| b.is_awake(sleep))
    }

    /// The active shootable body with the lowest id
    pub fn next_shootable_body(&self) -> Result<&Body, SimError> {
        self.bodies
            .iter()
            .find(|b| b.active && b.shootable)
            .ok_or(SimError::NoShootableBody)
    }

    /// First pocket (in list order) that would absorb a ball of `radius` at `pos`
    pub fn find_pocket_containing(&self, pos: DVec2, radius: f64) -> Option<PocketId> {
        self.pockets
            .iter()
            .find(|p| p.absorbs(pos, radius))
            .map(|p| p.id)
    }

    /// Run one tick of `dt` seconds
    pub fn advance<S: EventSink + ?Sized>(&mut self, dt: f64, sink: &mut S) -> TickReport {
        advance(self, dt, sink)
    }
}
