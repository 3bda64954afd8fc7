//! Notifications emitted while a tick runs
//!
//! The world only pushes messages; routing them to audio, scoring or rule
//! scripts is the host's business.

use std::sync::mpsc::Sender;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::boundary::BoundaryId;
use super::table::PocketId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A ball bounced off a cushion or jaw
    BoundaryHit {
        body: BodyId,
        boundary: BoundaryId,
        normal: DVec2,
        /// Approach speed along the normal before the bounce
        impact_speed: f64,
    },
    /// Two balls touched; `normal` points from `b` to `a`
    PairCollision {
        a: BodyId,
        b: BodyId,
        normal: DVec2,
        impact_speed: f64,
    },
    /// A ball dropped into a pocket and was deactivated
    PocketAbsorbed { body: BodyId, pocket: PocketId },
}

impl SimEvent {
    /// Bodies involved, first participant first
    pub fn bodies(&self) -> (BodyId, Option<BodyId>) {
        match *self {
            SimEvent::BoundaryHit { body, .. } | SimEvent::PocketAbsorbed { body, .. } => {
                (body, None)
            }
            SimEvent::PairCollision { a, b, .. } => (a, Some(b)),
        }
    }
}

/// Receiver for simulation notifications
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        // A dropped receiver just means nobody is listening
        let _ = self.send(event);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SimEvent) {}
}
