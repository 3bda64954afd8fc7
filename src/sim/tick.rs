//! Event-driven simulation tick
//!
//! Each iteration finds the single earliest contact inside the remaining
//! time, moves every body to that instant, damps, checks pockets and
//! resolves the contact. Iterations are capped per tick; when the cap is
//! hit the leftover time is dropped.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::boundary::{BoundaryId, BoundaryIndex};
use super::collision::{reflect_off_boundary, resolve_equal_mass_collision, time_to_circle_collision};
use super::events::{EventSink, SimEvent};
use super::world::SimulationWorld;
use crate::consts::VELOCITY_EPSILON;
use crate::settings::PhysicsSettings;

/// Contacts this close to the end of the slice are left for the next tick
const RESOLVE_EPSILON: f64 = 1e-12;

/// Summary of one call to [`advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Loop iterations run (each resolves at most one contact)
    pub iterations: u32,
    /// Boundary and pair contacts resolved
    pub events_resolved: u32,
    /// Bodies absorbed by pockets
    pub pocketed: u32,
    /// The per-tick event budget ran out before the tick finished
    pub budget_exhausted: bool,
    /// Simulated time left unspent (0 unless the budget ran out)
    pub dropped_time: f64,
}

/// The contact chosen for an iteration (indices into the body list)
#[derive(Debug, Clone, Copy)]
enum Contact {
    Boundary {
        body: usize,
        boundary: BoundaryId,
        normal: DVec2,
    },
    Pair {
        a: usize,
        b: usize,
        normal: DVec2,
    },
}

/// Scale a velocity by the speed-regime damping over `dt`
///
/// A single exponential never reaches rest, so slow balls get a much stronger
/// decay and snap to zero under the rest floor.
pub fn apply_damping(vel: DVec2, dt: f64, settings: &PhysicsSettings) -> DVec2 {
    if dt <= 0.0 {
        return vel;
    }

    let damping = &settings.damping;
    let speed = vel.length();
    if speed < damping.low_speed_cutoff {
        let damped = vel * (-damping.low_speed_damping * dt).exp();
        if damped.length() < damping.rest_speed {
            DVec2::ZERO
        } else {
            damped
        }
    } else if speed < damping.mid_speed_cutoff {
        vel * (-damping.mid_speed_damping * dt).exp()
    } else {
        vel * (-settings.base_drag * dt).exp()
    }
}

/// Earliest contact within `[0, remaining]`
///
/// Boundaries are scanned before pairs and lower indices before higher ones;
/// only a strictly earlier time replaces the current pick. A pair is tested
/// when at least one of its bodies is awake, not only when both are, so a
/// moving ball can strike a resting one.
fn find_earliest_contact(
    settings: &PhysicsSettings,
    boundaries: &BoundaryIndex,
    bodies: &[Body],
    remaining: f64,
) -> (f64, Option<Contact>) {
    let sleep = settings.sleep_speed;
    let mut earliest = remaining;
    let mut contact = None;

    for (i, body) in bodies.iter().enumerate() {
        if !body.is_awake(sleep) {
            continue;
        }
        if let Some(hit) = boundaries.earliest_hit(body.pos, body.vel, body.radius(), earliest) {
            if hit.impact.time < earliest {
                earliest = hit.impact.time;
                contact = Some(Contact::Boundary {
                    body: i,
                    boundary: hit.boundary,
                    normal: hit.impact.normal,
                });
            }
        }
    }

    for (i, a) in bodies.iter().enumerate() {
        if !a.active {
            continue;
        }
        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            // A resting ball can still be struck; two resting balls cannot meet
            if !b.active || (!a.is_awake(sleep) && !b.is_awake(sleep)) {
                continue;
            }
            let Some(impact) =
                time_to_circle_collision(a.pos, a.vel, a.radius(), b.pos, b.vel, b.radius(), earliest)
            else {
                continue;
            };
            if impact.time < earliest {
                earliest = impact.time;
                contact = Some(Contact::Pair {
                    a: i,
                    b: j,
                    normal: impact.normal,
                });
            }
        }
    }

    (earliest, contact)
}

/// Apply a contact's response. Returns false if a participant was pocketed
/// earlier in the same iteration.
fn resolve_contact<S: EventSink + ?Sized>(
    settings: &PhysicsSettings,
    bodies: &mut [Body],
    contact: Contact,
    sink: &mut S,
) -> bool {
    let nudge = settings.separation_nudge;

    match contact {
        Contact::Boundary {
            body,
            boundary,
            normal,
        } => {
            let body = &mut bodies[body];
            if !body.active {
                return false;
            }
            let impact_speed = -body.vel.dot(normal);
            body.vel = reflect_off_boundary(body.vel, normal, settings.restitution_for(boundary.kind()));
            body.pos += normal * nudge;
            log::trace!("Body {} hit {:?} at {:.3} m/s", body.id, boundary, impact_speed);
            sink.emit(SimEvent::BoundaryHit {
                body: body.id,
                boundary,
                normal,
                impact_speed,
            });
        }
        Contact::Pair { a, b, normal } => {
            // a < b by construction
            let (head, tail) = bodies.split_at_mut(b);
            let (a, b) = (&mut head[a], &mut tail[0]);
            if !a.active || !b.active {
                return false;
            }
            let impact_speed = -(a.vel - b.vel).dot(normal);
            let (va, vb) = resolve_equal_mass_collision(a.vel, b.vel, normal, settings.ball_restitution);
            a.vel = va;
            b.vel = vb;
            a.pos += normal * nudge;
            b.pos -= normal * nudge;
            log::trace!("Bodies {} and {} collided at {:.3} m/s", a.id, b.id, impact_speed);
            sink.emit(SimEvent::PairCollision {
                a: a.id,
                b: b.id,
                normal,
                impact_speed,
            });
        }
    }

    true
}

/// Advance the world by `dt` seconds of simulated time
///
/// Runs to completion; never fails. Non-positive or non-finite `dt` is a
/// no-op.
pub fn advance<S: EventSink + ?Sized>(world: &mut SimulationWorld, dt: f64, sink: &mut S) -> TickReport {
    let mut report = TickReport::default();
    if !dt.is_finite() || dt <= 0.0 {
        return report;
    }

    let SimulationWorld {
        settings,
        boundaries,
        pockets,
        bodies,
        ..
    } = world;

    let mut remaining = dt;
    let mut events_left = settings.max_events_per_tick;

    while remaining > 0.0 {
        if events_left == 0 {
            report.budget_exhausted = true;
            report.dropped_time = remaining;
            log::debug!(
                "Event budget of {} exhausted, dropping {:.6}s of {:.6}s",
                settings.max_events_per_tick,
                remaining,
                dt
            );
            break;
        }
        events_left -= 1;
        report.iterations += 1;

        let (earliest, contact) = find_earliest_contact(settings, boundaries, bodies, remaining);

        // Move everyone to the contact instant
        for body in bodies.iter_mut().filter(|b| b.active) {
            body.pos += body.vel * earliest;
            body.vel = apply_damping(body.vel, earliest, settings);
        }

        for body in bodies.iter_mut().filter(|b| b.active && b.pocketable) {
            if let Some(pocket) = pockets.iter().find(|p| p.absorbs(body.pos, body.radius())) {
                body.active = false;
                report.pocketed += 1;
                log::info!("Body {} dropped into pocket {:?}", body.id, pocket.id);
                sink.emit(SimEvent::PocketAbsorbed {
                    body: body.id,
                    pocket: pocket.id,
                });
            }
        }

        if earliest < remaining - RESOLVE_EPSILON {
            if let Some(contact) = contact {
                if resolve_contact(settings, bodies, contact, sink) {
                    report.events_resolved += 1;
                }
            }
        }

        remaining = (remaining - earliest.max(VELOCITY_EPSILON)).max(0.0);
    }

    report
}
