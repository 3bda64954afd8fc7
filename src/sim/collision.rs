//! Continuous collision detection and response for balls
//!
//! Everything here is a pure function of positions and velocities. Time of
//! impact is solved analytically, so a contact is found at the instant it
//! happens instead of being corrected after the bodies overlap.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DIRECTION_EPSILON, VELOCITY_EPSILON};

/// Predicted contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    /// Time from now until contact (seconds)
    pub time: f64,
    /// Unit contact normal, pointing from the obstacle toward the moving ball
    pub normal: DVec2,
}

#[inline]
fn keep_earliest(best: &mut Option<Impact>, candidate: Impact) {
    match best {
        Some(current) if current.time <= candidate.time => {}
        _ => *best = Some(candidate),
    }
}

/// Time until a moving ball touches a fixed point
///
/// Solves |p0 + v·t - point|² = r² and keeps the entry root. A ball that is
/// not closing on the point is never reported; one that already overlaps it
/// and is still closing touches it now.
pub fn time_to_point_collision(
    p0: DVec2,
    vel: DVec2,
    radius: f64,
    point: DVec2,
    max_t: f64,
) -> Option<Impact> {
    let a = vel.length_squared();
    if a < VELOCITY_EPSILON {
        return None;
    }

    let s = p0 - point;
    let half_b = s.dot(vel);
    if half_b >= 0.0 {
        return None;
    }
    let c = s.length_squared() - radius * radius;
    let disc = half_b * half_b - a * c;
    if disc < 0.0 {
        return None;
    }

    // Entry root (-b - √disc)/a, rearranged to avoid cancellation
    let t = c.max(0.0) / (-half_b + disc.sqrt());
    if !(0.0..=max_t).contains(&t) {
        return None;
    }

    let normal = (p0 + vel * t - point).normalize_or_zero();
    if normal == DVec2::ZERO || vel.dot(normal) >= -VELOCITY_EPSILON {
        return None;
    }

    Some(Impact { time: t, normal })
}

/// Time until a moving ball touches a line segment
///
/// The segment is treated as a capsule of half-width `radius`: a straight
/// core clipped to the segment's extent plus a round cap at each endpoint.
/// Returns the earliest contact within `[0, max_t]`. A zero-length segment
/// degrades to a single point.
pub fn time_to_segment_collision(
    p0: DVec2,
    vel: DVec2,
    radius: f64,
    seg_a: DVec2,
    seg_b: DVec2,
    max_t: f64,
) -> Option<Impact> {
    if max_t < 0.0 || vel.length_squared() < VELOCITY_EPSILON {
        return None;
    }

    let edge = seg_b - seg_a;
    let len_sq = edge.length_squared();
    if len_sq < DIRECTION_EPSILON {
        return time_to_point_collision(p0, vel, radius, seg_a, max_t);
    }

    let mut best = None;

    // Straight core: signed distance d(t) = d0 + (v·n)t hits +r or -r
    let n = edge.perp() / len_sq.sqrt();
    let d0 = (p0 - seg_a).dot(n);
    let vn = vel.dot(n);
    if vn.abs() >= DIRECTION_EPSILON {
        for side in [1.0, -1.0] {
            let closing = -side * vn;
            if closing <= VELOCITY_EPSILON {
                continue;
            }
            // Only the face the center is on can be struck; a ball already
            // sunk into that face touches it now
            if side * d0 < 0.0 {
                continue;
            }
            let t = (side * d0 - radius).max(0.0) / closing;
            if t > max_t {
                continue;
            }
            let normal = n * side;
            let u = (p0 + vel * t - seg_a).dot(edge) / len_sq;
            if (0.0..=1.0).contains(&u) {
                keep_earliest(&mut best, Impact { time: t, normal });
            }
        }
    }

    // End caps
    for endpoint in [seg_a, seg_b] {
        if let Some(hit) = time_to_point_collision(p0, vel, radius, endpoint, max_t) {
            keep_earliest(&mut best, hit);
        }
    }

    best
}

/// Time until two moving balls touch
///
/// Works in the frame of ball B: s = pA - pB, v = vA - vB, R = rA + rB and
/// solves (v·v)t² + 2(s·v)t + (s·s - R²) = 0. The normal points from B to A.
/// Balls that already overlap and are still closing report contact at t = 0.
#[allow(clippy::too_many_arguments)]
pub fn time_to_circle_collision(
    pos_a: DVec2,
    vel_a: DVec2,
    radius_a: f64,
    pos_b: DVec2,
    vel_b: DVec2,
    radius_b: f64,
    max_t: f64,
) -> Option<Impact> {
    if max_t < 0.0 {
        return None;
    }

    let s = pos_a - pos_b;
    let v = vel_a - vel_b;
    let a = v.length_squared();
    if a < VELOCITY_EPSILON {
        return None;
    }

    let reach = radius_a + radius_b;
    let half_b = s.dot(v);
    let c = s.length_squared() - reach * reach;

    if c < 0.0 {
        if half_b >= 0.0 {
            return None;
        }
        let normal = s.normalize_or_zero();
        return (normal != DVec2::ZERO).then_some(Impact { time: 0.0, normal });
    }

    if half_b >= 0.0 {
        return None;
    }
    let disc = half_b * half_b - a * c;
    if disc < 0.0 {
        return None;
    }

    let t = c / (-half_b + disc.sqrt());
    if !(0.0..=max_t).contains(&t) {
        return None;
    }

    let normal = (s + v * t).normalize_or_zero();
    if normal == DVec2::ZERO || v.dot(normal) >= -VELOCITY_EPSILON {
        return None;
    }

    Some(Impact { time: t, normal })
}

/// Bounce a velocity off a surface
///
/// Keeps the tangential part and reverses the normal part scaled by
/// `restitution` (1 keeps speed, 0 kills all motion into the surface).
#[inline]
pub fn reflect_off_boundary(velocity: DVec2, normal: DVec2, restitution: f64) -> DVec2 {
    let normal_part = velocity.dot(normal) * normal;
    (velocity - normal_part) - restitution * normal_part
}

/// Equal-mass ball-ball response
///
/// With equal masses the normal components simply trade places (scaled by
/// `restitution`); tangential components stay with their ball.
#[inline]
pub fn resolve_equal_mass_collision(
    vel_a: DVec2,
    vel_b: DVec2,
    normal: DVec2,
    restitution: f64,
) -> (DVec2, DVec2) {
    let a_normal = vel_a.dot(normal) * normal;
    let b_normal = vel_b.dot(normal) * normal;
    (
        vel_a - a_normal + b_normal * restitution,
        vel_b - b_normal + a_normal * restitution,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn assert_vec_eq(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_segment_head_on() {
        // Horizontal segment on y = 0, ball above moving straight down
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 5.0),
            DVec2::new(0.0, -2.0),
            0.5,
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            10.0,
        )
        .unwrap();
        assert!((hit.time - 2.25).abs() < EPS);
        assert_vec_eq(hit.normal, DVec2::Y);
    }

    #[test]
    fn test_segment_from_below_flips_normal() {
        let hit = time_to_segment_collision(
            DVec2::new(0.0, -5.0),
            DVec2::new(0.0, 2.0),
            0.5,
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            10.0,
        )
        .unwrap();
        assert!((hit.time - 2.25).abs() < EPS);
        assert_vec_eq(hit.normal, DVec2::NEG_Y);
    }

    #[test]
    fn test_segment_beyond_max_t() {
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 5.0),
            DVec2::new(0.0, -2.0),
            0.5,
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            2.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_moving_away() {
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 5.0),
            DVec2::new(0.0, 2.0),
            0.5,
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_parallel_miss() {
        let hit = time_to_segment_collision(
            DVec2::new(-20.0, 1.0),
            DVec2::new(3.0, 0.0),
            0.5,
            DVec2::new(-10.0, 0.0),
            DVec2::new(10.0, 0.0),
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_end_cap() {
        // Ball travels along the segment's line and meets endpoint A head-on
        let hit = time_to_segment_collision(
            DVec2::new(-5.0, 0.0),
            DVec2::new(1.0, 0.0),
            0.5,
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            100.0,
        )
        .unwrap();
        assert!((hit.time - 4.5).abs() < EPS);
        assert_vec_eq(hit.normal, DVec2::NEG_X);
    }

    #[test]
    fn test_segment_core_outside_projection_uses_cap() {
        // Ball falls just past the end of the segment, so the straight core
        // is out of range and only the round cap at (1, 0) can be touched.
        let hit = time_to_segment_collision(
            DVec2::new(1.3, 5.0),
            DVec2::new(0.0, -1.0),
            0.5,
            DVec2::new(-1.0, 0.0),
            DVec2::new(1.0, 0.0),
            100.0,
        )
        .unwrap();
        // Contact when (0.3)² + y² = 0.25 → y = 0.4
        assert!((hit.time - 4.6).abs() < 1e-9);
        assert_vec_eq(hit.normal, DVec2::new(0.6, 0.8));
    }

    #[test]
    fn test_degenerate_segment_is_a_point() {
        let p = DVec2::new(3.0, 0.0);
        let hit = time_to_segment_collision(DVec2::ZERO, DVec2::X, 1.0, p, p, 10.0).unwrap();
        assert!((hit.time - 2.0).abs() < EPS);
        assert_vec_eq(hit.normal, DVec2::NEG_X);
    }

    #[test]
    fn test_resting_ball_never_collides() {
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 0.5),
            DVec2::ZERO,
            0.5,
            DVec2::new(-1.0, 0.0),
            DVec2::new(1.0, 0.0),
            10.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_touching_and_leaving_is_not_a_hit() {
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 0.5),
            DVec2::new(1.0, 1.0),
            0.5,
            DVec2::new(-1.0, 0.0),
            DVec2::new(1.0, 0.0),
            10.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_sunk_ball_still_closing_hits_now() {
        // Pushed a hair into the segment and still heading into it
        let hit = time_to_segment_collision(
            DVec2::new(0.0, 0.5 - 1e-6),
            DVec2::new(0.3, -1.0),
            0.5,
            DVec2::new(-1.0, 0.0),
            DVec2::new(1.0, 0.0),
            10.0,
        )
        .unwrap();
        assert_eq!(hit.time, 0.0);
        assert_vec_eq(hit.normal, DVec2::Y);

        // Same for an end cap
        let hit = time_to_point_collision(DVec2::new(-0.45, 0.0), DVec2::X, 0.5, DVec2::ZERO, 10.0).unwrap();
        assert_eq!(hit.time, 0.0);
        assert_vec_eq(hit.normal, DVec2::NEG_X);
    }

    #[test]
    fn test_circle_head_on() {
        let hit = time_to_circle_collision(
            DVec2::new(-5.0, 0.0),
            DVec2::new(5.0, 0.0),
            0.5,
            DVec2::new(5.0, 0.0),
            DVec2::new(-5.0, 0.0),
            0.5,
            2.0,
        )
        .unwrap();
        assert!((hit.time - 0.9).abs() < EPS);
        // From B (right) toward A (left)
        assert_vec_eq(hit.normal, DVec2::NEG_X);
    }

    #[test]
    fn test_circle_no_relative_motion() {
        let v = DVec2::new(1.0, 1.0);
        let hit = time_to_circle_collision(DVec2::ZERO, v, 0.5, DVec2::new(2.0, 0.0), v, 0.5, 10.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_circle_miss() {
        let hit = time_to_circle_collision(
            DVec2::new(-5.0, 0.0),
            DVec2::new(1.0, 0.0),
            0.5,
            DVec2::new(0.0, 2.0),
            DVec2::ZERO,
            0.5,
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_circle_separating() {
        let hit = time_to_circle_collision(
            DVec2::new(-1.0, 0.0),
            DVec2::new(-1.0, 0.0),
            0.5,
            DVec2::new(1.0, 0.0),
            DVec2::ZERO,
            0.5,
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_circle_overlapping_and_closing_is_immediate() {
        let hit = time_to_circle_collision(
            DVec2::new(-0.4, 0.0),
            DVec2::new(1.0, 0.0),
            0.5,
            DVec2::new(0.4, 0.0),
            DVec2::ZERO,
            0.5,
            1.0,
        )
        .unwrap();
        assert_eq!(hit.time, 0.0);
        assert_vec_eq(hit.normal, DVec2::NEG_X);
    }

    #[test]
    fn test_reflect_full_and_dead() {
        let v = DVec2::new(3.0, -4.0);
        assert_vec_eq(reflect_off_boundary(v, DVec2::Y, 1.0), DVec2::new(3.0, 4.0));
        assert_vec_eq(reflect_off_boundary(v, DVec2::Y, 0.0), DVec2::new(3.0, 0.0));
    }

    #[test]
    fn test_equal_mass_head_on_exchange() {
        let va = DVec2::new(5.0, 0.0);
        let vb = DVec2::new(-2.0, 0.0);
        let (a, b) = resolve_equal_mass_collision(va, vb, DVec2::NEG_X, 1.0);
        assert_vec_eq(a, vb);
        assert_vec_eq(b, va);
    }

    #[test]
    fn test_equal_mass_keeps_tangential() {
        // Glancing hit: only the x (normal) parts trade places
        let va = DVec2::new(2.0, 1.0);
        let vb = DVec2::new(0.0, -3.0);
        let (a, b) = resolve_equal_mass_collision(va, vb, DVec2::X, 1.0);
        assert_vec_eq(a, DVec2::new(0.0, 1.0));
        assert_vec_eq(b, DVec2::new(2.0, -3.0));
    }

    proptest! {
        #[test]
        fn prop_segment_head_on_time(d in 0.6f64..50.0, s in 0.1f64..20.0, r in 0.01f64..0.5) {
            let hit = time_to_segment_collision(
                DVec2::new(0.0, d),
                DVec2::new(0.0, -s),
                r,
                DVec2::new(-100.0, 0.0),
                DVec2::new(100.0, 0.0),
                1e6,
            ).unwrap();
            prop_assert!((hit.time - (d - r) / s).abs() < 1e-9 * (1.0 + hit.time));
            prop_assert!((hit.normal - DVec2::Y).length() < 1e-12);
        }

        #[test]
        fn prop_circle_closing_time(d in 1.01f64..50.0, s in 0.1f64..20.0, r in 0.01f64..0.5) {
            prop_assume!(d > 2.0 * r);
            let hit = time_to_circle_collision(
                DVec2::ZERO,
                DVec2::new(s, 0.0),
                r,
                DVec2::new(d, 0.0),
                DVec2::ZERO,
                r,
                1e6,
            ).unwrap();
            prop_assert!((hit.time - (d - 2.0 * r) / s).abs() < 1e-7 * (1.0 + hit.time));
        }

        #[test]
        fn prop_reflect_scales_normal_keeps_tangent(
            vx in -10.0f64..10.0,
            vy in -10.0f64..10.0,
            angle in 0.0f64..std::f64::consts::TAU,
            k in 0.0f64..=1.0,
        ) {
            let normal = DVec2::from_angle(angle);
            let v = DVec2::new(vx, vy);
            let out = reflect_off_boundary(v, normal, k);
            let tangent = normal.perp();
            prop_assert!((out.dot(normal).abs() - k * v.dot(normal).abs()).abs() < 1e-9);
            prop_assert!((out.dot(tangent) - v.dot(tangent)).abs() < 1e-9);
        }

        #[test]
        fn prop_elastic_equal_mass_conserves_momentum(
            ax in -10.0f64..10.0, ay in -10.0f64..10.0,
            bx in -10.0f64..10.0, by in -10.0f64..10.0,
            angle in 0.0f64..std::f64::consts::TAU,
        ) {
            let va = DVec2::new(ax, ay);
            let vb = DVec2::new(bx, by);
            let (a, b) = resolve_equal_mass_collision(va, vb, DVec2::from_angle(angle), 1.0);
            prop_assert!(((a + b) - (va + vb)).length() < 1e-9);
            prop_assert!((a.length_squared() + b.length_squared()
                - va.length_squared() - vb.length_squared()).abs() < 1e-7);
        }
    }
}
