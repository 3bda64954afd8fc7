//! Rack layouts for spawning object balls
//!
//! A perfectly symmetric rack makes every break identical, so each ball gets
//! a tiny seeded offset. Same seed, same rack.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Triangle rack pointing at -x (toward the head of the table)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RackLayout {
    pub rows: u32,
    /// Space left between neighbouring balls
    pub gap: f64,
    /// Max per-axis random offset; kept under half the gap so balls never overlap
    pub jitter: f64,
}

impl Default for RackLayout {
    /// Fifteen-ball rack
    fn default() -> Self {
        Self {
            rows: 5,
            gap: 1e-4,
            jitter: 2e-5,
        }
    }
}

impl RackLayout {
    pub fn ball_count(&self) -> usize {
        let rows = self.rows as usize;
        rows * (rows + 1) / 2
    }

    /// Ball centers, apex first, row by row
    pub fn positions(&self, apex: DVec2, ball_radius: f64, seed: u64) -> Vec<DVec2> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let pitch = 2.0 * ball_radius + self.gap;
        let row_step = pitch * 3f64.sqrt() / 2.0;
        // Bad values (negative or NaN) disable the jitter
        let max_jitter = (self.gap / 2.0 * 0.99).max(0.0);
        let jitter = self.jitter.clamp(0.0, max_jitter);

        let mut positions = Vec::with_capacity(self.ball_count());
        for row in 0..self.rows {
            for i in 0..=row {
                let base = apex
                    + DVec2::new(
                        row as f64 * row_step,
                        (i as f64 - row as f64 / 2.0) * pitch,
                    );
                let offset = if jitter > 0.0 {
                    DVec2::new(
                        rng.random_range(-jitter..=jitter),
                        rng.random_range(-jitter..=jitter),
                    )
                } else {
                    DVec2::ZERO
                };
                positions.push(base + offset);
            }
        }
        positions
    }
}
