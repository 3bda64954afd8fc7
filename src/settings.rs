//! Physics tunables
//!
//! Plain numeric configuration handed to the world at construction. Missing
//! fields in a JSON document fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::BoundaryKind;

/// Speed-regime damping parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingSettings {
    /// Below this speed the strong damping applies
    pub low_speed_cutoff: f64,
    /// Exponential coefficient (per second) for the low-speed regime
    pub low_speed_damping: f64,
    /// Speeds under this floor snap to exact rest
    pub rest_speed: f64,
    /// Upper bound of the mid-speed band
    pub mid_speed_cutoff: f64,
    /// Exponential coefficient (per second) for the mid-speed band
    pub mid_speed_damping: f64,
}

impl Default for DampingSettings {
    fn default() -> Self {
        Self {
            low_speed_cutoff: LOW_SPEED_CUTOFF,
            low_speed_damping: LOW_SPEED_DAMPING,
            rest_speed: REST_SPEED,
            mid_speed_cutoff: MID_SPEED_CUTOFF,
            mid_speed_damping: MID_SPEED_DAMPING,
        }
    }
}

/// World tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    // === Restitution ===
    /// Ball-ball restitution (0.0 - 1.0)
    pub ball_restitution: f64,
    /// Cushion restitution (0.0 - 1.0)
    pub rail_restitution: f64,
    /// Pocket jaw restitution (0.0 - 1.0)
    pub jaw_restitution: f64,

    // === Motion ===
    /// Base exponential drag coefficient, per second
    pub base_drag: f64,
    /// Speed below which a body is treated as resting
    pub sleep_speed: f64,
    pub damping: DampingSettings,

    // === Event loop ===
    /// Positional push applied along the contact normal after a resolve
    pub separation_nudge: f64,
    /// Iteration guard for the per-tick event loop
    pub max_events_per_tick: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            ball_restitution: BALL_RESTITUTION,
            rail_restitution: RAIL_RESTITUTION,
            jaw_restitution: JAW_RESTITUTION,

            base_drag: BASE_DRAG,
            sleep_speed: SLEEP_SPEED,
            damping: DampingSettings::default(),

            separation_nudge: SEPARATION_NUDGE,
            max_events_per_tick: MAX_EVENTS_PER_TICK,
        }
    }
}

impl PhysicsSettings {
    /// Frictionless, perfectly elastic settings (handy for analytic checks)
    pub fn elastic() -> Self {
        Self {
            ball_restitution: 1.0,
            rail_restitution: 1.0,
            jaw_restitution: 1.0,
            base_drag: 0.0,
            damping: DampingSettings {
                low_speed_damping: 0.0,
                mid_speed_damping: 0.0,
                rest_speed: 0.0,
                ..DampingSettings::default()
            },
            ..Self::default()
        }
    }

    /// Restitution used when a ball reflects off the given kind of boundary
    pub fn restitution_for(&self, kind: BoundaryKind) -> f64 {
        match kind {
            BoundaryKind::Rail => self.rail_restitution,
            BoundaryKind::Jaw => self.jaw_restitution,
        }
    }

    /// Reject values that would make the tick loop misbehave
    pub fn validate(&self) -> Result<(), SimError> {
        let unit = [
            ("ball_restitution", self.ball_restitution),
            ("rail_restitution", self.rail_restitution),
            ("jaw_restitution", self.jaw_restitution),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidSettings(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        let non_negative = [
            ("base_drag", self.base_drag),
            ("sleep_speed", self.sleep_speed),
            ("separation_nudge", self.separation_nudge),
            ("damping.low_speed_damping", self.damping.low_speed_damping),
            ("damping.mid_speed_damping", self.damping.mid_speed_damping),
            ("damping.rest_speed", self.damping.rest_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidSettings(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.damping.low_speed_cutoff > self.damping.mid_speed_cutoff {
            return Err(SimError::InvalidSettings(format!(
                "damping.low_speed_cutoff ({}) exceeds damping.mid_speed_cutoff ({})",
                self.damping.low_speed_cutoff, self.damping.mid_speed_cutoff
            )));
        }

        if self.max_events_per_tick == 0 {
            return Err(SimError::InvalidSettings(
                "max_events_per_tick must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded physics settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PhysicsSettings::default().validate().is_ok());
        assert!(PhysicsSettings::elastic().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = PhysicsSettings::from_json(r#"{ "ball_restitution": 0.5 }"#).unwrap();
        assert_eq!(settings.ball_restitution, 0.5);
        assert_eq!(settings.rail_restitution, RAIL_RESTITUTION);
        assert_eq!(settings.max_events_per_tick, MAX_EVENTS_PER_TICK);
        assert_eq!(settings.damping, DampingSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = PhysicsSettings::elastic();
        settings.max_events_per_tick = 7;
        let json = settings.to_json().unwrap();
        assert_eq!(PhysicsSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_out_of_range_restitution() {
        let err = PhysicsSettings::from_json(r#"{ "rail_restitution": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSettings(_)));
    }

    #[test]
    fn test_rejects_zero_event_budget() {
        let settings = PhysicsSettings {
            max_events_per_tick: 0,
            ..PhysicsSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_format_error() {
        let err = PhysicsSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::SettingsFormat(_)));
    }

    #[test]
    fn test_restitution_per_boundary_kind() {
        let settings = PhysicsSettings::default();
        assert_eq!(settings.restitution_for(BoundaryKind::Rail), RAIL_RESTITUTION);
        assert_eq!(settings.restitution_for(BoundaryKind::Jaw), JAW_RESTITUTION);
    }
}
