use serde::{Deserialize, Serialize};

use crate::math::IDim;

/// Tuning knobs for the player controller.
///
/// Speeds and forces are in pixels per tick; `gravity` is per second² and is
/// divided by the tick rate before use.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Multiplies velocity while coming to rest.
    pub friction: f64,
    pub gravity: f64,
    /// Upward impulse of an ordinary jump.
    pub jump_force: f64,
    /// Upward impulse when jumping from a ladder or dropping off a one-way platform.
    pub ladder_jump_force: f64,
    /// Multiplies horizontal speed at the start of a jump or leap.
    pub leap_coeff: f64,
    pub terminal_velocity: f64,
    pub max_walk_speed: f64,
    pub walk_accel: f64,
    /// Horizontal acceleration while falling.
    pub fall_accel: f64,
    pub max_run_speed: f64,
    pub max_ladder_speed: f64,
    pub climb_accel: f64,
    /// Upward force per tick while passing up through a one-way platform.
    pub one_way_lift_force: f64,
    /// Speed above which a sideways jump off a ladder becomes a fall.
    pub ladder_stickiness: f64,
    /// Vertical speed past which a jump counts as having peaked.
    pub apex_threshold: f64,
    /// Magnitudes below this snap to zero.
    pub rest_epsilon: f64,
    /// Minimum horizontal speed that the leap multiplier applies to.
    pub leap_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.5,
            gravity: 40.0,
            jump_force: 8.0,
            ladder_jump_force: 4.0,
            leap_coeff: 1.25,
            terminal_velocity: 7.0,
            max_walk_speed: 2.0,
            walk_accel: 1.0,
            fall_accel: 0.5,
            max_run_speed: 5.0,
            max_ladder_speed: 2.0,
            climb_accel: 0.5,
            one_way_lift_force: 3.0,
            ladder_stickiness: 1.5,
            apex_threshold: -0.25,
            rest_epsilon: 1e-2,
            leap_threshold: 1e-2,
        }
    }
}

/// Everything fixed for the lifetime of a simulation.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate: f64,
    /// Player hitbox size in pixels.
    pub player_size: IDim,
    pub physics: PhysicsConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            player_size: IDim::new(16, 16),
            physics: PhysicsConfig::default(),
        }
    }
}

impl SimConfig {
    /// Gravity applied per tick.
    #[inline]
    pub fn gravity_per_tick(&self) -> f64 {
        self.physics.gravity / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{ "tick_rate": 30, "physics": { "gravity": 60 } }"#).unwrap();
        assert_eq!(cfg.tick_rate, 30.0);
        assert_eq!(cfg.physics.gravity, 60.0);
        assert_eq!(cfg.physics.jump_force, 8.0);
        assert_eq!(cfg.player_size, IDim::new(16, 16));
        assert_eq!(cfg.gravity_per_tick(), 2.0);
    }
}
