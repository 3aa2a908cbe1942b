//! The player controller: a finite-state machine stepped once per tick.
//!
//! Each handler updates velocity for its state, moves through the resolver
//! (Y before X), and picks the next state from what the moves ran into.
//! Which cells a move may pass through depends on the state and the sign of
//! the vertical velocity; see [`Player::clip_x`] and [`Player::clip_y`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimConfig;
use crate::grid::CollisionGrid;
use crate::input::Input;
use crate::math::{IDim, IRect, IVec2, Vec2};
use crate::terrain::{Clip, CollideMask};

/// Speed past which both-buttons-held damping starts when friction is off.
const DAMPEN_ABOVE: f64 = 1e2;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Falling,
    Running,
    /// A jump with a running start.
    Leaping,
    LadderClimbing,
    /// Being lifted up through a one-way platform.
    OneWayClimbing,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerState::Idle => "IDLE",
            PlayerState::Walking => "WALK",
            PlayerState::Jumping => "JUMP",
            PlayerState::Falling => "FALL",
            PlayerState::Running => "RUN",
            PlayerState::Leaping => "LEAP",
            PlayerState::LadderClimbing => "LADDER",
            PlayerState::OneWayClimbing => "ONEWAY_CLIMB",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    state: PlayerState,
    pos: IVec2,
    vel: Vec2,
    size: IDim,

    /// Y position past which `fall_clip` is cleared.
    fall_reset_y: i32,
    /// Mask passed through for the rest of the current fall.
    fall_clip: CollideMask,
    /// Last ground probe result.
    colliding: CollideMask,
    /// Horizontal speed cap for the current fall, set by whatever started it.
    max_fall_x_speed: f64,

    cfg: SimConfig,
}

impl Player {
    /// A player standing idle at `pos`.
    pub fn new(pos: IVec2, cfg: SimConfig) -> Self {
        Self {
            state: PlayerState::Idle,
            pos,
            vel: Vec2::ZERO,
            size: cfg.player_size,
            fall_reset_y: 0,
            fall_clip: CollideMask::empty(),
            colliding: CollideMask::empty(),
            max_fall_x_speed: 0.0,
            cfg,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn colliding(&self) -> CollideMask {
        self.colliding
    }

    pub fn fall_clip(&self) -> CollideMask {
        self.fall_clip
    }

    pub fn fall_reset_y(&self) -> i32 {
        self.fall_reset_y
    }

    pub fn hitbox(&self) -> IRect {
        IRect::from_pos_dim(self.pos, self.size)
    }

    /// Advances the player by one tick and returns the new state.
    pub fn update(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let max_walk = self.cfg.physics.max_walk_speed;
        let max_run = self.cfg.physics.max_run_speed;

        let next = match self.state {
            PlayerState::Idle => self.update_idle(grid, input),
            PlayerState::Walking => self.update_run_or_walk(grid, input, max_walk, false),
            PlayerState::Running => self.update_run_or_walk(grid, input, max_run, true),
            PlayerState::Jumping => self.update_leaping_or_jumping(grid, max_walk),
            PlayerState::Leaping => self.update_leaping_or_jumping(grid, max_run),
            PlayerState::Falling => self.update_falling(grid, input),
            PlayerState::LadderClimbing => self.update_ladder_climbing(grid, input),
            PlayerState::OneWayClimbing => self.update_one_way_climbing(grid),
        };

        if next != self.state {
            debug!(from = %self.state, to = %next, x = self.pos.x, y = self.pos.y, "player state changed");
        }
        self.state = next;
        next
    }

    /// Horizontal moves pass one-way cells only while rising.
    pub fn clip_x(&self) -> Clip {
        if self.vel.y < 0.0 {
            Clip::OneWay
        } else {
            Clip::Never
        }
    }

    pub fn clip_y(&self) -> Clip {
        match self.state {
            PlayerState::Falling => Clip::Exactly(self.fall_clip),
            PlayerState::LadderClimbing => Clip::Exactly(CollideMask::LADDER_TOP),
            PlayerState::OneWayClimbing => Clip::OneWay,
            _ if self.vel.y < 0.0 => Clip::OneWay,
            _ => Clip::Never,
        }
    }

    fn move_x(&mut self, grid: &CollisionGrid) -> CollideMask {
        let (dx, mask) = grid.move_x(self.hitbox(), self.vel.x, self.clip_x());
        self.pos.x += dx;
        if mask.colliding(self.clip_x()) {
            self.vel.x = 0.0;
        }
        mask
    }

    fn move_y(&mut self, grid: &CollisionGrid) -> CollideMask {
        let (dy, mask) = grid.move_y(self.hitbox(), self.vel.y, self.clip_y());
        self.pos.y += dy;
        if mask.colliding(self.clip_y()) {
            self.vel.y = 0.0;
        }
        mask
    }

    /// Origin and mask of the cell just below the middle of the feet.
    fn cell_under_foot(&self, grid: &CollisionGrid) -> (Vec2, CollideMask) {
        let hb = self.hitbox();
        let x = hb.x as f64 + hb.w as f64 / 2.0;
        let y = hb.max_y() as f64;
        grid.cell_at(Vec2::new(x, y))
    }

    fn on_solid_ground(&mut self, grid: &CollisionGrid) -> bool {
        let mask = grid.collides(self.hitbox().add(IVec2::new(0, 1)), Clip::Never);
        self.colliding = mask;
        mask.colliding(Clip::Never)
    }

    #[inline]
    fn or_zero(&self, v: f64) -> f64 {
        if v.abs() < self.cfg.physics.rest_epsilon {
            0.0
        } else {
            v
        }
    }

    fn update_idle(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let friction = self.cfg.physics.friction;
        self.vel.x = self.or_zero(friction * self.vel.x);
        self.vel.y = self.or_zero(friction * self.vel.y);

        if !self.on_solid_ground(grid) {
            return PlayerState::Falling;
        }
        if input.climbing_up()
            && self.start_ladder_climbing(grid, input) == PlayerState::LadderClimbing
        {
            return PlayerState::LadderClimbing;
        }
        let (_, underfoot) = self.cell_under_foot(grid);
        if input.climbing_down()
            && underfoot.intersects(CollideMask::LADDER_TOP)
            && self.start_ladder_climbing(grid, input) == PlayerState::LadderClimbing
        {
            return PlayerState::LadderClimbing;
        }
        if input.walking() {
            return self.walking_or_running(input);
        }
        if input.jumped() {
            return self.start_jumping(grid, input);
        }
        PlayerState::Idle
    }

    fn walking_or_running(&self, input: Input) -> PlayerState {
        if input.running() {
            PlayerState::Running
        } else {
            PlayerState::Walking
        }
    }

    fn update_run_or_walk(
        &mut self,
        grid: &CollisionGrid,
        input: Input,
        max_speed: f64,
        can_leap: bool,
    ) -> PlayerState {
        self.handle_x_vel_update(input, self.cfg.physics.walk_accel, max_speed, true);

        self.move_y(grid);
        self.move_x(grid);

        if !self.on_solid_ground(grid) {
            return self.start_falling(grid, max_speed);
        }
        if input.climbing_up()
            && self.start_ladder_climbing(grid, input) == PlayerState::LadderClimbing
        {
            return PlayerState::LadderClimbing;
        }
        if input.jumped() {
            return if can_leap {
                self.start_jumping_or_leaping(grid, input)
            } else {
                self.start_jumping(grid, input)
            };
        }
        if !input.walking() {
            return PlayerState::Idle;
        }
        self.walking_or_running(input)
    }

    /// Accelerates toward `max_speed` in the held direction. Holding both
    /// directions damps instead.
    fn handle_x_vel_update(&mut self, input: Input, accel: f64, max_speed: f64, use_friction: bool) {
        if input.walking_both() {
            if use_friction {
                self.vel.x = self.or_zero(self.cfg.physics.friction * self.vel.x);
            } else if self.vel.x > DAMPEN_ABOVE {
                self.vel.x = self.or_zero(self.vel.x - accel);
            } else if self.vel.x < -DAMPEN_ABOVE {
                self.vel.x = self.or_zero(self.vel.x + accel);
            }
        }
        if input.contains(Input::WALKED_RIGHT) {
            self.vel.x = (self.vel.x + accel).min(max_speed);
        }
        if input.contains(Input::WALKED_LEFT) {
            self.vel.x = (self.vel.x - accel).max(-max_speed);
        }
    }

    /// Enters the fall, unless the player is inside a one-way platform it
    /// cannot pass, in which case it is lifted up through it instead.
    fn start_falling(&mut self, grid: &CollisionGrid, max_fall_x_speed: f64) -> PlayerState {
        let inside = grid.collides(self.hitbox(), Clip::Never);
        if inside.intersects(CollideMask::ONE_WAY) && inside.colliding(self.clip_y()) {
            debug!(x = self.pos.x, y = self.pos.y, "lifting through one-way platform");
            self.vel.y -= self.cfg.physics.one_way_lift_force;
            self.vel.x = 0.0;
            return PlayerState::OneWayClimbing;
        }
        self.max_fall_x_speed = max_fall_x_speed;
        PlayerState::Falling
    }

    fn update_falling(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let next = self.fall(grid, input);
        if next != PlayerState::Falling {
            self.fall_clip = CollideMask::empty();
        }
        next
    }

    fn fall(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let phys = self.cfg.physics;
        self.handle_x_vel_update(input, phys.fall_accel, self.max_fall_x_speed, false);
        self.vel.y = (self.vel.y + self.cfg.gravity_per_tick()).min(phys.terminal_velocity);

        let collides_y = self.move_y(grid);
        self.move_x(grid);

        if !self.fall_clip.is_empty() && self.pos.y > self.fall_reset_y {
            self.fall_clip = CollideMask::empty();
        }

        if collides_y.colliding(self.clip_y()) {
            return if input.walking() {
                self.walking_or_running(input)
            } else {
                PlayerState::Idle
            };
        }
        if input.climbing_up()
            && self.start_ladder_climbing(grid, input) == PlayerState::LadderClimbing
        {
            return PlayerState::LadderClimbing;
        }
        PlayerState::Falling
    }

    /// Starts a jump with the run flag stripped, so it can never become a leap.
    fn start_jumping(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        self.start_jumping_or_leaping(grid, input - Input::RUNNING)
    }

    fn start_jumping_or_leaping(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let phys = self.cfg.physics;

        // jumping down off a one-way platform
        if input.climbing_down() {
            let (_, underfoot) = self.cell_under_foot(grid);
            if underfoot.intersects(CollideMask::ONE_WAY) {
                self.vel.y = -phys.ladder_jump_force;
                self.fall_clip = underfoot;
                self.fall_reset_y = self.hitbox().max_y();
                return PlayerState::Falling;
            }
        }

        if self.vel.x.abs() > phys.leap_threshold {
            self.vel.x *= phys.leap_coeff;
        }
        self.vel.y = if self.state == PlayerState::LadderClimbing {
            -phys.ladder_jump_force
        } else {
            -phys.jump_force
        };
        // off the ground, so the first Y move does not end the jump
        self.pos.y -= 1;

        if input.running() {
            PlayerState::Leaping
        } else {
            PlayerState::Jumping
        }
    }

    fn update_leaping_or_jumping(&mut self, grid: &CollisionGrid, max_fall_x_speed: f64) -> PlayerState {
        self.vel.y = self.or_zero(self.vel.y + self.cfg.gravity_per_tick());

        let collides_y = self.move_y(grid);
        self.move_x(grid);

        if collides_y.colliding(self.clip_y()) {
            self.vel.y = 0.0;
            return self.start_falling(grid, max_fall_x_speed);
        }
        if self.vel.y > self.cfg.physics.apex_threshold {
            return self.start_falling(grid, self.vel.x.abs());
        }
        self.state
    }

    /// Grabs the ladder under the player's feet, if there is one.
    ///
    /// Returns [`PlayerState::LadderClimbing`] on success and the current
    /// state otherwise; callers must check. Climbing up from a ladder top or
    /// down from a ladder bottom is refused. On success the player is
    /// centered on the ladder and stops dead.
    pub fn start_ladder_climbing(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let (origin, cell) = self.cell_under_foot(grid);
        if !cell.intersects(CollideMask::LADDER) {
            return self.state;
        }
        if input.climbing_up() && cell.contains(CollideMask::LADDER_TOP) {
            return self.state;
        }
        if input.climbing_down() && cell.contains(CollideMask::LADDER_BOTTOM) {
            return self.state;
        }
        self.pos.x = origin.x as i32 + (grid.cell_size() - self.size.w) / 2;
        self.vel = Vec2::ZERO;
        PlayerState::LadderClimbing
    }

    fn update_ladder_climbing(&mut self, grid: &CollisionGrid, input: Input) -> PlayerState {
        let phys = self.cfg.physics;
        if input.contains(Input::CLIMBED) {
            if self.vel.y > DAMPEN_ABOVE {
                self.vel.y = self.or_zero(self.vel.y - phys.climb_accel);
            } else if self.vel.x < -DAMPEN_ABOVE {
                self.vel.y = self.or_zero(self.vel.y + phys.climb_accel);
            }
        } else if input.climbing_down() {
            self.vel.y = (self.vel.y + phys.climb_accel).min(phys.max_ladder_speed);
        } else if input.climbing_up() {
            self.vel.y = (self.vel.y - phys.climb_accel).max(-phys.max_ladder_speed);
        } else {
            self.vel.y = 0.0;
        }

        let collides_y = self.move_y(grid);
        if collides_y.intersects(CollideMask::SOLID) {
            self.vel.y = 0.0;
        }

        let (_, underfoot) = self.cell_under_foot(grid);
        if !underfoot.intersects(CollideMask::LADDER)
            || (underfoot == CollideMask::LADDER_BOTTOM && self.on_solid_ground(grid))
        {
            return self.start_falling(grid, phys.max_walk_speed);
        }

        if input.contains(Input::JUMPED | Input::CLIMBED_DOWN) {
            // drop off without any lift
            return self.start_falling(grid, phys.max_walk_speed);
        }
        if input.jumped() {
            if input.walking() {
                self.handle_x_vel_update(input, phys.walk_accel, phys.max_walk_speed, true);
                if self.vel.mag() > phys.ladder_stickiness {
                    return self.start_falling(grid, phys.max_walk_speed);
                }
            }
            return self.start_jumping(grid, input);
        }
        PlayerState::LadderClimbing
    }

    fn update_one_way_climbing(&mut self, grid: &CollisionGrid) -> PlayerState {
        self.vel.y -= self.cfg.physics.one_way_lift_force;
        self.vel.x = 0.0;

        let collides_y = self.move_y(grid);
        self.move_x(grid);

        if !collides_y.colliding(self.clip_y()) {
            return PlayerState::Idle;
        }
        PlayerState::OneWayClimbing
    }
}
