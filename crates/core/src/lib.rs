//! Collision and movement core of a tile-based platformer.
//!
//! A [`Level`] owns a [`CollisionGrid`] decoded from packed terrain codes and
//! a [`Player`] driven one fixed tick at a time from an [`Input`] flag set.
//! Nothing here polls devices, renders, or loads files.

pub mod bitgrid;
pub mod config;
pub mod grid;
pub mod input;
pub mod level;
pub mod math;
pub mod player;
pub mod resolver;
pub mod terrain;

pub use bitgrid::BitGrid;
pub use config::{PhysicsConfig, SimConfig};
pub use grid::{CollisionGrid, Derived};
pub use input::{Input, Key};
pub use level::{EntityData, Level, LevelData, LevelError, PlayerView};
pub use math::{IDim, IRect, IVec2, Rect, Vec2};
pub use player::{Player, PlayerState};
pub use terrain::{Cell, Clip, CollideMask, UnknownTerrain};
