use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::SimConfig;
use crate::grid::CollisionGrid;
use crate::input::Input;
use crate::math::IVec2;
use crate::player::{Player, PlayerState};
use crate::terrain::UnknownTerrain;

/// Entity id the player spawns at.
pub const PLAYER_START: &str = "Player";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("grid width is zero")]
    ZeroWidth,
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("{len} cells do not fill rows of width {width}")]
    RaggedGrid { len: usize, width: usize },
    #[error("cell {index}: {source}")]
    UnknownTerrain {
        index: usize,
        #[source]
        source: UnknownTerrain,
    },
    #[error("no player start entity in level")]
    NoPlayerStart,
}

/// A placed entity; only the player start is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityData {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

/// The collision layer and entities of one level, as a loader hands them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub cell_size: i32,
    /// Grid width in cells.
    pub width: usize,
    /// Packed terrain codes, row-major.
    pub grid: Vec<u32>,
    #[serde(default)]
    pub entities: Vec<EntityData>,
}

/// What a renderer needs from one tick.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub vx: f64,
    pub vy: f64,
    pub state: PlayerState,
    /// Mask from the last ground probe.
    pub colliding: u32,
}

/// A loaded level: the derived collision grid and the player moving through it.
#[derive(Debug, Clone)]
pub struct Level {
    grid: CollisionGrid,
    player: Player,
}

impl Level {
    pub fn load(data: &LevelData, cfg: SimConfig) -> Result<Self, LevelError> {
        if data.cell_size <= 0 {
            return Err(LevelError::ZeroCellSize);
        }
        if data.width == 0 {
            return Err(LevelError::ZeroWidth);
        }
        if data.grid.len() % data.width != 0 {
            return Err(LevelError::RaggedGrid { len: data.grid.len(), width: data.width });
        }

        let mut grid = CollisionGrid::from_codes(&data.grid, data.width, data.cell_size)
            .map_err(|(index, source)| LevelError::UnknownTerrain { index, source })?;
        let derived = grid.derive_flags();

        let start = data
            .entities
            .iter()
            .find(|e| e.id == PLAYER_START)
            .ok_or(LevelError::NoPlayerStart)?;

        info!(
            width = grid.width(),
            height = grid.height(),
            cell_size = grid.cell_size(),
            ladder_tops = derived.ladder_tops,
            ladder_bottoms = derived.ladder_bottoms,
            one_way = derived.one_way,
            "level loaded"
        );

        let player = Player::new(IVec2::new(start.x, start.y), cfg);
        Ok(Self { grid, player })
    }

    /// Advances the simulation one tick.
    pub fn tick(&mut self, input: Input) -> PlayerState {
        self.player.update(&self.grid, input)
    }

    pub fn view(&self) -> PlayerView {
        let (pos, vel) = (self.player.pos(), self.player.vel());
        PlayerView {
            x: pos.x,
            y: pos.y,
            vx: vel.x,
            vy: vel.y,
            state: self.player.state(),
            colliding: self.player.colliding().bits(),
        }
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}
