//! Terrain cells and the collision masks they contribute.
//!
//! Cells are stored as a tagged [`Cell`]. The packed `u32` form only exists at
//! the storage boundary (level data in, [`Cell::encode`] out):
//!
//! ```text
//!  31   30   29 ............ 0
//! [OW] [LB] [  base kind     ]   base: 0 none, 1 dirt, 2 ladder, 3 stone
//! ```
//!
//! On a ladder, bit 31 reads as "ladder top" and bit 30 as "ladder bottom".
//! On dirt or stone, bit 31 is the one-way flag.

use thiserror::Error;

const KIND_BITS: u32 = 0x3fff_ffff;
const ONE_WAY_BIT: u32 = 1 << 31;
const BOTTOM_BIT: u32 = 1 << 30;

const RAW_NOTHING: u32 = 0;
const RAW_DIRT: u32 = 1;
const RAW_LADDER: u32 = 2;
const RAW_STONE: u32 = 3;

/// Raw terrain codes as the level loader hands them over.
pub mod raw {
    pub const NOTHING: u32 = super::RAW_NOTHING;
    pub const DIRT: u32 = super::RAW_DIRT;
    pub const LADDER: u32 = super::RAW_LADDER;
    pub const STONE: u32 = super::RAW_STONE;
    pub const ONE_WAY: u32 = super::ONE_WAY_BIT;
    pub const LADDER_TOP: u32 = LADDER | super::ONE_WAY_BIT;
    pub const LADDER_BOTTOM: u32 = LADDER | super::BOTTOM_BIT;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown terrain code 0x{0:x}")]
pub struct UnknownTerrain(pub u32);

/// One cell of the collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Dirt { one_way: bool },
    Stone { one_way: bool },
    Ladder { top: bool, bottom: bool },
}

impl Cell {
    pub const DIRT: Cell = Cell::Dirt { one_way: false };
    pub const STONE: Cell = Cell::Stone { one_way: false };
    pub const LADDER: Cell = Cell::Ladder { top: false, bottom: false };

    /// Packs this cell into its wire representation.
    pub const fn encode(self) -> u32 {
        const fn flag(set: bool, bit: u32) -> u32 {
            if set {
                bit
            } else {
                0
            }
        }
        match self {
            Cell::Empty => RAW_NOTHING,
            Cell::Dirt { one_way } => RAW_DIRT | flag(one_way, ONE_WAY_BIT),
            Cell::Stone { one_way } => RAW_STONE | flag(one_way, ONE_WAY_BIT),
            Cell::Ladder { top, bottom } => {
                RAW_LADDER | flag(top, ONE_WAY_BIT) | flag(bottom, BOTTOM_BIT)
            }
        }
    }

    /// Plain dirt or stone. Flagged cells do not count.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Dirt { one_way: false } | Cell::Stone { one_way: false })
    }

    #[inline]
    pub fn is_ladder(self) -> bool {
        matches!(self, Cell::Ladder { .. })
    }

    /// True when the high flag bit is set, which includes ladder tops.
    #[inline]
    pub fn is_one_way(self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Dirt { one_way } | Cell::Stone { one_way } => one_way,
            Cell::Ladder { top, .. } => top,
        }
    }

    pub fn collide_mask(self) -> CollideMask {
        let base = match self {
            Cell::Empty => return CollideMask::empty(),
            Cell::Dirt { .. } => CollideMask::DIRT,
            Cell::Stone { .. } => CollideMask::STONE,
            Cell::Ladder { bottom: true, .. } => CollideMask::LADDER_BOTTOM,
            Cell::Ladder { .. } => CollideMask::LADDER,
        };
        if self.is_one_way() {
            base | CollideMask::ONE_WAY
        } else {
            base
        }
    }
}

impl TryFrom<u32> for Cell {
    type Error = UnknownTerrain;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        let one_way = code & ONE_WAY_BIT != 0;
        match code & KIND_BITS {
            // flags on an empty cell carry no meaning and are dropped
            RAW_NOTHING => Ok(Cell::Empty),
            RAW_DIRT => Ok(Cell::Dirt { one_way }),
            RAW_STONE => Ok(Cell::Stone { one_way }),
            RAW_LADDER => Ok(Cell::Ladder { top: one_way, bottom: code & BOTTOM_BIT != 0 }),
            _ => Err(UnknownTerrain(code)),
        }
    }
}

bitflags::bitflags! {
    /// What solid categories a collision query touched.
    ///
    /// Masks from several sample points are OR'd together; the result is only
    /// judged solid or not at the end, through [`CollideMask::colliding`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollideMask: u32 {
        const DIRT    = 1 << 0;
        const LADDER  = 1 << 1;
        const STONE   = 1 << 2;
        /// Ladder-bottom sub-flag; only meaningful alongside `LADDER`.
        const BOTTOM  = BOTTOM_BIT;
        /// One-way flag, doubling as the ladder-top sub-flag.
        const ONE_WAY = ONE_WAY_BIT;

        /// Solid underfoot.
        const SOLID         = Self::DIRT.bits() | Self::STONE.bits();
        const LADDER_TOP    = Self::LADDER.bits() | Self::ONE_WAY.bits();
        const LADDER_BOTTOM = Self::LADDER.bits() | Self::BOTTOM.bits();
    }
}

impl CollideMask {
    /// False if `clip` passes through this mask, otherwise whether the mask
    /// counts as a solid obstacle.
    #[inline]
    pub fn colliding(self, clip: Clip) -> bool {
        if clip.clips(self) {
            return false;
        }
        self.intersects(Self::SOLID) || self.contains(Self::ONE_WAY)
    }
}

/// Which masks a single move is allowed to pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clip {
    /// Nothing is passable.
    #[default]
    Never,
    /// Anything carrying the one-way bit is passable.
    OneWay,
    /// Only this exact mask is passable.
    Exactly(CollideMask),
}

impl Clip {
    #[inline]
    pub fn clips(self, mask: CollideMask) -> bool {
        match self {
            Clip::Never => false,
            Clip::OneWay => mask.intersects(CollideMask::ONE_WAY),
            Clip::Exactly(m) => mask == m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mask_of(code: u32) -> CollideMask {
        Cell::try_from(code).expect("valid code").collide_mask()
    }

    #[test]
    fn collide_mask_per_kind() {
        let cases = [
            (raw::LADDER, CollideMask::LADDER),
            (raw::LADDER_TOP, CollideMask::LADDER_TOP),
            (raw::LADDER_BOTTOM, CollideMask::LADDER_BOTTOM),
            (raw::DIRT, CollideMask::DIRT),
            (raw::STONE, CollideMask::STONE),
            (raw::NOTHING, CollideMask::empty()),
        ];
        for (code, expected) in cases {
            assert_eq!(mask_of(code), expected, "code 0x{code:x}");
        }
    }

    #[test]
    fn ladder_top_carries_one_way_bit() {
        assert_eq!(mask_of(raw::LADDER_TOP) & CollideMask::ONE_WAY, CollideMask::ONE_WAY);
    }

    #[test]
    fn flags_survive_translation() {
        assert_eq!(mask_of(raw::STONE | raw::ONE_WAY), CollideMask::ONE_WAY | CollideMask::STONE);
        assert_eq!(mask_of(raw::DIRT | raw::ONE_WAY), CollideMask::ONE_WAY | CollideMask::DIRT);
    }

    #[test]
    fn ladder_top_clipped_by_one_way() {
        assert!(CollideMask::LADDER_TOP.colliding(Clip::Never));
        assert!(!CollideMask::LADDER_TOP.colliding(Clip::OneWay));
        assert!(!CollideMask::LADDER_TOP.colliding(Clip::Exactly(CollideMask::LADDER_TOP)));
    }

    #[test]
    fn ladder_alone_is_not_solid() {
        assert!(!CollideMask::LADDER.colliding(Clip::Never));
        assert!(!CollideMask::LADDER_BOTTOM.colliding(Clip::Never));
        assert!(!CollideMask::BOTTOM.colliding(Clip::Never));
        assert!(!CollideMask::empty().colliding(Clip::Never));
    }

    #[test]
    fn unknown_base_kind_rejected() {
        assert_eq!(Cell::try_from(4), Err(UnknownTerrain(4)));
        assert_eq!(Cell::try_from(7 | raw::ONE_WAY), Err(UnknownTerrain(7 | raw::ONE_WAY)));
    }

    #[test]
    fn solidity_ignores_flagged_cells() {
        assert!(Cell::DIRT.is_solid());
        assert!(Cell::STONE.is_solid());
        assert!(!Cell::Dirt { one_way: true }.is_solid());
        assert!(!Cell::LADDER.is_solid());
        assert!(!Cell::Empty.is_solid());
    }

    fn arb_code() -> impl Strategy<Value = u32> {
        (0u32..=3, any::<bool>(), any::<bool>()).prop_map(|(base, ow, lb)| {
            let bottom = if base == raw::LADDER && lb { BOTTOM_BIT } else { 0 };
            base | if ow { ONE_WAY_BIT } else { 0 } | bottom
        })
    }

    proptest! {
        #[test]
        fn mask_matches_packed_layout(code in arb_code()) {
            let base = code & KIND_BITS;
            let expected = if base == 0 {
                0
            } else {
                (1 << (base - 1)) | (code & (ONE_WAY_BIT | BOTTOM_BIT))
            };
            prop_assert_eq!(mask_of(code).bits(), expected);
        }

        #[test]
        fn encode_inverts_decode(code in arb_code()) {
            let cell = Cell::try_from(code).unwrap();
            if cell != Cell::Empty {
                prop_assert_eq!(cell.encode(), code);
            }
        }

        #[test]
        fn clip_always_wins(bits in any::<u32>()) {
            let mask = CollideMask::from_bits_retain(bits);
            prop_assert!(!mask.colliding(Clip::Exactly(mask)));
            if mask.contains(CollideMask::ONE_WAY) {
                prop_assert!(!mask.colliding(Clip::OneWay));
            }
        }

        #[test]
        fn more_samples_never_unblock(a in any::<u32>(), b in any::<u32>()) {
            let a = CollideMask::from_bits_retain(a);
            let b = CollideMask::from_bits_retain(b);
            prop_assert!(!a.colliding(Clip::Never) || (a | b).colliding(Clip::Never));
        }
    }
}
