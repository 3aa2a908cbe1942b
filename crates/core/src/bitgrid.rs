use crate::math::{IDim, IVec2};

/// A width×height grid of bits positioned somewhere in 2D space.
///
/// The offset is a plain value; the bit storage `B` may be owned (`Vec<u8>`)
/// or borrowed (`&[u8]`, `&mut [u8]`). [`BitGrid::add`] and
/// [`BitGrid::add_mut`] hand out translated views over the same storage, so a
/// hit-mask can be moved around without touching the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid<B = Vec<u8>> {
    bits: B,
    dims: IDim,
    offset: IVec2,
}

impl BitGrid {
    /// An all-false grid. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let dims = IDim::new(width.max(0), height.max(0));
        let len = (dims.w as usize * dims.h as usize).div_ceil(8);
        Self { bits: vec![0; len], dims, offset: IVec2::default() }
    }

    /// An all-true grid.
    pub fn filled(width: i32, height: i32) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..grid.dims.h {
            for x in 0..grid.dims.w {
                grid.set(x, y);
            }
        }
        grid
    }
}

impl<B: AsRef<[u8]>> BitGrid<B> {
    #[inline]
    pub fn dims(&self) -> IDim {
        self.dims
    }

    #[inline]
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    /// True iff the bit at world coordinates `(x, y)` is set. Everything
    /// outside the grid is false.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|i| self.is_set(i))
    }

    /// A read-only view of the same bits, translated by `v`.
    pub fn add(&self, v: IVec2) -> BitGrid<&[u8]> {
        BitGrid { bits: self.bits.as_ref(), dims: self.dims, offset: self.offset + v }
    }

    /// Every cell as `(x, y, set)` in world coordinates, column by column.
    /// Each call starts a fresh scan.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, bool)> + '_ {
        let IDim { w, h } = self.dims;
        let off = self.offset;
        (0..w).flat_map(move |x| {
            (0..h).map(move |y| (x + off.x, y + off.y, self.is_set(bit_index(w, x, y))))
        })
    }

    /// Calls `f` for each cell until it returns true.
    pub fn for_each(&self, mut f: impl FnMut(i32, i32, bool) -> bool) {
        let _ = self.iter().any(|(x, y, set)| f(x, y, set));
    }

    /// World coordinates of every set bit.
    pub fn set_points(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.iter().filter(|&(_, _, set)| set).map(|(x, y, _)| IVec2::new(x, y))
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        let (lx, ly) = (x.checked_sub(self.offset.x)?, y.checked_sub(self.offset.y)?);
        if lx < 0 || ly < 0 || lx >= self.dims.w || ly >= self.dims.h {
            return None;
        }
        Some(bit_index(self.dims.w, lx, ly))
    }

    #[inline]
    fn is_set(&self, idx: usize) -> bool {
        self.bits.as_ref()[idx / 8] & (1 << (idx % 8)) != 0
    }
}

/// Row-major bit offset of local `(x, y)`, all three non-negative.
#[inline]
fn bit_index(w: i32, x: i32, y: i32) -> usize {
    y as usize * w as usize + x as usize
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BitGrid<B> {
    /// Sets the bit at world coordinates; a no-op outside the grid.
    pub fn set(&mut self, x: i32, y: i32) {
        if let Some(i) = self.idx(x, y) {
            self.bits.as_mut()[i / 8] |= 1 << (i % 8);
        }
    }

    /// Clears the bit at world coordinates; a no-op outside the grid.
    pub fn unset(&mut self, x: i32, y: i32) {
        if let Some(i) = self.idx(x, y) {
            self.bits.as_mut()[i / 8] &= !(1 << (i % 8));
        }
    }

    /// A writable view of the same bits, translated by `v`.
    pub fn add_mut(&mut self, v: IVec2) -> BitGrid<&mut [u8]> {
        let offset = self.offset + v;
        BitGrid { bits: self.bits.as_mut(), dims: self.dims, offset }
    }
}
