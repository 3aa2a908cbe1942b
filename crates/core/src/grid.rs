use crate::math::IVec2;
use crate::terrain::{Cell, UnknownTerrain};

/// Dense row-major grid of terrain cells for one level's collision layer.
///
/// Flags are derived once by [`CollisionGrid::derive_flags`] and never change
/// during play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    cells: Vec<Cell>,
    width: usize,
    cell_size: i32,
}

/// Counts of flags set by the derivation passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Derived {
    pub ladder_tops: usize,
    pub ladder_bottoms: usize,
    pub one_way: usize,
}

impl CollisionGrid {
    /// Decodes packed terrain codes. `width` must be non-zero and divide
    /// `codes.len()`; the caller validates both.
    pub fn from_codes(
        codes: &[u32],
        width: usize,
        cell_size: i32,
    ) -> Result<Self, (usize, UnknownTerrain)> {
        let cells = codes
            .iter()
            .enumerate()
            .map(|(i, &code)| Cell::try_from(code).map_err(|e| (i, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells, width, cell_size })
    }

    pub fn from_cells(cells: Vec<Cell>, width: usize, cell_size: i32) -> Self {
        Self { cells, width, cell_size }
    }

    /// Re-packs every cell into its wire code, row-major.
    pub fn codes(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.encode()).collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.cells.len() / self.width
        }
    }

    #[inline]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Cell at cell coordinates. Anything outside the grid is empty.
    #[inline]
    pub fn cell(&self, cx: i32, cy: i32) -> Cell {
        self.index(cx, cy).map_or(Cell::Empty, |i| self.cells[i])
    }

    /// Overwrites a cell; a no-op outside the grid.
    pub fn set_cell(&mut self, cx: i32, cy: i32, cell: Cell) {
        if let Some(i) = self.index(cx, cy) {
            self.cells[i] = cell;
        }
    }

    /// Cell containing the world point `(x, y)`.
    #[inline]
    pub fn cell_at_world(&self, x: f64, y: f64) -> Cell {
        let c = self.world_to_cell(x, y);
        self.cell(c.x, c.y)
    }

    #[inline]
    pub fn world_to_cell(&self, x: f64, y: f64) -> IVec2 {
        let size = self.cell_size as f64;
        IVec2::new((x / size).floor() as i32, (y / size).floor() as i32)
    }

    fn index(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        if cx >= self.width || cy >= self.height() {
            return None;
        }
        Some(cx + cy * self.width)
    }

    /// Visits every cell, column by column.
    fn for_each_cell(&mut self, mut f: impl FnMut(&Self, i32, i32, Cell) -> Option<Cell>) {
        let (w, h) = (self.width as i32, self.height() as i32);
        for cx in 0..w {
            for cy in 0..h {
                let cell = self.cell(cx, cy);
                if let Some(updated) = f(self, cx, cy, cell) {
                    self.set_cell(cx, cy, updated);
                }
            }
        }
    }

    /// Runs both derivation passes, ladders first.
    pub fn derive_flags(&mut self) -> Derived {
        let mut derived = Derived::default();
        self.process_ladders(&mut derived);
        self.process_one_way(&mut derived);
        derived
    }

    /// A ladder is a top when neither diagonal-up neighbor is solid and one
    /// side neighbor is, and a bottom when it rests on something solid.
    fn process_ladders(&mut self, derived: &mut Derived) {
        self.for_each_cell(|g, cx, cy, cell| {
            if cell != Cell::LADDER {
                return None;
            }
            let top = !g.cell(cx + 1, cy - 1).is_solid()
                && !g.cell(cx - 1, cy - 1).is_solid()
                && (g.cell(cx - 1, cy).is_solid() || g.cell(cx + 1, cy).is_solid());
            let bottom = g.cell(cx, cy + 1).is_solid();
            if !top && !bottom {
                return None;
            }
            derived.ladder_tops += top as usize;
            derived.ladder_bottoms += bottom as usize;
            Some(Cell::Ladder { top, bottom })
        });
    }

    /// Dirt with nothing solid directly above or below is a one-way plank.
    fn process_one_way(&mut self, derived: &mut Derived) {
        self.for_each_cell(|g, cx, cy, cell| {
            if cell != Cell::DIRT {
                return None;
            }
            if g.cell(cx, cy - 1).is_solid() || g.cell(cx, cy + 1).is_solid() {
                return None;
            }
            derived.one_way += 1;
            Some(Cell::Dirt { one_way: true })
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a grid from ASCII rows: `.` empty, `D` dirt, `S` stone, `L` ladder.
    pub(crate) fn grid_from_rows(rows: &[&str], cell_size: i32) -> CollisionGrid {
        let width = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| match ch {
                'D' => Cell::DIRT,
                'S' => Cell::STONE,
                'L' => Cell::LADDER,
                _ => Cell::Empty,
            })
            .collect();
        CollisionGrid::from_cells(cells, width, cell_size)
    }

    #[test]
    fn out_of_range_reads_empty() {
        let g = grid_from_rows(&["SS", "SS"], 16);
        assert_eq!(g.cell(0, 0), Cell::STONE);
        for (cx, cy) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MAX, 0), (2, -1)] {
            assert_eq!(g.cell(cx, cy), Cell::Empty, "({cx}, {cy})");
        }
        assert_eq!(g.cell_at_world(-0.5, 4.0), Cell::Empty);
        assert_eq!(g.cell_at_world(31.9, 31.9), Cell::STONE);
        assert_eq!(g.cell_at_world(32.0, 0.0), Cell::Empty);
    }

    #[test]
    fn ladder_edges_detected() {
        let mut g = grid_from_rows(
            &[
                ".....", //
                "SSLSS", //
                "..L..", //
                "SSSSS",
            ],
            16,
        );
        let derived = g.derive_flags();
        assert_eq!(g.cell(2, 1), Cell::Ladder { top: true, bottom: false });
        assert_eq!(g.cell(2, 2), Cell::Ladder { top: false, bottom: true });
        assert_eq!(derived, Derived { ladder_tops: 1, ladder_bottoms: 1, one_way: 0 });
    }

    #[test]
    fn ladder_without_side_support_is_not_a_top() {
        let mut g = grid_from_rows(&["...", ".L.", ".L.", "..."], 16);
        g.derive_flags();
        assert_eq!(g.cell(1, 1), Cell::LADDER);
        assert_eq!(g.cell(1, 2), Cell::LADDER);
    }

    #[test]
    fn one_way_inferred_for_isolated_dirt() {
        let mut g = grid_from_rows(
            &[
                "....", //
                "DD.D", //
                "...D", //
                "SSSS",
            ],
            16,
        );
        g.derive_flags();
        assert_eq!(g.cell(0, 1), Cell::Dirt { one_way: true });
        assert_eq!(g.cell(1, 1), Cell::Dirt { one_way: true });
        // stacked dirt is a true solid
        assert_eq!(g.cell(3, 1), Cell::DIRT);
        assert_eq!(g.cell(3, 2), Cell::DIRT);
        assert_eq!(g.cell(0, 3), Cell::STONE);
    }

    #[test]
    fn grid_edge_counts_as_open() {
        let mut g = grid_from_rows(&["D"], 16);
        g.derive_flags();
        assert_eq!(g.cell(0, 0), Cell::Dirt { one_way: true });
    }

    #[test]
    fn codes_reencode_derived_flags() {
        let mut g = grid_from_rows(&["SLS", ".L.", "SSS"], 8);
        g.derive_flags();
        let codes = g.codes();
        let back = CollisionGrid::from_codes(&codes, 3, 8).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.cell(1, 0).encode(), crate::terrain::raw::LADDER_TOP);
    }
}
