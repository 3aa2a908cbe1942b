//! Axis-separated, unit-stepped movement against a [`CollisionGrid`].
//!
//! A hitbox is tested by sampling points instead of rasterizing it: the four
//! corners (inset by [`EPS`]), half-unit points along every edge, and a
//! half-unit lattice through the interior. Points on the bottom edge see
//! one-way cells; every other point ignores them, so an actor lands on top of
//! a one-way platform but passes through its sides and underside.

use std::ops::ControlFlow;

use crate::bitgrid::BitGrid;
use crate::grid::CollisionGrid;
use crate::math::{IRect, IVec2, Vec2};
use crate::terrain::{Clip, CollideMask};

/// Corner inset, keeps shared cell edges from registering as overlap.
pub const EPS: f64 = 1e-3;
const SPACING: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn unit(self) -> IVec2 {
        match self {
            Axis::X => IVec2::new(1, 0),
            Axis::Y => IVec2::new(0, 1),
        }
    }
}

impl CollisionGrid {
    pub fn move_x(&self, hitbox: IRect, amount: f64, clip: Clip) -> (i32, CollideMask) {
        self.move_axis(hitbox, amount, Axis::X, clip)
    }

    pub fn move_y(&self, hitbox: IRect, amount: f64, clip: Clip) -> (i32, CollideMask) {
        self.move_axis(hitbox, amount, Axis::Y, clip)
    }

    /// Moves `hitbox` by `amount` along `axis` one unit at a time, stopping at
    /// the first unit step that `clip` does not let through.
    ///
    /// Returns the distance actually moved and the blocking mask, or an empty
    /// mask if the whole move succeeded. `amount` is rounded to whole units;
    /// callers keep their own sub-unit remainder. When it rounds to zero,
    /// nothing moves and the result is every mask the hitbox currently
    /// overlaps, unfiltered by `clip`.
    pub fn move_axis(
        &self,
        hitbox: IRect,
        amount: f64,
        axis: Axis,
        clip: Clip,
    ) -> (i32, CollideMask) {
        let mut remaining = amount.round() as i32;
        if remaining == 0 {
            return (0, self.all_overlapping(hitbox));
        }
        let sign = remaining.signum();
        let step = axis.unit().scale(sign);

        let mut hitbox = hitbox;
        let mut actual = 0;
        while remaining != 0 {
            let next = hitbox.add(step);
            let mask = self.collides(next, clip);
            if mask.colliding(clip) {
                return (actual, mask);
            }
            hitbox = next;
            remaining -= sign;
            actual += sign;
        }
        (actual, CollideMask::empty())
    }

    /// Union of the masks of every sampled cell under `hitbox`, skipping cells
    /// `clip` passes through.
    pub fn collides(&self, hitbox: IRect, clip: Clip) -> CollideMask {
        let (x1, y1, x2, y2) = hitbox.to_rect().inset_corners(EPS);
        let mut result = CollideMask::empty();
        let _ = for_box_points(x1, y1, x2, y2, |x, y, bottom| {
            let cell = self.cell_at_world(x, y);
            let mask = cell.collide_mask();
            if !clip.clips(mask) && (bottom || !cell.is_one_way()) {
                result |= mask;
            }
            ControlFlow::Continue(())
        });
        result
    }

    /// Union of the masks of every cell the hitbox overlaps, one-way or not.
    pub fn all_overlapping(&self, hitbox: IRect) -> CollideMask {
        let (x1, y1, x2, y2) = hitbox.to_rect().inset_corners(EPS);
        let mut result = CollideMask::empty();
        let _ = for_box_points(x1, y1, x2, y2, |x, y, _| {
            result |= self.cell_at_world(x, y).collide_mask();
            ControlFlow::Continue(())
        });
        result
    }

    /// The pixel origin and mask of the cell containing `point`.
    pub fn cell_at(&self, point: Vec2) -> (Vec2, CollideMask) {
        let c = self.world_to_cell(point.x, point.y);
        let size = self.cell_size();
        let origin = IVec2::new(c.x * size, c.y * size).to_vec2();
        (origin, self.cell(c.x, c.y).collide_mask())
    }

    /// Union of the masks under every set bit of a pixel hit-mask.
    pub fn mask_overlapping<B: AsRef<[u8]>>(&self, mask: &BitGrid<B>) -> CollideMask {
        mask.set_points().fold(CollideMask::empty(), |acc, p| {
            acc | self.cell_at_world(p.x as f64 + 0.5, p.y as f64 + 0.5).collide_mask()
        })
    }
}

/// Visits `(x, y)` along a horizontal line at half-unit spacing, endpoints
/// included.
fn for_h_line(
    x1: f64,
    x2: f64,
    y: f64,
    mut f: impl FnMut(f64, f64) -> ControlFlow<()>,
) -> ControlFlow<()> {
    f(x1, y)?;
    let mut x = x1 + SPACING;
    while x < x2 {
        f(x, y)?;
        x += SPACING;
    }
    f(x2, y)
}

fn for_v_line(
    x: f64,
    y1: f64,
    y2: f64,
    mut f: impl FnMut(f64, f64) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
    f(x, y1)?;
    let mut y = y1 + SPACING;
    while y < y2 {
        f(x, y)?;
        y += SPACING;
    }
    f(x, y2)
}

/// Visits the sample points of the box `(x1, y1)..(x2, y2)`. The flag passed
/// to `f` marks points on the bottom edge.
fn for_box_points(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    mut f: impl FnMut(f64, f64, bool) -> ControlFlow<()>,
) -> ControlFlow<()> {
    f(x2, y2, true)?;
    f(x1, y2, true)?;
    f(x2, y1, false)?;
    f(x1, y1, false)?;

    for_v_line(x2, y1, y2, |x, y| f(x, y, false))?;
    for_v_line(x1, y1, y2, |x, y| f(x, y, false))?;
    for_h_line(x1, x2, y1, |x, y| f(x, y, false))?;
    for_h_line(x1, x2, y2, |x, y| f(x, y, true))?;

    let mut x = x1 + SPACING;
    while x < x2 {
        let mut y = y1 + SPACING;
        while y < y2 {
            f(x, y, false)?;
            y += SPACING;
        }
        x += SPACING;
    }
    ControlFlow::Continue(())
}
