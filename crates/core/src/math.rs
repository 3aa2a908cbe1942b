use serde::{Deserialize, Serialize};

/// Integer 2D coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn scale(self, a: i32) -> Self {
        Self { x: self.x * a, y: self.y * a }
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2 { x: self.x as f64, y: self.y as f64 }
    }
}

impl std::ops::Add for IVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

/// Floating-point 2D coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn mag(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Integer width and height.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IDim {
    pub w: i32,
    pub h: i32,
}

impl IDim {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Integer-aligned rectangle; `(x, y)` is the upper-left corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_dim(pos: IVec2, dim: IDim) -> Self {
        Self { x: pos.x, y: pos.y, w: dim.w, h: dim.h }
    }

    #[inline]
    pub fn add(self, v: IVec2) -> Self {
        Self { x: self.x + v.x, y: self.y + v.y, ..self }
    }

    /// Y coordinate one past the bottom row.
    #[inline]
    pub fn max_y(self) -> i32 {
        self.y + self.h
    }

    pub fn to_rect(self) -> Rect {
        Rect { x: self.x as f64, y: self.y as f64, w: self.w as f64, h: self.h as f64 }
    }
}

/// Floating-point rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Shrinks the rectangle by `eps` on every side, returning `(x1, y1, x2, y2)`.
    #[inline]
    pub fn inset_corners(self, eps: f64) -> (f64, f64, f64, f64) {
        (self.x + eps, self.y + eps, self.x + self.w - eps, self.y + self.h - eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_add_keeps_size() {
        let r = IRect::new(3, 4, 16, 32).add(IVec2::new(-1, 2));
        assert_eq!(r, IRect::new(2, 6, 16, 32));
        assert_eq!(r.max_y(), 38);
    }

    #[test]
    fn mag_is_euclidean() {
        assert_eq!(Vec2::new(3.0, 4.0).mag(), 5.0);
        assert_eq!(IVec2::new(2, -3).scale(-2), IVec2::new(-4, 6));
    }
}
