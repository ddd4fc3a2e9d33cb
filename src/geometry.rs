//! Shared AABB geometry: the `Aabb` type, floored cell-coordinate mapping,
//! and the rectangle intersection predicate.

use mint::Point2;

/// A small epsilon subtracted from the far edge of a nonzero extent so that
/// an AABB whose edge lands exactly on a cell boundary does not spuriously
/// claim the next cell. Applied consistently by add/update/remove/query.
const EPSILON: f32 = 1e-4;

/// An axis-aligned bounding box: `x, y` are the world-space top-left corner,
/// `w, h >= 0` are the extents. A zero-width or zero-height box is a point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Top-left world-space x coordinate.
    pub x: f32,
    /// Top-left world-space y coordinate.
    pub y: f32,
    /// Width; must be non-negative.
    pub w: f32,
    /// Height; must be non-negative.
    pub h: f32,
}

impl Aabb {
    /// Builds an AABB from its top-left corner and extent.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// `true` if every field is finite and the extents are non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w >= 0.0
            && self.h >= 0.0
    }

    /// Lower-left (top-left) corner.
    pub fn ll(&self) -> Point2<f32> {
        Point2 {
            x: self.x,
            y: self.y,
        }
    }

    /// Upper-right (bottom-right) corner.
    pub fn ur(&self) -> Point2<f32> {
        Point2 {
            x: self.x + self.w,
            y: self.y + self.h,
        }
    }

    /// Standard AABB-AABB overlap test via half-extent projection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let ax0 = self.x;
        let ax1 = self.x + self.w;
        let ay0 = self.y;
        let ay1 = self.y + self.h;

        let bx0 = other.x;
        let bx1 = other.x + other.w;
        let by0 = other.y;
        let by1 = other.y + other.h;

        let x = f32::abs((ax0 + ax1) - (bx0 + bx1)) <= (ax1 - ax0 + bx1 - bx0);
        let y = f32::abs((ay0 + ay1) - (by0 + by1)) <= (ay1 - ay0 + by1 - by0);

        x && y
    }
}

/// An inclusive rectangle of grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Minimum cell x coordinate (inclusive).
    pub gx0: i32,
    /// Minimum cell y coordinate (inclusive).
    pub gy0: i32,
    /// Maximum cell x coordinate (inclusive).
    pub gx1: i32,
    /// Maximum cell y coordinate (inclusive).
    pub gy1: i32,
}

impl CellRect {
    /// A rectangle covering exactly one cell.
    pub fn single(gx: i32, gy: i32) -> Self {
        Self {
            gx0: gx,
            gy0: gy,
            gx1: gx,
            gy1: gy,
        }
    }

    /// `true` if this is a single-cell rectangle (`gx0 == gx1 && gy0 == gy1`).
    pub fn is_single_cell(&self) -> bool {
        self.gx0 == self.gx1 && self.gy0 == self.gy1
    }

    /// `true` if the two inclusive cell rectangles share at least one cell.
    pub fn intersects(&self, other: &CellRect) -> bool {
        self.gx0 <= other.gx1
            && other.gx0 <= self.gx1
            && self.gy0 <= other.gy1
            && other.gy0 <= self.gy1
    }

    /// Row-major iteration over every `(gx, gy)` this rectangle covers.
    /// Iteration order is not part of the public contract but is fixed here
    /// for deterministic tests.
    pub fn iter(&self) -> CellRectIter {
        CellRectIter {
            rect: *self,
            gx: self.gx0,
            gy: self.gy0,
            done: self.gx0 > self.gx1 || self.gy0 > self.gy1,
        }
    }
}

/// Iterator over the cells of a [`CellRect`], row-major.
pub struct CellRectIter {
    rect: CellRect,
    gx: i32,
    gy: i32,
    done: bool,
}

impl Iterator for CellRectIter {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = (self.gx, self.gy);

        if self.gx == self.rect.gx1 {
            if self.gy == self.rect.gy1 {
                self.done = true;
            } else {
                self.gx = self.rect.gx0;
                self.gy += 1;
            }
        } else {
            self.gx += 1;
        }

        Some(item)
    }
}

/// Floored division, consistent across the zero boundary for negative
/// coordinates.
#[inline]
fn floor_div(coord: f32, cell_size: i32) -> i32 {
    (coord / cell_size as f32).floor() as i32
}

/// The minimal inclusive cell rectangle covering `aabb`'s closed extent, for
/// a grid of the given `cell_size`. Used identically by add, update, remove,
/// and query so that removal always sees the same cell rectangle add used.
pub fn cell_rect(aabb: &Aabb, cell_size: i32) -> CellRect {
    let gx0 = floor_div(aabb.x, cell_size);
    let gy0 = floor_div(aabb.y, cell_size);

    let gx1 = if aabb.w > 0.0 {
        floor_div(aabb.x + aabb.w - EPSILON, cell_size).max(gx0)
    } else {
        gx0
    };
    let gy1 = if aabb.h > 0.0 {
        floor_div(aabb.y + aabb.h - EPSILON, cell_size).max(gy0)
    } else {
        gy0
    };

    CellRect { gx0, gy0, gx1, gy1 }
}
