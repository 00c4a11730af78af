// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

use crate::error::PartitionError;

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point. Edges are inclusive.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB (both corners contained).
    pub fn contains_rect(&self, other: &Self) -> bool {
        self.contains_point(other.min_x, other.min_y) && self.contains_point(other.max_x, other.max_y)
    }

    /// Whether the two AABBs share at least one point. Touching edges overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// The coordinate this AABB contributes along a splitting axis.
    #[inline]
    pub fn edge(&self, axis: Axis) -> T {
        match axis {
            Axis::XMin => self.min_x,
            Axis::YMin => self.min_y,
            Axis::XMax => self.max_x,
            Axis::YMax => self.max_y,
        }
    }
}

impl Aabb2D<f32> {
    /// Create an AABB from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Aabb2D<f64> {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl From<Aabb2D<f64>> for kurbo::Rect {
    fn from(a: Aabb2D<f64>) -> Self {
        Self::new(a.min_x, a.min_y, a.max_x, a.max_y)
    }
}

#[cfg(feature = "kurbo")]
impl Aabb2D<f64> {
    /// Whether this AABB contains a Kurbo point. Edges are inclusive.
    pub fn contains_kurbo_point(&self, p: kurbo::Point) -> bool {
        self.contains_point(p.x, p.y)
    }
}

/// Splitting dimension of a KD-tree level.
///
/// Elements are rectangles, so a level splits on one of the four rectangle edges
/// rather than on a point coordinate. Depth cycles through the variants in
/// declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// Left edge.
    XMin = 0,
    /// Top edge.
    YMin = 1,
    /// Right edge.
    XMax = 2,
    /// Bottom edge.
    YMax = 3,
}

impl Axis {
    /// Axis used by the root of a freshly built tree.
    pub const FIRST: Self = Self::XMin;

    /// The axis used one level deeper.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::XMin => Self::YMin,
            Self::YMin => Self::XMax,
            Self::XMax => Self::YMax,
            Self::YMax => Self::XMin,
        }
    }

    /// The other edge along the same dimension.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::XMin => Self::XMax,
            Self::YMin => Self::YMax,
            Self::XMax => Self::XMin,
            Self::YMax => Self::YMin,
        }
    }

    /// True for `XMin` and `YMin`.
    #[inline]
    pub const fn is_min(self) -> bool {
        matches!(self, Self::XMin | Self::YMin)
    }

    /// True for `XMin` and `XMax`.
    #[inline]
    pub const fn is_x(self) -> bool {
        matches!(self, Self::XMin | Self::XMax)
    }
}

impl TryFrom<u8> for Axis {
    type Error = PartitionError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::XMin),
            1 => Ok(Self::YMin),
            2 => Ok(Self::XMax),
            3 => Ok(Self::YMax),
            other => Err(PartitionError::InvalidAxis(other)),
        }
    }
}

/// A key paired with the bounding box it should be partitioned under.
///
/// This is the unit of input to
/// [`add_or_update_elements`](crate::BoundingBoxPartitioning::add_or_update_elements).
/// Geometry is never changed in place; submit a new element to move a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundingBoxElement<K, T> {
    key: K,
    bounding_box: Aabb2D<T>,
}

impl<K, T> BoundingBoxElement<K, T> {
    /// Pair `key` with `bounding_box`.
    pub const fn new(key: K, bounding_box: Aabb2D<T>) -> Self {
        Self { key, bounding_box }
    }

    /// The element key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The element's bounding box.
    pub const fn bounding_box(&self) -> &Aabb2D<T> {
        &self.bounding_box
    }
}

impl<K: Copy, T: Copy> From<(K, Aabb2D<T>)> for BoundingBoxElement<K, T> {
    fn from((key, bounding_box): (K, Aabb2D<T>)) -> Self {
        Self::new(key, bounding_box)
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
