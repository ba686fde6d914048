// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector and ball primitives shared by the tree.

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use glam::{DVec2, DVec3};

/// The vector operations the tree needs, abstracted over dimension.
///
/// Implemented for [`glam::DVec2`] and [`glam::DVec3`]. The tree only
/// consumes the small set below; everything else (normalisation, component
/// access, dot products) comes from glam itself.
pub trait Vector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
{
    /// The zero vector.
    const ZERO: Self;

    /// Euclidean distance to `other`.
    fn distance(self, other: Self) -> f64;

    /// Euclidean length.
    fn length(self) -> f64;
}

impl Vector for DVec2 {
    const ZERO: Self = DVec2::ZERO;

    #[inline]
    fn distance(self, other: Self) -> f64 {
        DVec2::distance(self, other)
    }

    #[inline]
    fn length(self) -> f64 {
        DVec2::length(self)
    }
}

impl Vector for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    #[inline]
    fn distance(self, other: Self) -> f64 {
        DVec3::distance(self, other)
    }

    #[inline]
    fn length(self) -> f64 {
        DVec3::length(self)
    }
}

/// A closed region of space: a center point and a non-negative radius.
///
/// In 2-D this is a disc, in 3-D a solid sphere; the tree treats both
/// uniformly through the [`Vector`] parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ball<V> {
    /// Center point.
    pub center: V,
    /// Radius. Non-negative, and finite for everything but the tree root.
    pub radius: f64,
}

/// A 2-D ball (disc).
pub type Ball2 = Ball<DVec2>;
/// A 3-D ball (sphere).
pub type Ball3 = Ball<DVec3>;

impl<V: Vector> Ball<V> {
    /// Create a ball from its center and radius.
    pub const fn new(center: V, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True if `other` lies entirely inside `self`. The comparison is
    /// closed: a ball exactly on the boundary is contained.
    pub fn contains_ball(&self, other: &Self) -> bool {
        self.center.distance(other.center) + other.radius <= self.radius
    }

    /// True if the two balls overlap. The comparison is strict: balls that
    /// merely touch do not intersect.
    pub fn intersects_ball(&self, other: &Self) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// This ball with `amount` added to its radius.
    #[must_use]
    pub fn grown(self, amount: f64) -> Self {
        Self {
            center: self.center,
            radius: self.radius + amount,
        }
    }
}
