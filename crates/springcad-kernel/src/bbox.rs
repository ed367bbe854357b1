//! Axis-aligned bounding boxes.

use springcad_math::{Point3, Vec3};

/// Bounds of a mesh or cutter, aligned with the world axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Box spanning `min` to `max`.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any included point replaces.
    pub fn empty() -> Self {
        Self {
            min: Point3::from(Vec3::repeat(f64::INFINITY)),
            max: Point3::from(Vec3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// True when no point has been included.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Grow to contain `p`.
    pub fn include_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        if other.is_empty() {
            return *self;
        }
        Aabb3::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Closed-interval overlap on all three axes; touching boxes overlap.
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// True when this box's XY footprint covers `other`'s.
    pub fn covers_footprint(&self, other: &Aabb3) -> bool {
        (0..2).all(|i| self.min[i] <= other.min[i] && self.max[i] >= other.max[i])
    }

    /// Edge lengths along x, y and z.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching() {
        let a = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb3::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let c = Aabb3::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Aabb3::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(a.union(&Aabb3::empty()), a);
        assert!(Aabb3::empty().is_empty());
        assert_eq!(Aabb3::empty().union(&a), a);
    }

    #[test]
    fn test_covers_footprint() {
        let wide = Aabb3::new(Point3::new(-5.0, -5.0, 0.0), Point3::new(5.0, 5.0, 1.0));
        let narrow = Aabb3::new(Point3::new(-4.0, -4.0, -3.0), Point3::new(4.0, 4.0, 9.0));
        assert!(wide.covers_footprint(&narrow));
        assert!(!narrow.covers_footprint(&wide));
    }
}
