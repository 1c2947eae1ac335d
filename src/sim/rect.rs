//! Axis-aligned rectangles and the overlap (MTV) resolver
//!
//! Every collision test in the simulation goes through [`Rect::intersects`]
//! followed by [`overlap`]. Objects are tested at their *swept* position
//! (position + velocity), i.e. where they will be after this tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box (top-left position + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Rectangle an object will occupy after moving by `vel`
    #[inline]
    pub fn swept(pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self::new(pos + vel, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(self.pos - Vec2::splat(margin), self.size + Vec2::splat(2.0 * margin))
    }

    /// Strict intersection test: rectangles that only share an edge do not intersect.
    ///
    /// Handles negative sizes by normalizing the extents first.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = self.extents();
        let (b_min, b_max) = other.extents();

        let inter_left = a_min.x.max(b_min.x);
        let inter_top = a_min.y.max(b_min.y);
        let inter_right = a_max.x.min(b_max.x);
        let inter_bottom = a_max.y.min(b_max.y);

        inter_left < inter_right && inter_top < inter_bottom
    }

    fn extents(&self) -> (Vec2, Vec2) {
        let far = self.pos + self.size;
        (self.pos.min(far), self.pos.max(far))
    }
}

/// Per-axis penetration depth between two rectangles.
///
/// Only meaningful once `a.intersects(&b)` has returned true; for disjoint
/// rectangles at least one component is non-positive.
#[inline]
pub fn overlap(a: &Rect, b: &Rect) -> Vec2 {
    Vec2::new(
        a.right().min(b.right()) - a.left().max(b.left()),
        a.bottom().min(b.bottom()) - a.top().max(b.top()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // Shares the x = 10 edge only
        assert!(!a.intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(a.intersects(&rect(9.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&rect(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_intersects_negative_size() {
        let a = rect(10.0, 10.0, -10.0, -10.0);
        assert!(a.intersects(&rect(5.0, 5.0, 2.0, 2.0)));
    }

    #[test]
    fn test_overlap_partial() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(9.0, 4.0, 10.0, 10.0);
        assert_eq!(overlap(&a, &b), Vec2::new(1.0, 6.0));
    }

    #[test]
    fn test_overlap_contained() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(10.0, 20.0, 5.0, 8.0);
        assert_eq!(overlap(&outer, &inner), Vec2::new(5.0, 8.0));
    }

    #[test]
    fn test_overlap_disjoint_has_non_positive_axis() {
        let o = overlap(&rect(0.0, 0.0, 10.0, 10.0), &rect(30.0, 0.0, 10.0, 10.0));
        assert!(o.x <= 0.0);
    }

    #[test]
    fn test_swept_and_expanded() {
        let r = Rect::swept(Vec2::new(1.0, 2.0), Vec2::new(3.0, -1.0), Vec2::new(4.0, 4.0));
        assert_eq!(r.pos, Vec2::new(4.0, 1.0));

        let field = rect(0.0, 0.0, 400.0, 200.0).expanded(50.0);
        assert_eq!(field.left(), -50.0);
        assert_eq!(field.bottom(), 250.0);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric_and_positive(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            aw in 1.0f32..50.0, ah in 1.0f32..50.0,
            fx in -0.99f32..0.99, fy in -0.99f32..0.99,
            bw in 1.0f32..50.0, bh in 1.0f32..50.0,
        ) {
            // Offset B by a fraction of the relevant extent so the two always overlap
            let bx = ax + if fx < 0.0 { fx * bw } else { fx * aw };
            let by = ay + if fy < 0.0 { fy * bh } else { fy * ah };
            let a = rect(ax, ay, aw, ah);
            let b = rect(bx, by, bw, bh);
            prop_assume!(a.intersects(&b));

            let ab = overlap(&a, &b);
            let ba = overlap(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!(ab.x > 0.0 && ab.y > 0.0);
            prop_assert!(ab.x <= aw.min(bw) + 1e-3);
            prop_assert!(ab.y <= ah.min(bh) + 1e-3);
        }
    }
}
