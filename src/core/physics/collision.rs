//! Circle overlap tests and equal-mass elastic responses

use super::Vec2;

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first circle to the second
    pub normal: Vec2,
    /// Penetration depth, always positive
    pub overlap: f64,
}

/// Test two circles for overlap
///
/// Coincident centres get an arbitrary but finite normal (+x) so the
/// response never produces NaN.
#[must_use]
pub fn circle_contact(a: Vec2, ra: f64, b: Vec2, rb: f64) -> Option<Contact> {
    let delta = b - a;
    let reach = ra + rb;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > f64::EPSILON {
        delta / dist
    } else {
        Vec2::new(1.0, 0.0)
    };
    Some(Contact {
        normal,
        overlap: reach - dist,
    })
}

/// Elastic collision between equal masses: exchange the normal components
///
/// Bodies already separating are left alone. Returns whether velocities changed.
pub fn resolve_elastic(va: &mut Vec2, vb: &mut Vec2, normal: Vec2) -> bool {
    let closing = (*va - *vb).dot(normal);
    if closing <= 0.0 {
        return false;
    }
    *va -= normal * closing;
    *vb += normal * closing;
    true
}

/// Reflect a body's velocity off an immovable circle
///
/// `normal` points from the obstacle toward the body.
pub fn bounce_off_static(vel: &mut Vec2, normal: Vec2) -> bool {
    let approach = vel.dot(normal);
    if approach >= 0.0 {
        return false;
    }
    *vel -= normal * (2.0 * approach);
    true
}

/// Mutable references to two distinct elements, `i < j`
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_detection() {
        assert!(circle_contact(Vec2::ZERO, 1.0, Vec2::new(3.0, 0.0), 1.0).is_none());
        let c = circle_contact(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0).unwrap();
        assert!((c.overlap - 0.5).abs() < 1e-12);
        assert!((c.normal.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_centres_get_finite_normal() {
        let c = circle_contact(Vec2::new(2.0, 2.0), 1.0, Vec2::new(2.0, 2.0), 1.0).unwrap();
        assert!(c.normal.is_finite());
        assert!((c.overlap - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_head_on_swap_conserves_energy() {
        let mut a = Vec2::new(2.0, 0.5);
        let mut b = Vec2::new(-1.0, 0.0);
        let before = a.length_squared() + b.length_squared();
        assert!(resolve_elastic(&mut a, &mut b, Vec2::new(1.0, 0.0)));
        assert!((a.x + 1.0).abs() < 1e-12);
        assert!((b.x - 2.0).abs() < 1e-12);
        assert!((a.y - 0.5).abs() < 1e-12);
        let after = a.length_squared() + b.length_squared();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_separating_bodies_untouched() {
        let mut a = Vec2::new(-1.0, 0.0);
        let mut b = Vec2::new(1.0, 0.0);
        assert!(!resolve_elastic(&mut a, &mut b, Vec2::new(1.0, 0.0)));
        assert_eq!(a, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_bounce_off_static() {
        let mut v = Vec2::new(-2.0, 1.0);
        assert!(bounce_off_static(&mut v, Vec2::new(1.0, 0.0)));
        assert_eq!(v, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_pair_mut() {
        let mut items = [1, 2, 3];
        let (a, b) = pair_mut(&mut items, 0, 2);
        std::mem::swap(a, b);
        assert_eq!(items, [3, 2, 1]);
    }
}
