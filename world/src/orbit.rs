//! Rings of projectiles kept at a fixed radius around the anchor.

use horde_survival_core::{ActorHandle, ActorKind, Vec2, PENETRATION_INFINITE};

use crate::{pool::ActorPool, projectile::Projectile};

/// Ring of infinite-penetration projectiles circling the anchor.
#[derive(Clone, Debug)]
pub(crate) struct OrbitRing {
    kind: ActorKind,
    /// Counter-clockwise rotation in degrees, kept within `[0, 360)`.
    angle: f32,
    children: Vec<ActorHandle>,
}

impl OrbitRing {
    pub(crate) fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            angle: 0.0,
            children: Vec::new(),
        }
    }

    pub(crate) fn children(&self) -> &[ActorHandle] {
        &self.children
    }

    /// Turns the ring clockwise.
    pub(crate) fn rotate(&mut self, degrees: f32) {
        self.angle = (self.angle - degrees).rem_euclid(360.0);
    }

    /// Lays out `count` children, reusing live ones and drawing the rest.
    ///
    /// Returns `false` when the ring's kind has no pool.
    pub(crate) fn arrange(
        &mut self,
        pool: &mut ActorPool<Projectile>,
        count: usize,
        damage: f32,
        radius: f32,
    ) -> bool {
        if !pool.is_registered(self.kind) {
            return false;
        }

        for stale in self.children.iter().skip(count) {
            let _ = pool.release(*stale);
        }
        self.children.truncate(count);

        for index in 0..count {
            let reusable = self
                .children
                .get(index)
                .filter(|handle| pool.resolve(**handle).is_some())
                .copied();
            let handle = match reusable {
                Some(handle) => handle,
                None => match pool.get(self.kind) {
                    Some((handle, _)) => handle,
                    None => return false,
                },
            };

            if let Some(child) = pool.resolve_mut(handle) {
                child.init(
                    damage,
                    PENETRATION_INFINITE,
                    Vec2::ZERO,
                    0.0,
                    child.position,
                    radius,
                );
            }

            if index < self.children.len() {
                self.children[index] = handle;
            } else {
                self.children.push(handle);
            }
        }

        true
    }

    /// Moves every child to its slot around `center`.
    pub(crate) fn place(&self, pool: &mut ActorPool<Projectile>, center: Vec2, radius: f32) {
        let count = self.children.len();
        for (index, handle) in self.children.iter().enumerate() {
            if let Some(child) = pool.resolve_mut(*handle) {
                child.position = center + slot_offset(self.angle, index, count, radius);
            }
        }
    }
}

/// Offset of child `index` of `count` from the ring centre.
///
/// Child zero starts straight up; the rest follow counter-clockwise at equal
/// spacing.
pub(crate) fn slot_offset(ring_angle: f32, index: usize, count: usize, radius: f32) -> Vec2 {
    if count == 0 {
        return Vec2::ZERO;
    }
    let local = 360.0 * index as f32 / count as f32;
    let theta = (ring_angle + local).to_radians();
    Vec2::new(-theta.sin(), theta.cos()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: ActorKind = ActorKind::new(2);

    fn pool() -> ActorPool<Projectile> {
        let mut pool = ActorPool::new();
        assert!(pool.register(RING));
        pool
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn children_are_spaced_evenly_from_the_top() {
        assert!(close(slot_offset(0.0, 0, 4, 1.5), Vec2::new(0.0, 1.5)));
        assert!(close(slot_offset(0.0, 1, 4, 1.5), Vec2::new(-1.5, 0.0)));
        assert!(close(slot_offset(0.0, 2, 4, 1.5), Vec2::new(0.0, -1.5)));
        assert!(close(slot_offset(0.0, 3, 4, 1.5), Vec2::new(1.5, 0.0)));
    }

    #[test]
    fn rotation_turns_clockwise() {
        let mut ring = OrbitRing::new(RING);
        ring.rotate(90.0);
        assert!(close(slot_offset(ring.angle, 0, 1, 1.0), Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn growth_reuses_existing_children() {
        let mut pool = pool();
        let mut ring = OrbitRing::new(RING);
        assert!(ring.arrange(&mut pool, 3, 3.0, 0.4));
        let before = ring.children().to_vec();

        assert!(ring.arrange(&mut pool, 5, 4.0, 0.4));
        assert_eq!(&ring.children()[..3], &before[..]);
        assert_eq!(pool.slot_count(RING), 5, "only the two new children are drawn");

        for handle in ring.children() {
            let child = pool.resolve(*handle).expect("child active");
            assert!(child.is_infinite());
            assert_eq!(child.damage(), 4.0);
        }
    }

    #[test]
    fn unregistered_kind_is_refused() {
        let mut pool = pool();
        let mut ring = OrbitRing::new(ActorKind::new(9));
        assert!(!ring.arrange(&mut pool, 2, 1.0, 0.4));
        assert!(ring.children().is_empty());
    }
}
