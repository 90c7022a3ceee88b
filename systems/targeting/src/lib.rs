#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that finds the hostile actor nearest to the anchor.

use horde_survival_core::{ActorHandle, EnemyPhase, EnemySnapshot, EnemyView, Vec2};

/// Candidate gathered during a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanTarget {
    /// Weak reference to the detected actor.
    pub handle: ActorHandle,
    /// Position of the actor when it was scanned.
    pub position: Vec2,
    /// Euclidean distance from the scan origin.
    pub distance: f32,
}

/// Proximity scanner that reuses its candidate buffer between ticks.
#[derive(Debug, Default)]
pub struct ProximityScanner {
    radius: f32,
    candidates: Vec<ScanTarget>,
    nearest: Option<ScanTarget>,
}

impl ProximityScanner {
    /// Creates a scanner querying a circle of the provided radius.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Radius of the circular query.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Recomputes the nearest alive actor around `origin`.
    pub fn handle(&mut self, origin: Vec2, enemies: &EnemyView) -> Option<ScanTarget> {
        self.scan(origin, enemies, |_| true)
    }

    /// Recomputes the nearest alive actor around `origin` accepted by `filter`.
    ///
    /// Candidates are gathered in the view's discovery order and nothing is
    /// carried over from previous scans.
    pub fn scan<F>(&mut self, origin: Vec2, enemies: &EnemyView, mut filter: F) -> Option<ScanTarget>
    where
        F: FnMut(&EnemySnapshot) -> bool,
    {
        self.candidates.clear();
        for snapshot in enemies.iter() {
            if snapshot.phase == EnemyPhase::Dead || !filter(snapshot) {
                continue;
            }
            let distance = origin.distance(snapshot.position);
            if distance > self.radius {
                continue;
            }
            self.candidates.push(ScanTarget {
                handle: snapshot.handle,
                position: snapshot.position,
                distance,
            });
        }

        self.nearest = nearest_index(self.candidates.iter().map(|candidate| candidate.distance))
            .and_then(|index| self.candidates.get(index).copied());
        self.nearest
    }

    /// Result of the most recent scan.
    #[must_use]
    pub fn nearest(&self) -> Option<ScanTarget> {
        self.nearest
    }

    /// Candidates gathered by the most recent scan, in discovery order.
    #[must_use]
    pub fn candidates(&self) -> &[ScanTarget] {
        &self.candidates
    }
}

/// Index of the smallest distance; ties keep the earliest entry.
#[must_use]
pub fn nearest_index<I>(distances: I) -> Option<usize>
where
    I: IntoIterator<Item = f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, distance) in distances.into_iter().enumerate() {
        match best {
            Some((_, shortest)) if distance >= shortest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}
