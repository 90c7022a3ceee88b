//! Arena of reusable actors grouped by kind.
//!
//! Slots are never removed. A released slot keeps its payload until the next
//! `get` for its kind reactivates it, at which point its generation advances so
//! handles issued for the previous occupant stop resolving.

use std::collections::BTreeMap;

use horde_survival_core::{ActorHandle, ActorKind};

#[derive(Debug)]
struct Slot<T> {
    active: bool,
    generation: u32,
    actor: T,
}

impl<T> Slot<T> {
    fn handle(&self, kind: ActorKind, index: usize) -> Option<ActorHandle> {
        let index = u32::try_from(index).ok()?;
        Some(ActorHandle::new(kind, index, self.generation))
    }
}

/// Reusable actor storage keyed by kind.
#[derive(Debug)]
pub struct ActorPool<T> {
    pools: BTreeMap<ActorKind, Vec<Slot<T>>>,
}

impl<T> Default for ActorPool<T> {
    fn default() -> Self {
        Self {
            pools: BTreeMap::new(),
        }
    }
}

impl<T: Default> ActorPool<T> {
    /// Draws an actor of the provided kind.
    ///
    /// The first inactive slot in insertion order is reactivated; when every
    /// slot is busy a default actor is appended. Reactivated actors keep the
    /// payload of their previous occupant, so callers initialise them before
    /// use. Returns `None` only for kinds that were never registered.
    pub fn get(&mut self, kind: ActorKind) -> Option<(ActorHandle, &mut T)> {
        let slots = self.pools.get_mut(&kind)?;
        let index = match slots.iter().position(|slot| !slot.active) {
            Some(index) => {
                let slot = slots.get_mut(index)?;
                slot.active = true;
                slot.generation = slot.generation.wrapping_add(1);
                index
            }
            None => {
                slots.push(Slot {
                    active: true,
                    generation: 0,
                    actor: T::default(),
                });
                slots.len() - 1
            }
        };

        let slot = slots.get_mut(index)?;
        let handle = slot.handle(kind, index)?;
        Some((handle, &mut slot.actor))
    }
}

impl<T> ActorPool<T> {
    /// Creates an empty pool without any registered kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind, returning `false` when it already had a pool.
    pub fn register(&mut self, kind: ActorKind) -> bool {
        if self.pools.contains_key(&kind) {
            return false;
        }
        let _ = self.pools.insert(kind, Vec::new());
        true
    }

    /// Reports whether a pool exists for the provided kind.
    #[must_use]
    pub fn is_registered(&self, kind: ActorKind) -> bool {
        self.pools.contains_key(&kind)
    }

    /// Deactivates the actor referenced by the handle.
    ///
    /// Returns `false` when the handle is stale or already released.
    pub fn release(&mut self, handle: ActorHandle) -> bool {
        match self.slot_mut(handle) {
            Some(slot) if slot.active && slot.generation == handle.generation() => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    /// Resolves a handle to its active actor.
    #[must_use]
    pub fn resolve(&self, handle: ActorHandle) -> Option<&T> {
        self.pools
            .get(&handle.kind())
            .and_then(|slots| slots.get(handle.slot() as usize))
            .filter(|slot| slot.active && slot.generation == handle.generation())
            .map(|slot| &slot.actor)
    }

    /// Resolves a handle to its active actor for mutation.
    pub fn resolve_mut(&mut self, handle: ActorHandle) -> Option<&mut T> {
        self.slot_mut(handle)
            .filter(|slot| slot.active && slot.generation == handle.generation())
            .map(|slot| &mut slot.actor)
    }

    /// Returns whatever active actor currently occupies the handle's slot,
    /// together with a handle carrying the slot's current generation.
    ///
    /// Unlike [`ActorPool::resolve_mut`] this ignores the handle's generation.
    pub fn occupant_mut(&mut self, handle: ActorHandle) -> Option<(ActorHandle, &mut T)> {
        let slot = self.slot_mut(handle).filter(|slot| slot.active)?;
        let current = ActorHandle::new(handle.kind(), handle.slot(), slot.generation);
        Some((current, &mut slot.actor))
    }

    /// Number of slots ever created for the kind, active or not.
    #[must_use]
    pub fn slot_count(&self, kind: ActorKind) -> usize {
        self.pools.get(&kind).map_or(0, Vec::len)
    }

    /// Number of active slots for the kind.
    #[must_use]
    pub fn active_count(&self, kind: ActorKind) -> usize {
        self.pools
            .get(&kind)
            .map_or(0, |slots| slots.iter().filter(|slot| slot.active).count())
    }

    /// Registered kinds in ascending order.
    pub fn kinds(&self) -> impl Iterator<Item = ActorKind> + '_ {
        self.pools.keys().copied()
    }

    /// Iterates active actors by ascending kind, then by insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorHandle, &T)> {
        self.pools.iter().flat_map(|(&kind, slots)| {
            slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.active)
                .filter_map(move |(index, slot)| Some((slot.handle(kind, index)?, &slot.actor)))
        })
    }

    /// Iterates active actors for mutation in the same order as [`ActorPool::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ActorHandle, &mut T)> {
        self.pools.iter_mut().flat_map(|(&kind, slots)| {
            slots
                .iter_mut()
                .enumerate()
                .filter(|(_, slot)| slot.active)
                .filter_map(move |(index, slot)| {
                    let handle = slot.handle(kind, index)?;
                    Some((handle, &mut slot.actor))
                })
        })
    }

    /// Appends the handles of every active actor to `out`, in iteration order.
    pub fn collect_handles(&self, out: &mut Vec<ActorHandle>) {
        out.extend(self.iter().map(|(handle, _)| handle));
    }

    fn slot_mut(&mut self, handle: ActorHandle) -> Option<&mut Slot<T>> {
        self.pools
            .get_mut(&handle.kind())
            .and_then(|slots| slots.get_mut(handle.slot() as usize))
    }
}
