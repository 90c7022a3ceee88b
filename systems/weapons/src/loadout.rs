//! Upgrade items, level-up offers and the equipment they produce.

use std::time::Duration;

use horde_survival_core::{Command, ItemKind, ItemSpec, StatSource, Vec2, WeaponId, WeaponTuning};
use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    gear::{Gear, GearKind},
    weapon::{Weapon, WeaponSpec},
};

/// Number of items offered on every level-up.
pub const OFFER_SIZE: usize = 3;

/// Outcome of selecting an upgrade item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upgrade {
    /// The item's weapon or gear was created.
    Equipped,
    /// The item's weapon or gear gained a level.
    Improved,
    /// The anchor's health should be restored.
    Healed,
    /// The item is exhausted, unknown or misconfigured; nothing changed.
    Ignored,
}

#[derive(Clone, Debug)]
struct ItemSlot {
    spec: ItemSpec,
    level: usize,
    equipped: Option<Equipped>,
}

#[derive(Clone, Copy, Debug)]
enum Equipped {
    Weapon(usize),
    Gear(usize),
}

impl ItemSlot {
    fn is_maxed(&self) -> bool {
        self.spec.kind != ItemKind::Heal && self.level >= self.spec.max_level()
    }
}

/// Upgrade items together with the weapons and gear they produced.
///
/// Gear is refreshed explicitly after every weapon change, so derived stats
/// never lag behind a level-up.
#[derive(Debug)]
pub struct Loadout {
    items: Vec<ItemSlot>,
    weapons: Vec<Weapon>,
    gear: Vec<Gear>,
    tuning: WeaponTuning,
    anchor_base_speed: f32,
    next_weapon: u32,
    rng: ChaCha8Rng,
    offer: Vec<usize>,
}

impl Loadout {
    /// Creates an empty loadout offering the provided items.
    #[must_use]
    pub fn new(
        items: Vec<ItemSpec>,
        tuning: WeaponTuning,
        anchor_base_speed: f32,
        rng_seed: u64,
    ) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|spec| ItemSlot {
                    spec,
                    level: 0,
                    equipped: None,
                })
                .collect(),
            weapons: Vec::new(),
            gear: Vec::new(),
            tuning,
            anchor_base_speed,
            next_weapon: 0,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            offer: Vec::with_capacity(OFFER_SIZE),
        }
    }

    /// Equipped weapons in creation order.
    #[must_use]
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// Equipped gear in creation order.
    #[must_use]
    pub fn gear(&self) -> &[Gear] {
        &self.gear
    }

    /// Number of configured items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Times the item was selected, ignoring heals.
    #[must_use]
    pub fn item_level(&self, index: usize) -> Option<usize> {
        self.items.get(index).map(|slot| slot.level)
    }

    /// Reports whether the item can no longer be improved.
    #[must_use]
    pub fn is_maxed(&self, index: usize) -> bool {
        self.items.get(index).map_or(true, ItemSlot::is_maxed)
    }

    /// Items currently on offer.
    #[must_use]
    pub fn offer(&self) -> &[usize] {
        &self.offer
    }

    /// Draws a fresh offer of distinct items.
    ///
    /// Exhausted items are replaced by the first healing item, so the offer
    /// may repeat it.
    pub fn roll_offer(&mut self) -> &[usize] {
        self.offer.clear();
        let amount = OFFER_SIZE.min(self.items.len());
        let heal = self
            .items
            .iter()
            .position(|slot| slot.spec.kind == ItemKind::Heal);

        for candidate in index::sample(&mut self.rng, self.items.len(), amount) {
            let maxed = self.items.get(candidate).map_or(true, ItemSlot::is_maxed);
            match (maxed, heal) {
                (false, _) => self.offer.push(candidate),
                (true, Some(heal)) => self.offer.push(heal),
                (true, None) => {}
            }
        }
        &self.offer
    }

    /// Applies the item at `index`.
    pub fn select(
        &mut self,
        index: usize,
        stats: &dyn StatSource,
        out: &mut Vec<Command>,
    ) -> Upgrade {
        let Some(slot) = self.items.get(index) else {
            return Upgrade::Ignored;
        };
        if slot.is_maxed() {
            return Upgrade::Ignored;
        }

        let spec = slot.spec.clone();
        let level = slot.level;
        let equipped = slot.equipped;

        let upgrade = match (spec.kind, equipped) {
            (ItemKind::Heal, _) => return Upgrade::Healed,
            (ItemKind::Melee | ItemKind::Range, None) => {
                let Some(projectile) = spec.projectile else {
                    return Upgrade::Ignored;
                };
                let id = WeaponId::new(self.next_weapon);
                self.next_weapon += 1;
                let weapon = Weapon::init(
                    id,
                    WeaponSpec {
                        kind: spec.item_id,
                        projectile,
                        base_damage: spec.base_damage,
                        base_count: spec.base_count,
                    },
                    &self.tuning,
                    stats,
                    out,
                );
                self.weapons.push(weapon);
                self.set_equipped(index, Equipped::Weapon(self.weapons.len() - 1));
                Upgrade::Equipped
            }
            (ItemKind::Melee | ItemKind::Range, Some(Equipped::Weapon(weapon))) => {
                let ratio = spec.damages.get(level).copied().unwrap_or_default();
                let added = spec.counts.get(level).copied().unwrap_or_default();
                let Some(weapon) = self.weapons.get_mut(weapon) else {
                    return Upgrade::Ignored;
                };
                weapon.level_up(spec.base_damage + spec.base_damage * ratio, added, stats, out);
                Upgrade::Improved
            }
            (ItemKind::Glove | ItemKind::Shoe, None) => {
                let kind = if spec.kind == ItemKind::Glove {
                    GearKind::Glove
                } else {
                    GearKind::Shoe
                };
                let rate = spec.damages.first().copied().unwrap_or_default();
                self.gear.push(Gear::new(kind, rate));
                self.set_equipped(index, Equipped::Gear(self.gear.len() - 1));
                Upgrade::Equipped
            }
            (ItemKind::Glove | ItemKind::Shoe, Some(Equipped::Gear(gear))) => {
                let rate = spec.damages.get(level).copied().unwrap_or_default();
                let Some(gear) = self.gear.get_mut(gear) else {
                    return Upgrade::Ignored;
                };
                gear.level_up(rate);
                Upgrade::Improved
            }
            _ => return Upgrade::Ignored,
        };

        if let Some(slot) = self.items.get_mut(index) {
            slot.level += 1;
        }
        self.refresh_gear(stats, out);
        upgrade
    }

    /// Advances every weapon by `dt`.
    pub fn update(
        &mut self,
        dt: Duration,
        origin: Vec2,
        target: Option<Vec2>,
        out: &mut Vec<Command>,
    ) {
        for weapon in &mut self.weapons {
            weapon.update(dt, origin, target, out);
        }
    }

    /// Lets every gear recompute the stats it owns.
    pub fn refresh_gear(&mut self, stats: &dyn StatSource, out: &mut Vec<Command>) {
        for gear in &self.gear {
            gear.apply(
                &mut self.weapons,
                &self.tuning,
                self.anchor_base_speed,
                stats,
                out,
            );
        }
    }

    fn set_equipped(&mut self, index: usize, equipped: Equipped) {
        if let Some(slot) = self.items.get_mut(index) {
            slot.equipped = Some(equipped);
        }
    }
}
