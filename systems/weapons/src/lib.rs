#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weapons, gear and the upgrade items that produce them.
//!
//! Weapons read the nearest scanned target and answer with fire or orbit
//! commands; the loadout turns level-up selections into new weapons, weapon
//! level-ups, gear and heals.

mod gear;
mod loadout;
mod weapon;

pub use gear::{Gear, GearKind};
pub use loadout::{Loadout, Upgrade, OFFER_SIZE};
pub use weapon::{Cadence, Weapon, WeaponSpec};
