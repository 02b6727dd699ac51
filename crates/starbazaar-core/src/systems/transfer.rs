//! Atomic cargo and currency transfers between entities.
//!
//! Both transfer kinds resolve the movable amount from read-only
//! snapshots *before* mutating anything, so a transfer either moves the
//! resolved amount in full or moves nothing. In particular a cargo move
//! is capped by the destination's free space up front, so units are never
//! removed from the source only to be clipped away by a full target.

use hecs::{Entity, World};

use crate::components::{Market, Storage, Wallet};

/// Move `amount` units of `item` between two storages at the same
/// location. `amount = 0` means "all held". Returns the amount moved
/// (0 on location mismatch, missing entities, or nothing to move).
pub fn transfer_cargo(
    world: &mut World,
    src: Entity,
    dst: Entity,
    item: &str,
    amount: u32,
) -> u32 {
    if src == dst {
        return 0;
    }
    let (src_location, held) = match world.get::<&Storage>(src) {
        Ok(s) => (s.location, s.amount_of(item)),
        Err(_) => return 0,
    };
    let (dst_location, free) = match world.get::<&Storage>(dst) {
        Ok(d) => (d.location, d.free_space()),
        Err(_) => return 0,
    };
    if src_location != dst_location {
        return 0;
    }

    let requested = if amount == 0 { held } else { amount.min(held) };
    let moved = requested.min(free);
    if moved == 0 {
        return 0;
    }

    if let Ok(mut s) = world.get::<&mut Storage>(src) {
        if !s.remove(item, moved) {
            return 0;
        }
    } else {
        return 0;
    }
    match world.get::<&mut Storage>(dst) {
        Ok(mut d) => d.add(item, moved),
        Err(_) => {
            // target vanished between the check and the move; restore
            if let Ok(mut s) = world.get::<&mut Storage>(src) {
                s.add(item, moved);
            }
            0
        }
    }
}

/// Move every item the location constraint allows from `src` to `dst`.
/// Each item follows the single-item contract. Returns units moved.
pub fn transfer_all_cargo(world: &mut World, src: Entity, dst: Entity) -> u32 {
    let items: Vec<String> = match world.get::<&Storage>(src) {
        Ok(s) => s.items().keys().cloned().collect(),
        Err(_) => return 0,
    };

    let mut moved = 0;
    for item in items {
        moved += transfer_cargo(world, src, dst, &item, 0);
    }
    moved
}

/// Move bits between wallets. `amount = 0` means the entire balance.
/// Fails atomically (no mutation to either side) when the source
/// balance is insufficient.
pub fn transfer_bits(world: &mut World, src: Entity, dst: Entity, amount: u64) -> bool {
    let available = match world.get::<&Wallet>(src) {
        Ok(w) => w.bits(),
        Err(_) => return false,
    };
    let amount = if amount == 0 { available } else { amount };
    if available < amount {
        return false;
    }
    if src == dst || amount == 0 {
        return true; // nothing changes hands
    }

    if let Ok(mut w) = world.get::<&mut Wallet>(src) {
        if !w.debit(amount) {
            return false;
        }
    } else {
        return false;
    }
    match world.get::<&mut Wallet>(dst) {
        Ok(mut w) => {
            w.credit(amount);
            true
        }
        Err(_) => {
            if let Ok(mut w) = world.get::<&mut Wallet>(src) {
                w.credit(amount);
            }
            false
        }
    }
}

/// Value a storage's contents against an outpost's pricing guide:
/// Σ quantity × last-traded-or-starting price. Read-only; used for
/// net-worth reporting.
pub fn cargo_value(world: &World, storage: Entity, market: &Market) -> u64 {
    match world.get::<&Storage>(storage) {
        Ok(s) => s
            .items()
            .iter()
            .map(|(item, qty)| market.pricing.quote(item) * *qty as u64)
            .sum(),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_storage(world: &mut World, location: Option<u32>, capacity: Option<u32>) -> Entity {
        static NEXT: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(100);
        let id = NEXT.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        world.spawn((Storage::new(id, location, capacity),))
    }

    fn spawn_wallet(world: &mut World, bits: u64) -> Entity {
        let mut wallet = Wallet::new(1, None);
        wallet.add_bits(bits);
        world.spawn((wallet,))
    }

    fn held(world: &World, e: Entity, item: &str) -> u32 {
        world.get::<&Storage>(e).map(|s| s.amount_of(item)).unwrap_or(0)
    }

    fn bits(world: &World, e: Entity) -> u64 {
        world.get::<&Wallet>(e).map(|w| w.bits()).unwrap_or(0)
    }

    #[test]
    fn test_transfer_cargo_conserves_total() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        let b = spawn_storage(&mut world, Some(1), None);
        world.get::<&mut Storage>(a).unwrap().add("Ore.Iron", 10);

        let moved = transfer_cargo(&mut world, a, b, "Ore.Iron", 4);
        assert_eq!(moved, 4);
        assert_eq!(held(&world, a, "Ore.Iron") + held(&world, b, "Ore.Iron"), 10);
    }

    #[test]
    fn test_transfer_cargo_zero_means_all() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        let b = spawn_storage(&mut world, Some(1), None);
        world.get::<&mut Storage>(a).unwrap().add("Ore.Iron", 7);

        assert_eq!(transfer_cargo(&mut world, a, b, "Ore.Iron", 0), 7);
        assert_eq!(held(&world, a, "Ore.Iron"), 0);
        assert_eq!(held(&world, b, "Ore.Iron"), 7);
    }

    #[test]
    fn test_transfer_cargo_location_mismatch_is_noop() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        let b = spawn_storage(&mut world, Some(2), None);
        world.get::<&mut Storage>(a).unwrap().add("Ore.Iron", 5);

        assert_eq!(transfer_cargo(&mut world, a, b, "Ore.Iron", 5), 0);
        assert_eq!(held(&world, a, "Ore.Iron"), 5);
    }

    #[test]
    fn test_transfer_cargo_capped_by_destination_space() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        let b = spawn_storage(&mut world, Some(1), Some(3));
        world.get::<&mut Storage>(a).unwrap().add("Ore.Iron", 10);

        // only 3 fit; the other 7 stay put instead of vanishing
        assert_eq!(transfer_cargo(&mut world, a, b, "Ore.Iron", 10), 3);
        assert_eq!(held(&world, a, "Ore.Iron"), 7);
        assert_eq!(held(&world, b, "Ore.Iron"), 3);
    }

    #[test]
    fn test_transfer_all_cargo() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        let b = spawn_storage(&mut world, Some(1), None);
        {
            let mut s = world.get::<&mut Storage>(a).unwrap();
            s.add("Ore.Iron", 3);
            s.add("Food.Wheat", 2);
        }

        assert_eq!(transfer_all_cargo(&mut world, a, b), 5);
        assert!(world.get::<&Storage>(a).unwrap().is_empty());
        assert_eq!(held(&world, b, "Food.Wheat"), 2);
    }

    #[test]
    fn test_transfer_bits_insufficient_is_noop() {
        let mut world = World::new();
        let a = spawn_wallet(&mut world, 30);
        let b = spawn_wallet(&mut world, 0);

        assert!(!transfer_bits(&mut world, a, b, 31));
        assert_eq!(bits(&world, a), 30);
        assert_eq!(bits(&world, b), 0);
    }

    #[test]
    fn test_transfer_bits_zero_means_all() {
        let mut world = World::new();
        let a = spawn_wallet(&mut world, 30);
        let b = spawn_wallet(&mut world, 5);

        assert!(transfer_bits(&mut world, a, b, 0));
        assert_eq!(bits(&world, a), 0);
        assert_eq!(bits(&world, b), 35);
    }

    #[test]
    fn test_cargo_value_quotes_without_mutation() {
        let mut world = World::new();
        let a = spawn_storage(&mut world, Some(1), None);
        world.get::<&mut Storage>(a).unwrap().add("Ore.Iron", 3);

        let market = Market::new();
        // never traded: 3 × starting price
        assert_eq!(
            cargo_value(&world, a, &market),
            3 * starbazaar_logic::pricing::STARTING_PRICE
        );
    }
}
