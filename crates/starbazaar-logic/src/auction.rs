//! Bid allocation planning for the daily clearing pass.
//!
//! The planner answers "who gets how many units at what price" for one
//! item, from a snapshot of supply, bids, and bidder balances. The core
//! engine applies a plan with real escrow transfers (which can still
//! shrink a fill, e.g. a full destination hold); the math itself lives
//! here so it can be tested without a world.

/// One bid, snapshotted for planning: what the bidder wants and what
/// their wallet held when the pass started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidOffer {
    pub quantity: u32,
    pub unit_price: u64,
    pub funds: u64,
}

/// A planned award: `quantity` units to the bid at `bid_index` (into
/// the caller's slice), at its own unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub bid_index: usize,
    pub quantity: u32,
    pub unit_price: u64,
}

/// Units a single bid can actually take: capped by remaining supply,
/// by the requested quantity, and by what the wallet affords at the
/// offered unit price. A zero unit price fills nothing (guards the
/// division).
pub fn fillable(supply: u32, quantity: u32, funds: u64, unit_price: u64) -> u32 {
    if unit_price == 0 {
        return 0;
    }
    let affordable = funds / unit_price;
    let affordable = affordable.min(u32::MAX as u64) as u32;
    supply.min(quantity).min(affordable)
}

/// Plan the allocation of `supply` units across `bids`.
///
/// Bids are walked highest unit price first; the caller shuffles the
/// slice beforehand so equal prices tie-break fairly (the sort here is
/// stable). Allocation keeps walking until supply is exhausted; every
/// bid that can afford at least one unit at its price may win.
pub fn plan_fills(supply: u32, bids: &[BidOffer]) -> Vec<Fill> {
    let mut order: Vec<usize> = (0..bids.len()).collect();
    order.sort_by(|&a, &b| bids[b].unit_price.cmp(&bids[a].unit_price));

    let mut remaining = supply;
    let mut fills = Vec::new();

    for index in order {
        if remaining == 0 {
            break;
        }
        let bid = &bids[index];
        let amount = fillable(remaining, bid.quantity, bid.funds, bid.unit_price);
        if amount == 0 {
            continue;
        }
        fills.push(Fill {
            bid_index: index,
            quantity: amount,
            unit_price: bid.unit_price,
        });
        remaining -= amount;
    }

    fills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fillable_caps() {
        // supply-bound
        assert_eq!(fillable(3, 10, 1000, 50), 3);
        // quantity-bound
        assert_eq!(fillable(10, 4, 1000, 50), 4);
        // funds-bound: 45 bits at 10 per unit affords 4 of the 5 asked
        assert_eq!(fillable(10, 5, 45, 10), 4);
    }

    #[test]
    fn test_fillable_zero_price_guard() {
        assert_eq!(fillable(10, 5, 1000, 0), 0);
    }

    #[test]
    fn test_plan_exhausts_supply_across_bids() {
        // 10 units on offer, A wants 6 @ 50, B wants 10 @ 40
        let bids = [
            BidOffer { quantity: 6, unit_price: 50, funds: 1000 },
            BidOffer { quantity: 10, unit_price: 40, funds: 1000 },
        ];
        let fills = plan_fills(10, &bids);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0], Fill { bid_index: 0, quantity: 6, unit_price: 50 });
        assert_eq!(fills[1], Fill { bid_index: 1, quantity: 4, unit_price: 40 });
    }

    #[test]
    fn test_plan_skips_broke_bidders() {
        let bids = [
            BidOffer { quantity: 5, unit_price: 90, funds: 10 },
            BidOffer { quantity: 5, unit_price: 30, funds: 1000 },
        ];
        let fills = plan_fills(5, &bids);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].bid_index, 1);
        assert_eq!(fills[0].quantity, 5);
    }

    #[test]
    fn test_plan_stable_for_equal_prices() {
        // equal prices keep slice order; the caller's shuffle is the
        // randomness, not the sort
        let bids = [
            BidOffer { quantity: 2, unit_price: 50, funds: 1000 },
            BidOffer { quantity: 2, unit_price: 50, funds: 1000 },
            BidOffer { quantity: 2, unit_price: 50, funds: 1000 },
        ];
        let fills = plan_fills(4, &bids);
        assert_eq!(
            fills.iter().map(|f| f.bid_index).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_plan_empty_inputs() {
        assert!(plan_fills(0, &[]).is_empty());
        assert!(plan_fills(
            5,
            &[BidOffer { quantity: 0, unit_price: 10, funds: 100 }]
        )
        .is_empty());
    }
}
