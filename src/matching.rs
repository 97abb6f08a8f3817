//! Matching - the cross/rest algorithm for incoming orders.
//!
//! An incoming order first consumes liquidity from the opposite side in
//! price-time order (best price first, FIFO head first within a level),
//! then rests any unfilled remainder in the book.

use crate::order::{Order, Side, Trade};
use crate::order_book::{OrderBook, MAX_PRICE};

impl OrderBook {
    /// Submit an order: match against the opposite side up to the limit
    /// price, then rest the remainder.
    ///
    /// Executed trades are available from [`OrderBook::trades`] until the
    /// next mutating call. A price outside `[0, MAX_PRICE)` is silently
    /// ignored, and duplicate ids are the caller's responsibility.
    pub fn add_order(&mut self, order_id: u64, side: Side, price: u32, quantity: u32) {
        if price >= MAX_PRICE {
            return;
        }

        // Phase 1: cross against the opposite side
        let filled = self.fill(order_id, side, price, quantity);
        if filled >= quantity {
            return;
        }

        // Phase 2: rest the remainder
        let remaining = quantity - filled;
        let level = self.level_mut(side, price);
        let was_empty = level.is_empty();
        level.push_order(price, order_id, remaining);

        self.orders
            .insert(order_id, Order::new(order_id, side, price, remaining));

        if was_empty {
            match side {
                Side::Buy => self.bid_bitmap.set(price),
                Side::Sell => self.ask_bitmap.set(price),
            }
        }

        // A newly rested order can only improve the best incrementally;
        // no scan needed on this path.
        match side {
            Side::Buy => {
                if price > self.best_bid {
                    self.best_bid = price;
                }
            }
            Side::Sell => {
                if price < self.best_ask {
                    self.best_ask = price;
                }
            }
        }
    }

    /// The matching loop. Returns the filled quantity; trades land in the
    /// trade buffer (excess beyond its capacity executes but is dropped
    /// from the record).
    fn fill(&mut self, order_id: u64, side: Side, limit: u32, quantity: u32) -> u32 {
        let mut remaining = quantity;
        let mut filled = 0u32;
        self.trade_buffer.clear();

        while remaining > 0 {
            // Best opposite price, or done if nothing crosses the limit
            let best = match side {
                Side::Buy => {
                    if self.best_ask >= MAX_PRICE || self.best_ask > limit {
                        break;
                    }
                    self.best_ask
                }
                Side::Sell => {
                    if self.best_bid == 0 || self.best_bid < limit {
                        break;
                    }
                    self.best_bid
                }
            };
            let maker_side = side.opposite();

            let resting_id = match self.level(maker_side, best).front() {
                Some(id) => id,
                None => {
                    // bit set but level drained; drop the bit and rescan
                    self.deactivate_level(maker_side, best);
                    continue;
                }
            };

            // Stale-order skip: tombstoned heads and heads with no record
            // are popped, not matched. Anything live trades, even an order
            // amended down to zero (it records an empty fill and leaves).
            let match_qty;
            let maker_done;
            match self.orders.get_mut(&resting_id) {
                Some(order) if !order.deleted => {
                    match_qty = remaining.min(order.quantity);
                    order.quantity -= match_qty;
                    maker_done = order.quantity == 0;
                    if maker_done {
                        order.deleted = true; // tombstone; pruned later
                    }
                }
                _ => {
                    self.pop_stale_head(maker_side, best);
                    continue;
                }
            }

            let trade = match side {
                Side::Buy => Trade::new(order_id, resting_id, best, match_qty),
                Side::Sell => Trade::new(resting_id, order_id, best, match_qty),
            };
            self.trade_buffer.push(trade);

            remaining -= match_qty;
            filled += match_qty;

            let level = self.level_mut(maker_side, best);
            debug_assert!(level.total_quantity >= match_qty);
            level.total_quantity -= match_qty;

            if maker_done {
                level.pop_front();
                if level.is_empty() {
                    self.deactivate_level(maker_side, best);
                }
            }
        }

        filled
    }

    /// Pop a head with no live record behind it, deactivating the level if
    /// that emptied it.
    fn pop_stale_head(&mut self, side: Side, price: u32) {
        let level = self.level_mut(side, price);
        level.pop_front();
        if level.is_empty() {
            self.deactivate_level(side, price);
        }
    }
}
