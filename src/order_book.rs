//! Order Book - the central limit order book state.
//!
//! Owns the four cooperating components: the order index, the dense
//! price-level arrays, the per-side occupancy bitmaps with cached best
//! prices, and the trade buffer. All operations are synchronous and the
//! caller serializes access; on return from any public operation the
//! cached bests, bitmaps, and level totals are mutually consistent.

use rustc_hash::FxHashMap;

use crate::bitmap::LevelBitmap;
use crate::order::{Order, Quote, Side, Trade};
use crate::price_level::PriceLevel;
use crate::trades::TradeBuffer;

/// Exclusive upper bound on the price index range.
///
/// Prices are plain integers in the caller's minimal unit; the dense array
/// layout trades memory for single-load level access, so the domain is
/// bounded at compile time.
pub const MAX_PRICE: u32 = 100_000;

/// A two-sided limit order book with price-time priority matching.
///
/// Best-bid is cached as `0` when the buy side is empty and best-ask as
/// [`MAX_PRICE`] when the sell side is empty, matching the sentinel
/// conventions of [`Quote`].
pub struct OrderBook {
    /// Order index: id -> record. Exclusively owns order records; level
    /// FIFOs refer to them by id. Tombstoned records linger here until
    /// [`OrderBook::prune_tombstones`] runs.
    pub(crate) orders: FxHashMap<u64, Order>,
    /// Buy-side levels, indexed by price
    pub(crate) bids: Vec<PriceLevel>,
    /// Sell-side levels, indexed by price
    pub(crate) asks: Vec<PriceLevel>,
    /// Occupancy bitmap over `bids`
    pub(crate) bid_bitmap: LevelBitmap,
    /// Occupancy bitmap over `asks`
    pub(crate) ask_bitmap: LevelBitmap,
    /// Highest occupied buy price; 0 when no bids
    pub(crate) best_bid: u32,
    /// Lowest occupied sell price; MAX_PRICE when no asks
    pub(crate) best_ask: u32,
    /// Trades from the most recent matching pass
    pub(crate) trade_buffer: TradeBuffer,
}

impl OrderBook {
    /// Create an empty book covering prices `[0, MAX_PRICE)`.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create an empty book with the order index pre-sized for `orders`
    /// resting orders.
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            orders: FxHashMap::with_capacity_and_hasher(orders, Default::default()),
            bids: vec![PriceLevel::new(); MAX_PRICE as usize],
            asks: vec![PriceLevel::new(); MAX_PRICE as usize],
            bid_bitmap: LevelBitmap::new(MAX_PRICE),
            ask_bitmap: LevelBitmap::new(MAX_PRICE),
            best_bid: 0,
            best_ask: MAX_PRICE,
            trade_buffer: TradeBuffer::new(),
        }
    }

    // ========================================================================
    // Top-of-Book Access
    // ========================================================================

    /// Highest occupied buy price, or 0 when the book has no bids.
    #[inline]
    pub fn best_bid(&self) -> u32 {
        self.best_bid
    }

    /// Lowest occupied sell price, or `MAX_PRICE` when the book has no asks.
    #[inline]
    pub fn best_ask(&self) -> u32 {
        self.best_ask
    }

    /// Top-of-book snapshot.
    ///
    /// A side with no resting quantity reports both its fields as zero.
    pub fn quote(&self) -> Quote {
        let mut quote = Quote::default();

        if self.best_bid > 0 {
            let level = &self.bids[self.best_bid as usize];
            if level.total_quantity > 0 {
                quote.bid_price = self.best_bid;
                quote.bid_quantity = level.total_quantity;
            }
        }

        if self.best_ask < MAX_PRICE {
            let level = &self.asks[self.best_ask as usize];
            if level.total_quantity > 0 {
                quote.ask_price = self.best_ask;
                quote.ask_quantity = level.total_quantity;
            }
        }

        quote
    }

    // ========================================================================
    // Level Access
    // ========================================================================

    #[inline]
    pub(crate) fn level(&self, side: Side, price: u32) -> &PriceLevel {
        match side {
            Side::Buy => &self.bids[price as usize],
            Side::Sell => &self.asks[price as usize],
        }
    }

    #[inline]
    pub(crate) fn level_mut(&mut self, side: Side, price: u32) -> &mut PriceLevel {
        match side {
            Side::Buy => &mut self.bids[price as usize],
            Side::Sell => &mut self.asks[price as usize],
        }
    }

    /// Resting quantity and order count at a price level.
    pub fn depth_at(&self, side: Side, price: u32) -> (u32, usize) {
        if price >= MAX_PRICE {
            return (0, 0);
        }
        let level = self.level(side, price);
        (level.total_quantity, level.order_ids.len())
    }

    /// Reset a level that has become empty, clear its occupancy bit, and
    /// re-derive the cached best for that side if the level was the best.
    pub(crate) fn deactivate_level(&mut self, side: Side, price: u32) {
        self.level_mut(side, price).reset();
        match side {
            Side::Buy => {
                self.bid_bitmap.clear(price);
                if self.best_bid == price {
                    self.best_bid = self.bid_bitmap.highest_set().unwrap_or(0);
                }
            }
            Side::Sell => {
                self.ask_bitmap.clear(price);
                if self.best_ask == price {
                    self.best_ask = self.ask_bitmap.lowest_set().unwrap_or(MAX_PRICE);
                }
            }
        }
    }

    // ========================================================================
    // Cancel / Modify
    // ========================================================================

    /// Cancel a resting order.
    ///
    /// Unknown or already-tombstoned ids are ignored. The id is erased from
    /// its level's FIFO (linear scan), the level total is reduced by the
    /// remaining quantity, and the record leaves the order index.
    pub fn cancel_order(&mut self, order_id: u64) {
        let (side, price, quantity) = match self.orders.get_mut(&order_id) {
            Some(order) if !order.deleted => {
                order.deleted = true;
                (order.side, order.price, order.quantity)
            }
            _ => return,
        };

        let level = self.level_mut(side, price);
        let removed = level.remove_id(order_id);
        debug_assert!(removed, "live order missing from its level FIFO");
        debug_assert!(level.total_quantity >= quantity);
        level.total_quantity -= quantity;

        if level.is_empty() {
            self.deactivate_level(side, price);
        }

        self.orders.remove(&order_id);
    }

    /// Replace a resting order's quantity.
    ///
    /// Queue position is retained: this is a quantity-only amendment, and an
    /// upward amendment keeps time priority (callers needing standard
    /// loss-of-priority semantics must cancel and replace). Unknown or
    /// tombstoned ids are ignored.
    pub fn modify_order(&mut self, order_id: u64, new_quantity: u32) {
        let (side, price, old_quantity) = match self.orders.get_mut(&order_id) {
            Some(order) if !order.deleted => {
                let old = order.quantity;
                order.quantity = new_quantity;
                (order.side, order.price, old)
            }
            _ => return,
        };

        let level = self.level_mut(side, price);
        debug_assert!(level.total_quantity >= old_quantity);
        level.total_quantity = level.total_quantity - old_quantity + new_quantity;
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Physically erase every tombstoned record from the order index.
    ///
    /// Never required for correctness - the matching loop skips stale heads
    /// on its own - but bounds index growth under sustained fill traffic.
    pub fn prune_tombstones(&mut self) {
        self.orders.retain(|_, order| !order.deleted);
    }

    /// Remove every order and reset the book to its initial state.
    ///
    /// Walks both level arrays, so this is O(MAX_PRICE).
    pub fn clear(&mut self) {
        self.orders.clear();
        for level in &mut self.bids {
            level.reset();
        }
        for level in &mut self.asks {
            level.reset();
        }
        self.bid_bitmap.clear_all();
        self.ask_bitmap.clear_all();
        self.best_bid = 0;
        self.best_ask = MAX_PRICE;
    }

    /// Pre-fault the level arrays so the first matching pass does not take
    /// page faults on cold memory.
    pub fn warm_up(&mut self) {
        for level in self.bids.iter_mut().chain(self.asks.iter_mut()) {
            // Volatile write to prevent the touch being optimized out
            unsafe {
                std::ptr::write_volatile(&mut level.price, level.price);
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Trades recorded by the most recent `add_order` call, in execution
    /// order. Valid only until the next mutating call.
    #[inline]
    pub fn trades(&self) -> &[Trade] {
        self.trade_buffer.as_slice()
    }

    /// Look up an order record (tombstoned records included).
    #[inline]
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Number of records in the order index.
    ///
    /// Includes tombstones until [`OrderBook::prune_tombstones`] runs.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// True if the order index holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid)
            .field("best_ask", &self.best_ask)
            .field("bid_levels", &self.bid_bitmap.count_ones())
            .field("ask_levels", &self.ask_bitmap.count_ones())
            .field("order_count", &self.orders.len())
            .finish()
    }
}
